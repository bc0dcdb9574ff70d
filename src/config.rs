//! YAML binding configuration
//!
//! Describes the policy layers a mapping layer merges for each column,
//! plus the enums its properties use:
//!
//! ```yaml
//! defaults:
//!   culture: de-DE
//! enums:
//!   Status:
//!     variants: [{ name: Active, value: 1 }, { name: Inactive, value: 2 }]
//! maps:
//!   Invoice:
//!     defaults: { number_style: "FLOAT | ALLOW_THOUSANDS" }
//!     columns:
//!       paid: { boolean_true_values: ["1"], boolean_false_values: ["0", ""] }
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{CellbindError, CellbindResult};
use crate::policy::{ConversionPolicy, PolicyLayer};
use crate::types::{EnumType, TypeTag};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BindingConfig {
    /// Global configuration layer
    pub defaults: PolicyLayer,
    pub enums: BTreeMap<String, EnumConfig>,
    /// Class maps by name
    pub maps: BTreeMap<String, MapConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumConfig {
    #[serde(default)]
    pub flags: bool,
    pub variants: Vec<VariantConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariantConfig {
    pub name: String,
    pub value: i64,
}

/// Policy layers of one class map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    pub defaults: PolicyLayer,
    pub columns: BTreeMap<String, PolicyLayer>,
}

impl BindingConfig {
    /// Load and validate a binding configuration file.
    ///
    /// # Arguments
    /// * `path` - Path to the YAML file
    ///
    /// # Returns
    /// * `Ok(BindingConfig)` - every culture, style and enum in the file is valid
    /// * `Err(CellbindError)` - unreadable file, malformed YAML or invalid settings
    ///
    /// # Example
    /// ```no_run
    /// use cellbind::config::BindingConfig;
    /// use std::path::Path;
    ///
    /// let config = BindingConfig::from_path(Path::new("binding.yaml"))?;
    /// let policy = config.policy_for(Some("Invoice"), Some("paid"))?;
    /// println!("Culture: {}", policy.culture.name());
    /// # Ok::<(), cellbind::error::CellbindError>(())
    /// ```
    pub fn from_path(path: &Path) -> CellbindResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            enums = config.enums.len(),
            maps = config.maps.len(),
            "loaded binding configuration"
        );
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> CellbindResult<Self> {
        let config: BindingConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    // Merge every layer once so bad cultures or styles fail at load time.
    fn validate(&self) -> CellbindResult<()> {
        ConversionPolicy::merged([&self.defaults])?;
        for (map_name, map) in &self.maps {
            ConversionPolicy::merged([&self.defaults, &map.defaults])
                .map_err(|e| in_context(format!("map '{}'", map_name), e))?;
            for (column, layer) in &map.columns {
                ConversionPolicy::merged([&self.defaults, &map.defaults, layer])
                    .map_err(|e| in_context(format!("column '{}.{}'", map_name, column), e))?;
            }
        }

        for (name, config) in &self.enums {
            if config.variants.is_empty() {
                return Err(CellbindError::Config(format!(
                    "Enum '{}' has no variants",
                    name
                )));
            }
            let mut seen = HashSet::new();
            for variant in &config.variants {
                if !seen.insert(variant.name.to_lowercase()) {
                    return Err(CellbindError::Config(format!(
                        "Enum '{}' declares variant '{}' twice",
                        name, variant.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Policy for a column: built-in → `defaults` → map defaults → column.
    ///
    /// Columns without overrides are fine; an unknown map is an error.
    pub fn policy_for(
        &self,
        map: Option<&str>,
        column: Option<&str>,
    ) -> CellbindResult<ConversionPolicy> {
        let mut layers = vec![&self.defaults];
        match (map, column) {
            (Some(name), column) => {
                let map = self
                    .maps
                    .get(name)
                    .ok_or_else(|| CellbindError::Config(format!("Unknown map '{}'", name)))?;
                layers.push(&map.defaults);
                if let Some(layer) = column.and_then(|c| map.columns.get(c)) {
                    layers.push(layer);
                }
            }
            (None, Some(column)) => {
                return Err(CellbindError::Config(format!(
                    "Column '{}' needs a map",
                    column
                )))
            }
            (None, None) => {}
        }
        ConversionPolicy::merged(layers)
    }

    /// The configured enum called `name`.
    pub fn enum_type(&self, name: &str) -> Option<Arc<EnumType>> {
        let config = self.enums.get(name)?;
        let variants = config
            .variants
            .iter()
            .map(|variant| (variant.name.clone(), variant.value));
        Some(Arc::new(
            EnumType::new(name, variants).with_flags(config.flags),
        ))
    }

    /// Parse a type name, resolving configured enums.
    pub fn resolve_type(&self, name: &str) -> CellbindResult<TypeTag> {
        Ok(TypeTag::parse_with(name, &|n| self.enum_type(n))?)
    }
}

fn in_context(context: String, err: CellbindError) -> CellbindError {
    match err {
        CellbindError::Config(message) => CellbindError::Config(format!("{}: {}", context, message)),
        other => other,
    }
}
