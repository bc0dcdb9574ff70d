//! Conversion policy: the settings that resolve ambiguous conversions
//!
//! A [`ConversionPolicy`] is an immutable snapshot handed to every converter
//! call. The mapping layer builds it by layering [`PolicyLayer`]s on top of
//! the built-in defaults:
//!
//! ```text
//! built-in defaults → global configuration → class map → column
//! ```
//!
//! Later layers win. List-valued fields (boolean tokens) are replaced
//! wholesale, never unioned.

mod culture;
mod styles;

pub use culture::{
    Culture, DateOrder, DE_CH, DE_DE, EN_GB, EN_US, ES_ES, FR_FR, INVARIANT, IT_IT, SV_SE,
};
pub use styles::{DateTimeStyles, NumberStyles};

use serde::{Deserialize, Serialize};

use crate::error::{CellbindError, CellbindResult};

/// Tokens recognised as `true` when a policy supplies none.
pub const DEFAULT_TRUE_VALUES: [&str; 3] = ["true", "yes", "y"];

/// Tokens recognised as `false` when a policy supplies none.
pub const DEFAULT_FALSE_VALUES: [&str; 3] = ["false", "no", "n"];

/// Settings for a single conversion call.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionPolicy {
    pub culture: &'static Culture,
    /// `None` selects the target type's default style
    pub number_styles: Option<NumberStyles>,
    pub date_styles: DateTimeStyles,
    /// Display format for numeric columns, passed through as a hint
    pub number_format: Option<String>,
    /// Display format for date columns, passed through as a hint
    pub date_format: Option<String>,
    /// First entry is the canonical output token
    pub boolean_true_values: Vec<String>,
    /// First entry is the canonical output token
    pub boolean_false_values: Vec<String>,
    /// The column holds a formula; only the I/O layer looks at this
    pub formula: bool,
}

impl Default for ConversionPolicy {
    fn default() -> Self {
        Self {
            culture: Culture::invariant(),
            number_styles: None,
            date_styles: DateTimeStyles::empty(),
            number_format: None,
            date_format: None,
            boolean_true_values: DEFAULT_TRUE_VALUES.iter().map(|s| s.to_string()).collect(),
            boolean_false_values: DEFAULT_FALSE_VALUES.iter().map(|s| s.to_string()).collect(),
            formula: false,
        }
    }
}

impl ConversionPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `layers` left to right on top of the built-in defaults.
    pub fn merged<'a, I>(layers: I) -> CellbindResult<Self>
    where
        I: IntoIterator<Item = &'a PolicyLayer>,
    {
        let mut policy = Self::default();
        for layer in layers {
            policy.apply(layer)?;
        }
        tracing::debug!(
            culture = policy.culture.name(),
            number_styles = ?policy.number_styles,
            "merged conversion policy"
        );
        Ok(policy)
    }

    /// Override this policy with every field `layer` sets.
    pub fn apply(&mut self, layer: &PolicyLayer) -> CellbindResult<()> {
        if let Some(id) = &layer.culture {
            self.culture = Culture::get(id)
                .ok_or_else(|| CellbindError::Config(format!("Unknown culture '{}'", id)))?;
        }
        if let Some(style) = non_empty(&layer.number_style) {
            let styles = bitflags::parser::from_str::<NumberStyles>(style).map_err(|e| {
                CellbindError::Config(format!("Invalid number style '{}': {}", style, e))
            })?;
            self.number_styles = Some(styles);
        }
        if let Some(style) = non_empty(&layer.date_style) {
            self.date_styles = bitflags::parser::from_str::<DateTimeStyles>(style).map_err(|e| {
                CellbindError::Config(format!("Invalid date style '{}': {}", style, e))
            })?;
        }
        if let Some(format) = non_empty(&layer.number_format) {
            self.number_format = Some(format.to_string());
        }
        if let Some(format) = non_empty(&layer.date_format) {
            self.date_format = Some(format.to_string());
        }
        replace_tokens(&mut self.boolean_true_values, &layer.boolean_true_values);
        replace_tokens(&mut self.boolean_false_values, &layer.boolean_false_values);
        if let Some(formula) = layer.formula {
            self.formula = formula;
        }
        Ok(())
    }

    pub fn with_culture(mut self, culture: &'static Culture) -> Self {
        self.culture = culture;
        self
    }

    pub fn with_number_styles(mut self, styles: NumberStyles) -> Self {
        self.number_styles = Some(styles);
        self
    }

    pub fn with_date_styles(mut self, styles: DateTimeStyles) -> Self {
        self.date_styles = styles;
        self
    }

    pub fn with_number_format(mut self, format: impl Into<String>) -> Self {
        self.number_format = Some(format.into());
        self
    }

    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = Some(format.into());
        self
    }

    pub fn with_true_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.boolean_true_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_false_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.boolean_false_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_formula(mut self, formula: bool) -> Self {
        self.formula = formula;
        self
    }

    /// The configured number style, or `default` when none is set.
    pub fn number_styles_or(&self, default: NumberStyles) -> NumberStyles {
        self.number_styles.unwrap_or(default)
    }

    /// Effective true tokens; never empty.
    pub fn true_values(&self) -> Vec<&str> {
        effective_tokens(&self.boolean_true_values, &DEFAULT_TRUE_VALUES)
    }

    /// Effective false tokens; never empty.
    pub fn false_values(&self) -> Vec<&str> {
        effective_tokens(&self.boolean_false_values, &DEFAULT_FALSE_VALUES)
    }
}

fn effective_tokens<'a>(tokens: &'a [String], defaults: &[&'static str]) -> Vec<&'a str> {
    if tokens.is_empty() {
        defaults.to_vec()
    } else {
        tokens.iter().map(String::as_str).collect()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn replace_tokens(current: &mut Vec<String>, layer: &Option<Vec<String>>) {
    if let Some(tokens) = layer {
        if !tokens.is_empty() && tokens != current {
            *current = tokens.clone();
        }
    }
}

/// One level of policy overrides, as written in a configuration file.
///
/// Every field is optional; unset fields leave the layer below untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyLayer {
    /// Locale tag, e.g. `de-DE`
    pub culture: Option<String>,
    /// Flag names, e.g. `"FLOAT | ALLOW_THOUSANDS"`
    pub number_style: Option<String>,
    /// Flag names, e.g. `"ADJUST_TO_UNIVERSAL"`
    pub date_style: Option<String>,
    pub number_format: Option<String>,
    pub date_format: Option<String>,
    pub boolean_true_values: Option<Vec<String>>,
    pub boolean_false_values: Option<Vec<String>>,
    pub formula: Option<bool>,
}

impl PolicyLayer {
    pub fn is_empty(&self) -> bool {
        self == &PolicyLayer::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn layer_with_tokens(truthy: &[&str], falsy: &[&str]) -> PolicyLayer {
        PolicyLayer {
            boolean_true_values: Some(truthy.iter().map(|s| s.to_string()).collect()),
            boolean_false_values: Some(falsy.iter().map(|s| s.to_string()).collect()),
            ..PolicyLayer::default()
        }
    }

    #[test]
    fn test_defaults() {
        let policy = ConversionPolicy::default();
        assert!(policy.culture.is_invariant());
        assert_eq!(policy.true_values(), vec!["true", "yes", "y"]);
        assert_eq!(policy.false_values(), vec!["false", "no", "n"]);
        assert!(!policy.formula);
        assert!(policy.number_styles.is_none());
    }

    #[test]
    fn test_empty_token_lists_fall_back_to_defaults() {
        let policy = ConversionPolicy::default()
            .with_true_values(Vec::<String>::new())
            .with_false_values(Vec::<String>::new());
        assert_eq!(policy.true_values(), vec!["true", "yes", "y"]);
        assert_eq!(policy.false_values(), vec!["false", "no", "n"]);
    }

    #[test]
    fn test_merge_most_specific_wins() {
        let global = PolicyLayer {
            culture: Some("de-DE".into()),
            number_style: Some("FLOAT".into()),
            ..layer_with_tokens(&["ja"], &["nein"])
        };
        let class_map = PolicyLayer {
            number_style: Some("FLOAT | ALLOW_THOUSANDS".into()),
            ..PolicyLayer::default()
        };
        let column = layer_with_tokens(&["1"], &["0", ""]);

        let policy = ConversionPolicy::merged([&global, &class_map, &column]).unwrap();

        assert_eq!(policy.culture.id, "de-DE");
        assert_eq!(
            policy.number_styles,
            Some(NumberStyles::FLOAT_AND_THOUSANDS)
        );
        assert_eq!(policy.true_values(), vec!["1"]);
        assert_eq!(policy.false_values(), vec!["0", ""]);
    }

    #[test]
    fn test_merge_lists_replace_not_union() {
        let global = layer_with_tokens(&["ja", "yes"], &["nein"]);
        let column = layer_with_tokens(&["x"], &[]);

        let policy = ConversionPolicy::merged([&global, &column]).unwrap();

        assert_eq!(policy.true_values(), vec!["x"]);
        // an empty list does not override
        assert_eq!(policy.false_values(), vec!["nein"]);
    }

    #[test]
    fn test_merge_unset_fields_keep_lower_layer() {
        let global = PolicyLayer {
            formula: Some(true),
            date_format: Some("yyyy-mm-dd".into()),
            ..PolicyLayer::default()
        };
        let column = PolicyLayer {
            date_format: Some("   ".into()),
            ..PolicyLayer::default()
        };

        let policy = ConversionPolicy::merged([&global, &column]).unwrap();

        assert!(policy.formula);
        assert_eq!(policy.date_format.as_deref(), Some("yyyy-mm-dd"));
    }

    #[test]
    fn test_merge_rejects_unknown_culture_and_styles() {
        let bad_culture = PolicyLayer {
            culture: Some("xx-YY".into()),
            ..PolicyLayer::default()
        };
        assert!(ConversionPolicy::merged([&bad_culture]).is_err());

        let bad_style = PolicyLayer {
            number_style: Some("ALLOW_EVERYTHING".into()),
            ..PolicyLayer::default()
        };
        assert!(ConversionPolicy::merged([&bad_style]).is_err());
    }

    #[test]
    fn test_layer_is_empty() {
        assert!(PolicyLayer::default().is_empty());
        assert!(!layer_with_tokens(&["1"], &[]).is_empty());
    }
}
