use crate::config::BindingConfig;
use crate::convert::datetime::parse_datetime;
use crate::error::{ArgumentError, CellbindError, CellbindResult};
use crate::policy::{Culture, DateTimeStyles};
use crate::registry::ConverterRegistry;
use crate::types::{CellValue, TypeTag};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

/// Shape of the raw cell handed to the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum RawKind {
    /// A text cell
    #[default]
    Text,
    /// A numeric cell (dates as serials)
    Number,
    /// A boolean cell
    Bool,
    /// A native date cell, given as ISO-8601
    Date,
    /// A blank cell; the value is ignored
    Empty,
}

/// Inputs of the convert command.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub type_name: String,
    pub value: String,
    pub raw_kind: RawKind,
    pub culture: Option<String>,
    pub config: Option<PathBuf>,
    pub map: Option<String>,
    pub column: Option<String>,
}

/// Outcome of one conversion, as printed by the convert command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionReport {
    #[serde(rename = "type")]
    pub type_name: String,
    pub culture: String,
    pub raw: String,
    pub raw_kind: String,
    pub value: String,
    pub value_kind: String,
    pub external: String,
    pub external_kind: String,
    pub native: bool,
    pub display_format: Option<String>,
}

/// Build the raw cell for `kind` from command-line text.
pub fn raw_cell(kind: RawKind, value: &str) -> CellbindResult<CellValue> {
    let cell = match kind {
        RawKind::Text => CellValue::String(value.to_string()),
        RawKind::Number => value.trim().parse::<f64>().map(CellValue::Number).map_err(|e| {
            ArgumentError::new(format!("'{}' is not a number: {}", value, e))
        })?,
        RawKind::Bool => value.trim().parse::<bool>().map(CellValue::Bool).map_err(|e| {
            ArgumentError::new(format!("'{}' is not a boolean: {}", value, e))
        })?,
        RawKind::Date => CellValue::DateTime(parse_datetime(
            value,
            Culture::invariant(),
            DateTimeStyles::empty(),
        )?),
        RawKind::Empty => CellValue::Empty,
    };
    Ok(cell)
}

/// Convert one raw value and describe both directions.
pub fn convert_value(options: &ConvertOptions) -> CellbindResult<ConversionReport> {
    let config = match &options.config {
        Some(path) => BindingConfig::from_path(path)?,
        None => BindingConfig::default(),
    };

    let mut policy = config.policy_for(options.map.as_deref(), options.column.as_deref())?;
    if let Some(id) = &options.culture {
        let culture = Culture::get(id)
            .ok_or_else(|| CellbindError::Config(format!("Unknown culture '{}'", id)))?;
        policy = policy.with_culture(culture);
    }

    let ty = config.resolve_type(&options.type_name)?;
    let converter = ConverterRegistry::global().get_converter(&ty)?;
    let raw = raw_cell(options.raw_kind, &options.value)?;

    let typed = converter.convert_from_external(&policy, &raw)?;
    let external = if converter.accepts_native_type() {
        typed.to_native_cell()
    } else {
        converter.convert_to_external(&policy, &typed)?
    };

    Ok(ConversionReport {
        type_name: ty.to_string(),
        culture: policy.culture.name().to_string(),
        raw: raw.to_string(),
        raw_kind: raw.type_name().to_string(),
        value: typed.to_string(),
        value_kind: typed.type_name().to_string(),
        external: external.to_string(),
        external_kind: external.type_name().to_string(),
        native: converter.accepts_native_type(),
        display_format: converter.display_format(&policy).map(str::to_string),
    })
}

/// Execute the convert command
pub fn convert(options: ConvertOptions, json: bool) -> CellbindResult<()> {
    let report = convert_value(&options)?;

    if json {
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| CellbindError::Config(format!("Cannot serialize report: {}", e)))?;
        println!("{}", text);
        return Ok(());
    }

    println!("{}", "Cellbind - Converting cell value".bold().green());
    println!("   Type:    {}", report.type_name.bright_blue().bold());
    println!("   Culture: {}", report.culture);
    println!("   Raw:     {} ({})", report.raw.cyan(), report.raw_kind);
    println!();
    println!(
        "{} {} ({})",
        "Value:".bold().green(),
        report.value.bold(),
        report.value_kind
    );
    println!(
        "   External: {} ({})",
        report.external.cyan(),
        report.external_kind
    );
    println!(
        "   Native:   {}",
        if report.native {
            "yes".green()
        } else {
            "no".yellow()
        }
    );
    if let Some(format) = &report.display_format {
        println!("   Format:   {}", format);
    }
    Ok(())
}

/// Execute the types command
pub fn types(config: Option<PathBuf>) -> CellbindResult<()> {
    let registry = ConverterRegistry::global();

    // Resolve configured enums so their converters show up
    if let Some(path) = &config {
        let config = BindingConfig::from_path(path)?;
        for name in config.enums.keys() {
            if let Some(ty) = config.enum_type(name) {
                registry.get_converter(&TypeTag::nullable(TypeTag::Enum(ty)))?;
            }
        }
    }

    println!("{}", "Registered converters:".bold().green());
    for ty in registry.registered_types() {
        let converter = registry.get_converter(&ty)?;
        let native = if converter.accepts_native_type() {
            "native".green()
        } else {
            "text".yellow()
        };
        println!("   {:<16} {}", ty.to_string().bright_blue(), native);
    }
    Ok(())
}
