//! Policy layering and binding configuration tests

use cellbind::config::BindingConfig;
use cellbind::policy::{ConversionPolicy, DateTimeStyles, NumberStyles, PolicyLayer, DE_DE, FR_FR};
use cellbind::registry::ConverterRegistry;
use cellbind::types::{CellValue, TypedValue};
use cellbind::CellbindError;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

const BINDING: &str = r##"
defaults:
  culture: de-DE
  boolean_true_values: [ja, yes]
  boolean_false_values: [nein, no]
enums:
  Status:
    variants:
      - { name: Active, value: 1 }
      - { name: Inactive, value: 2 }
maps:
  Invoice:
    defaults:
      number_style: "FLOAT | ALLOW_THOUSANDS"
      date_style: "NO_CURRENT_DATE_DEFAULT"
    columns:
      paid:
        boolean_true_values: ["1"]
        boolean_false_values: ["0", ""]
      amount:
        culture: fr-FR
        number_format: "#,##0.00"
"##;

fn write_binding(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("binding.yaml");
    fs::write(&path, BINDING).unwrap();
    path
}

// ═══════════════════════════════════════════════════════════════════════════
// LAYER MERGING
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_merge_order_most_specific_wins() {
    let global = PolicyLayer {
        culture: Some("de-DE".into()),
        number_format: Some("0.0".into()),
        ..Default::default()
    };
    let column = PolicyLayer {
        number_format: Some("0.000".into()),
        ..Default::default()
    };
    let policy = ConversionPolicy::merged([&global, &PolicyLayer::default(), &column]).unwrap();
    assert_eq!(policy.culture, &DE_DE);
    assert_eq!(policy.number_format.as_deref(), Some("0.000"));
}

#[test]
fn test_token_lists_never_empty() {
    let layer = PolicyLayer {
        boolean_true_values: Some(vec![]),
        ..Default::default()
    };
    let policy = ConversionPolicy::merged([&layer]).unwrap();
    assert!(!policy.true_values().is_empty());
    assert!(!policy.false_values().is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// BINDING CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_column_policies_from_file() {
    let dir = TempDir::new().unwrap();
    let config = BindingConfig::from_path(&write_binding(&dir)).unwrap();

    let paid = config.policy_for(Some("Invoice"), Some("paid")).unwrap();
    assert_eq!(paid.culture, &DE_DE);
    assert_eq!(paid.number_styles, Some(NumberStyles::FLOAT | NumberStyles::ALLOW_THOUSANDS));
    assert_eq!(paid.date_styles, DateTimeStyles::NO_CURRENT_DATE_DEFAULT);
    assert_eq!(paid.true_values(), vec!["1"]);

    let amount = config.policy_for(Some("Invoice"), Some("amount")).unwrap();
    assert_eq!(amount.culture, &FR_FR);
    assert_eq!(amount.true_values(), vec!["ja", "yes"]);
}

#[test]
fn test_policies_drive_conversions() {
    let config = BindingConfig::from_yaml_str(BINDING).unwrap();
    let registry = ConverterRegistry::global();

    let paid = config.policy_for(Some("Invoice"), Some("paid")).unwrap();
    let flag = registry.get_converter(&config.resolve_type("bool").unwrap()).unwrap();
    assert_eq!(flag.convert_from_external(&paid, &CellValue::Empty).unwrap(), TypedValue::Bool(false));
    assert_eq!(flag.convert_to_external(&paid, &TypedValue::Bool(true)).unwrap(), CellValue::Number(1.0));

    let global = config.policy_for(None, None).unwrap();
    assert_eq!(flag.convert_from_external(&global, &"Ja".into()).unwrap(), TypedValue::Bool(true));
    assert_eq!(flag.convert_from_external(&global, &"nein".into()).unwrap(), TypedValue::Bool(false));

    let amount = config.policy_for(Some("Invoice"), Some("amount")).unwrap();
    let number = registry.get_converter(&config.resolve_type("double").unwrap()).unwrap();
    assert_eq!(
        number.convert_from_external(&amount, &"1 234,5".into()).unwrap(),
        TypedValue::F64(1234.5)
    );
    assert_eq!(number.display_format(&amount), Some("#,##0.00"));
}

#[test]
fn test_configured_enum_resolves_through_registry() {
    let config = BindingConfig::from_yaml_str(BINDING).unwrap();
    let ty = config.resolve_type("Status?").unwrap();
    let converter = ConverterRegistry::global().get_converter(&ty).unwrap();
    let policy = config.policy_for(None, None).unwrap();

    assert_eq!(converter.convert_from_external(&policy, &"".into()).unwrap(), TypedValue::Null);
    let value = converter.convert_from_external(&policy, &"ACTIVE".into()).unwrap();
    assert_eq!(
        converter.convert_to_external(&policy, &value).unwrap(),
        CellValue::String("Active".into())
    );
}

#[test]
fn test_invalid_configuration_is_reported() {
    let err = BindingConfig::from_yaml_str("defaults: { culture: tlh-KL }").unwrap_err();
    assert!(matches!(err, CellbindError::Config(_)));
    assert!(err.to_string().contains("tlh-KL"));

    let err = BindingConfig::from_yaml_str("maps: [1, 2]").unwrap_err();
    assert!(matches!(err, CellbindError::Yaml(_)));
}
