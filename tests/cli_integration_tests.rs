//! CLI integration tests
//!
//! Run the compiled binary end to end. Skipped under coverage builds.

#![cfg(not(coverage))]
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cellbind() -> Command {
    let mut cmd = Command::cargo_bin("cellbind").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("CELLBIND_CONFIG");
    cmd
}

const BINDING: &str = r#"
defaults:
  culture: de-DE
enums:
  Status:
    variants:
      - { name: Active, value: 1 }
      - { name: Inactive, value: 2 }
maps:
  Invoice:
    columns:
      paid:
        boolean_true_values: ["1", "x"]
        boolean_false_values: ["0", ""]
"#;

fn binding(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("binding.yaml");
    fs::write(&path, BINDING).unwrap();
    path
}

// ═══════════════════════════════════════════════════════════════════════════
// HELP AND VERSION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_help_lists_commands() {
    cellbind()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("convert"))
        .stdout(predicate::str::contains("types"));
}

#[test]
fn test_version() {
    cellbind()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

// ═══════════════════════════════════════════════════════════════════════════
// CONVERT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_convert_int_text() {
    cellbind()
        .args(["convert", "int", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Value:"))
        .stdout(predicate::str::contains("42"))
        .stdout(predicate::str::contains("i32"));
}

#[test]
fn test_convert_json_report() {
    let output = cellbind()
        .args(["convert", "double", "1.234,5", "--culture", "de-DE", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["type"], "f64");
    assert_eq!(report["culture"], "de-DE");
    assert_eq!(report["value"], "1234.5");
    assert_eq!(report["external_kind"], "Number");
    assert_eq!(report["native"], true);
}

#[test]
fn test_convert_empty_nullable() {
    let output = cellbind()
        .args(["convert", "bool?", "--as", "empty", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["value_kind"], "null");
    assert_eq!(report["external_kind"], "Empty");
}

#[test]
fn test_convert_serial_number_to_date() {
    cellbind()
        .args(["convert", "datetime", "45356.5", "--as", "number", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-03-05"));
}

#[test]
fn test_convert_with_column_policy() {
    let dir = TempDir::new().unwrap();
    let path = binding(&dir);
    let output = cellbind()
        .args(["convert", "bool", "X", "--map", "Invoice", "--column", "paid", "--json"])
        .arg("--config")
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["value"], "True");
    assert_eq!(report["external"], "1");
    assert_eq!(report["external_kind"], "Number");
}

#[test]
fn test_convert_configured_enum() {
    let dir = TempDir::new().unwrap();
    cellbind()
        .args(["convert", "Status", "inactive", "--json"])
        .arg("--config")
        .arg(binding(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"external\": \"Inactive\""));
}

#[test]
fn test_convert_failure_exits_nonzero() {
    cellbind()
        .args(["convert", "int", "twelve"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error:"))
        .stderr(predicate::str::contains("twelve"));
}

#[test]
fn test_convert_unknown_culture() {
    cellbind()
        .args(["convert", "int", "1", "--culture", "xx-XX"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("xx-XX"));
}

#[test]
fn test_column_requires_map() {
    cellbind()
        .args(["convert", "bool", "1", "--column", "paid"])
        .assert()
        .failure();
}

// ═══════════════════════════════════════════════════════════════════════════
// TYPES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_types_lists_builtins() {
    cellbind()
        .arg("types")
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered converters"))
        .stdout(predicate::str::contains("decimal"))
        .stdout(predicate::str::contains("guid"));
}

#[test]
fn test_types_includes_configured_enums() {
    let dir = TempDir::new().unwrap();
    cellbind()
        .arg("types")
        .arg("--config")
        .arg(binding(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("Status?"));
}
