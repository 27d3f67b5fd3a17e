//! Integration tests for loading filter configuration from disk.

use std::fs;
use std::io::Write;

use tablegate_core::{ConfigError, FilterConfig, GatewayConfig};
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_load_filter_file_from_disk() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "included_tables:\n  - allowed_table\n  - \"prod_*\"").unwrap();

    let config = FilterConfig::load(file.path()).unwrap();
    assert_eq!(config.included_tables, vec!["allowed_table", "prod_*"]);
}

#[test]
fn test_empty_filter_file_allows_all() {
    let file = NamedTempFile::new().unwrap();

    let config = FilterConfig::load(file.path()).unwrap();
    assert!(config.is_allow_all());
}

#[test]
fn test_nonexistent_filter_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("table_filters.yaml");

    let err = FilterConfig::load(&missing).unwrap_err();
    match err {
        ConfigError::FileNotFound { path, .. } => assert_eq!(path, missing),
        other => panic!("expected FileNotFound, got {other:?}"),
    }
}

#[test]
fn test_unreadable_filter_path_is_not_found() {
    let dir = TempDir::new().unwrap();

    // A directory exists but cannot be read as a file.
    let err = FilterConfig::load(dir.path()).unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {err:?}");
}

#[test]
fn test_gateway_file_resolves_relative_filter_path() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("filters.yaml"),
        "included_tables:\n  - \"prod_*\"\n",
    )
    .unwrap();
    let gateway_path = dir.path().join("gateway.yaml");
    fs::write(&gateway_path, "table_filter_file: filters.yaml\n").unwrap();

    let gateway = GatewayConfig::from_file(&gateway_path).unwrap();
    assert_eq!(
        gateway.table_filter_file.as_deref(),
        Some(dir.path().join("filters.yaml").as_path())
    );

    let filter = gateway.load_filter().unwrap();
    assert_eq!(filter.included_tables, vec!["prod_*"]);
}

#[test]
fn test_gateway_file_pointing_at_missing_filter_fails() {
    let dir = TempDir::new().unwrap();
    let gateway_path = dir.path().join("gateway.yaml");
    fs::write(&gateway_path, "table_filter_file: nowhere.yaml\n").unwrap();

    let gateway = GatewayConfig::from_file(&gateway_path).unwrap();
    assert!(gateway.load_filter().unwrap_err().is_not_found());
}
