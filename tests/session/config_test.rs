/*!
 * Configuration Loading Tests
 */

use aie_rsc::{BackendKind, ConfigError, SessionConfig};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_defaults() {
    let config = SessionConfig::default();
    assert_eq!(config.columns, 50);
    assert_eq!(config.rows_per_column, 8);
    assert_eq!(config.combo_slots_per_tile, 4);
    assert_eq!(config.backend, BackendKind::Sim);
    assert_eq!(config.base_addr, 0x2000_0000_0000);
    assert_eq!(config.poll_timeout_us, 1000);
    assert!(!config.verify_writes);
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_file_keeps_defaults() {
    let file = write_config(r#"{ "columns": 10, "backend": "noop", "verify_writes": true }"#);
    let config = SessionConfig::from_file(file.path()).unwrap();

    assert_eq!(config.columns, 10);
    assert_eq!(config.backend, BackendKind::Noop);
    assert!(config.verify_writes);
    assert_eq!(config.rows_per_column, 8);
    assert_eq!(config.poll_timeout_us, 1000);
}

#[test]
fn test_file_round_trip() {
    let original = SessionConfig::small()
        .with_backend(BackendKind::Noop)
        .with_poll_timeout_us(42);
    let file = write_config(&serde_json::to_string_pretty(&original).unwrap());
    assert_eq!(SessionConfig::from_file(file.path()).unwrap(), original);
}

#[test]
fn test_invalid_files() {
    let unknown = write_config(r#"{ "colums": 10 }"#);
    assert!(matches!(
        SessionConfig::from_file(unknown.path()),
        Err(ConfigError::Parse(_))
    ));

    let garbage = write_config("not json");
    assert!(matches!(
        SessionConfig::from_file(garbage.path()),
        Err(ConfigError::Parse(_))
    ));

    let odd = write_config(r#"{ "combo_slots_per_tile": 3 }"#);
    assert!(matches!(
        SessionConfig::from_file(odd.path()),
        Err(ConfigError::Invalid { field: "combo_slots_per_tile", .. })
    ));

    let huge = write_config(r#"{ "combo_slots_per_tile": 1073741824 }"#);
    assert!(matches!(
        SessionConfig::from_file(huge.path()),
        Err(ConfigError::Invalid { field: "combo_slots_per_tile", .. })
    ));

    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        SessionConfig::from_file(dir.path().join("missing.json")),
        Err(ConfigError::Io(_))
    ));
}

#[test]
fn test_zero_dimensions_rejected() {
    let mut config = SessionConfig::small();
    config.rows_per_column = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Invalid { field: "rows_per_column", .. })
    ));
}
