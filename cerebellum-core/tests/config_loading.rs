//! Integration tests for JSON configuration loading

#![cfg(test)]

use std::io::Write;

use cerebellum_core::{CerebellumConfig, CerebellumEngine, CerebellumError, CorrectionRequest};
use tempfile::NamedTempFile;

fn write_config(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_partial_file_falls_back_to_defaults() {
    let file = write_config(r#"{ "max_correction_norm": 5.0, "variance_window": 8 }"#);

    let config = CerebellumConfig::from_json_file(file.path()).unwrap();
    let expected = CerebellumConfig::default()
        .with_max_correction_norm(5.0)
        .with_variance_window(8);
    assert_eq!(config, expected);
}

#[test]
fn test_preset_round_trips_through_file() {
    let preset = CerebellumConfig::aircraft_attitude();
    let file = write_config(&serde_json::to_string_pretty(&preset).unwrap());

    assert_eq!(CerebellumConfig::from_json_file(file.path()).unwrap(), preset);
}

#[test]
fn test_loaded_config_drives_engine() {
    let file = write_config(r#"{ "max_correction_norm": 0.5 }"#);
    let config = CerebellumConfig::from_json_file(file.path()).unwrap();
    let mut engine = CerebellumEngine::new(2, config).unwrap();

    let step = engine
        .compute_correction_detailed(CorrectionRequest::new(&[0.0, 0.0], &[10.0, 10.0]))
        .unwrap();
    assert!(step.saturated);
}

#[test]
fn test_invalid_values_rejected() {
    let file = write_config(r#"{ "min_confidence": 1.5 }"#);
    assert!(matches!(
        CerebellumConfig::from_json_file(file.path()),
        Err(CerebellumError::InvalidConfig { field: "min_confidence", .. })
    ));
}

#[test]
fn test_malformed_json_rejected() {
    let file = write_config("{ max_correction_norm: ");
    assert_eq!(
        CerebellumConfig::from_json_file(file.path()),
        Err(CerebellumError::ConfigLoad { reason: "malformed JSON" })
    );
}

#[test]
fn test_missing_file_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    assert_eq!(
        CerebellumConfig::from_json_file(&missing),
        Err(CerebellumError::ConfigLoad { reason: "file unreadable" })
    );
}
