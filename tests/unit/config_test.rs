//! Tests for configuration validation

use prometheus_admission::config::pass::{ENV_AUDIT_CAPACITY, ENV_MAX_CANDIDATES, ENV_SPAWN_DEPENDENCIES};
use prometheus_admission::config::AdmissionConfig;

#[test]
fn test_default_config_is_valid() {
    let config = AdmissionConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.max_candidates, 200);
    assert!(config.spawn_dependencies);
    assert_eq!(config.audit_capacity, 1024);
}

#[test]
fn test_config_invalid_max_candidates() {
    let invalid = AdmissionConfig {
        max_candidates: 0,
        ..AdmissionConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_config_from_json() {
    let json = r#"{
        "max_candidates": 50,
        "spawn_dependencies": false
    }"#;

    let config = AdmissionConfig::from_json_str(json).unwrap();
    assert_eq!(config.max_candidates, 50);
    assert!(!config.spawn_dependencies);
    assert_eq!(config.audit_capacity, 1024);
}

#[test]
fn test_config_from_json_rejects_invalid() {
    assert!(AdmissionConfig::from_json_str(r#"{"max_candidates": 0}"#).is_err());
    assert!(AdmissionConfig::from_json_str("not json").is_err());
}

// Single test touching the process environment so parallel tests never race on it.
#[test]
fn test_config_from_env() {
    std::env::set_var(ENV_MAX_CANDIDATES, "25");
    std::env::set_var(ENV_SPAWN_DEPENDENCIES, "false");
    std::env::remove_var(ENV_AUDIT_CAPACITY);
    let config = AdmissionConfig::from_env().unwrap();
    assert_eq!(config.max_candidates, 25);
    assert!(!config.spawn_dependencies);
    assert_eq!(config.audit_capacity, 1024);

    std::env::set_var(ENV_MAX_CANDIDATES, "many");
    assert!(AdmissionConfig::from_env().is_err());

    std::env::remove_var(ENV_MAX_CANDIDATES);
    std::env::remove_var(ENV_SPAWN_DEPENDENCIES);
}
