//! Comprehensive unit tests for config.rs module

use std::io::Write;

use staffing_workflow::config::{AppConfig, IntakeConfig, LoggingConfig, StoreConfig};
use tempfile::{Builder, NamedTempFile};

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_default_logging_config() {
    let config = AppConfig::default();

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file_path, None);
    assert_eq!(config.logging.max_files, 5);
    assert_eq!(config.logging.format, "text");
}

#[test]
fn test_default_store_config() {
    let config = AppConfig::default();

    assert!(!config.store.seed_demo_data);
    assert_eq!(config.store.note_author, "Project Manager");
    assert_eq!(config.store.invitation_lead_days, 1);
    assert_eq!(config.store.event_buffer, 256);
}

#[test]
fn test_default_intake_config() {
    let config = IntakeConfig::default();

    assert_eq!(config.consultant_id_prefix, "api-");
    assert_eq!(config.default_project_name, "New Project");
    assert_eq!(config.default_company, "Company");
    assert_eq!(config.default_description, "Project description");
    assert_eq!(config.default_duration_days, 30);
    assert_eq!(config.unspecified_location, "Unspecified");
}

#[test]
fn test_config_validation_success() {
    assert!(AppConfig::default().validate().is_ok());
}

#[test]
fn test_config_validation_invalid_log_level() {
    let mut config = AppConfig::default();
    config.logging.level = "verbose".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_valid_log_levels() {
    for level in ["trace", "debug", "info", "warn", "error"] {
        let mut config = AppConfig::default();
        config.logging.level = level.to_string();
        assert!(config.validate().is_ok(), "level {level}");
    }
}

#[test]
fn test_config_validation_invalid_log_format() {
    let mut config = AppConfig::default();
    config.logging.format = "xml".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_zero_max_files() {
    let mut config = AppConfig::default();
    config.logging.max_files = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_blank_note_author() {
    let mut config = AppConfig::default();
    config.store.note_author = "  ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_negative_lead_days() {
    let mut config = AppConfig::default();
    config.store.invitation_lead_days = -1;
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_zero_lead_days_allowed() {
    let mut config = AppConfig::default();
    config.store.invitation_lead_days = 0;
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_validation_zero_event_buffer() {
    let mut config = AppConfig::default();
    config.store.event_buffer = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_blank_id_prefix() {
    let mut config = AppConfig::default();
    config.intake.consultant_id_prefix = String::new();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_zero_duration() {
    let mut config = AppConfig::default();
    config.intake.default_duration_days = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_store_settings_from_config() {
    let config = AppConfig {
        store: StoreConfig {
            note_author: "Delivery Lead".to_string(),
            ..StoreConfig::default()
        },
        ..AppConfig::default()
    };
    let settings = config.store_settings();
    assert_eq!(settings.note_author, "Delivery Lead");
    assert_eq!(settings.event_buffer, 256);
}

#[test]
fn test_load_from_file_overrides_defaults() {
    let file = config_file(
        r#"
[logging]
level = "debug"
format = "json"

[store]
seed_demo_data = true
note_author = "Delivery Lead"

[intake]
consultant_id_prefix = "intake-"
"#,
    );

    let config = AppConfig::load_from(file.path()).unwrap();
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");
    assert!(config.store.seed_demo_data);
    assert_eq!(config.store.note_author, "Delivery Lead");
    assert_eq!(config.intake.consultant_id_prefix, "intake-");
    // Untouched keys keep their defaults
    assert_eq!(config.logging.max_files, 5);
    assert_eq!(config.intake.default_company, "Company");
}

#[test]
fn test_load_from_file_rejects_invalid_values() {
    let file = config_file("[logging]\nlevel = \"loud\"\n");
    assert!(AppConfig::load_from(file.path()).is_err());
}

#[test]
fn test_load_from_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(AppConfig::load_from(&dir.path().join("absent.toml")).is_err());
}

#[test]
fn test_environment_overrides_file() {
    std::env::set_var("STAFFING_INTAKE__DEFAULT_DURATION_DAYS", "45");
    let file = config_file("[intake]\ndefault_duration_days = 60\n");
    let config = AppConfig::load_from(file.path());
    std::env::remove_var("STAFFING_INTAKE__DEFAULT_DURATION_DAYS");

    assert_eq!(config.unwrap().intake.default_duration_days, 45);
}

#[test]
fn test_logging_config_with_file_path() {
    let config = LoggingConfig {
        file_path: Some("logs/staffing.log".to_string()),
        ..LoggingConfig::default()
    };
    assert_eq!(config.file_path.as_deref(), Some("logs/staffing.log"));
}

#[test]
fn test_config_serializes_to_yaml() {
    let yaml = serde_yaml::to_string(&AppConfig::default()).unwrap();
    assert!(yaml.contains("note_author: Project Manager"));
}

#[test]
fn test_config_clone() {
    let config = AppConfig::default();
    assert_eq!(config.clone(), config);
}
