//! Configuration tests

use super::*;
use capsule_parser::MigrationMode;
use std::path::PathBuf;
use tempfile::NamedTempFile;

#[test]
fn test_config_serialization() {
    let config = Config::default();
    let yaml = serde_yaml::to_string(&config).unwrap();
    let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(config, parsed);
}

#[test]
fn test_config_from_file() {
    let mut config = Config::default();
    config.generation.mode = MigrationMode::Semi;
    config.batch.parallel = 5;
    config.parser.exclude_patterns.push("legacy/**".to_string());
    config.output.base_path = PathBuf::from("./out");

    let temp_file = NamedTempFile::new().unwrap();
    config.save_to_file(temp_file.path()).unwrap();

    let loaded = Config::from_file(temp_file.path()).unwrap();
    assert_eq!(config, loaded);
}

#[test]
fn test_minimal_file_uses_defaults() {
    let temp_file = NamedTempFile::new().unwrap();
    std::fs::write(temp_file.path(), "version: \"1.0\"\ngeneration:\n  mode: manual\n").unwrap();

    let loaded = Config::from_file(temp_file.path()).unwrap();
    assert_eq!(loaded.generation.mode, MigrationMode::Manual);
    assert!(loaded.generation.format);
    assert_eq!(loaded.batch.parallel, batch::DEFAULT_PARALLEL);
    assert_eq!(loaded.validation.diagnostics, DiagnosticsKind::Tsc);
    assert!(loaded.parser.exclude_dirs.contains(&"node_modules".to_string()));
}

#[test]
fn test_config_validation() {
    assert!(Config::default().validate().is_ok());

    let mut version = Config::default();
    version.version = "2.0".to_string();
    assert!(version.validate().is_err());

    let mut parallel = Config::default();
    parallel.batch.parallel = 0;
    assert!(parallel.validate().is_err());

    let mut pattern = Config::default();
    pattern.parser.exclude_patterns.push("[".to_string());
    assert!(pattern.validate().is_err());

    let mut tsc = Config::default();
    tsc.validation.tsc_path = Some(PathBuf::from("/usr/bin/tsc"));
    assert!(tsc.validate().is_ok());
    tsc.validation.diagnostics = DiagnosticsKind::Syntax;
    assert!(tsc.validate().is_err());
}

#[test]
fn test_validator_follows_diagnostics_kind() {
    let mut config = ValidationConfig::default();
    assert_eq!(config.validator().provider_name(), "tsc");
    config.diagnostics = DiagnosticsKind::Syntax;
    assert_eq!(config.validator().provider_name(), "syntax");
}
