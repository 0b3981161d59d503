use std::path::PathBuf;

use querygate::config::{Config, DEFAULT_PREVIEW_LEN};

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.log_level, "warn");
    assert_eq!(config.check.baseline, PathBuf::from(".querygate.json"));
    assert_eq!(config.check.tolerance, 0);
    assert_eq!(config.analyze.threshold, 2);
    assert_eq!(config.analyze.preview_len, DEFAULT_PREVIEW_LEN);
    assert!(config.output.color);
}

#[test]
fn test_config_from_toml() {
    let config = Config::from_toml(
        r#"
log_level = "debug"

[check]
baseline = "ci/querygate.json"
tolerance = 2

[analyze]
threshold = 4
preview_len = 40

[output]
color = false
"#
    )
    .unwrap();

    assert_eq!(config.log_level, "debug");
    assert_eq!(config.check.baseline, PathBuf::from("ci/querygate.json"));
    assert_eq!(config.check.tolerance, 2);
    assert_eq!(config.analyze.threshold, 4);
    assert_eq!(config.analyze.preview_len, 40);
    assert!(!config.output.color);
}

#[test]
fn test_config_partial_toml_keeps_defaults() {
    let config = Config::from_toml("[analyze]\nthreshold = 5\n").unwrap();

    assert_eq!(config.analyze.threshold, 5);
    assert_eq!(config.analyze.preview_len, DEFAULT_PREVIEW_LEN);
    assert_eq!(config.check.baseline, PathBuf::from(".querygate.json"));
    assert_eq!(config.log_level, "warn");
}

#[test]
fn test_config_empty_toml() {
    let config = Config::from_toml("").unwrap();
    assert_eq!(config.check.tolerance, 0);
}

#[test]
fn test_config_negative_tolerance_rejected() {
    assert!(Config::from_toml("[check]\ntolerance = -1\n").is_err());
}

#[test]
fn test_config_invalid_toml() {
    assert!(Config::from_toml("[check\n").is_err());
}

#[test]
fn test_config_from_missing_file() {
    assert!(Config::from_file(std::path::Path::new("/nonexistent/querygate.toml")).is_err());
}
