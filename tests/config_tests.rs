//! Integration tests for configuration management

use gradebook_analytics::config::{Config, ConfigOverrides};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create a temporary config directory
fn setup_temp_config() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_file = temp_dir.path().join("config.toml");
    (temp_dir, config_file)
}

#[test]
fn test_config_from_defaults() {
    let config = Config::from_defaults();

    assert!(!config.logging.level.is_empty());
    assert!(!config.api.endpoint.is_empty());
    assert!(!config.paths.reports_dir.is_empty());
    assert!(!config.paths.exports_dir.is_empty());
    assert!(!config.report.format.is_empty());
    assert!(config.report.chart_width > 0 && config.report.chart_height > 0);
    assert_eq!(config.api.timeout_secs, 30);
}

#[test]
fn test_config_from_toml_basic() {
    let toml_str = r#"
[logging]
level = "info"
file = "/tmp/test.log"
verbose = true

[api]
endpoint = "https://lms.example.com"
token = "secret-token"
timeout_secs = 5

[paths]
reports_dir = "./reports"
exports_dir = "./exports"

[report]
format = "markdown"
chart_width = 640
chart_height = 320
pdf_converter = "/usr/bin/chromium"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file, "/tmp/test.log");
    assert!(config.logging.verbose);
    assert_eq!(config.api.endpoint, "https://lms.example.com");
    assert_eq!(config.api.token, "secret-token");
    assert_eq!(config.api.timeout().as_secs(), 5);
    assert_eq!(config.paths.reports_dir, "./reports");
    assert_eq!(config.paths.exports_dir, "./exports");
    assert_eq!(config.report.format, "markdown");
    assert_eq!(config.report.chart_width, 640);
    assert_eq!(config.report.chart_height, 320);
    assert_eq!(config.report.pdf_converter, "/usr/bin/chromium");
}

#[test]
fn test_config_from_toml_partial() {
    let toml_str = r#"
[logging]
level = "error"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse partial TOML");

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "");
    assert!(!config.logging.verbose);
    assert_eq!(config.api.token, "");
    assert_eq!(config.api.timeout_secs, 30);
    assert_eq!(config.report.chart_width, 800);
    assert_eq!(config.report.chart_height, 400);
}

#[test]
fn test_config_variable_expansion() {
    let toml_str = r#"
[logging]
file = "$GRADEBOOK_HOME/test.log"

[paths]
reports_dir = "$GRADEBOOK_HOME/reports"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML with variables");
    let home = Config::get_gradebook_dir();

    // stored as written, expanded where the value becomes a path
    assert_eq!(config.logging.file, "$GRADEBOOK_HOME/test.log");
    assert_eq!(config.logging.file_path(), Some(home.join("test.log")));
    assert_eq!(config.paths.reports_path(), home.join("reports"));
    assert_eq!(config.paths.exports_path(), PathBuf::from(""));
}

#[test]
fn test_save_keeps_home_variable_portable() {
    let (_temp_dir, config_file) = setup_temp_config();

    let mut config = Config::from_toml(
        r#"
[paths]
reports_dir = "$GRADEBOOK_HOME/reports"
"#,
    )
    .unwrap();
    config.set("level", "info").unwrap();
    config.save_to(&config_file).expect("Failed to save config");

    let saved = fs::read_to_string(&config_file).unwrap();
    assert!(saved.contains("reports_dir = \"$GRADEBOOK_HOME/reports\""));
    let home = Config::get_gradebook_dir();
    assert!(!saved.contains(home.to_string_lossy().as_ref()));
}

#[test]
fn test_chart_size_is_bounded() {
    let mut config = Config::from_defaults();

    assert!(config.set("chart_width", "100000").is_err());
    assert!(config.set("chart_height", "0").is_err());
    assert_eq!(config.report.chart_width, 800);

    config.set("chart_width", "4000").unwrap();
    config.set("chart_height", "100").unwrap();
    assert_eq!(config.report.chart_width, 4000);
    assert_eq!(config.report.chart_height, 100);
}

#[test]
fn test_empty_log_file_has_no_path() {
    let config = Config::from_toml("[logging]\nfile = \"\"\n").unwrap();
    assert!(config.logging.file_path().is_none());
    assert!(config.report.converter().is_none());
}

#[test]
fn test_config_get_set() {
    let mut config = Config::from_defaults();

    assert!(config.get("level").is_some());

    config.set("level", "DEBUG").expect("Failed to set level");
    assert_eq!(config.get("level").unwrap(), "debug");

    config.set("verbose", "true").expect("Failed to set verbose");
    assert!(config.logging.verbose);

    config.set("endpoint", "https://lms.test").unwrap();
    assert_eq!(config.get("endpoint").unwrap(), "https://lms.test");

    config.set("timeout-secs", "12").unwrap();
    assert_eq!(config.get("timeout_secs").unwrap(), "12");

    config.set("format", "md").unwrap();
    assert_eq!(config.get("format").unwrap(), "markdown");

    config.set("chart_width", "1024").unwrap();
    assert_eq!(config.report.chart_width, 1024);

    config.set("reports-dir", "/srv/reports").unwrap();
    assert_eq!(config.get("reports_dir").unwrap(), "/srv/reports");
}

#[test]
fn test_config_set_rejects_bad_values() {
    let mut config = Config::from_defaults();

    assert!(config.set("level", "loud").is_err());
    assert!(config.set("verbose", "maybe").is_err());
    assert!(config.set("timeout_secs", "-3").is_err());
    assert!(config.set("chart_height", "tall").is_err());
    assert!(config.set("format", "docx").is_err());
    assert!(config.set("no_such_key", "x").is_err());
    assert!(config.get("no_such_key").is_none());
}

#[test]
fn test_config_unset_restores_default() {
    let defaults = Config::from_defaults();
    let mut config = defaults.clone();

    config.set("token", "abc").unwrap();
    config.set("chart_height", "900").unwrap();
    config.unset("token", &defaults).unwrap();
    config.unset("chart-height", &defaults).unwrap();

    assert_eq!(config.api.token, defaults.api.token);
    assert_eq!(config.report.chart_height, defaults.report.chart_height);
    assert!(config.unset("bogus", &defaults).is_err());
}

#[test]
fn test_apply_overrides() {
    let mut config = Config::from_defaults();
    let overrides = ConfigOverrides {
        level: Some("error".to_string()),
        token: Some("override-token".to_string()),
        reports_dir: Some("/tmp/reports".to_string()),
        ..Default::default()
    };

    let original_endpoint = config.api.endpoint.clone();
    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.api.token, "override-token");
    assert_eq!(config.paths.reports_dir, "/tmp/reports");
    assert_eq!(config.api.endpoint, original_endpoint);
}

#[test]
fn test_merge_defaults_fills_only_missing() {
    let defaults = Config::from_defaults();
    let mut config = Config::from_toml(
        r#"
[logging]
level = "error"

[api]
token = "mine"
"#,
    )
    .unwrap();

    assert!(config.merge_defaults(&defaults));
    assert_eq!(config.logging.level, "error");
    assert_eq!(config.api.token, "mine");
    assert_eq!(config.api.endpoint, defaults.api.endpoint);
    assert_eq!(config.paths.reports_dir, defaults.paths.reports_dir);

    // Nothing left to merge the second time
    assert!(!config.merge_defaults(&defaults));
}

#[test]
fn test_config_serialization_round_trip() {
    let (_temp_dir, config_file) = setup_temp_config();

    let mut config = Config::from_defaults();
    config.api.token = "persisted".to_string();
    config.report.chart_width = 1200;

    let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");
    fs::write(&config_file, &toml_str).expect("Failed to write config");

    let loaded = Config::from_toml(&fs::read_to_string(&config_file).unwrap()).unwrap();
    assert_eq!(loaded.api.token, "persisted");
    assert_eq!(loaded.report.chart_width, 1200);
    assert_eq!(loaded.logging.level, config.logging.level);
}

#[test]
fn test_display_masks_token() {
    let mut config = Config::from_defaults();
    config.api.token = "supersecret1234".to_string();

    let shown = config.to_string();
    assert!(shown.contains("[api]"));
    assert!(shown.contains("[report]"));
    assert!(shown.contains("token = \"***********1234\""));
    assert!(!shown.contains("supersecret"));
}

#[test]
fn test_config_file_name_per_profile() {
    let path = Config::get_config_file_path();
    assert!(path.starts_with(Config::get_gradebook_dir()));
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    if cfg!(debug_assertions) {
        assert_eq!(name, "dconfig.toml");
    } else {
        assert_eq!(name, "config.toml");
    }
}
