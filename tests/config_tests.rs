use std::fs;
use std::path::PathBuf;

use scoreline::config::Config;
use scoreline::error::ConfigError;

fn write_temp_config(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("scoreline.toml");
    fs::write(&path, contents).expect("write temp config");
    path
}

#[test]
fn config_loads_with_defaults_for_missing_sections() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp_config(&dir, "");

    let config = Config::load(&path).expect("empty config is valid");
    assert_eq!(config.database.url, "scoreline.db");
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, "pretty");
    assert!(config.sources.fbref.enabled);
    assert_eq!(config.sources.fbref.request_delay_ms, 2000);
    assert_eq!(config.sources.api_football.request_delay_ms, 250);
}

#[test]
fn config_reads_explicit_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp_config(
        &dir,
        r#"
[database]
url = "data/football.db"

[logging]
level = "debug"
format = "json"

[sources.fbref]
enabled = false

[sources.football_data]
request_delay_ms = 1200
"#,
    );

    let config = Config::load(&path).expect("config is valid");
    assert_eq!(config.database.url, "data/football.db");
    assert_eq!(config.logging.format, "json");
    assert!(!config.sources.fbref.enabled);
    assert_eq!(config.sources.football_data.request_delay_ms, 1200);
    assert_eq!(
        config.sources.football_data.delay(),
        std::time::Duration::from_millis(1200)
    );
}

#[test]
fn config_rejects_unknown_logging_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp_config(
        &dir,
        r#"
[logging]
level = "info"
format = "xml"
"#,
    );

    match Config::load(&path) {
        Err(ConfigError::InvalidValue {
            field: "logging.format",
            ..
        }) => {}
        Err(err) => panic!("expected invalid format error, got {err}"),
        Ok(config) => panic!("expected rejection, got format {}", config.logging.format),
    }
}

#[test]
fn config_rejects_empty_database_url() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp_config(
        &dir,
        r#"
[database]
url = ""
"#,
    );

    assert!(matches!(
        Config::load(&path),
        Err(ConfigError::MissingField {
            field: "database.url"
        })
    ));
}

#[test]
fn missing_config_file_is_a_read_error() {
    assert!(matches!(
        Config::load("/definitely/not/here/scoreline.toml"),
        Err(ConfigError::ReadFile(_))
    ));
}

#[test]
fn api_keys_come_from_the_environment() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp_config(&dir, "");

    std::env::set_var("FOOTBALL_DATA_API_KEY", "fd-test-key");
    let config = Config::load(&path).expect("config is valid");
    std::env::remove_var("FOOTBALL_DATA_API_KEY");

    assert_eq!(
        config.sources.football_data.api_key.as_deref(),
        Some("fd-test-key")
    );
}
