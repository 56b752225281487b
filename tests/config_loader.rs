mod common;

use common::temp_file;
use viewstate::config::{Config, ConfigError, OutputConfig, ReplayConfig};

#[test]
fn test_config_default_values() {
    let config = Config::default();
    assert!(!config.replay.skip_invalid);
    assert_eq!(config.replay.sql_limit, None);
    assert!(config.output.pretty);
}

#[test]
fn test_config_path_ends_with_expected() {
    let path = Config::config_path();
    assert!(path.ends_with("viewstate/config.toml"));
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_full_config() {
    let (_dir, path) = temp_file(
        "config.toml",
        r#"
[replay]
skip_invalid = true
sql_limit = 100

[output]
pretty = false
"#,
    );
    let config = Config::load_from(&path).unwrap();
    assert_eq!(
        config,
        Config {
            replay: ReplayConfig {
                skip_invalid: true,
                sql_limit: Some(100),
            },
            output: OutputConfig { pretty: false },
        }
    );
}

#[test]
fn test_partial_config_fills_defaults() {
    let (_dir, path) = temp_file("config.toml", "[replay]\nsql_limit = 20\n");
    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.replay.sql_limit, Some(20));
    assert!(!config.replay.skip_invalid);
    assert!(config.output.pretty);
}

#[test]
fn test_zero_limit_fails_validation() {
    let (_dir, path) = temp_file("config.toml", "[replay]\nsql_limit = 0\n");
    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError { .. }));
    assert!(err.to_string().contains("sql_limit"));
}

#[test]
fn test_malformed_toml_is_parse_error() {
    let (_dir, path) = temp_file("config.toml", "[replay\nskip_invalid = yes\n");
    let err = Config::load_from(&path).unwrap_err();
    match err {
        ConfigError::ParseError { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("Expected ParseError, got {:?}", other),
    }
}
