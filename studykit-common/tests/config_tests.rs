//! Unit tests for configuration and graceful degradation
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate STUDYKIT_CONFIG or STUDYKIT_BACKEND_URL are marked
//! with #[serial] to ensure they run sequentially, not in parallel.

use serial_test::serial;
use std::env;
use std::io::Write;
use studykit_common::config::{GenerationConfig, PollingConfig, BACKEND_URL_ENV, CONFIG_PATH_ENV};

#[test]
fn compiled_defaults_match_reference_behavior() {
    let config = GenerationConfig::default();

    assert_eq!(config.request_timeout_secs, 30);
    assert_eq!(config.polling.interval_ms, 5_000);
    assert_eq!(config.polling.max_attempts, 60);
    assert!(!config.backend_url.is_empty());
}

#[test]
fn load_from_reads_full_toml() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
backend_url = "https://gen.example.edu"
request_timeout_secs = 10

[polling]
interval_ms = 250
max_attempts = 8
"#
    )
    .unwrap();

    let config = GenerationConfig::load_from(file.path()).unwrap();
    assert_eq!(config.backend_url, "https://gen.example.edu");
    assert_eq!(config.request_timeout_secs, 10);
    assert_eq!(
        config.polling,
        PollingConfig {
            interval_ms: 250,
            max_attempts: 8,
        }
    );
}

#[test]
fn load_from_fills_missing_fields_with_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, r#"backend_url = "https://gen.example.edu""#).unwrap();

    let config = GenerationConfig::load_from(file.path()).unwrap();
    assert_eq!(config.backend_url, "https://gen.example.edu");
    // Unspecified sections fall back to compiled defaults
    assert_eq!(config.polling, PollingConfig::default());
}

#[test]
fn load_from_rejects_malformed_toml() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "backend_url = [not toml").unwrap();

    assert!(GenerationConfig::load_from(file.path()).is_err());
}

#[test]
#[serial]
fn load_uses_defaults_when_config_file_is_missing() {
    env::set_var(CONFIG_PATH_ENV, "/nonexistent/studykit/config.toml");
    env::remove_var(BACKEND_URL_ENV);

    let config = GenerationConfig::load();
    assert_eq!(config, GenerationConfig::default());

    env::remove_var(CONFIG_PATH_ENV);
}

#[test]
#[serial]
fn backend_url_env_overrides_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, r#"backend_url = "https://from-file.example.edu""#).unwrap();

    env::set_var(CONFIG_PATH_ENV, file.path());
    env::set_var(BACKEND_URL_ENV, "https://from-env.example.edu");

    let config = GenerationConfig::load();
    assert_eq!(config.backend_url, "https://from-env.example.edu");

    env::remove_var(CONFIG_PATH_ENV);
    env::remove_var(BACKEND_URL_ENV);
}
