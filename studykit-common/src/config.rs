//! Configuration loading for the generation pipeline
//!
//! A missing or unreadable config file never aborts startup: the loader logs
//! a warning and falls back to compiled defaults. Resolution priority:
//! 1. `STUDYKIT_CONFIG` environment variable (explicit file path)
//! 2. `~/.config/studykit/config.toml` (platform config dir)
//! 3. Compiled defaults

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file path
pub const CONFIG_PATH_ENV: &str = "STUDYKIT_CONFIG";

/// Environment variable overriding the backend base URL
pub const BACKEND_URL_ENV: &str = "STUDYKIT_BACKEND_URL";

/// Completion-polling tunables
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PollingConfig {
    /// Fixed delay between job status checks, in milliseconds
    pub interval_ms: u64,
    /// Status checks before the wait is abandoned as timed out
    pub max_attempts: u32,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 5_000,
            max_attempts: 60,
        }
    }
}

/// Generation pipeline configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GenerationConfig {
    /// Base URL of the generation backend
    pub backend_url: String,
    /// Per-request HTTP timeout, in seconds
    pub request_timeout_secs: u64,
    pub polling: PollingConfig,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:5720".to_string(),
            request_timeout_secs: 30,
            polling: PollingConfig::default(),
        }
    }
}

impl GenerationConfig {
    /// Load configuration with graceful degradation
    ///
    /// Missing file or parse failure logs a warning and returns defaults.
    /// `STUDYKIT_BACKEND_URL` overrides the backend URL from any source.
    pub fn load() -> Self {
        let mut config = match Self::config_file_path() {
            Some(path) if path.exists() => match Self::load_from(&path) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "Loaded generation config");
                    config
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to load config file, using defaults"
                    );
                    Self::default()
                }
            },
            Some(path) => {
                tracing::warn!(
                    path = %path.display(),
                    "Config file not found, using defaults"
                );
                Self::default()
            }
            None => {
                tracing::warn!("Could not determine config directory, using defaults");
                Self::default()
            }
        };

        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            config.backend_url = url;
        }

        config
    }

    /// Load configuration from an explicit TOML file path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    fn config_file_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|d| d.join("studykit").join("config.toml"))
    }
}
