//! Coordinator configuration.
//!
//! Configuration can be built in code or loaded from a YAML or JSON file.
//! Durations are written in milliseconds:
//!
//! ```yaml
//! settle_delay_ms: 500
//! storage_key: theme
//! poll_interval_ms: 1000
//! ```
//!
//! Every field is optional; missing fields keep their defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::store::STORAGE_KEY;

/// Default wait after a transition before new requests are accepted.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Default interval for re-reading the OS color scheme.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Errors from loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported config format for {path} (expected .yaml, .yml or .json)")]
    UnsupportedFormat { path: PathBuf },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Settings for a [`ThemeCoordinator`](crate::ThemeCoordinator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Fixed wait between starting a transition and accepting new input.
    pub settle_delay: Duration,
    /// Key the preference is persisted under.
    pub storage_key: String,
    /// How often [`SystemSignal`](crate::SystemSignal) re-reads the OS scheme.
    pub poll_interval: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
            storage_key: STORAGE_KEY.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    settle_delay_ms: Option<u64>,
    storage_key: Option<String>,
    poll_interval_ms: Option<u64>,
}

impl CoordinatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Parses a YAML document.
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: RawConfig = serde_yaml::from_str(source)?;
        Self::from_raw(raw)
    }

    /// Parses a JSON document.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(source)?;
        Self::from_raw(raw)
    }

    /// Loads a config file, choosing the format by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str) -> Result<Self, ConfigError> = match ext.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml_str,
            Some("json") => Self::from_json_str,
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse(&content)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(ms) = raw.settle_delay_ms {
            config.settle_delay = Duration::from_millis(ms);
        }
        if let Some(key) = raw.storage_key {
            if key.trim().is_empty() {
                return Err(ConfigError::Invalid("storage_key must not be empty".into()));
            }
            config.storage_key = key;
        }
        if let Some(ms) = raw.poll_interval_ms {
            if ms == 0 {
                return Err(ConfigError::Invalid(
                    "poll_interval_ms must be greater than zero".into(),
                ));
            }
            config.poll_interval = Duration::from_millis(ms);
        }
        Ok(config)
    }
}
