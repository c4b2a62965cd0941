//! Front-end configuration.
//!
//! Read from an optional TOML file; every key has a default and command-line
//! flags override whatever the file says.
//!
//! ```toml
//! rates_file = "rates/TaxRates.json"
//! log_level = "info"
//! log_file = "live-earnings.log"
//! notice_seconds = 3
//! ```

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Tax-rate table to load instead of the bundled one.
    pub rates_file: Option<PathBuf>,
    /// EnvFilter directive; `None` keeps `RUST_LOG` or the built-in default.
    pub log_level: Option<String>,
    /// Append log records to this file.
    pub log_file: Option<PathBuf>,
    /// How long an error notice stays visible.
    pub notice_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rates_file: None,
            log_level: None,
            log_file: None,
            notice_seconds: 3,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn notice_duration(&self) -> Duration {
        Duration::from_secs(self.notice_seconds)
    }
}
