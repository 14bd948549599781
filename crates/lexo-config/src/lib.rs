use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use self::api::ApiConfig;
use self::log::LogConfig;
use self::pipeline::PipelineConfig;
use self::retry::RetryConfig;

pub mod api;
pub mod log;
pub mod pipeline;
pub mod retry;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub retry: RetryConfig,
    pub pipeline: PipelineConfig,
    pub log: LogConfig,
}

impl Config {
    /// Build from environment variables, falling back to defaults
    pub fn new() -> Self {
        Config {
            api: ApiConfig::new(),
            retry: RetryConfig::new(),
            pipeline: PipelineConfig::new(),
            log: LogConfig::new(),
        }
    }

    /// Load a JSON config file. Missing fields take their defaults.
    ///
    /// The API key is never required in the file: an empty key is filled
    /// from the environment.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if config.api.api_key.is_empty() {
            config.api.api_key = api::api_key_from_env();
        }

        Ok(config)
    }

    /// `from_file` when a path is given, `new` otherwise
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::new()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.retry.validate()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Parse an environment variable, ignoring it when unset or malformed
pub(crate) fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
