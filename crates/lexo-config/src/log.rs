use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_file() -> Option<PathBuf> {
    Some(PathBuf::from("lexophile.log"))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub debug: bool,
    /// Log file appended to next to console output; `None` disables it
    #[serde(default = "default_file")]
    pub file: Option<PathBuf>,
    pub json: bool,
}

impl LogConfig {
    pub fn new() -> Self {
        let file = match env::var("LEXO_LOG_FILE") {
            Ok(value) if value.is_empty() => None,
            Ok(value) => Some(PathBuf::from(value)),
            Err(_) => default_file(),
        };

        Self {
            debug: false,
            file,
            json: false,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            debug: false,
            file: default_file(),
            json: false,
        }
    }
}
