use std::env;
use std::path::PathBuf;

use lexo_types::DEFAULT_SOURCE;
use serde::{Deserialize, Serialize};

fn default_word_list() -> PathBuf {
    PathBuf::from("word_list_main.txt")
}

fn default_output() -> PathBuf {
    PathBuf::from("words.json")
}

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

fn default_request_delay_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    #[serde(default = "default_word_list")]
    pub word_list: PathBuf,
    /// Dataset file, rewritten after every word
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Source label recorded in new datasets
    #[serde(default = "default_source")]
    pub source: String,
    /// Pause after each successful request
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self {
            word_list: env::var("LEXO_WORD_LIST")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_word_list()),
            output: env::var("LEXO_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_output()),
            source: default_source(),
            request_delay_ms: crate::env_parse("LEXO_REQUEST_DELAY_MS")
                .unwrap_or_else(default_request_delay_ms),
        }
    }

    /// File name recorded in metadata (the path without its directories)
    pub fn word_list_file_name(&self) -> String {
        self.word_list
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.word_list.display().to_string())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            word_list: default_word_list(),
            output: default_output(),
            source: default_source(),
            request_delay_ms: default_request_delay_ms(),
        }
    }
}
