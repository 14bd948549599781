use std::env;

use serde::{Deserialize, Serialize};

pub(crate) fn default_api_url() -> String {
    "https://api.perplexity.ai/chat/completions".to_string()
}

fn default_model() -> String {
    "sonar".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

pub(crate) fn api_key_from_env() -> String {
    env::var("PERPLEXITY_API_KEY").unwrap_or_default()
}

/// Upstream language-model endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Bearer token; empty means requests fail without reaching the network
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl ApiConfig {
    pub fn new() -> Self {
        Self {
            api_url: env::var("LEXO_API_URL").unwrap_or_else(|_| default_api_url()),
            api_key: api_key_from_env(),
            model: env::var("LEXO_MODEL").unwrap_or_else(|_| default_model()),
            request_timeout_secs: crate::env_parse("LEXO_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(default_request_timeout_secs),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: String::new(),
            model: default_model(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}
