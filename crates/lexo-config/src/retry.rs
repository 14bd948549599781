use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_max_delay_secs() -> u64 {
    300
}

fn default_jitter_min() -> f64 {
    1.10
}

fn default_jitter_max() -> f64 {
    1.30
}

fn default_max_total_wait_secs() -> u64 {
    1800
}

/// Backoff schedule for rate-limited and transient API errors
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Cap applied to the un-jittered delay
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: u64,
    #[serde(default = "default_jitter_min")]
    pub jitter_min: f64,
    #[serde(default = "default_jitter_max")]
    pub jitter_max: f64,
    /// Budget of backoff sleep per word before giving up on it
    #[serde(default = "default_max_total_wait_secs")]
    pub max_total_wait_secs: u64,
}

impl RetryConfig {
    pub fn new() -> Self {
        Self {
            base_delay_ms: crate::env_parse("LEXO_BASE_DELAY_MS")
                .unwrap_or_else(default_base_delay_ms),
            max_delay_secs: crate::env_parse("LEXO_MAX_DELAY_SECS")
                .unwrap_or_else(default_max_delay_secs),
            jitter_min: default_jitter_min(),
            jitter_max: default_jitter_max(),
            max_total_wait_secs: crate::env_parse("LEXO_MAX_TOTAL_WAIT_SECS")
                .unwrap_or_else(default_max_total_wait_secs),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_delay_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.base_delay_ms",
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.jitter_min < 1.0 || self.jitter_max < self.jitter_min {
            return Err(ConfigError::InvalidValue {
                field: "retry.jitter_min/jitter_max",
                reason: format!(
                    "need 1.0 <= jitter_min <= jitter_max, got [{}, {}]",
                    self.jitter_min, self.jitter_max
                ),
            });
        }

        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: default_base_delay_ms(),
            max_delay_secs: default_max_delay_secs(),
            jitter_min: default_jitter_min(),
            jitter_max: default_jitter_max(),
            max_total_wait_secs: default_max_total_wait_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(RetryConfig::default().validate().is_ok());
    }

    #[test]
    fn test_shrinking_jitter_is_rejected() {
        let config = RetryConfig {
            jitter_min: 0.9,
            ..RetryConfig::default()
        };
        assert!(config.validate().is_err());

        let config = RetryConfig {
            jitter_min: 1.3,
            jitter_max: 1.1,
            ..RetryConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
