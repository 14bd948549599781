//! Retry state machine for one word's API call.
//!
//! Rate-limited and transient errors back off exponentially with upward
//! jitter: `min(base * 2^(n-1), cap) * U[jitter_min, jitter_max]`. There is
//! no cap on the attempt count; a word is given up once its cumulative
//! backoff sleep would exceed `max_total_wait`. Fatal errors stop at once.

use std::time::Duration;

use lexo_config::retry::RetryConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{EnrichError, Enricher};

#[derive(Debug, Clone)]
pub struct BackoffPolicy {
    base: Duration,
    cap: Duration,
    jitter_min: f64,
    jitter_max: f64,
    max_total_wait: Duration,
}

impl BackoffPolicy {
    pub fn new(
        base: Duration,
        cap: Duration,
        jitter: (f64, f64),
        max_total_wait: Duration,
    ) -> Self {
        Self {
            base,
            cap,
            jitter_min: jitter.0,
            jitter_max: jitter.1.max(jitter.0),
            max_total_wait,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            Duration::from_millis(config.base_delay_ms),
            Duration::from_secs(config.max_delay_secs),
            (config.jitter_min, config.jitter_max),
            Duration::from_secs(config.max_total_wait_secs),
        )
    }

    /// Delay before jitter for attempt `n` (1-based)
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt.saturating_sub(1));

        factor
            .and_then(|factor| self.base.checked_mul(factor))
            .map_or(self.cap, |delay| delay.min(self.cap))
    }

    /// Base delay scaled by a random factor from the jitter range
    pub fn jittered_delay<R: Rng>(&self, attempt: u32, rng: &mut R) -> Duration {
        let factor = rng.gen_range(self.jitter_min..=self.jitter_max);
        self.base_delay(attempt).mul_f64(factor)
    }
}

/// Reported before each backoff sleep
#[derive(Debug)]
pub struct RetryNotice<'a> {
    pub word: &'a str,
    /// The attempt that just failed
    pub attempt: u32,
    pub delay: Duration,
    pub waited: Duration,
    pub error: &'a EnrichError,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("{0}")]
    Fatal(EnrichError),

    #[error("gave up after {attempts} attempts ({}s of backoff): {last}", .waited.as_secs())]
    GaveUp {
        attempts: u32,
        waited: Duration,
        last: EnrichError,
    },
}

/// Wraps an [`Enricher`] with the backoff schedule
pub struct RetryingFetcher<E> {
    enricher: E,
    policy: BackoffPolicy,
    rng: StdRng,
}

impl<E: Enricher> RetryingFetcher<E> {
    pub fn new(enricher: E, policy: BackoffPolicy) -> Self {
        Self::with_rng(enricher, policy, StdRng::from_entropy())
    }

    pub fn with_rng(enricher: E, policy: BackoffPolicy, rng: StdRng) -> Self {
        Self {
            enricher,
            policy,
            rng,
        }
    }

    pub fn enricher(&self) -> &E {
        &self.enricher
    }

    /// Fetch the raw reply for `word`, sleeping between retryable failures.
    /// `on_retry` runs before every sleep.
    pub async fn fetch<F>(&mut self, word: &str, mut on_retry: F) -> Result<String, FetchError>
    where
        F: FnMut(&RetryNotice<'_>),
    {
        let mut attempt: u32 = 1;
        let mut waited = Duration::ZERO;

        loop {
            tracing::debug!(word, attempt, "API request attempt");

            let error = match self.enricher.enrich(word).await {
                Ok(text) => {
                    tracing::debug!(word, attempt, "API request successful");
                    return Ok(text);
                }
                Err(error) if !error.is_retryable() => {
                    tracing::error!(word, attempt, %error, "API request failed with non-retryable error");
                    return Err(FetchError::Fatal(error));
                }
                Err(error) => error,
            };

            let delay = self.policy.jittered_delay(attempt, &mut self.rng);
            if waited + delay > self.policy.max_total_wait {
                tracing::error!(
                    word,
                    attempt,
                    waited_secs = waited.as_secs_f64(),
                    %error,
                    "Backoff budget exhausted, giving up"
                );
                return Err(FetchError::GaveUp {
                    attempts: attempt,
                    waited,
                    last: error,
                });
            }

            on_retry(&RetryNotice {
                word,
                attempt,
                delay,
                waited,
                error: &error,
            });

            tokio::time::sleep(delay).await;
            waited += delay;
            attempt += 1;
        }
    }
}
