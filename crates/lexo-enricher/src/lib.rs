mod perplexity;
mod prompt;
mod retry;

pub use perplexity::PerplexityEnricher;
pub use prompt::build_prompt;
pub use retry::{BackoffPolicy, FetchError, RetryNotice, RetryingFetcher};

/// Word enrichment provider interface
#[async_trait::async_trait]
pub trait Enricher: Send + Sync {
    /// Ask the model about `word` and return its raw text reply
    async fn enrich(&self, word: &str) -> Result<String, EnrichError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnrichError {
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Transient error: {0}")]
    Transient(String),

    #[error("Fatal API error: {0}")]
    Fatal(String),
}

impl EnrichError {
    /// Rate-limit and transient errors are retried with backoff
    pub fn is_retryable(&self) -> bool {
        matches!(self, EnrichError::RateLimited(_) | EnrichError::Transient(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            EnrichError::RateLimited(_) => "rate_limited",
            EnrichError::Transient(_) => "transient",
            EnrichError::Fatal(_) => "fatal",
        }
    }

    /// Classify an error that only comes with a message
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if has_rate_limit_signal(&message) {
            EnrichError::RateLimited(message)
        } else {
            EnrichError::Fatal(message)
        }
    }

    /// Classify a non-success HTTP status together with its body
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = format!("HTTP {}: {}", status, preview(body, 200));

        match status {
            429 => EnrichError::RateLimited(message),
            408 | 500..=599 => EnrichError::Transient(message),
            401 | 403 => EnrichError::Fatal(format!("authentication failed ({message})")),
            _ if has_rate_limit_signal(body) => EnrichError::RateLimited(message),
            _ => EnrichError::Fatal(message),
        }
    }
}

impl From<reqwest::Error> for EnrichError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return EnrichError::from_status(status.as_u16(), &err.to_string());
        }

        if err.is_timeout() || err.is_connect() || err.is_request() || err.is_body() {
            EnrichError::Transient(err.to_string())
        } else {
            EnrichError::from_message(err.to_string())
        }
    }
}

const RATE_LIMIT_SIGNALS: [&str; 4] = ["rate limit", "too many requests", "429", "quota"];

/// Whether an error text says the caller is being throttled
pub fn has_rate_limit_signal(text: &str) -> bool {
    let lower = text.to_lowercase();
    RATE_LIMIT_SIGNALS.iter().any(|signal| lower.contains(signal))
}

/// First `max_chars` characters of `text`, marked when cut
pub(crate) fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
