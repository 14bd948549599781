use std::time::Duration;

use async_trait::async_trait;
use lexo_config::api::ApiConfig;
use serde::{Deserialize, Serialize};

use crate::prompt::build_prompt;
use crate::{EnrichError, Enricher, ProviderMetadata, preview};

const SYSTEM_MESSAGE: &str =
    "You are a lexicographer. You answer with a single valid JSON object and nothing else.";

/// Chat-completions client for the Perplexity API
#[derive(Clone)]
pub struct PerplexityEnricher {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    model: String,
}

impl PerplexityEnricher {
    pub fn new(config: &ApiConfig) -> Result<Self, EnrichError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| EnrichError::Fatal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_url: config.api_url.clone(),
            model: config.model.clone(),
        })
    }

    fn request_body(&self, word: &str) -> ChatRequest<'_> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_MESSAGE.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_prompt(word),
                },
            ],
        }
    }
}

#[async_trait]
impl Enricher for PerplexityEnricher {
    async fn enrich(&self, word: &str) -> Result<String, EnrichError> {
        if self.api_key.is_empty() {
            return Err(EnrichError::Fatal("API key is not configured".to_string()));
        }

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(word))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(EnrichError::from_status(status.as_u16(), &body));
        }

        extract_content(&body)
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "Perplexity".to_string(),
            model: self.model.clone(),
        }
    }
}

/// Pull the assistant message out of a chat-completions body
fn extract_content(body: &str) -> Result<String, EnrichError> {
    let parsed: ChatResponse = serde_json::from_str(body).map_err(|e| {
        EnrichError::Fatal(format!(
            "Failed to parse API response: {} (body: {})",
            e,
            preview(body, 200)
        ))
    })?;

    if let Some(error) = parsed.error {
        return Err(EnrichError::from_message(error.message));
    }

    parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.unwrap_or_default())
        .ok_or_else(|| EnrichError::Fatal("No choices in API response".to_string()))
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}
