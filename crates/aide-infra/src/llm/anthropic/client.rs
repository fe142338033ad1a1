//! AnthropicResponder -- [`Responder`] for the Anthropic Messages API.
//!
//! The API key is held as a [`SecretString`] and only exposed when building
//! request headers.

use std::time::Duration;

use aide_core::responder::Responder;
use aide_types::error::{ConfigError, ResponderError};
use aide_types::message::{Message, MessageRole};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use super::types::{AnthropicContentBlock, AnthropicMessage, AnthropicRequest, AnthropicResponse, ErrorPayload};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

pub struct AnthropicResponder {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: Option<f64>,
}

impl AnthropicResponder {
    const API_VERSION: &'static str = "2023-06-01";

    pub fn new(api_key: SecretString, model: impl Into<String>) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| ConfigError::Responder(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.into(),
            max_tokens: 1024,
            temperature: None,
        })
    }

    /// Override the base URL (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f64>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// System messages go to the top-level `system` field; the rest keep
    /// their order.
    fn to_anthropic_request(&self, messages: &[Message]) -> AnthropicRequest {
        let system: Vec<&str> = messages
            .iter()
            .filter(|m| m.role() == MessageRole::System)
            .map(|m| m.content())
            .collect();

        let turns = messages
            .iter()
            .filter(|m| m.role() != MessageRole::System)
            .map(|m| AnthropicMessage {
                role: m.role().to_string(),
                content: m.content().to_string(),
            })
            .collect();

        AnthropicRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: turns,
            system: (!system.is_empty()).then(|| system.join("\n\n")),
            temperature: self.temperature,
        }
    }
}

fn error_for_status(status: reqwest::StatusCode, body: &str) -> ResponderError {
    let message = serde_json::from_str::<ErrorPayload>(body)
        .map(|p| p.error.message)
        .unwrap_or_else(|_| body.to_string());

    match status.as_u16() {
        400 => ResponderError::InvalidRequest(message),
        401 | 403 => ResponderError::AuthenticationFailed,
        429 => ResponderError::RateLimited {
            retry_after_ms: None,
        },
        529 => ResponderError::Overloaded(message),
        _ => ResponderError::Provider {
            message: format!("HTTP {status}: {message}"),
        },
    }
}

impl Responder for AnthropicResponder {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn respond(&self, messages: &[Message]) -> Result<String, ResponderError> {
        let body = self.to_anthropic_request(messages);

        let response = self
            .client
            .post(self.url("/v1/messages"))
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", Self::API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ResponderError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after_ms = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(|secs| secs.saturating_mul(1000));
            let error_body = response.text().await.unwrap_or_default();
            return Err(match error_for_status(status, &error_body) {
                ResponderError::RateLimited { .. } => ResponderError::RateLimited { retry_after_ms },
                other => other,
            });
        }

        let parsed: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| ResponderError::Deserialization(format!("failed to parse response: {e}")))?;

        debug!(
            id = %parsed.id,
            model = %parsed.model,
            stop_reason = ?parsed.stop_reason,
            "anthropic response received"
        );

        let text = parsed
            .content
            .iter()
            .filter_map(|block| match block {
                AnthropicContentBlock::Text { text } => Some(text.as_str()),
                AnthropicContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            return Err(ResponderError::EmptyResponse);
        }
        Ok(text)
    }
}
