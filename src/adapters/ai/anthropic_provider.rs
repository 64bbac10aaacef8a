//! Anthropic provider - AiProvider implementation for the Messages API.
//!
//! The conversational reply uses a plain completion; structured extraction
//! offers the model a single tool whose input schema comes from the stage
//! profile table. A response without a tool-use block is an extraction
//! decline, not an error.
//!
//! # Configuration
//!
//! ```ignore
//! let config = AnthropicConfig::new(api_key)
//!     .with_model("claude-sonnet-4-20250514")
//!     .with_max_retries(3);
//! let provider = AnthropicProvider::new(config);
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

use crate::ports::{
    AiError, AiProvider, CompletionRequest, CompletionResponse, ExtractionRequest, FinishReason,
    Message, MessageRole, ProviderInfo, TokenUsage,
};

/// Anthropic API version header value.
const ANTHROPIC_API_VERSION: &str = "2023-06-01";

/// Configuration for the Anthropic provider.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use.
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl AnthropicConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "claude-sonnet-4-20250514".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 3,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Anthropic Messages API provider.
pub struct AnthropicProvider {
    config: AnthropicConfig,
    client: Client,
}

impl AnthropicProvider {
    /// Creates a new provider with the given configuration.
    pub fn new(config: AnthropicConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url)
    }

    fn to_api_messages(messages: &[Message]) -> Vec<ApiMessage> {
        messages
            .iter()
            .map(|msg| ApiMessage {
                role: match msg.role {
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                }
                .to_string(),
                content: msg.content.clone(),
            })
            .collect()
    }

    async fn send(&self, body: &Value) -> Result<Response, AiError> {
        self.client
            .post(self.messages_url())
            .header("x-api-key", self.config.api_key())
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AiError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    AiError::network(format!("Connection failed: {}", e))
                } else {
                    AiError::network(e.to_string())
                }
            })
    }

    /// Maps non-success statuses to AiError.
    async fn handle_response_status(&self, response: Response) -> Result<Response, AiError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 => Err(AiError::AuthenticationFailed),
            429 => Err(AiError::RateLimited {
                retry_after_secs: parse_retry_after(&error_body),
            }),
            400 => {
                if error_body.contains("prompt is too long") {
                    Err(AiError::ContextTooLong)
                } else {
                    Err(AiError::InvalidRequest(error_body))
                }
            }
            500..=599 => Err(AiError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(AiError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }

    /// Sends with exponential backoff on retryable errors.
    async fn send_with_retries(&self, body: &Value) -> Result<ApiResponse, AiError> {
        let mut retry_count = 0;

        loop {
            let result = match self.send(body).await {
                Ok(response) => match self.handle_response_status(response).await {
                    Ok(response) => {
                        return response
                            .json::<ApiResponse>()
                            .await
                            .map_err(|e| AiError::parse(format!("Failed to parse response: {}", e)))
                    }
                    Err(err) => Err(err),
                },
                Err(err) => Err(err),
            };

            match result {
                Err(err) if err.is_retryable() && retry_count < self.config.max_retries => {
                    warn!(error = %err, attempt = retry_count + 1, "retrying Anthropic request");
                    // Exponential backoff: 1s, 2s, 4s, ...
                    sleep(Duration::from_secs(1 << retry_count)).await;
                    retry_count += 1;
                }
                other => return other,
            }
        }
    }

    fn finish_reason(stop_reason: Option<&str>) -> FinishReason {
        match stop_reason {
            Some("end_turn") | Some("stop_sequence") | Some("tool_use") => FinishReason::Stop,
            Some("max_tokens") => FinishReason::Length,
            _ => FinishReason::Stop,
        }
    }
}

#[async_trait]
impl AiProvider for AnthropicProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AiError> {
        let mut body = json!({
            "model": self.config.model,
            "messages": Self::to_api_messages(&request.messages),
            "max_tokens": request.max_tokens.unwrap_or(4096),
        });
        if let Some(system) = &request.system_prompt {
            body["system"] = json!(system);
        }

        let response = self.send_with_retries(&body).await?;

        let content = response
            .content
            .iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join("");

        if content.is_empty() {
            return Err(AiError::parse("completion returned no text content"));
        }

        Ok(CompletionResponse {
            content,
            usage: TokenUsage::new(response.usage.input_tokens, response.usage.output_tokens),
            model: response.model,
            finish_reason: Self::finish_reason(response.stop_reason.as_deref()),
        })
    }

    async fn extract(&self, request: ExtractionRequest) -> Result<Option<Value>, AiError> {
        let mut body = json!({
            "model": self.config.model,
            "messages": Self::to_api_messages(&request.messages),
            "max_tokens": request.max_tokens.unwrap_or(2048),
            "tools": [{
                "name": request.tool_name,
                "description": request.tool_description,
                "input_schema": request.input_schema,
            }],
            "tool_choice": {"type": "auto"},
        });
        if let Some(system) = &request.system_prompt {
            body["system"] = json!(system);
        }

        let response = self.send_with_retries(&body).await?;

        // The first tool-use block carries the structured value; a reply
        // without one means the model declined to extract.
        let extracted = response
            .content
            .into_iter()
            .find(|block| block.block_type == "tool_use")
            .and_then(|block| block.input);

        Ok(extracted)
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("anthropic", &self.config.model, 200_000)
    }
}

/// Parses retry-after seconds from an error body, defaulting to 60.
fn parse_retry_after(error_body: &str) -> u32 {
    if let Ok(parsed) = serde_json::from_str::<Value>(error_body) {
        if let Some(msg) = parsed
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            if let Some(idx) = msg.find("try again in ") {
                let rest = &msg[idx + 13..];
                if let Some(num_end) = rest.find(|c: char| !c.is_ascii_digit()) {
                    if let Ok(secs) = rest[..num_end].parse::<u32>() {
                        return secs;
                    }
                }
            }
        }
    }
    60
}

// ═══════════════════════════════════════════════════════════════════════════
// Wire types
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
    model: String,
    stop_reason: Option<String>,
    usage: ApiUsage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    input: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    input_tokens: u32,
    output_tokens: u32,
}
