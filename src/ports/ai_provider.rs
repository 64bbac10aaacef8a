//! AI provider port - interface to the text/JSON generation oracle.
//!
//! The planning engine treats language generation as an opaque capability
//! with two operations: free-text completion for the conversational reply,
//! and tool-use structured extraction for stage records. Implementations
//! translate between a provider's API and these provider-agnostic types.
//!
//! # Contract
//!
//! - `complete` returns non-empty text or an error; errors propagate and
//!   fail the turn.
//! - `extract` returns `Ok(None)` when the model declines to produce a
//!   structured value; a declined extraction is never a turn failure.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Port for AI/LLM provider interactions.
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Generates a free-text completion for the conversational reply.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AiError>;

    /// Attempts a structured extraction over the same conversation.
    ///
    /// Returns `Ok(None)` when the model produced no structured value.
    /// Schema validation of the returned value is the caller's concern.
    async fn extract(&self, request: ExtractionRequest) -> Result<Option<Value>, AiError>;

    /// Provider information (name, model, context size).
    fn provider_info(&self) -> ProviderInfo;
}

/// A message in the conversation sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// Role of the message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// Request for a free-text completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Conversation messages (history + current user message).
    pub messages: Vec<Message>,
    /// System prompt guiding model behavior.
    pub system_prompt: Option<String>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            system_prompt: None,
            max_tokens: None,
        }
    }

    /// Sets the system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Sets the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }
}

/// Request for a tool-use structured extraction.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// Conversation messages, ending with the extraction instruction as a
    /// synthetic user message.
    pub messages: Vec<Message>,
    /// System prompt for the extraction call.
    pub system_prompt: Option<String>,
    /// Name of the extraction tool offered to the model.
    pub tool_name: String,
    /// Human-readable description of the tool.
    pub tool_description: String,
    /// JSON schema of the tool input.
    pub input_schema: Value,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
}

impl ExtractionRequest {
    pub fn new(
        messages: Vec<Message>,
        tool_name: impl Into<String>,
        input_schema: Value,
    ) -> Self {
        Self {
            messages,
            system_prompt: None,
            tool_name: tool_name.into(),
            tool_description: String::new(),
            input_schema,
            max_tokens: None,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_tool_description(mut self, description: impl Into<String>) -> Self {
        self.tool_description = description.into();
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }
}

/// Response from a free-text completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated content (non-empty by contract).
    pub content: String,
    /// Token usage for observability.
    pub usage: TokenUsage,
    /// Model that generated the response.
    pub model: String,
    /// Why the model stopped generating.
    pub finish_reason: FinishReason,
}

/// Token usage information.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural stop (end of response).
    Stop,
    /// Hit max_tokens limit.
    Length,
    /// An error occurred.
    Error,
}

/// AI provider errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AiError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// Context (prompt + history) exceeds the model limit.
    #[error("context too long")]
    ContextTooLong,

    /// Provider is unavailable.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during the request.
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },

    /// Failed to parse the provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl AiError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// True when a retry might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::Unavailable(_) | Self::Network(_) | Self::Timeout { .. }
        )
    }
}

/// Provider information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Provider name (e.g. "anthropic").
    pub name: String,
    /// Model identifier.
    pub model: String,
    /// Maximum context window size in tokens.
    pub max_context_tokens: u32,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>, max_context_tokens: u32) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            max_context_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ai_provider_is_object_safe() {
        fn _accepts_dyn(_provider: &dyn AiProvider) {}
    }

    #[test]
    fn completion_request_builder_sets_fields() {
        let request = CompletionRequest::new(vec![Message::user("hi")])
            .with_system_prompt("be helpful")
            .with_max_tokens(512);
        assert_eq!(request.system_prompt.as_deref(), Some("be helpful"));
        assert_eq!(request.max_tokens, Some(512));
        assert_eq!(request.messages.len(), 1);
    }

    #[test]
    fn retryable_classification() {
        assert!(AiError::network("reset").is_retryable());
        assert!(AiError::Timeout { timeout_secs: 30 }.is_retryable());
        assert!(!AiError::AuthenticationFailed.is_retryable());
        assert!(!AiError::parse("bad json").is_retryable());
    }

    #[test]
    fn token_usage_totals() {
        let usage = TokenUsage::new(100, 50);
        assert_eq!(usage.total_tokens, 150);
    }
}
