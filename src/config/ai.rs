//! AI provider configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// AI provider configuration (Anthropic)
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Anthropic API key
    pub anthropic_api_key: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum tokens per conversational reply
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failures
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.anthropic_api_key.is_empty() {
            return Err(ValidationError::MissingRequired("AI__ANTHROPIC_API_KEY"));
        }
        if self.model.is_empty() {
            return Err(ValidationError::MissingRequired("AI__MODEL"));
        }
        if self.max_tokens == 0 {
            return Err(ValidationError::InvalidValue {
                field: "AI__MAX_TOKENS",
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_timeout() -> u64 {
    60
}

fn default_retries() -> u32 {
    3
}
