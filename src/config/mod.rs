//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `PLAN_COMPASS` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use plan_compass::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod ai;
mod error;
mod server;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// AI provider configuration (Anthropic)
    pub ai: AiConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Loads a `.env` file if present (development), then reads variables
    /// with the `PLAN_COMPASS` prefix:
    ///
    /// - `PLAN_COMPASS__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `PLAN_COMPASS__AI__ANTHROPIC_API_KEY=...` -> `ai.anthropic_api_key`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PLAN_COMPASS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` when any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        AppConfig {
            server: ServerConfig::default(),
            ai: AiConfig {
                anthropic_api_key: "sk-ant-test".to_string(),
                model: "claude-sonnet-4-20250514".to_string(),
                max_tokens: 2048,
                timeout_secs: 60,
                max_retries: 3,
            },
        }
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn missing_api_key_fails_validation() {
        let mut config = valid_config();
        config.ai.anthropic_api_key = String::new();
        assert!(config.validate().is_err());
    }
}
