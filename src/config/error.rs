//! Configuration error types

use thiserror::Error;

/// Errors while loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying loader/deserialization failure
    #[error("configuration loading failed: {0}")]
    Load(#[from] config::ConfigError),
}

/// Errors from semantic validation of loaded configuration.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    /// A required variable is missing or empty
    #[error("missing required configuration: PLAN_COMPASS__{0}")]
    MissingRequired(&'static str),

    /// Server port must be non-zero
    #[error("server port must be non-zero")]
    InvalidPort,

    /// A value is out of its valid range
    #[error("invalid value for PLAN_COMPASS__{field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
}
