//! Shared error types for configuration and startup.
//!
//! Each library crate owns its own error enum; this module only covers
//! what every crate needs before it can talk to anything remote.

use thiserror::Error;

/// Errors raised while reading settings from the environment
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set (e.g. in .env)")]
    Missing(String),

    #[error("invalid value for {var}: '{value}' ({reason})")]
    Invalid {
        var: String,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    pub fn missing(var: &str) -> Self {
        Self::Missing(var.to_string())
    }

    pub fn invalid(var: &str, value: &str, reason: impl ToString) -> Self {
        Self::Invalid {
            var: var.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
