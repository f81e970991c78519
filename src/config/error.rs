//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("max_restarts_per_turn must be greater than zero")]
    InvalidRestartLimit,

    #[error("idle_timeout_secs must be greater than zero")]
    InvalidIdleTimeout,

    #[error("max_sessions must be greater than zero")]
    InvalidSessionCap,

    #[error("At least one start keyword is required")]
    NoStartKeywords,

    #[error("Keyword '{0}' is both a start and a stop keyword")]
    ConflictingKeyword(String),

    #[error("Invalid log level directive: {0}")]
    InvalidLogLevel(String),
}
