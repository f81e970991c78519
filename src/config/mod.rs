//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CHATFLOW` prefix and nested values use double underscores as separators.
//! Every value has a default, so an empty environment yields a usable config.
//!
//! # Example
//!
//! ```no_run
//! use chatflow::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Evicting sessions after {:?}", config.sessions.idle_timeout());
//! ```

mod engine;
mod error;
mod logging;
mod sessions;

pub use engine::EngineConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use sessions::SessionConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Orchestrator limits
    #[serde(default)]
    pub engine: EngineConfig,

    /// Session registry (keywords, eviction, capacity)
    #[serde(default)]
    pub sessions: SessionConfig,

    /// Tracing subscriber settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CHATFLOW` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CHATFLOW__ENGINE__MAX_RESTARTS_PER_TURN=5` -> `engine.max_restarts_per_turn = 5`
    /// - `CHATFLOW__SESSIONS__START_KEYWORDS=#start,#go` -> `sessions.start_keywords = "#start,#go"`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CHATFLOW")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.engine.validate()?;
        self.sessions.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
