//! Tracing subscriber setup for embedders.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Builds the filter: `RUST_LOG` when set, otherwise the configured level.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(&config.level))
}

/// Parses a configured level, falling back to `info` when it is malformed.
fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Fails if a global subscriber was already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TryInitError> {
    let json = config.json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(false)
            .with_span_list(false)
    });
    let plain = (!config.json).then(|| tracing_subscriber::fmt::layer().with_target(true));

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(json)
        .with(plain)
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_fails() {
        let config = LoggingConfig::default();
        let _ = init_tracing(&config);
        assert!(init_tracing(&config).is_err());
    }

    #[test]
    fn invalid_level_falls_back_to_info() {
        assert_eq!(level_filter("chatflow=verbose").to_string(), "info");
    }

    #[test]
    fn valid_level_is_kept() {
        assert_eq!(level_filter("chatflow=debug").to_string(), "chatflow=debug");
    }
}
