//! Session registry configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// How conversations are opened, closed and evicted
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Sessions idle for longer than this are evicted
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// Maximum number of concurrent sessions
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Keywords that open a conversation (comma-separated, case-insensitive)
    #[serde(default = "default_start_keywords")]
    pub start_keywords: String,

    /// Keywords that close a conversation (comma-separated, case-insensitive)
    #[serde(default = "default_stop_keywords")]
    pub stop_keywords: String,
}

impl SessionConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Get start keywords as a lowercase vector
    pub fn start_keywords_list(&self) -> Vec<String> {
        keyword_list(&self.start_keywords)
    }

    /// Get stop keywords as a lowercase vector
    pub fn stop_keywords_list(&self) -> Vec<String> {
        keyword_list(&self.stop_keywords)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.idle_timeout_secs == 0 {
            return Err(ValidationError::InvalidIdleTimeout);
        }
        if self.max_sessions == 0 {
            return Err(ValidationError::InvalidSessionCap);
        }
        let start = self.start_keywords_list();
        if start.is_empty() {
            return Err(ValidationError::NoStartKeywords);
        }
        if let Some(keyword) = self
            .stop_keywords_list()
            .into_iter()
            .find(|k| start.contains(k))
        {
            return Err(ValidationError::ConflictingKeyword(keyword));
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout(),
            max_sessions: default_max_sessions(),
            start_keywords: default_start_keywords(),
            stop_keywords: default_stop_keywords(),
        }
    }
}

fn keyword_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

fn default_idle_timeout() -> u64 {
    1800
}

fn default_max_sessions() -> usize {
    10_000
}

fn default_start_keywords() -> String {
    "#iniciar,#agendar".to_string()
}

fn default_stop_keywords() -> String {
    "#encerrar".to_string()
}
