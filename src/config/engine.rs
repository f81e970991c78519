//! Orchestrator tuning

use serde::Deserialize;

use super::error::ValidationError;

/// Limits applied by the orchestrator's driver loop
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Upper bound on session restarts performed by a single `process` call.
    ///
    /// A restart step whose backbone holds only messages would otherwise
    /// loop forever without awaiting input. Pipeline length is not limited.
    #[serde(default = "default_max_restarts")]
    pub max_restarts_per_turn: usize,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_restarts_per_turn == 0 {
            return Err(ValidationError::InvalidRestartLimit);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_restarts_per_turn: default_max_restarts(),
        }
    }
}

fn default_max_restarts() -> usize {
    100
}
