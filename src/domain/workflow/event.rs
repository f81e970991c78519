//! Lifecycle events emitted to the event handler.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Session lifecycle notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrchestratorEvent {
    #[serde(rename = "workflow_started")]
    Started,
    #[serde(rename = "workflow_progress")]
    Progress,
    #[serde(rename = "workflow_ended")]
    Ended,
}

impl OrchestratorEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrchestratorEvent::Started => "workflow_started",
            OrchestratorEvent::Progress => "workflow_progress",
            OrchestratorEvent::Ended => "workflow_ended",
        }
    }
}

impl fmt::Display for OrchestratorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
