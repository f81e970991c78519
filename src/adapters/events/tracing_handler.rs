//! Event handler that logs lifecycle events.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::workflow::{OrchestratorEvent, WorkflowData};
use crate::ports::WorkflowEventHandler;

/// Writes every lifecycle event to the tracing subscriber.
///
/// Start and end are logged at `info`, progress at `debug`.
#[derive(Debug, Clone, Default)]
pub struct TracingEventHandler {
    label: Option<String>,
}

impl TracingEventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a conversation label (e.g. the sender's number) to every line.
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
        }
    }
}

#[async_trait]
impl WorkflowEventHandler for TracingEventHandler {
    async fn on_event(&self, event: OrchestratorEvent, data: &WorkflowData) {
        let label = self.label.as_deref().unwrap_or("-");
        match event {
            OrchestratorEvent::Progress => debug!(
                label,
                event = %event,
                processed = data.processed_nodes,
                total = data.total_nodes,
                current_step_id = ?data.current_step_id,
                "Workflow progress"
            ),
            OrchestratorEvent::Started | OrchestratorEvent::Ended => info!(
                label,
                event = %event,
                processed = data.processed_nodes,
                total = data.total_nodes,
                workflow_id = ?data.workflow_id,
                "Workflow lifecycle"
            ),
        }
    }
}
