//! Event handler that keeps every lifecycle event for later inspection.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::workflow::{OrchestratorEvent, WorkflowData};
use crate::ports::WorkflowEventHandler;

/// Records events together with their snapshots.
///
/// Useful in tests and for embedders that inspect the final snapshot
/// after a session ends (e.g. to submit a booking).
#[derive(Debug, Default)]
pub struct RecordingEventHandler {
    recorded: Mutex<Vec<(OrchestratorEvent, WorkflowData)>>,
}

impl RecordingEventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded event kinds in order.
    pub async fn events(&self) -> Vec<OrchestratorEvent> {
        self.recorded.lock().await.iter().map(|(e, _)| *e).collect()
    }

    pub async fn count(&self, event: OrchestratorEvent) -> usize {
        self.recorded
            .lock()
            .await
            .iter()
            .filter(|(e, _)| *e == event)
            .count()
    }

    /// Snapshot attached to the most recent occurrence of `event`.
    pub async fn last_snapshot(&self, event: OrchestratorEvent) -> Option<WorkflowData> {
        self.recorded
            .lock()
            .await
            .iter()
            .rev()
            .find(|(e, _)| *e == event)
            .map(|(_, data)| data.clone())
    }

    pub async fn clear(&self) {
        self.recorded.lock().await.clear();
    }
}

#[async_trait]
impl WorkflowEventHandler for RecordingEventHandler {
    async fn on_event(&self, event: OrchestratorEvent, data: &WorkflowData) {
        self.recorded.lock().await.push((event, data.clone()));
    }
}
