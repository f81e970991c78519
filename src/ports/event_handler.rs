//! WorkflowEventHandler port - Observes session lifecycle.

use async_trait::async_trait;

use crate::domain::workflow::{OrchestratorEvent, WorkflowData};

/// Port for lifecycle observers.
///
/// Observers cannot influence the session; failures must be handled
/// inside the implementation.
#[async_trait]
pub trait WorkflowEventHandler: Send + Sync {
    async fn on_event(&self, event: OrchestratorEvent, data: &WorkflowData);
}
