//! Application layer - Drives conversations through the domain model.
//!
//! - `WorkflowOrchestrator` - State machine for one session
//! - `SessionRegistry` - Routes inbound messages to per-key orchestrators

mod orchestrator;
mod session_registry;

pub use orchestrator::WorkflowOrchestrator;
pub use session_registry::{OrchestratorFactory, SessionError, SessionRegistry, TurnOutcome};
