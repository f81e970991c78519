//! Ports - Interfaces for the engine's collaborators.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the orchestrator and the outside world. Adapters implement these ports.
//!
//! ## Presentation Ports
//!
//! - `ActionHandler` - Presents steps and reports failures
//! - `MessageRenderer` - Formats steps as text
//! - `OutputHandler` - Delivers text to the user
//!
//! ## Observation Ports
//!
//! - `WorkflowEventHandler` - Receives lifecycle events with a snapshot
//!
//! ## Content Ports
//!
//! - `StepLoader` - Late-bound content for lazy steps (defined next to the
//!   step model and re-exported here)

mod action_handler;
mod event_handler;
mod message_renderer;
mod output_handler;

pub use action_handler::ActionHandler;
pub use event_handler::WorkflowEventHandler;
pub use message_renderer::MessageRenderer;
pub use output_handler::OutputHandler;

pub use crate::domain::workflow::{loader_fn, MountedContent, StepLoader};
