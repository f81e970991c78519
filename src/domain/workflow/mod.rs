//! Workflow model: steps, options, reusable workflows and session snapshots.
//!
//! # Module Organization
//!
//! - `step` - The dialogue step and its kind-specific payload
//! - `option` - Pool options
//! - `mount` - Late-bound content for lazy steps
//! - `workflow` - Named step lists spliced in by decision steps
//! - `factory` - Step constructors and the pool builder
//! - `data` - Progress snapshot
//! - `state` / `event` - Orchestrator state and lifecycle events

mod data;
mod errors;
mod event;
mod factory;
mod mount;
mod option;
mod state;
mod step;
mod workflow;

pub use data::{progress_ratio, StepInfo, WorkflowData};
pub use errors::WorkflowError;
pub use event::OrchestratorEvent;
pub use factory::{PoolBuilder, StepFactory};
pub use mount::{loader_fn, MountedContent, StepLoader};
pub use option::WorkflowOption;
pub use state::OrchestratorState;
pub use step::{StepAction, StepBehavior, StepPayload, WorkflowStep};
pub use workflow::Workflow;
