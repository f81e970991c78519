//! Domain layer containing the workflow model.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, timestamps, errors, state machine)
//! - `workflow` - Steps, options, workflows, snapshots and lifecycle types

pub mod foundation;
pub mod workflow;
