//! Named, reusable branch blueprints.

use std::collections::HashSet;

use crate::domain::foundation::ValidationError;

use super::step::WorkflowStep;

/// An ordered, immutable list of steps registered under an id.
///
/// Decision steps splice a workflow into a running session by reference to
/// its id. The blueprint itself is never mutated: sessions receive fresh
/// instances through [`Workflow::instantiate`].
#[derive(Debug, Clone)]
pub struct Workflow {
    id: String,
    steps: Vec<WorkflowStep>,
}

impl Workflow {
    /// Creates a workflow and assigns its id to every step it owns.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if `id` is blank
    /// - `Duplicate` if two steps share an id
    pub fn new(id: impl Into<String>, steps: Vec<WorkflowStep>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("workflow_id"));
        }

        let mut seen = HashSet::new();
        for step in &steps {
            if !seen.insert(step.id()) {
                return Err(ValidationError::duplicate("step_id", step.id()));
            }
        }

        let steps = steps
            .into_iter()
            .map(|mut step| {
                step.set_workflow_id(id.clone());
                step
            })
            .collect();

        Ok(Self { id, steps })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn steps(&self) -> &[WorkflowStep] {
        &self.steps
    }

    pub fn size(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns session-owned copies of the blueprint steps.
    pub fn instantiate(&self) -> Vec<WorkflowStep> {
        self.steps
            .iter()
            .cloned()
            .map(|mut step| {
                step.reset_mount();
                step
            })
            .collect()
    }
}
