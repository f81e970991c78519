//! Point-in-time read view of a session.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::step::WorkflowStep;

/// Summary of one user-facing step for progress reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepInfo {
    pub name: String,
    pub label: String,
    pub is_done: bool,
    pub value: Option<String>,
}

/// Snapshot of session progress and captured values.
///
/// Built on demand from the processed stack and the pending queue; never
/// cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowData {
    pub total_nodes: usize,
    pub processed_nodes: usize,
    /// Step id to captured value, message and internal steps excluded.
    pub values: HashMap<String, String>,
    /// `processed_nodes / total_nodes`, 1.0 for an empty session.
    pub progress: f64,
    pub is_finished: bool,
    /// Answered steps first, then pending ones, in session order.
    pub steps: Vec<StepInfo>,
    pub is_awaiting_input: bool,
    pub current_step_id: Option<String>,
    pub workflow_id: Option<String>,
}

impl WorkflowData {
    /// Builds the snapshot for a session.
    pub fn collect<'a>(
        processed: &'a [WorkflowStep],
        pending: impl IntoIterator<Item = &'a WorkflowStep>,
        is_awaiting_input: bool,
    ) -> Self {
        let mut values = HashMap::new();
        let mut steps = Vec::new();

        for step in processed.iter().filter(|s| is_reported(s)) {
            if let Some(value) = step.value() {
                values.insert(step.id().to_string(), value.to_string());
                steps.push(StepInfo {
                    name: step.name().to_string(),
                    label: step.name().to_string(),
                    is_done: true,
                    value: Some(value.to_string()),
                });
            }
        }

        let mut pending_count = 0;
        let mut current: Option<&WorkflowStep> = None;
        for step in pending {
            pending_count += 1;
            current.get_or_insert(step);
            if is_reported(step) {
                steps.push(StepInfo {
                    name: step.name().to_string(),
                    label: step.name().to_string(),
                    is_done: false,
                    value: None,
                });
            }
        }

        let processed_nodes = processed.len();
        let total_nodes = processed_nodes + pending_count;

        Self {
            total_nodes,
            processed_nodes,
            values,
            progress: progress_ratio(processed_nodes, total_nodes),
            is_finished: pending_count == 0,
            steps,
            is_awaiting_input,
            current_step_id: current.map(|s| s.id().to_string()),
            workflow_id: current.map(|s| s.workflow_id().to_string()),
        }
    }

    /// Looks up a captured value by step id.
    pub fn value(&self, step_id: &str) -> Option<&str> {
        self.values.get(step_id).map(String::as_str)
    }
}

fn is_reported(step: &WorkflowStep) -> bool {
    !step.is_message() && !step.is_internal()
}

/// Fraction of processed steps, defined as 1.0 when there are none at all.
pub fn progress_ratio(processed: usize, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        processed as f64 / total as f64
    }
}
