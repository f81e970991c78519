//! Selectable options of a pool step.

use serde::{Deserialize, Serialize};

/// A choice presented by a pool step.
///
/// Option ids are dense (`0..n`) in declaration order within their step;
/// users answer a pool by typing the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowOption {
    /// Position of the option within its step.
    pub id: usize,
    /// Value captured when the option is selected.
    pub value: String,
    /// Label shown to the user.
    pub display_value: String,
    /// Workflow injected when the option is chosen on a decision step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    /// Selecting this option navigates back instead of answering.
    #[serde(default)]
    pub is_back_action: bool,
}

impl WorkflowOption {
    /// Creates an option whose label equals its value.
    pub fn new(id: usize, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            id,
            display_value: value.clone(),
            value,
            reference_id: None,
            is_back_action: false,
        }
    }

    /// Creates a back-navigation option.
    pub fn back(id: usize, display_value: impl Into<String>) -> Self {
        let display_value = display_value.into();
        Self {
            id,
            value: display_value.clone(),
            display_value,
            reference_id: None,
            is_back_action: true,
        }
    }

    /// Sets the label shown to the user.
    pub fn with_display_value(mut self, display_value: impl Into<String>) -> Self {
        self.display_value = display_value.into();
        self
    }

    /// Points the option at a registered workflow.
    pub fn with_reference(mut self, reference_id: impl Into<String>) -> Self {
        self.reference_id = Some(reference_id.into());
        self
    }

    /// Returns the referenced workflow id, if any.
    pub fn reference(&self) -> Option<&str> {
        self.reference_id.as_deref().filter(|r| !r.is_empty())
    }
}

/// Renumbers options so their ids are dense in list order.
pub(crate) fn reindex(options: &mut [WorkflowOption]) {
    for (position, option) in options.iter_mut().enumerate() {
        option.id = position;
    }
}
