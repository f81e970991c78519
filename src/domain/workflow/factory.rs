//! Declarative step construction.

use std::sync::Arc;

use super::mount::StepLoader;
use super::option::WorkflowOption;
use super::step::{StepBehavior, StepPayload, WorkflowStep};

/// Stateless constructors for the three step kinds.
pub struct StepFactory;

impl StepFactory {
    pub fn message(
        id: impl Into<String>,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> WorkflowStep {
        WorkflowStep::new(id, name, StepPayload::Message { text: text.into() })
    }

    pub fn question(
        id: impl Into<String>,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> WorkflowStep {
        WorkflowStep::new(id, name, StepPayload::Question { text: text.into() })
    }

    /// Builds a pool from ready-made options; ids are renumbered in order.
    pub fn pool(
        id: impl Into<String>,
        name: impl Into<String>,
        title: impl Into<String>,
        options: Vec<WorkflowOption>,
    ) -> WorkflowStep {
        WorkflowStep::new(
            id,
            name,
            StepPayload::Pool {
                title: title.into(),
                options,
                selected_option_id: None,
            },
        )
    }
}

/// Fluent builder for pool steps.
///
/// Options receive sequential ids as they are added, so the first option
/// is answered with `0`, the second with `1`, and so on.
///
/// # Example
///
/// ```ignore
/// let menu = PoolBuilder::new()
///     .with_id("menu")
///     .with_title("O que deseja fazer?")
///     .with_option_ref("book", "Agendar", "booking")
///     .with_option_ref("cancel", "Cancelar", "cancel")
///     .decision()
///     .build();
/// ```
#[derive(Default)]
pub struct PoolBuilder {
    id: String,
    name: Option<String>,
    title: String,
    workflow_id: Option<String>,
    options: Vec<WorkflowOption>,
    behavior: StepBehavior,
    is_decision: bool,
    loader: Option<Arc<dyn StepLoader>>,
}

impl PoolBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Display name; defaults to the id.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_workflow_id(mut self, workflow_id: impl Into<String>) -> Self {
        self.workflow_id = Some(workflow_id.into());
        self
    }

    pub fn with_option(mut self, value: impl Into<String>) -> Self {
        let id = self.options.len();
        self.options.push(WorkflowOption::new(id, value));
        self
    }

    pub fn with_option_display(
        mut self,
        value: impl Into<String>,
        display_value: impl Into<String>,
    ) -> Self {
        let id = self.options.len();
        self.options
            .push(WorkflowOption::new(id, value).with_display_value(display_value));
        self
    }

    /// Adds an option that branches into the workflow `reference_id`.
    pub fn with_option_ref(
        mut self,
        value: impl Into<String>,
        display_value: impl Into<String>,
        reference_id: impl Into<String>,
    ) -> Self {
        let id = self.options.len();
        self.options.push(
            WorkflowOption::new(id, value)
                .with_display_value(display_value)
                .with_reference(reference_id),
        );
        self
    }

    pub fn with_back_option(mut self, display_value: impl Into<String>) -> Self {
        let id = self.options.len();
        self.options.push(WorkflowOption::back(id, display_value));
        self
    }

    /// Marks the pool as a decision step.
    pub fn decision(mut self) -> Self {
        self.is_decision = true;
        self
    }

    pub fn with_behavior(mut self, behavior: StepBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Binds a loader; the built pool is lazy.
    pub fn with_loader(mut self, loader: Arc<dyn StepLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn build(self) -> WorkflowStep {
        let name = self.name.unwrap_or_else(|| self.id.clone());
        let mut step = StepFactory::pool(self.id, name, self.title, self.options)
            .with_behavior(self.behavior);
        if self.is_decision {
            step = step.as_decision();
        }
        if let Some(workflow_id) = self.workflow_id {
            step = step.with_workflow_id(workflow_id);
        }
        if let Some(loader) = self.loader {
            step = step.with_loader(loader);
        }
        step
    }
}
