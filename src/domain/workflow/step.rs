//! The atomic unit of a dialogue.
//!
//! A step presents something to the user (a message, a question or a pool
//! of options) and, for questions and pools, captures the user's answer.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::domain::foundation::DomainError;

use super::mount::{MountedContent, StepLoader};
use super::option::{reindex, WorkflowOption};

/// What the orchestrator asks the action handler to do with a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepAction {
    /// Informative message, never waits for a reply.
    SendMessage,
    /// Free-text question, waits for a non-empty reply.
    SendQuestion,
    /// Numbered options, waits for a valid option id.
    SendPool,
}

/// Behavior applied right after a step is advanced past.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepBehavior {
    #[default]
    None,
    /// Discards the remaining pending steps.
    EndSession,
    /// Replays the session backbone up to the first decision step.
    RestartSession,
}

/// Kind-specific content of a step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepPayload {
    Message {
        text: String,
    },
    Question {
        text: String,
    },
    Pool {
        title: String,
        options: Vec<WorkflowOption>,
        selected_option_id: Option<usize>,
    },
}

impl StepPayload {
    fn action(&self) -> StepAction {
        match self {
            StepPayload::Message { .. } => StepAction::SendMessage,
            StepPayload::Question { .. } => StepAction::SendQuestion,
            StepPayload::Pool { .. } => StepAction::SendPool,
        }
    }
}

/// A single dialogue step.
///
/// Steps are plain values: workflows keep them as blueprints and every
/// session owns its own instances.
#[derive(Clone)]
pub struct WorkflowStep {
    id: String,
    workflow_id: String,
    name: String,
    payload: StepPayload,
    behavior: StepBehavior,
    is_internal: bool,
    is_template: bool,
    is_decision: bool,
    is_lazy: bool,
    value: Option<String>,
    metadata: Option<String>,
    loader: Option<Arc<dyn StepLoader>>,
    mounted: bool,
}

impl WorkflowStep {
    /// Creates a step with default flags and no owning workflow.
    pub fn new(id: impl Into<String>, name: impl Into<String>, payload: StepPayload) -> Self {
        let mut payload = payload;
        if let StepPayload::Pool { options, .. } = &mut payload {
            reindex(options);
        }
        Self {
            id: id.into(),
            workflow_id: String::new(),
            name: name.into(),
            payload,
            behavior: StepBehavior::None,
            is_internal: false,
            is_template: false,
            is_decision: false,
            is_lazy: false,
            value: None,
            metadata: None,
            loader: None,
            mounted: false,
        }
    }

    // === Modifiers ===

    pub fn with_behavior(mut self, behavior: StepBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Marks the step content as containing substitution markers.
    pub fn as_template(mut self) -> Self {
        self.is_template = true;
        self
    }

    /// Hides the step from progress reporting.
    pub fn as_internal(mut self) -> Self {
        self.is_internal = true;
        self
    }

    /// Makes a pool selection inject the referenced workflow.
    pub fn as_decision(mut self) -> Self {
        self.is_decision = true;
        self
    }

    /// Marks the step as lazy without binding a loader.
    pub fn as_lazy(mut self) -> Self {
        self.is_lazy = true;
        self
    }

    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }

    pub fn with_workflow_id(mut self, workflow_id: impl Into<String>) -> Self {
        self.workflow_id = workflow_id.into();
        self
    }

    /// Binds a loader and marks the step as lazy.
    pub fn with_loader(mut self, loader: Arc<dyn StepLoader>) -> Self {
        self.set_loader(loader);
        self
    }

    // === Accessors ===

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn workflow_id(&self) -> &str {
        &self.workflow_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn payload(&self) -> &StepPayload {
        &self.payload
    }

    pub fn action(&self) -> StepAction {
        self.payload.action()
    }

    pub fn behavior(&self) -> StepBehavior {
        self.behavior
    }

    /// The captured answer, once the step has been answered.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn metadata(&self) -> Option<&str> {
        self.metadata.as_deref()
    }

    /// Message text, question text or pool title.
    pub fn text(&self) -> &str {
        match &self.payload {
            StepPayload::Message { text } | StepPayload::Question { text } => text,
            StepPayload::Pool { title, .. } => title,
        }
    }

    /// Pool options; empty for other kinds.
    pub fn options(&self) -> &[WorkflowOption] {
        match &self.payload {
            StepPayload::Pool { options, .. } => options,
            _ => &[],
        }
    }

    /// Looks an option up by its numeric id.
    pub fn option(&self, option_id: usize) -> Option<&WorkflowOption> {
        self.options().iter().find(|option| option.id == option_id)
    }

    pub fn selected_option_id(&self) -> Option<usize> {
        match &self.payload {
            StepPayload::Pool {
                selected_option_id, ..
            } => *selected_option_id,
            _ => None,
        }
    }

    pub fn selected_option(&self) -> Option<&WorkflowOption> {
        self.selected_option_id().and_then(|id| self.option(id))
    }

    pub fn is_message(&self) -> bool {
        self.action() == StepAction::SendMessage
    }

    pub fn is_question(&self) -> bool {
        self.action() == StepAction::SendQuestion
    }

    pub fn is_pool(&self) -> bool {
        self.action() == StepAction::SendPool
    }

    pub fn is_internal(&self) -> bool {
        self.is_internal
    }

    pub fn is_template(&self) -> bool {
        self.is_template
    }

    pub fn is_decision(&self) -> bool {
        self.is_decision
    }

    pub fn is_lazy(&self) -> bool {
        self.is_lazy
    }

    /// True once the loader ran for the current presentation.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// True when the step must be mounted before it is presented.
    pub fn needs_mount(&self) -> bool {
        self.is_lazy && !self.mounted
    }

    // === Input ===

    /// Checks a normalized reply against the step kind.
    ///
    /// - pool: must parse to an existing option id
    /// - question: must be non-empty after trimming
    /// - message: always accepted
    pub fn validate_input(&self, input: &str) -> bool {
        match &self.payload {
            StepPayload::Pool { .. } => input
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|id| self.option(id))
                .is_some(),
            StepPayload::Question { .. } => !input.trim().is_empty(),
            StepPayload::Message { .. } => true,
        }
    }

    // === Setters ===

    pub fn set_answer(&mut self, answer: impl Into<String>) {
        self.value = Some(answer.into());
    }

    /// Records a pool selection and captures the option value.
    pub fn set_selected_option(&mut self, option: &WorkflowOption) {
        if let StepPayload::Pool {
            selected_option_id, ..
        } = &mut self.payload
        {
            *selected_option_id = Some(option.id);
        }
        self.value = Some(option.value.clone());
    }

    /// Replaces the pool options, renumbering them densely.
    pub fn set_options(&mut self, new_options: Vec<WorkflowOption>) {
        if let StepPayload::Pool {
            options,
            selected_option_id,
            ..
        } = &mut self.payload
        {
            *options = new_options;
            reindex(options);
            *selected_option_id = None;
        }
    }

    pub fn set_workflow_id(&mut self, workflow_id: impl Into<String>) {
        self.workflow_id = workflow_id.into();
    }

    pub fn set_loader(&mut self, loader: Arc<dyn StepLoader>) {
        self.loader = Some(loader);
        self.is_lazy = true;
    }

    // === Mounting ===

    /// Runs the bound loader and merges its output onto this step.
    ///
    /// Steps without a loader are simply marked as mounted. On failure the
    /// step stays unmounted so the next presentation retries.
    pub async fn mount(&mut self, values: &HashMap<String, String>) -> Result<(), DomainError> {
        if let Some(loader) = self.loader.clone() {
            let content = loader.load(values).await?;
            self.apply(content);
        }
        self.mounted = true;
        Ok(())
    }

    /// Merges loader output in place.
    pub fn apply(&mut self, content: MountedContent) {
        if let Some(message) = content.message.filter(|m| !m.is_empty()) {
            match &mut self.payload {
                StepPayload::Message { text } | StepPayload::Question { text } => *text = message,
                StepPayload::Pool { .. } => {}
            }
        }
        if let Some(new_title) = content.title.filter(|t| !t.is_empty()) {
            if let StepPayload::Pool { title, .. } = &mut self.payload {
                *title = new_title;
            }
        }
        if !content.options.is_empty() {
            self.set_options(content.options);
        }
        if let Some(workflow_id) = content.workflow_id.filter(|w| !w.is_empty()) {
            self.workflow_id = workflow_id;
        }
    }

    /// Forgets the previous mount so the next presentation loads again.
    pub(crate) fn reset_mount(&mut self) {
        self.mounted = false;
    }

    pub(crate) fn into_payload(self) -> StepPayload {
        self.payload
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Debug for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkflowStep")
            .field("id", &self.id)
            .field("workflow_id", &self.workflow_id)
            .field("name", &self.name)
            .field("payload", &self.payload)
            .field("behavior", &self.behavior)
            .field("is_internal", &self.is_internal)
            .field("is_template", &self.is_template)
            .field("is_decision", &self.is_decision)
            .field("is_lazy", &self.is_lazy)
            .field("value", &self.value)
            .field("mounted", &self.mounted)
            .finish_non_exhaustive()
    }
}
