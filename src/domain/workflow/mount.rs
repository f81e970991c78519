//! Late-bound step content.
//!
//! Lazy steps carry a [`StepLoader`] instead of fixed content. The loader
//! runs right before the step is presented and receives the values the
//! user has captured so far.

use async_trait::async_trait;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use crate::domain::foundation::DomainError;

use super::option::WorkflowOption;
use super::step::{StepPayload, WorkflowStep};

/// Partial step content produced by a loader.
///
/// Empty fields leave the mounted step untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MountedContent {
    /// Replaces the message text (message steps) or question text.
    pub message: Option<String>,
    /// Replaces the pool title.
    pub title: Option<String>,
    /// Replaces the pool options when non-empty.
    pub options: Vec<WorkflowOption>,
    /// Re-assigns the owning workflow.
    pub workflow_id: Option<String>,
}

impl MountedContent {
    /// Content carrying only a message text.
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            message: Some(text.into()),
            ..Default::default()
        }
    }

    /// Content carrying only pool options.
    pub fn options(options: Vec<WorkflowOption>) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Sets the workflow the mounted step should report.
    pub fn with_workflow_id(mut self, workflow_id: impl Into<String>) -> Self {
        self.workflow_id = Some(workflow_id.into());
        self
    }
}

impl From<WorkflowStep> for MountedContent {
    /// Lets loaders reuse the step builders to describe their output.
    fn from(step: WorkflowStep) -> Self {
        let workflow_id = Some(step.workflow_id().to_string()).filter(|id| !id.is_empty());
        match step.into_payload() {
            StepPayload::Message { text } | StepPayload::Question { text } => Self {
                message: Some(text),
                workflow_id,
                ..Default::default()
            },
            StepPayload::Pool { title, options, .. } => Self {
                title: Some(title).filter(|t| !t.is_empty()),
                options,
                workflow_id,
                ..Default::default()
            },
        }
    }
}

/// Loader bound to a lazy step.
///
/// # Example
///
/// ```ignore
/// struct AvailableDates;
///
/// #[async_trait]
/// impl StepLoader for AvailableDates {
///     async fn load(&self, values: &HashMap<String, String>) -> Result<MountedContent, DomainError> {
///         Ok(MountedContent::options(next_seven_days()))
///     }
/// }
/// ```
#[async_trait]
pub trait StepLoader: Send + Sync {
    /// Produces content for the step from the values captured so far.
    async fn load(&self, values: &HashMap<String, String>) -> Result<MountedContent, DomainError>;
}

struct FnLoader<F>(F);

#[async_trait]
impl<F> StepLoader for FnLoader<F>
where
    F: Fn(HashMap<String, String>) -> BoxFuture<'static, Result<MountedContent, DomainError>>
        + Send
        + Sync,
{
    async fn load(&self, values: &HashMap<String, String>) -> Result<MountedContent, DomainError> {
        (self.0)(values.clone()).await
    }
}

/// Wraps an async closure as a [`StepLoader`].
pub fn loader_fn<F, Fut>(f: F) -> Arc<dyn StepLoader>
where
    F: Fn(HashMap<String, String>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<MountedContent, DomainError>> + Send + 'static,
{
    Arc::new(FnLoader(
        move |values: HashMap<String, String>| -> BoxFuture<'static, Result<MountedContent, DomainError>> {
            Box::pin(f(values))
        },
    ))
}
