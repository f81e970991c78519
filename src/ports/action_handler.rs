//! ActionHandler port - Presents steps to the end user.
//!
//! The orchestrator decides *what* to show; implementations decide *how*
//! (rendering, transport). Each call completes before the orchestrator
//! moves on, and the orchestrator never retries.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::workflow::{WorkflowData, WorkflowStep};

/// Port for presenting steps.
///
/// A returned error keeps the step current: the orchestrator calls
/// [`ActionHandler::report_error`] and does not advance.
///
/// # Example
///
/// ```ignore
/// #[async_trait]
/// impl ActionHandler for ConsoleHandler {
///     async fn present_message(&self, step: &WorkflowStep, _data: &WorkflowData) -> Result<(), DomainError> {
///         println!("{}", step.text());
///         Ok(())
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// Shows an informative message. `data` is the snapshot taken right
    /// before the message is presented.
    async fn present_message(
        &self,
        step: &WorkflowStep,
        data: &WorkflowData,
    ) -> Result<(), DomainError>;

    /// Asks a free-text question.
    async fn present_question(&self, step: &WorkflowStep) -> Result<(), DomainError>;

    /// Shows numbered options.
    async fn present_pool(&self, step: &WorkflowStep, data: &WorkflowData)
        -> Result<(), DomainError>;

    /// Tells the user that `step` could not be presented or loaded.
    ///
    /// `input` is the normalized reply of the failed turn.
    async fn report_error(&self, step: &WorkflowStep, input: &str);
}
