//! Action handler that renders steps and hands the text to an output.

use async_trait::async_trait;
use tracing::warn;

use crate::domain::foundation::DomainError;
use crate::domain::workflow::{WorkflowData, WorkflowStep};
use crate::ports::{ActionHandler, MessageRenderer, OutputHandler};

/// Notice sent to the user when a step cannot be presented.
pub const DEFAULT_ERROR_NOTICE: &str = "Desculpe, algo deu errado. Tente novamente.";

/// Composes a [`MessageRenderer`] with an [`OutputHandler`].
///
/// Every presentation renders the step to text and sends it as a single
/// message. Rendering and delivery errors are returned unchanged.
pub struct RenderingActionHandler<R, O> {
    renderer: R,
    output: O,
    error_notice: String,
}

impl<R, O> RenderingActionHandler<R, O>
where
    R: MessageRenderer,
    O: OutputHandler,
{
    pub fn new(renderer: R, output: O) -> Self {
        Self {
            renderer,
            output,
            error_notice: DEFAULT_ERROR_NOTICE.to_string(),
        }
    }

    /// Overrides the notice sent by `report_error`.
    pub fn with_error_notice(mut self, notice: impl Into<String>) -> Self {
        self.error_notice = notice.into();
        self
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}

#[async_trait]
impl<R, O> ActionHandler for RenderingActionHandler<R, O>
where
    R: MessageRenderer,
    O: OutputHandler,
{
    async fn present_message(
        &self,
        step: &WorkflowStep,
        data: &WorkflowData,
    ) -> Result<(), DomainError> {
        let text = self.renderer.render_message(step, &data.values)?;
        self.output.send_message(&text).await
    }

    async fn present_question(&self, step: &WorkflowStep) -> Result<(), DomainError> {
        let text = self.renderer.render_question(step)?;
        self.output.send_message(&text).await
    }

    async fn present_pool(
        &self,
        step: &WorkflowStep,
        data: &WorkflowData,
    ) -> Result<(), DomainError> {
        let text = self.renderer.render_pool(step, data)?;
        self.output.send_message(&text).await
    }

    async fn report_error(&self, step: &WorkflowStep, input: &str) {
        if let Err(err) = self.output.send_message(&self.error_notice).await {
            warn!(
                step_id = %step.id(),
                input,
                error = %err,
                "Failed to deliver error notice"
            );
        }
    }
}
