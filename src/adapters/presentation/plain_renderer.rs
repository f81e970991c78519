//! Plain-text renderer for chat transports.

use std::collections::HashMap;
use std::fmt::Write;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::workflow::{WorkflowData, WorkflowStep};
use crate::ports::MessageRenderer;

/// Renders steps as WhatsApp-style text.
///
/// Messages and questions are sent verbatim. Pools render as a bold title
/// followed by one `id - label` line per option:
///
/// ```text
/// *Qual data você prefere?*
///
/// 0 - 15/01
/// 1 - 16/01
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextRenderer;

impl PlainTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl MessageRenderer for PlainTextRenderer {
    fn render_message(
        &self,
        step: &WorkflowStep,
        _values: &HashMap<String, String>,
    ) -> Result<String, DomainError> {
        Ok(step.text().to_string())
    }

    fn render_pool(&self, step: &WorkflowStep, _data: &WorkflowData) -> Result<String, DomainError> {
        let mut out = format!("*{}*\n\n", step.text());
        for option in step.options() {
            writeln!(out, "{} - {}", option.id, option.display_value).map_err(|e| {
                DomainError::new(ErrorCode::RenderFailed, e.to_string())
                    .with_detail("step_id", step.id())
            })?;
        }
        Ok(out)
    }

    fn render_question(&self, step: &WorkflowStep) -> Result<String, DomainError> {
        Ok(step.text().to_string())
    }
}
