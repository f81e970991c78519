//! Error types for the workflow engine.

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Failures surfaced by the orchestrator.
///
/// Invalid user replies are never errors; they are dropped silently.
#[derive(Debug, Clone, thiserror::Error)]
pub enum WorkflowError {
    #[error("Step '{step_id}' references unknown workflow '{reference_id}'")]
    UnknownWorkflow {
        step_id: String,
        reference_id: String,
    },

    #[error("Decision step '{step_id}' option {option_id} has no workflow reference")]
    MissingReference { step_id: String, option_id: usize },

    #[error("Presenting step '{step_id}' failed: {source}")]
    Presentation {
        step_id: String,
        source: DomainError,
    },

    #[error("Loading step '{step_id}' failed: {source}")]
    Loader {
        step_id: String,
        source: DomainError,
    },

    #[error("Turn exceeded {limit} session restarts")]
    RestartLimitExceeded { limit: usize },

    #[error(transparent)]
    InvalidWorkflow(#[from] ValidationError),
}

impl WorkflowError {
    /// True for misconfigured workflows, as opposed to runtime failures.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            WorkflowError::UnknownWorkflow { .. }
                | WorkflowError::MissingReference { .. }
                | WorkflowError::InvalidWorkflow(_)
        )
    }

    /// Step the error is attached to, if any.
    pub fn step_id(&self) -> Option<&str> {
        match self {
            WorkflowError::UnknownWorkflow { step_id, .. }
            | WorkflowError::MissingReference { step_id, .. }
            | WorkflowError::Presentation { step_id, .. }
            | WorkflowError::Loader { step_id, .. } => Some(step_id),
            WorkflowError::RestartLimitExceeded { .. } | WorkflowError::InvalidWorkflow(_) => {
                None
            }
        }
    }
}

impl From<WorkflowError> for DomainError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::UnknownWorkflow {
                step_id,
                reference_id,
            } => DomainError::new(
                ErrorCode::WorkflowNotFound,
                format!("Workflow '{}' is not registered", reference_id),
            )
            .with_detail("step_id", step_id),
            WorkflowError::Presentation { source, .. } | WorkflowError::Loader { source, .. } => {
                source
            }
            WorkflowError::InvalidWorkflow(e) => e.into(),
            other => DomainError::new(ErrorCode::InternalError, other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_workflow_message_names_both_ids() {
        let err = WorkflowError::UnknownWorkflow {
            step_id: "menu".to_string(),
            reference_id: "booking".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Step 'menu' references unknown workflow 'booking'"
        );
        assert!(err.is_configuration());
        assert_eq!(err.step_id(), Some("menu"));
    }

    #[test]
    fn presentation_error_exposes_source() {
        use std::error::Error;
        let err = WorkflowError::Presentation {
            step_id: "hi".to_string(),
            source: DomainError::delivery("socket closed"),
        };
        assert!(!err.is_configuration());
        assert!(err.source().is_some());
        assert!(err.to_string().contains("socket closed"));
    }

    #[test]
    fn converts_to_domain_error_with_code() {
        let err: DomainError = WorkflowError::UnknownWorkflow {
            step_id: "menu".to_string(),
            reference_id: "booking".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::WorkflowNotFound);
        assert_eq!(err.details.get("step_id").map(String::as_str), Some("menu"));

        let err: DomainError = WorkflowError::Loader {
            step_id: "date".to_string(),
            source: DomainError::loader("timeout"),
        }
        .into();
        assert_eq!(err.code, ErrorCode::LoaderFailed);
    }

    #[test]
    fn validation_error_converts() {
        let err: WorkflowError = ValidationError::empty_field("workflow_id").into();
        assert!(matches!(err, WorkflowError::InvalidWorkflow(_)));
        assert_eq!(err.step_id(), None);
    }
}
