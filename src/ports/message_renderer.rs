//! MessageRenderer port - Turns steps into user-facing text.

use std::collections::HashMap;

use crate::domain::foundation::DomainError;
use crate::domain::workflow::{WorkflowData, WorkflowStep};

/// Port for step rendering.
///
/// Template steps (`is_template`) may reference captured values; how the
/// substitution works is up to the implementation.
pub trait MessageRenderer: Send + Sync {
    /// Renders a message step with the values captured so far.
    fn render_message(
        &self,
        step: &WorkflowStep,
        values: &HashMap<String, String>,
    ) -> Result<String, DomainError>;

    /// Renders a pool title and its numbered options.
    fn render_pool(&self, step: &WorkflowStep, data: &WorkflowData) -> Result<String, DomainError>;

    fn render_question(&self, step: &WorkflowStep) -> Result<String, DomainError>;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;
    use crate::domain::workflow::StepFactory;

    struct EchoRenderer;

    impl MessageRenderer for EchoRenderer {
        fn render_message(
            &self,
            step: &WorkflowStep,
            _: &HashMap<String, String>,
        ) -> Result<String, DomainError> {
            Ok(step.id().to_string())
        }

        fn render_pool(&self, step: &WorkflowStep, _: &WorkflowData) -> Result<String, DomainError> {
            Ok(step.id().to_string())
        }

        fn render_question(&self, step: &WorkflowStep) -> Result<String, DomainError> {
            Ok(step.id().to_string())
        }
    }

    #[test]
    fn shared_renderer_works_from_other_threads() {
        let renderer: Arc<dyn MessageRenderer> = Arc::new(EchoRenderer);

        let worker = {
            let renderer = Arc::clone(&renderer);
            thread::spawn(move || {
                let step = StepFactory::question("apartamento", "Apartamento", "Qual?");
                renderer.render_question(&step)
            })
        };

        assert_eq!(worker.join().unwrap().unwrap(), "apartamento");
        assert_eq!(Arc::strong_count(&renderer), 1);
    }
}
