//! Workflow orchestrator - Drives one conversation through its steps.
//!
//! The orchestrator owns a pending queue and a processed stack of steps.
//! Each call to [`WorkflowOrchestrator::process`] feeds one user reply into
//! the session and runs the driver loop until the session either waits for
//! the next reply or ends.
//!
//! # Driver loop
//!
//! ```text
//! not started ──▶ start sequence (Started event)
//! queue empty ──▶ Ended event, yield
//! lazy head   ──▶ mount through its loader
//! message     ──▶ present, advance, continue
//! pool/question, Default       ──▶ present, AwaitingInput, yield
//! pool/question, AwaitingInput ──▶ bind reply (or drop it), advance, continue
//! ```
//!
//! The loop is iterative, so long pipelines never grow the stack. Only
//! restarts can make a turn cycle without consuming steps; they are capped
//! by [`EngineConfig::max_restarts_per_turn`].

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::domain::foundation::{SessionId, StateMachine};
use crate::domain::workflow::{
    OrchestratorEvent, OrchestratorState, StepAction, StepBehavior, Workflow, WorkflowData,
    WorkflowError, WorkflowOption, WorkflowStep,
};
use crate::ports::{ActionHandler, WorkflowEventHandler};

/// Outcome of one iteration of the driver loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Turn {
    /// Keep going with an empty input.
    Continue,
    /// Return control to the caller.
    Yield,
}

/// State machine for a single conversation session.
///
/// Not meant for concurrent use: every mutating method takes `&mut self`,
/// so embedders serialize calls per session (see `SessionRegistry`).
pub struct WorkflowOrchestrator {
    session_id: SessionId,
    action_handler: Arc<dyn ActionHandler>,
    event_handler: Arc<dyn WorkflowEventHandler>,
    config: EngineConfig,
    queue: VecDeque<WorkflowStep>,
    processed: Vec<WorkflowStep>,
    workflows: HashMap<String, Workflow>,
    state: OrchestratorState,
    started: bool,
    turn_restarts: usize,
}

impl WorkflowOrchestrator {
    pub fn new(
        action_handler: Arc<dyn ActionHandler>,
        event_handler: Arc<dyn WorkflowEventHandler>,
    ) -> Self {
        Self::with_config(action_handler, event_handler, EngineConfig::default())
    }

    pub fn with_config(
        action_handler: Arc<dyn ActionHandler>,
        event_handler: Arc<dyn WorkflowEventHandler>,
        config: EngineConfig,
    ) -> Self {
        Self {
            session_id: SessionId::new(),
            action_handler,
            event_handler,
            config,
            queue: VecDeque::new(),
            processed: Vec::new(),
            workflows: HashMap::new(),
            state: OrchestratorState::Initial,
            started: false,
            turn_restarts: 0,
        }
    }

    /// Replaces the generated session id, e.g. to correlate logs.
    pub fn with_session_id(mut self, session_id: SessionId) -> Self {
        self.session_id = session_id;
        self
    }

    // === Composition ===

    /// Registers workflows that decision steps can branch into.
    ///
    /// Re-registering an id overwrites the previous workflow. Every decision
    /// option, in the registry and in the pending queue, must reference a
    /// registered workflow once the call completes; otherwise nothing is
    /// registered. Workflows referencing each other must be loaded together.
    ///
    /// # Errors
    ///
    /// - `UnknownWorkflow` if a decision option points at an unregistered id
    /// - `MissingReference` if a decision option has no reference at all
    pub fn load(&mut self, workflows: impl IntoIterator<Item = Workflow>) -> Result<(), WorkflowError> {
        let mut registry = self.workflows.clone();
        for workflow in workflows {
            registry.insert(workflow.id().to_string(), workflow);
        }

        validate_decisions(&registry, registry.values().flat_map(|w| w.steps()))?;
        validate_decisions(&registry, &self.queue)?;

        info!(
            session_id = %self.session_id,
            workflows = registry.len(),
            "Workflows loaded"
        );
        self.workflows = registry;
        Ok(())
    }

    /// Appends a step to the pending queue.
    pub fn add_step(&mut self, step: WorkflowStep) {
        self.queue.push_back(step);
    }

    /// Appends fresh instances of a workflow's steps to the pending queue.
    pub fn add_workflow(&mut self, workflow: &Workflow) {
        self.queue.extend(workflow.instantiate());
    }

    // === Queries ===

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// The current step, if the session has not ended.
    pub fn peek(&self) -> Option<&WorkflowStep> {
        self.queue.front()
    }

    /// Number of pending steps.
    pub fn size(&self) -> usize {
        self.queue.len()
    }

    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    pub fn is_finished(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn state(&self) -> OrchestratorState {
        self.state
    }

    /// Builds a fresh snapshot of the session.
    pub fn get_data(&self) -> WorkflowData {
        WorkflowData::collect(
            &self.processed,
            &self.queue,
            self.state.accepts_user_input(),
        )
    }

    // === Lifecycle ===

    /// Starts the session and runs it up to the first reply it needs.
    ///
    /// # Errors
    ///
    /// Same as [`WorkflowOrchestrator::process`]; queued decision steps are
    /// validated before anything is presented.
    pub async fn start(&mut self) -> Result<(), WorkflowError> {
        self.begin().await?;
        self.process(None).await
    }

    /// Feeds one user reply into the session.
    ///
    /// Invalid replies are dropped without error: the current step stays
    /// presented and the session keeps waiting.
    ///
    /// # Errors
    ///
    /// - `Presentation` / `Loader` when a collaborator fails; the current
    ///   step is kept and `report_error` was already called
    /// - `UnknownWorkflow` / `MissingReference` for a misconfigured decision
    /// - `RestartLimitExceeded` when the session keeps restarting without
    ///   waiting for a reply
    pub async fn process(&mut self, input: Option<&str>) -> Result<(), WorkflowError> {
        let mut input = input.map(str::trim).unwrap_or_default().to_string();
        let limit = self.config.max_restarts_per_turn;
        self.turn_restarts = 0;

        loop {
            match self.run_once(&input).await? {
                Turn::Continue => input.clear(),
                Turn::Yield => return Ok(()),
            }

            if self.turn_restarts > limit {
                warn!(
                    session_id = %self.session_id,
                    limit,
                    "Turn exceeded restart limit"
                );
                return Err(WorkflowError::RestartLimitExceeded { limit });
            }
        }
    }

    /// Moves the current step onto the processed stack.
    ///
    /// Applies the step's behavior (restart or end of session), emits a
    /// `Progress` event and returns the new current step.
    pub async fn advance(&mut self) -> Option<&WorkflowStep> {
        let Some(mut step) = self.queue.pop_front() else {
            return None;
        };

        step.reset_mount();
        let behavior = step.behavior();
        debug!(
            session_id = %self.session_id,
            step_id = %step.id(),
            workflow_id = %step.workflow_id(),
            "Step completed"
        );
        self.processed.push(step);
        self.set_state(OrchestratorState::Default);

        match behavior {
            StepBehavior::RestartSession => {
                self.turn_restarts += 1;
                self.clear();
            }
            StepBehavior::EndSession => {
                let discarded = self.queue.len();
                self.queue.clear();
                debug!(session_id = %self.session_id, discarded, "Session ended by step");
            }
            StepBehavior::None => {}
        }

        self.emit(OrchestratorEvent::Progress).await;
        self.queue.front()
    }

    /// Moves the most recently processed step back to the head of the queue.
    ///
    /// Returns `false` when nothing was processed yet. Either way the state
    /// becomes `Default`, so the next `process` call presents the head.
    pub fn backtrack(&mut self) -> bool {
        self.set_state(OrchestratorState::Default);

        let Some(mut step) = self.processed.pop() else {
            return false;
        };

        if let Some(head) = self.queue.front_mut() {
            head.reset_mount();
        }
        step.reset_mount();
        debug!(session_id = %self.session_id, step_id = %step.id(), "Stepped back");
        self.queue.push_front(step);
        true
    }

    /// Restarts the session from its backbone.
    ///
    /// Processed steps are appended to the queue oldest first, up to and
    /// including the first decision step; later history is dropped. The
    /// next `process` call starts the session again. Captured values are
    /// kept.
    pub fn clear(&mut self) {
        let history = std::mem::take(&mut self.processed);
        let mut replayed = 0;

        for mut step in history {
            let is_decision = step.is_decision();
            step.reset_mount();
            self.queue.push_back(step);
            replayed += 1;
            if is_decision {
                break;
            }
        }

        self.started = false;
        self.set_state(OrchestratorState::Initial);
        info!(session_id = %self.session_id, replayed, "Session restarted");
    }

    // === Driver ===

    async fn begin(&mut self) -> Result<(), WorkflowError> {
        validate_decisions(&self.workflows, &self.queue)?;

        self.started = true;
        self.set_state(OrchestratorState::Default);
        info!(
            session_id = %self.session_id,
            steps = self.queue.len(),
            "Session started"
        );
        self.emit(OrchestratorEvent::Started).await;
        Ok(())
    }

    async fn run_once(&mut self, input: &str) -> Result<Turn, WorkflowError> {
        if !self.started {
            self.begin().await?;
            return Ok(Turn::Continue);
        }

        let Some(action) = self.queue.front().map(WorkflowStep::action) else {
            debug!(session_id = %self.session_id, "Session ended");
            self.emit(OrchestratorEvent::Ended).await;
            return Ok(Turn::Yield);
        };

        self.mount_current(input).await?;

        let awaiting = self.state.accepts_user_input();
        if awaiting && !self.queue.front().is_some_and(|s| s.validate_input(input)) {
            debug!(session_id = %self.session_id, "Dropped invalid input");
            return Ok(Turn::Yield);
        }

        match (action, awaiting) {
            (StepAction::SendMessage, _) => {
                self.present(input).await?;
                self.advance().await;
                Ok(Turn::Continue)
            }
            (_, false) => {
                self.present(input).await?;
                self.set_state(OrchestratorState::AwaitingInput);
                Ok(Turn::Yield)
            }
            (StepAction::SendPool, true) => self.select_option(input).await,
            (StepAction::SendQuestion, true) => {
                if let Some(step) = self.queue.front_mut() {
                    step.set_answer(input);
                }
                self.advance().await;
                Ok(Turn::Continue)
            }
        }
    }

    async fn mount_current(&mut self, input: &str) -> Result<(), WorkflowError> {
        if !self.queue.front().is_some_and(WorkflowStep::needs_mount) {
            return Ok(());
        }

        let values = self.get_data().values;
        let Some(step) = self.queue.front_mut() else {
            return Ok(());
        };

        match step.mount(&values).await {
            Ok(()) => {
                debug!(session_id = %self.session_id, step_id = %step.id(), "Step mounted");
                Ok(())
            }
            Err(source) => {
                warn!(
                    session_id = %self.session_id,
                    step_id = %step.id(),
                    error = %source,
                    "Failed to load step"
                );
                self.action_handler.report_error(step, input).await;
                Err(WorkflowError::Loader {
                    step_id: step.id().to_string(),
                    source,
                })
            }
        }
    }

    async fn present(&self, input: &str) -> Result<(), WorkflowError> {
        let Some(step) = self.queue.front() else {
            return Ok(());
        };

        let result = match step.action() {
            StepAction::SendMessage => {
                let data = self.get_data();
                self.action_handler.present_message(step, &data).await
            }
            StepAction::SendQuestion => self.action_handler.present_question(step).await,
            StepAction::SendPool => {
                let data = self.get_data();
                self.action_handler.present_pool(step, &data).await
            }
        };

        match result {
            Ok(()) => {
                debug!(
                    session_id = %self.session_id,
                    step_id = %step.id(),
                    workflow_id = %step.workflow_id(),
                    "Step presented"
                );
                Ok(())
            }
            Err(source) => {
                warn!(
                    session_id = %self.session_id,
                    step_id = %step.id(),
                    error = %source,
                    "Failed to present step"
                );
                self.action_handler.report_error(step, input).await;
                Err(WorkflowError::Presentation {
                    step_id: step.id().to_string(),
                    source,
                })
            }
        }
    }

    async fn select_option(&mut self, input: &str) -> Result<Turn, WorkflowError> {
        let Some(step) = self.queue.front() else {
            return Ok(Turn::Yield);
        };

        let Some(option) = input
            .parse::<usize>()
            .ok()
            .and_then(|id| step.option(id))
            .cloned()
        else {
            debug!(session_id = %self.session_id, step_id = %step.id(), "Unknown option");
            return Ok(Turn::Yield);
        };

        if option.is_back_action {
            self.backtrack();
            return Ok(Turn::Continue);
        }

        let branch = if step.is_decision() {
            let workflow = decision_target(&self.workflows, step, &option)?;
            info!(
                session_id = %self.session_id,
                step_id = %step.id(),
                workflow_id = %workflow.id(),
                "Branching into workflow"
            );
            workflow.instantiate()
        } else {
            Vec::new()
        };

        if let Some(step) = self.queue.front_mut() {
            step.set_selected_option(&option);
        }
        self.queue.extend(branch);
        self.advance().await;
        Ok(Turn::Continue)
    }

    async fn emit(&self, event: OrchestratorEvent) {
        let data = self.get_data();
        debug!(
            session_id = %self.session_id,
            event = %event,
            progress = data.progress,
            "Workflow event"
        );
        self.event_handler.on_event(event, &data).await;
    }

    fn set_state(&mut self, next: OrchestratorState) {
        if self.state == next {
            return;
        }
        self.state = match self.state.transition_to(next) {
            Ok(state) => state,
            Err(e) => {
                warn!(
                    session_id = %self.session_id,
                    from = %self.state,
                    to = %next,
                    allowed = ?self.state.valid_transitions(),
                    error = %e,
                    "Unexpected state transition"
                );
                debug_assert!(false, "invalid transition {} -> {}", self.state, next);
                next
            }
        };
    }
}

/// Resolves the workflow a decision option branches into.
fn decision_target<'a>(
    registry: &'a HashMap<String, Workflow>,
    step: &WorkflowStep,
    option: &WorkflowOption,
) -> Result<&'a Workflow, WorkflowError> {
    let reference = option
        .reference()
        .ok_or_else(|| WorkflowError::MissingReference {
            step_id: step.id().to_string(),
            option_id: option.id,
        })?;

    registry
        .get(reference)
        .ok_or_else(|| WorkflowError::UnknownWorkflow {
            step_id: step.id().to_string(),
            reference_id: reference.to_string(),
        })
}

/// Checks every non-back option of non-lazy decision steps.
///
/// Lazy decisions get their options from a loader, so they can only be
/// checked when selected.
fn validate_decisions<'a>(
    registry: &HashMap<String, Workflow>,
    steps: impl IntoIterator<Item = &'a WorkflowStep>,
) -> Result<(), WorkflowError> {
    for step in steps
        .into_iter()
        .filter(|s| s.is_decision() && !s.is_lazy())
    {
        for option in step.options().iter().filter(|o| !o.is_back_action) {
            decision_target(registry, step, option)?;
        }
    }
    Ok(())
}
