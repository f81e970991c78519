//! OrchestratorState enum for the dialogue driver.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Where a session stands relative to its current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrchestratorState {
    /// Not started, or reset by a restart.
    #[default]
    Initial,
    /// Ready to present the current step.
    Default,
    /// Current step presented, waiting for the user's reply.
    AwaitingInput,
}

impl OrchestratorState {
    /// Returns true if the next input is matched against the current step.
    pub fn accepts_user_input(&self) -> bool {
        matches!(self, OrchestratorState::AwaitingInput)
    }
}

impl StateMachine for OrchestratorState {
    /// Valid transitions:
    /// - Initial -> Default
    /// - Default -> Default, AwaitingInput, Initial
    /// - AwaitingInput -> Default, Initial
    fn can_transition_to(&self, target: &Self) -> bool {
        use OrchestratorState::*;
        matches!(
            (self, target),
            (Initial, Default)
                | (Default, Default)
                | (Default, AwaitingInput)
                | (Default, Initial)
                | (AwaitingInput, Default)
                | (AwaitingInput, Initial)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use OrchestratorState::*;
        match self {
            Initial => vec![Default],
            Default => vec![Default, AwaitingInput, Initial],
            AwaitingInput => vec![Default, Initial],
        }
    }
}

impl fmt::Display for OrchestratorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrchestratorState::Initial => "Initial",
            OrchestratorState::Default => "Default",
            OrchestratorState::AwaitingInput => "AwaitingInput",
        };
        write!(f, "{}", s)
    }
}
