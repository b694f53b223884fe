//! Result of attempting to advance a session's environment.

use std::fmt;

use super::EnvironmentState;

/// Why a command cycle left the environment untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnchangedReason {
    /// The command was not a kubectl or git command.
    UnrecognizedCommand,
    /// A collaborator call returned an error.
    GenerationFailed(String),
    /// A collaborator call exceeded its deadline.
    Timeout,
    /// The update reply was not valid JSON.
    UndecodableUpdate(String),
    /// The update reply was valid JSON but not an object.
    NotAnObject,
}

impl fmt::Display for UnchangedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedCommand => write!(f, "command not recognized"),
            Self::GenerationFailed(message) => write!(f, "generation failed: {message}"),
            Self::Timeout => write!(f, "collaborator timed out"),
            Self::UndecodableUpdate(message) => write!(f, "undecodable update: {message}"),
            Self::NotAnObject => write!(f, "update document is not an object"),
        }
    }
}

/// Outcome of the state-update step of a command cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum StateUpdateOutcome {
    /// The update document was merged into the previous state.
    Applied(EnvironmentState),
    /// The previous state stands.
    Unchanged(UnchangedReason),
}

impl StateUpdateOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// Resolves the outcome against the state the cycle started from.
    pub fn into_state(self, previous: EnvironmentState) -> EnvironmentState {
        match self {
            Self::Applied(state) => state,
            Self::Unchanged(_) => previous,
        }
    }
}
