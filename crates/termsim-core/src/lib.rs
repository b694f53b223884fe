//! Domain layer for termsim.
//!
//! Holds the session state model, the schema-less environment tree with its
//! merge engine, command classification and the collaborator traits that the
//! outer layers implement.

pub mod command;
pub mod config;
pub mod error;
pub mod generation;
pub mod reply;
pub mod session;
pub mod state;

pub use command::{ParsedCommand, ToolKind, classify};
pub use error::{Result, TermsimError};
pub use generation::{GenerationRequest, PromptKind, TextGenerator};
pub use session::{SessionRepository, SessionState};
pub use state::{EnvironmentState, StateUpdateOutcome, UnchangedReason};
