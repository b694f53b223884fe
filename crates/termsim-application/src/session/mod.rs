//! Session application services.
//!
//! `SessionService` owns the session store and runs command cycles;
//! `SessionLocks` serializes cycles per session id.

mod locks;
mod service;

pub use locks::SessionLocks;
pub use service::SessionService;

use serde::{Deserialize, Serialize};
use termsim_core::ParsedCommand;

/// An incoming command for a (possibly new) session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRequest {
    pub command: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl CommandRequest {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            session_id: None,
            user_id: None,
        }
    }

    pub fn for_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn for_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

/// Result of one command cycle as seen by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse {
    pub output: String,
    /// False exactly when the output starts with "error" (any case)
    pub success: bool,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed_command: Option<ParsedCommand>,
}

pub(crate) fn output_indicates_success(output: &str) -> bool {
    !output.to_lowercase().starts_with("error")
}
