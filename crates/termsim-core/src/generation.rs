//! Contract for the external text-generation collaborator.
//!
//! The simulator uses one generator three ways: rendering terminal output,
//! extracting a structured parse of a command, and proposing a state-update
//! document. Replies are untrusted text; callers decide how to recover.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::command::ToolKind;
use crate::error::Result;

/// Context variable holding the raw command line.
pub const CONTEXT_COMMAND: &str = "command";
/// Context variable holding the canonical environment for output rendering.
pub const CONTEXT_ENVIRONMENT_STATE: &str = "environment_state";
/// Context variable holding the canonical environment for state updates.
pub const CONTEXT_CURRENT_STATE: &str = "current_state";
/// Context variable holding the rendered output of the command.
pub const CONTEXT_COMMAND_OUTPUT: &str = "command_output";
/// Context variable naming the tool family.
pub const CONTEXT_TOOL_TYPE: &str = "tool_type";

/// Which prompt a request is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    /// Simulated terminal output for a command of the given tool.
    TerminalOutput(ToolKind),
    /// A JSON object with the five `ParsedCommand` fields.
    ParseCommand,
    /// A JSON object holding only the changed parts of the environment.
    StateUpdate(ToolKind),
}

impl PromptKind {
    /// Short label used in logs and timeout errors.
    pub fn label(&self) -> &'static str {
        match self {
            Self::TerminalOutput(_) => "terminal output",
            Self::ParseCommand => "command parse",
            Self::StateUpdate(_) => "state update",
        }
    }
}

/// A prompt selector plus the named context variables it is rendered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub kind: PromptKind,
    pub context: BTreeMap<String, String>,
}

impl GenerationRequest {
    pub fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            context: BTreeMap::new(),
        }
    }

    /// Adds a context variable (builder style).
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.context.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.context.get(key).map(String::as_str)
    }
}

/// A text-generation service, treated as an untrusted function from prompt
/// context to string.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = GenerationRequest::new(PromptKind::TerminalOutput(ToolKind::Git))
            .with(CONTEXT_COMMAND, "git status")
            .with(CONTEXT_ENVIRONMENT_STATE, "{}");

        assert_eq!(request.get(CONTEXT_COMMAND), Some("git status"));
        assert_eq!(request.get(CONTEXT_COMMAND_OUTPUT), None);
        assert_eq!(request.kind.label(), "terminal output");
    }
}
