//! Simulation dispatcher: one command in, output and a state outcome out.
//!
//! Flow for a recognized command:
//!
//! ```text
//! classify -> parse -> render output (collaborator) -> state update (collaborator) -> merge
//! ```
//!
//! Unrecognized commands short-circuit with a fixed message and no
//! collaborator calls. Collaborator failures never escape: they become an
//! error-text output or a `StateUpdateOutcome::Unchanged`.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use termsim_core::generation::{
    CONTEXT_COMMAND, CONTEXT_COMMAND_OUTPUT, CONTEXT_CURRENT_STATE, CONTEXT_ENVIRONMENT_STATE,
};
use termsim_core::reply::extract_json_payload;
use termsim_core::{
    EnvironmentState, GenerationRequest, ParsedCommand, PromptKind, StateUpdateOutcome,
    TermsimError, TextGenerator, ToolKind, UnchangedReason, classify,
};

use crate::command_parser::CommandParser;
use crate::generation::generate_with_timeout;

/// Output for commands that are neither kubectl nor git.
pub const UNRECOGNIZED_COMMAND_OUTPUT: &str =
    "Command not recognized. This environment supports kubectl and git commands.";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(90);

/// Everything one command cycle produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub output: String,
    pub parsed: ParsedCommand,
    pub outcome: StateUpdateOutcome,
}

impl SimulationResult {
    /// `(output, new state, parsed command)`, resolving the outcome against
    /// the state the cycle started from.
    pub fn into_parts(self, previous: EnvironmentState) -> (String, EnvironmentState, ParsedCommand) {
        (self.output, self.outcome.into_state(previous), self.parsed)
    }
}

#[derive(Clone)]
pub struct SimulationDispatcher {
    generator: Arc<dyn TextGenerator>,
    parser: CommandParser,
    timeout: Duration,
}

impl SimulationDispatcher {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self::with_timeout(generator, DEFAULT_TIMEOUT)
    }

    /// Bounds every collaborator call by `timeout`.
    pub fn with_timeout(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self {
            parser: CommandParser::new(generator.clone(), timeout),
            generator,
            timeout,
        }
    }

    pub async fn process(&self, command: &str, state: &EnvironmentState) -> SimulationResult {
        let tool = classify(command);
        if !tool.is_supported() {
            tracing::debug!(command, "unrecognized command");
            return SimulationResult {
                output: UNRECOGNIZED_COMMAND_OUTPUT.to_string(),
                parsed: ParsedCommand::fallback(command),
                outcome: StateUpdateOutcome::Unchanged(UnchangedReason::UnrecognizedCommand),
            };
        }

        let parsed = self.parser.parse(command).await;

        let (output, outcome) = match self.simulate(tool, command, state).await {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(%tool, error = %err, "terminal output generation failed");
                (failure_output(&err), unchanged_for(&err))
            }
        };

        if let StateUpdateOutcome::Unchanged(reason) = &outcome {
            tracing::warn!(%tool, %reason, "state left unchanged");
        }

        SimulationResult {
            output,
            parsed,
            outcome,
        }
    }

    /// Renders output; an output failure is the only error this returns.
    async fn simulate(
        &self,
        tool: ToolKind,
        command: &str,
        state: &EnvironmentState,
    ) -> termsim_core::Result<(String, StateUpdateOutcome)> {
        let state_text = state.to_canonical_string()?;

        let request = GenerationRequest::new(PromptKind::TerminalOutput(tool))
            .with(CONTEXT_COMMAND, command)
            .with(CONTEXT_ENVIRONMENT_STATE, state_text.clone());
        let output = generate_with_timeout(self.generator.as_ref(), &request, self.timeout).await?;

        let outcome = self
            .request_update(tool, command, state, state_text, &output)
            .await;
        Ok((output, outcome))
    }

    async fn request_update(
        &self,
        tool: ToolKind,
        command: &str,
        state: &EnvironmentState,
        state_text: String,
        output: &str,
    ) -> StateUpdateOutcome {
        let request = GenerationRequest::new(PromptKind::StateUpdate(tool))
            .with(CONTEXT_COMMAND, command)
            .with(CONTEXT_CURRENT_STATE, state_text)
            .with(CONTEXT_COMMAND_OUTPUT, output);

        match generate_with_timeout(self.generator.as_ref(), &request, self.timeout).await {
            Ok(reply) => apply_update_reply(state, &reply),
            Err(err) => StateUpdateOutcome::Unchanged(unchanged_reason(&err)),
        }
    }
}

/// Decodes an update document and merges it, all or nothing.
pub fn apply_update_reply(state: &EnvironmentState, reply: &str) -> StateUpdateOutcome {
    match serde_json::from_str::<Value>(extract_json_payload(reply)) {
        Ok(Value::Object(updates)) => StateUpdateOutcome::Applied(state.merged(&updates)),
        Ok(_) => StateUpdateOutcome::Unchanged(UnchangedReason::NotAnObject),
        Err(err) => StateUpdateOutcome::Unchanged(UnchangedReason::UndecodableUpdate(err.to_string())),
    }
}

fn unchanged_reason(err: &TermsimError) -> UnchangedReason {
    if err.is_timeout() {
        UnchangedReason::Timeout
    } else {
        UnchangedReason::GenerationFailed(err.to_string())
    }
}

fn unchanged_for(err: &TermsimError) -> StateUpdateOutcome {
    StateUpdateOutcome::Unchanged(unchanged_reason(err))
}

fn failure_output(err: &TermsimError) -> String {
    if err.is_timeout() {
        "Error: simulation timed out".to_string()
    } else {
        "Error: simulation unavailable, please try again".to_string()
    }
}
