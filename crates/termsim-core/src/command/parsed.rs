use serde::{Deserialize, Serialize};

use super::classifier::classify;
use crate::error::Result;
use crate::reply::extract_json_payload;

/// Structured view of one command line.
///
/// Transient: attached to the response of a cycle, never stored in a session.
/// All five fields are required when decoding a collaborator reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCommand {
    pub tool: String,
    pub subcommand: String,
    pub options: Vec<String>,
    pub args: Vec<String>,
    pub valid: bool,
}

impl ParsedCommand {
    /// Deterministic parse used whenever structured extraction is unavailable.
    pub fn fallback(command: &str) -> Self {
        let tool = classify(command);
        Self {
            tool: tool.to_string(),
            subcommand: String::new(),
            options: Vec::new(),
            args: Vec::new(),
            valid: tool.is_supported(),
        }
    }

    /// Decodes a collaborator reply, tolerating a surrounding code fence.
    pub fn decode_reply(reply: &str) -> Result<Self> {
        Ok(serde_json::from_str(extract_json_payload(reply))?)
    }

    /// Decodes `reply`, falling back to [`ParsedCommand::fallback`] on any failure.
    pub fn decode_or_fallback(command: &str, reply: &str) -> Self {
        match Self::decode_reply(reply) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::debug!(error = %err, "parse reply rejected, using fallback parse");
                Self::fallback(command)
            }
        }
    }
}
