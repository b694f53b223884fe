//! Structured command parsing with a deterministic fallback.

use std::sync::Arc;
use std::time::Duration;

use termsim_core::generation::CONTEXT_COMMAND;
use termsim_core::{GenerationRequest, ParsedCommand, PromptKind, TextGenerator};

use crate::generation::generate_with_timeout;

/// Asks the generator for a structured parse of a command line.
///
/// `parse` never fails: a generator error, a timeout or an undecodable reply
/// all produce [`ParsedCommand::fallback`].
#[derive(Clone)]
pub struct CommandParser {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl CommandParser {
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    pub async fn parse(&self, command: &str) -> ParsedCommand {
        let request = GenerationRequest::new(PromptKind::ParseCommand).with(CONTEXT_COMMAND, command);

        match generate_with_timeout(self.generator.as_ref(), &request, self.timeout).await {
            Ok(reply) => ParsedCommand::decode_or_fallback(command, &reply),
            Err(err) => {
                tracing::warn!(error = %err, "command parse unavailable, using fallback parse");
                ParsedCommand::fallback(command)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Reply, ScriptedGenerator};

    fn parser(parse: Reply) -> CommandParser {
        let generator = ScriptedGenerator::new(parse, Reply::text(""), Reply::text("{}"));
        CommandParser::new(Arc::new(generator), Duration::from_millis(200))
    }

    #[tokio::test]
    async fn test_uses_structured_reply() {
        let reply = r#"{"tool":"git","subcommand":"checkout","options":["-b"],"args":["feature"],"valid":true}"#;
        let parsed = parser(Reply::text(reply)).parse("git checkout -b feature").await;

        assert_eq!(parsed.subcommand, "checkout");
        assert_eq!(parsed.options, vec!["-b"]);
        assert_eq!(parsed.args, vec!["feature"]);
    }

    #[tokio::test]
    async fn test_non_json_reply_falls_back() {
        let parsed = parser(Reply::text("The command is git status"))
            .parse("git status")
            .await;
        assert_eq!(parsed, ParsedCommand::fallback("git status"));
    }

    #[tokio::test]
    async fn test_generator_failure_falls_back() {
        let parsed = parser(Reply::Fail("503".into())).parse("kubectl get pods").await;
        assert_eq!(parsed.tool, "kubectl");
        assert!(parsed.valid);
        assert!(parsed.options.is_empty());
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let parsed = parser(Reply::Hang).parse("helm install x").await;
        assert_eq!(parsed.tool, "unknown");
        assert!(!parsed.valid);
    }
}
