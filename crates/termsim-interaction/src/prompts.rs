//! Prompt templates for the simulator.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use minijinja::Environment;
use termsim_core::generation::CONTEXT_TOOL_TYPE;
use termsim_core::{GenerationRequest, PromptKind, Result, TermsimError};

const TERMINAL_OUTPUT: &str = "terminal_output";
const PARSE_COMMAND: &str = "parse_command";
const STATE_UPDATE: &str = "state_update";

const TERMINAL_OUTPUT_TEMPLATE: &str = r#"
You are simulating a command-line environment for {{ tool_type }} commands.
Generate accurate command output based on the virtual state described below.

CURRENT ENVIRONMENT STATE:
{{ environment_state }}

USER COMMAND:
{{ command }}

Instructions:
1. Parse the command and determine if it's valid
2. If invalid, return an appropriate error message that would appear in a real terminal
3. If valid, return the expected output based on the current environment state
4. Output should match the exact format and style of real {{ tool_type }} command outputs
5. Don't include any explanations or comments outside of what would appear in a real terminal

Return ONLY the terminal output text, formatted exactly as it would appear in a real terminal.
"#;

const PARSE_COMMAND_TEMPLATE: &str = r#"
Parse the following command into its structured components:
{{ command }}

Return ONLY a JSON representation of the command with these fields:
1. "tool": The main tool being used (kubectl, git, etc.)
2. "subcommand": The specific subcommand (get, apply, commit, etc.)
3. "options": An array of option flags (like --namespace, -n, etc.)
4. "args": An array of positional arguments
5. "valid": Boolean indicating if this appears to be a valid command

Output the JSON structure and nothing else.
"#;

const STATE_UPDATE_TEMPLATE: &str = r#"
Given the executed {{ tool_type }} command and its output, update the virtual environment state.

CURRENT STATE:
{{ current_state }}

EXECUTED COMMAND:
{{ command }}

COMMAND OUTPUT:
{{ command_output }}

Instructions:
1. Analyze how this command would modify the state of a real {{ tool_type }} environment
2. Return a JSON representation of the UPDATED state
3. Include only changes and elements that need to be updated, don't repeat unchanged values
4. Be precise and accurate to how real {{ tool_type }} commands modify state

Return ONLY the JSON representation of state changes.
"#;

static TEMPLATES: LazyLock<Environment<'static>> = LazyLock::new(|| {
    let mut env = Environment::new();
    for (name, source) in [
        (TERMINAL_OUTPUT, TERMINAL_OUTPUT_TEMPLATE),
        (PARSE_COMMAND, PARSE_COMMAND_TEMPLATE),
        (STATE_UPDATE, STATE_UPDATE_TEMPLATE),
    ] {
        env.add_template(name, source)
            .expect("built-in prompt templates are valid");
    }
    env
});

/// Renders the prompt text for `request`.
///
/// The tool family carried by the prompt kind is exposed as `tool_type`;
/// other variables come from the request context.
pub fn render_prompt(request: &GenerationRequest) -> Result<String> {
    let (name, tool) = match request.kind {
        PromptKind::TerminalOutput(tool) => (TERMINAL_OUTPUT, Some(tool)),
        PromptKind::ParseCommand => (PARSE_COMMAND, None),
        PromptKind::StateUpdate(tool) => (STATE_UPDATE, Some(tool)),
    };

    let mut context: BTreeMap<&str, &str> = request
        .context
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();
    if let Some(tool) = &tool {
        context.insert(CONTEXT_TOOL_TYPE, tool.as_ref());
    }

    let template = TEMPLATES
        .get_template(name)
        .map_err(|e| TermsimError::internal(format!("missing prompt template {name}: {e}")))?;
    let rendered = template
        .render(&context)
        .map_err(|e| TermsimError::internal(format!("failed to render {name} prompt: {e}")))?;
    Ok(rendered.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use termsim_core::ToolKind;
    use termsim_core::generation::{
        CONTEXT_COMMAND, CONTEXT_COMMAND_OUTPUT, CONTEXT_CURRENT_STATE, CONTEXT_ENVIRONMENT_STATE,
    };

    #[test]
    fn test_terminal_output_prompt_names_the_tool() {
        let request = GenerationRequest::new(PromptKind::TerminalOutput(ToolKind::Kubectl))
            .with(CONTEXT_COMMAND, "kubectl get pods")
            .with(CONTEXT_ENVIRONMENT_STATE, "{\"pods\": {}}");

        let prompt = render_prompt(&request).unwrap();

        assert!(prompt.starts_with("You are simulating a command-line environment for kubectl commands."));
        assert!(prompt.contains("USER COMMAND:\nkubectl get pods"));
        assert!(prompt.contains("{\"pods\": {}}"));
    }

    #[test]
    fn test_parse_prompt_lists_fields() {
        let request = GenerationRequest::new(PromptKind::ParseCommand).with(CONTEXT_COMMAND, "git log");

        let prompt = render_prompt(&request).unwrap();

        assert!(prompt.contains("git log"));
        for field in ["\"tool\"", "\"subcommand\"", "\"options\"", "\"args\"", "\"valid\""] {
            assert!(prompt.contains(field), "missing {field}");
        }
    }

    #[test]
    fn test_state_update_prompt_includes_output() {
        let request = GenerationRequest::new(PromptKind::StateUpdate(ToolKind::Git))
            .with(CONTEXT_COMMAND, "git init")
            .with(CONTEXT_CURRENT_STATE, "{\"initialized\": false}")
            .with(CONTEXT_COMMAND_OUTPUT, "Initialized empty Git repository");

        let prompt = render_prompt(&request).unwrap();

        assert!(prompt.starts_with("Given the executed git command"));
        assert!(prompt.contains("Initialized empty Git repository"));
        assert!(prompt.contains("{\"initialized\": false}"));
    }

    #[test]
    fn test_state_text_is_not_interpreted_as_template() {
        let request = GenerationRequest::new(PromptKind::TerminalOutput(ToolKind::Git))
            .with(CONTEXT_COMMAND, "git status")
            .with(CONTEXT_ENVIRONMENT_STATE, "{{ not a variable }}");

        let prompt = render_prompt(&request).unwrap();
        assert!(prompt.contains("{{ not a variable }}"));
    }
}
