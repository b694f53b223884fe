use std::borrow::Cow::{self, Borrowed, Owned};
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use termsim_application::CommandRequest;
use termsim_core::{ToolKind, classify};

use crate::bootstrap::App;

const EVICTION_INTERVAL: Duration = Duration::from_secs(60);

/// Completes tool names and REPL directives, and colours unsupported input.
struct TerminalHelper {
    words: Vec<&'static str>,
}

impl TerminalHelper {
    fn new() -> Self {
        Self {
            words: vec!["kubectl", "git", ":state", ":reset", ":session", "exit"],
        }
    }
}

impl Helper for TerminalHelper {}

impl Completer for TerminalHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if line.contains(' ') {
            return Ok((0, vec![]));
        }

        let candidates = self
            .words
            .iter()
            .filter(|word| word.starts_with(line))
            .map(|word| Pair {
                display: word.to_string(),
                replacement: word.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for TerminalHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with(':') {
            Owned(line.bright_cyan().to_string())
        } else if !line.trim().is_empty() && classify(line) == ToolKind::Unknown {
            Owned(line.bright_black().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for TerminalHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.is_empty() || line.contains(' ') {
            return None;
        }
        self.words
            .iter()
            .find(|word| word.starts_with(line) && word.len() > line.len())
            .map(|word| word[line.len()..].to_string())
    }
}

impl Validator for TerminalHelper {}

/// Runs the interactive terminal.
///
/// Every line goes through one command cycle on the bound session; the
/// session is created on first use unless `--session` names an existing one.
pub async fn run(app: &App, session: Option<String>, user: Option<String>) -> Result<()> {
    let eviction = app
        .config
        .sessions
        .idle_ttl()
        .map(|_| app.service.clone().spawn_eviction_task(EVICTION_INTERVAL));

    let mut session_id = session;

    let mut rl = Editor::new()?;
    rl.set_helper(Some(TerminalHelper::new()));

    println!("{}", "=== termsim ===".bright_magenta().bold());
    println!(
        "{}",
        "Type kubectl or git commands. ':state' shows the environment, ':reset' restores it, 'exit' quits."
            .bright_black()
    );
    println!();

    loop {
        let readline = rl.readline("$ ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed == "exit" || trimmed == "quit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                if let Some(directive) = trimmed.strip_prefix(':') {
                    run_directive(app, directive, session_id.as_deref()).await;
                    continue;
                }

                let request = CommandRequest {
                    command: trimmed.to_string(),
                    session_id: session_id.clone(),
                    user_id: user.clone(),
                };

                match app.service.process_command(request).await {
                    Ok(response) => {
                        if session_id.as_deref() != Some(response.session_id.as_str()) {
                            println!(
                                "{}",
                                format!("[session {}]", response.session_id).bright_black()
                            );
                            session_id = Some(response.session_id.clone());
                        }
                        if response.success {
                            println!("{}", response.output);
                        } else {
                            println!("{}", response.output.red());
                        }
                    }
                    Err(e) => eprintln!("{}", format!("Session store error: {e}").red()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'exit' to quit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    if let Some(handle) = eviction {
        handle.abort();
    }
    Ok(())
}

async fn run_directive(app: &App, directive: &str, session_id: Option<&str>) {
    let Some(session_id) = session_id else {
        println!("{}", "No session yet. Run a command first.".yellow());
        return;
    };

    let result = match directive {
        "session" => {
            println!("{session_id}");
            Ok(())
        }
        "state" => super::session::show(app, session_id).await,
        "reset" => super::session::reset(app, session_id).await,
        other => {
            println!("{}", format!("Unknown directive ':{other}'").yellow());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}", format!("Error: {e}").red());
    }
}
