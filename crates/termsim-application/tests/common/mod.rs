#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use termsim_application::{SessionService, SimulationDispatcher};
use termsim_core::generation::CONTEXT_CURRENT_STATE;
use termsim_core::{GenerationRequest, PromptKind, Result, TermsimError, TextGenerator};
use termsim_infrastructure::InMemorySessionRepository;
use tokio::sync::Barrier;

pub const GIT_STATUS_PARSE: &str =
    r#"{"tool":"git","subcommand":"status","options":[],"args":[],"valid":true}"#;
pub const KUBECTL_APPLY_PARSE: &str =
    r#"{"tool":"kubectl","subcommand":"apply","options":["-f"],"args":["x.yaml"],"valid":true}"#;

/// Answers each prompt kind with a fixed string and counts calls.
pub struct FixedGenerator {
    pub parse: String,
    pub output: String,
    pub update: String,
    pub calls: AtomicUsize,
}

impl FixedGenerator {
    pub fn new(parse: &str, output: &str, update: &str) -> Self {
        Self {
            parse: parse.to_string(),
            output: output.to_string(),
            update: update.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for FixedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(match request.kind {
            PromptKind::ParseCommand => self.parse.clone(),
            PromptKind::TerminalOutput(_) => self.output.clone(),
            PromptKind::StateUpdate(_) => self.update.clone(),
        })
    }
}

/// Increments a `counter` key read from the state it is shown.
///
/// Sleeps between reading and answering so unserialized cycles would lose
/// an increment.
pub struct CounterGenerator;

#[async_trait]
impl TextGenerator for CounterGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        match request.kind {
            PromptKind::ParseCommand => Ok(KUBECTL_APPLY_PARSE.to_string()),
            PromptKind::TerminalOutput(_) => {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok("deployment.apps/counter configured".to_string())
            }
            PromptKind::StateUpdate(_) => {
                let current = match request.get(CONTEXT_CURRENT_STATE) {
                    Some(text) => serde_json::from_str::<Value>(text)?,
                    None => Value::Null,
                };
                let seen = current.get("counter").and_then(Value::as_u64).unwrap_or(0);
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok(json!({ "counter": seen + 1 }).to_string())
            }
        }
    }
}

/// Output generation waits until `parties` cycles are rendering at once.
pub struct BarrierGenerator {
    pub barrier: Barrier,
}

impl BarrierGenerator {
    pub fn new(parties: usize) -> Self {
        Self {
            barrier: Barrier::new(parties),
        }
    }
}

#[async_trait]
impl TextGenerator for BarrierGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        match request.kind {
            PromptKind::ParseCommand => Ok(GIT_STATUS_PARSE.to_string()),
            PromptKind::TerminalOutput(_) => {
                self.barrier.wait().await;
                Ok("On branch main".to_string())
            }
            PromptKind::StateUpdate(_) => Ok("{}".to_string()),
        }
    }
}

/// Never answers output requests.
pub struct StalledGenerator;

#[async_trait]
impl TextGenerator for StalledGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        match request.kind {
            PromptKind::ParseCommand => Ok(GIT_STATUS_PARSE.to_string()),
            PromptKind::TerminalOutput(_) => std::future::pending().await,
            PromptKind::StateUpdate(_) => Err(TermsimError::internal("update requested after stall")),
        }
    }
}

pub fn in_memory_service(generator: Arc<dyn TextGenerator>) -> SessionService {
    let dispatcher = SimulationDispatcher::with_timeout(generator, Duration::from_secs(10));
    SessionService::new(Arc::new(InMemorySessionRepository::new()), dispatcher)
}
