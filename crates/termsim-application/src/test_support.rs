use std::sync::Mutex;

use async_trait::async_trait;
use termsim_core::{GenerationRequest, PromptKind, Result, TermsimError, TextGenerator};

/// What a scripted generator answers for one prompt kind.
#[derive(Clone)]
pub enum Reply {
    Text(String),
    Fail(String),
    Hang,
}

impl Reply {
    pub fn text(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Generator returning fixed replies per prompt kind and recording calls.
pub struct ScriptedGenerator {
    pub parse: Reply,
    pub output: Reply,
    pub update: Reply,
    pub calls: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn new(parse: Reply, output: Reply, update: Reply) -> Self {
        Self {
            parse,
            output,
            update,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn kinds(&self) -> Vec<PromptKind> {
        self.calls.lock().unwrap().iter().map(|r| r.kind).collect()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.calls.lock().unwrap().push(request.clone());
        let reply = match request.kind {
            PromptKind::ParseCommand => self.parse.clone(),
            PromptKind::TerminalOutput(_) => self.output.clone(),
            PromptKind::StateUpdate(_) => self.update.clone(),
        };
        match reply {
            Reply::Text(text) => Ok(text),
            Reply::Fail(message) => Err(TermsimError::generation(message)),
            Reply::Hang => std::future::pending().await,
        }
    }
}
