//! Wires configuration, session store and generator into a `SessionService`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use termsim_application::{SessionService, SimulationDispatcher};
use termsim_core::config::SimulatorConfig;
use termsim_core::{GenerationRequest, TermsimError, TextGenerator};
use termsim_infrastructure::{ConfigService, session_repository_from_config};
use termsim_interaction::OpenAIApiGenerator;

pub struct App {
    pub config: SimulatorConfig,
    pub service: Arc<SessionService>,
}

impl App {
    /// Loads config and builds the service.
    ///
    /// When `needs_generator` is false a missing API key is tolerated; the
    /// session commands that run this way never call the generator.
    pub async fn load(config_path: Option<PathBuf>, needs_generator: bool) -> Result<Self> {
        let config_service = match config_path {
            Some(path) => ConfigService::with_path(path),
            None => ConfigService::default_location()?,
        };
        let config = config_service
            .load()
            .with_context(|| format!("Failed to load {}", config_service.path().display()))?;

        let repository = session_repository_from_config(&config.sessions).await?;

        let generator: Arc<dyn TextGenerator> =
            match OpenAIApiGenerator::try_from_env(config.generator.clone()) {
                Ok(generator) => {
                    tracing::info!(model = generator.model(), "using OpenAI generator");
                    Arc::new(generator)
                }
                Err(e) if !needs_generator => {
                    tracing::debug!(error = %e, "generator unavailable");
                    Arc::new(NoGenerator)
                }
                Err(e) => return Err(e.into()),
            };

        let dispatcher = SimulationDispatcher::with_timeout(
            generator,
            config.sessions.collaborator_timeout(),
        );
        let service = Arc::new(
            SessionService::new(repository, dispatcher).with_idle_ttl(config.sessions.idle_ttl()),
        );

        Ok(Self { config, service })
    }
}

/// Stand-in for commands that only read or reset stored sessions.
struct NoGenerator;

#[async_trait]
impl TextGenerator for NoGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> termsim_core::Result<String> {
        Err(TermsimError::config("OPENAI_API_KEY not found in environment variables"))
    }
}
