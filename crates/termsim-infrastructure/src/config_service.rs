//! Configuration service implementation.
//!
//! Loads `SimulatorConfig` from `config.toml` (default
//! `~/.config/termsim/config.toml`, or `$TERMSIM_CONFIG`) and layers the
//! OpenAI environment variables on top.

use std::path::{Path, PathBuf};

use termsim_core::config::SimulatorConfig;
use termsim_core::{Result, TermsimError};

use crate::paths::TermsimPaths;

pub const ENV_CONFIG_PATH: &str = "TERMSIM_CONFIG";
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_MODEL_NAME: &str = "OPENAI_MODEL_NAME";
pub const ENV_API_BASE: &str = "OPENAI_API_BASE";

#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Uses `$TERMSIM_CONFIG` when set, otherwise the platform config file.
    pub fn default_location() -> Result<Self> {
        if let Ok(path) = std::env::var(ENV_CONFIG_PATH)
            && !path.trim().is_empty()
        {
            return Ok(Self::with_path(path));
        }
        let path = TermsimPaths::config_file().map_err(|e| TermsimError::config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the file (missing file means defaults) and applies env overrides.
    pub fn load(&self) -> Result<SimulatorConfig> {
        let mut config = self.load_file()?;
        apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        Ok(config)
    }

    fn load_file(&self) -> Result<SimulatorConfig> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(SimulatorConfig::default());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            TermsimError::config(format!(
                "Failed to read configuration file at {}: {}",
                self.path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            TermsimError::config(format!(
                "Failed to parse configuration file at {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

/// Overrides generator settings from `OPENAI_MODEL_NAME` and `OPENAI_API_BASE`.
///
/// Empty values are ignored. `lookup` abstracts the environment for tests.
pub fn apply_env_overrides<F>(config: &mut SimulatorConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(model) = non_empty(ENV_MODEL_NAME) {
        config.generator.model = model;
    }
    if let Some(api_base) = non_empty(ENV_API_BASE) {
        config.generator.api_base = api_base;
    }
}
