//! Configuration model for termsim.
//!
//! Every field has a default so an empty or missing `config.toml` is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4";

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct SimulatorConfig {
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub sessions: SessionConfig,
}

/// Settings for the text-generation collaborator.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub api_base: String,
    pub model: String,
    /// Kept low so simulated output stays consistent between runs
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub request_timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.1,
            max_tokens: None,
            request_timeout_secs: 60,
        }
    }
}

impl GeneratorConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Memory,
    Directory,
}

/// Session store and command-cycle settings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SessionConfig {
    pub storage: StorageKind,
    /// Directory for the `directory` store; defaults under the config dir
    pub data_dir: Option<PathBuf>,
    /// Sessions idle longer than this are evicted; `None` keeps them forever
    pub idle_ttl_secs: Option<u64>,
    /// Deadline for each collaborator call within a command cycle
    pub collaborator_timeout_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage: StorageKind::Memory,
            data_dir: None,
            idle_ttl_secs: None,
            collaborator_timeout_secs: 90,
        }
    }
}

impl SessionConfig {
    pub fn idle_ttl(&self) -> Option<Duration> {
        self.idle_ttl_secs.map(Duration::from_secs)
    }

    pub fn collaborator_timeout(&self) -> Duration {
        Duration::from_secs(self.collaborator_timeout_secs.max(1))
    }
}
