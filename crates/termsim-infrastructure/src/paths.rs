//! Path resolution for termsim configuration and session data.
//!
//! ```text
//! ~/.config/termsim/
//! ├── config.toml      # SimulatorConfig
//! └── sessions/        # AsyncDirSessionRepository files
//!     └── <session-id>.json
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "termsim";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

pub struct TermsimPaths;

impl TermsimPaths {
    /// Returns the termsim configuration directory (e.g. `~/.config/termsim/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn sessions_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("sessions"))
    }
}
