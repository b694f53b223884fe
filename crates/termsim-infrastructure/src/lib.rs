//! Infrastructure layer for termsim: session stores, paths and configuration.

pub mod async_dir_session_repository;
pub mod config_service;
pub mod in_memory_session_repository;
pub mod paths;

pub use crate::async_dir_session_repository::AsyncDirSessionRepository;
pub use crate::config_service::ConfigService;
pub use crate::in_memory_session_repository::InMemorySessionRepository;

use std::sync::Arc;

use termsim_core::config::{SessionConfig, StorageKind};
use termsim_core::{Result, SessionRepository, TermsimError};

/// Builds the session store selected by `[sessions] storage`.
pub async fn session_repository_from_config(
    config: &SessionConfig,
) -> Result<Arc<dyn SessionRepository>> {
    match config.storage {
        StorageKind::Memory => Ok(Arc::new(InMemorySessionRepository::new())),
        StorageKind::Directory => {
            let dir = match &config.data_dir {
                Some(dir) => dir.clone(),
                None => paths::TermsimPaths::sessions_dir()
                    .map_err(|e| TermsimError::config(e.to_string()))?,
            };
            Ok(Arc::new(AsyncDirSessionRepository::new(dir).await?))
        }
    }
}
