//! Directory-backed `SessionRepository`.
//!
//! Each session is one pretty-printed JSON file. Writes go to a temporary
//! sibling first and are renamed into place, so a reader never observes a
//! half-written session.
//!
//! ```text
//! base_dir/
//! ├── 6f1c...e2.json
//! └── 9a07...41.json
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use termsim_core::{Result, SessionRepository, SessionState, TermsimError};
use tokio::fs;
use tokio::io::AsyncWriteExt;

const EXTENSION: &str = "json";

pub struct AsyncDirSessionRepository {
    base_dir: PathBuf,
}

impl AsyncDirSessionRepository {
    /// Opens (creating if needed) a session directory.
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).await?;
        tracing::debug!(dir = %base_dir.display(), "opened session directory");
        Ok(Self { base_dir })
    }

    pub fn sessions_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Maps a session id to its file, refusing ids that could escape the directory.
    fn session_path(&self, session_id: &str) -> Option<PathBuf> {
        let safe = !session_id.is_empty()
            && session_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        safe.then(|| self.base_dir.join(format!("{session_id}.{EXTENSION}")))
    }

    async fn read_session(path: &Path) -> Result<SessionState> {
        let content = fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[async_trait]
impl SessionRepository for AsyncDirSessionRepository {
    async fn find_by_id(&self, session_id: &str) -> Result<Option<SessionState>> {
        let Some(path) = self.session_path(session_id) else {
            return Ok(None);
        };

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    async fn save(&self, session: &SessionState) -> Result<()> {
        let path = self.session_path(&session.session_id).ok_or_else(|| {
            TermsimError::internal(format!("invalid session id '{}'", session.session_id))
        })?;
        let tmp_path = path.with_extension(format!("{EXTENSION}.tmp"));
        let content = serde_json::to_vec_pretty(session)?;

        let mut file = fs::File::create(&tmp_path).await?;
        file.write_all(&content).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&tmp_path, &path).await?;
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<()> {
        let Some(path) = self.session_path(session_id) else {
            return Ok(());
        };
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_all(&self) -> Result<Vec<SessionState>> {
        let mut sessions = Vec::new();
        let mut entries = fs::read_dir(&self.base_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }
            match Self::read_session(&path).await {
                Ok(session) => sessions.push(session),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable session file");
                }
            }
        }

        Ok(sessions)
    }
}
