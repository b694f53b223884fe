//! Session repository trait.
//!
//! Defines the interface for session persistence operations.

use async_trait::async_trait;

use super::model::SessionState;
use crate::error::Result;

/// An abstract store of `SessionState` values keyed by session id.
///
/// Backends range from an in-memory map to a durable directory store. The
/// repository does not serialize command cycles; that is the session
/// service's job.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Finds a session by its ID.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(SessionState))`: Session found
    /// - `Ok(None)`: Session not found
    /// - `Err(_)`: Error occurred during retrieval
    async fn find_by_id(&self, session_id: &str) -> Result<Option<SessionState>>;

    /// Inserts or replaces a session.
    async fn save(&self, session: &SessionState) -> Result<()>;

    /// Deletes a session. Deleting a missing session is not an error.
    async fn delete(&self, session_id: &str) -> Result<()>;

    /// Lists all stored sessions.
    async fn list_all(&self) -> Result<Vec<SessionState>>;
}
