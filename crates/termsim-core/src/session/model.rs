use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::{EnvironmentState, default_environment};

/// Root aggregate for one terminal session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Opaque identifier, immutable after creation
    pub session_id: String,
    /// Optional owner, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Bumped on every completed command cycle
    pub updated_at: DateTime<Utc>,
    pub environment_state: EnvironmentState,
}

impl SessionState {
    /// Creates a session with a fresh UUID and the default environment.
    pub fn new(user_id: Option<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), user_id)
    }

    pub fn with_id(session_id: impl Into<String>, user_id: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            user_id,
            created_at: now,
            updated_at: now,
            environment_state: default_environment(),
        }
    }

    /// Replaces the environment after a completed cycle and bumps `updated_at`.
    pub fn advance(&mut self, environment_state: EnvironmentState) {
        self.environment_state = environment_state;
        self.updated_at = Utc::now();
    }

    /// Restores the default environment, keeping id and owner.
    ///
    /// The session is rebuilt from scratch, so `created_at` restarts too.
    pub fn reset(&mut self) {
        *self = Self::with_id(std::mem::take(&mut self.session_id), self.user_id.take());
    }

    /// Whether the session has been idle for longer than `ttl` at `now`.
    pub fn is_idle(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now.signed_duration_since(self.updated_at) > ttl
    }
}
