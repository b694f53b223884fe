//! Session manager: resolves sessions, runs command cycles, persists results.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use termsim_core::{Result, SessionRepository, SessionState};
use tokio::sync::OwnedMutexGuard;
use tokio::task::JoinHandle;

use super::locks::SessionLocks;
use super::{CommandRequest, CommandResponse, output_indicates_success};
use crate::dispatcher::SimulationDispatcher;

/// Owns the session store and every `SessionState` in it.
///
/// A command cycle holds its session's lock from load to write-back, so two
/// cycles on one session never interleave. State is written only once a
/// cycle completes; a cycle dropped part-way leaves the stored state as it was.
pub struct SessionService {
    repository: Arc<dyn SessionRepository>,
    dispatcher: SimulationDispatcher,
    locks: SessionLocks,
    idle_ttl: Option<Duration>,
}

impl SessionService {
    pub fn new(repository: Arc<dyn SessionRepository>, dispatcher: SimulationDispatcher) -> Self {
        Self {
            repository,
            dispatcher,
            locks: SessionLocks::new(),
            idle_ttl: None,
        }
    }

    /// Enables idle-session eviction for sessions untouched longer than `ttl`.
    pub fn with_idle_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.idle_ttl = ttl;
        self
    }

    /// Runs one command cycle.
    ///
    /// A missing or unknown `session_id` starts a new session with a fresh id
    /// and the default environment. Only store failures are returned as errors.
    pub async fn process_command(&self, request: CommandRequest) -> Result<CommandResponse> {
        let (mut session, _guard) = self
            .resolve_session(request.session_id.as_deref(), request.user_id)
            .await?;

        let previous = session.environment_state.clone();
        let result = self.dispatcher.process(&request.command, &previous).await;

        let applied = result.outcome.is_applied();
        let (output, new_state, parsed) = result.into_parts(previous);
        session.advance(new_state);
        self.repository.save(&session).await?;

        tracing::debug!(
            session_id = %session.session_id,
            tool = %parsed.tool,
            applied,
            "command cycle completed"
        );

        Ok(CommandResponse {
            success: output_indicates_success(&output),
            output,
            session_id: session.session_id,
            parsed_command: Some(parsed),
        })
    }

    /// Loads an existing session under its lock, or creates and stores a new one.
    async fn resolve_session(
        &self,
        session_id: Option<&str>,
        user_id: Option<String>,
    ) -> Result<(SessionState, OwnedMutexGuard<()>)> {
        if let Some(session_id) = session_id {
            let guard = self.locks.acquire(session_id).await;
            if let Some(session) = self.repository.find_by_id(session_id).await? {
                return Ok((session, guard));
            }
            drop(guard);
            self.locks.forget(session_id);
            tracing::debug!(session_id, "unknown session id, starting a new session");
        }

        let session = SessionState::new(user_id);
        let guard = self.locks.acquire(&session.session_id).await;
        self.repository.save(&session).await?;
        tracing::info!(session_id = %session.session_id, "session created");
        Ok((session, guard))
    }

    /// Creates a session with the default environment without running a command.
    pub async fn create_session(&self, user_id: Option<String>) -> Result<SessionState> {
        let session = SessionState::new(user_id);
        self.repository.save(&session).await?;
        tracing::info!(session_id = %session.session_id, "session created");
        Ok(session)
    }

    /// Returns the last persisted state of a session, `None` if it does not exist.
    pub async fn get_session(&self, session_id: &str) -> Result<Option<SessionState>> {
        self.repository.find_by_id(session_id).await
    }

    /// Restores the default environment in place, keeping id and owner.
    ///
    /// Returns `false` (and creates nothing) when the session does not exist.
    pub async fn reset_session(&self, session_id: &str) -> Result<bool> {
        let guard = self.locks.acquire(session_id).await;

        let Some(mut session) = self.repository.find_by_id(session_id).await? else {
            drop(guard);
            self.locks.forget(session_id);
            return Ok(false);
        };

        session.reset();
        self.repository.save(&session).await?;
        tracing::info!(session_id, "session reset");
        drop(guard);
        Ok(true)
    }

    pub async fn list_sessions(&self) -> Result<Vec<String>> {
        let mut ids: Vec<String> = self
            .repository
            .list_all()
            .await?
            .into_iter()
            .map(|session| session.session_id)
            .collect();
        ids.sort();
        Ok(ids)
    }

    /// Deletes sessions idle for longer than the configured TTL at `now`.
    ///
    /// Sessions with a cycle in flight are skipped. Returns the evicted ids;
    /// a service without a TTL evicts nothing.
    pub async fn evict_idle(&self, now: DateTime<Utc>) -> Result<Vec<String>> {
        let Some(ttl) = self.idle_ttl else {
            return Ok(Vec::new());
        };
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);

        let mut evicted = Vec::new();
        for candidate in self.repository.list_all().await? {
            if !candidate.is_idle(now, ttl) {
                continue;
            }
            let Some(guard) = self.locks.try_acquire(&candidate.session_id) else {
                continue;
            };

            // Re-read under the lock; a cycle may have finished since listing.
            let still_idle = self
                .repository
                .find_by_id(&candidate.session_id)
                .await?
                .is_some_and(|session| session.is_idle(now, ttl));
            if still_idle {
                self.repository.delete(&candidate.session_id).await?;
                evicted.push(candidate.session_id.clone());
            }

            drop(guard);
            if still_idle {
                self.locks.forget(&candidate.session_id);
            }
        }

        if !evicted.is_empty() {
            tracing::info!(count = evicted.len(), "evicted idle sessions");
        }
        Ok(evicted)
    }

    /// Spawns a task that runs [`SessionService::evict_idle`] every `interval`.
    pub fn spawn_eviction_task(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(e) = self.evict_idle(Utc::now()).await {
                    tracing::warn!(error = %e, "idle session eviction failed");
                }
            }
        })
    }
}
