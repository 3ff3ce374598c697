//! services/web/src/adapters/session_store.rs
//!
//! This module contains the process-local session store, the concrete implementation
//! of the `SessionRepository` port from the `core` crate. Sessions live only as long
//! as the process does, and idle ones are swept out periodically.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lessonflow_core::domain::Session;
use lessonflow_core::ports::{PortError, PortResult, SessionRepository};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An in-memory session store that implements the `SessionRepository` port.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl InMemorySessionStore {
    /// Creates a new, empty `InMemorySessionStore`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions currently held.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

//=========================================================================================
// `SessionRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl SessionRepository for InMemorySessionStore {
    async fn get_session(&self, session_id: Uuid) -> PortResult<Session> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or_else(|| PortError::NotFound(format!("session {}", session_id)))?;
        session.last_accessed_at = Utc::now();
        Ok(session.clone())
    }

    async fn save_session(&self, mut session: Session) -> PortResult<()> {
        session.last_accessed_at = Utc::now();
        self.sessions.write().await.insert(session.id, session);
        Ok(())
    }

    async fn remove_idle_sessions(&self, cutoff: DateTime<Utc>) -> PortResult<usize> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.last_accessed_at >= cutoff);
        Ok(before - sessions.len())
    }
}

//=========================================================================================
// Idle Session Sweeper
//=========================================================================================

/// Spawns a background task that drops sessions idle for longer than `idle_ttl`,
/// checking every `every`.
pub fn spawn_idle_sweeper(
    sessions: Arc<dyn SessionRepository>,
    idle_ttl: Duration,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let ttl = match chrono::Duration::from_std(idle_ttl) {
                Ok(ttl) => ttl,
                Err(e) => {
                    error!(error = %e, "Session idle TTL out of range; sweeper stopped");
                    return;
                }
            };
            match sessions.remove_idle_sessions(Utc::now() - ttl).await {
                Ok(0) => debug!("Session sweep found nothing idle"),
                Ok(removed) => info!(removed, "Removed idle sessions"),
                Err(e) => error!("Session sweep failed: {:?}", e),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lessonflow_core::Catalog;

    #[tokio::test]
    async fn sessions_round_trip_through_the_store() {
        let store = InMemorySessionStore::new();
        let mut session = Session::new(Uuid::new_v4());
        assert!(store.get_session(session.id).await.is_err());

        session.log_in();
        session.cart.add("math-basic", &Catalog::builtin());
        store.save_session(session.clone()).await.unwrap();

        let loaded = store.get_session(session.id).await.unwrap();
        assert!(loaded.is_logged_in());
        assert_eq!(loaded.cart.course_ids(), session.cart.course_ids());
        assert!(loaded.last_accessed_at >= session.last_accessed_at);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let store = InMemorySessionStore::new();
        let err = store.get_session(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));
    }

    #[tokio::test]
    async fn idle_sessions_are_removed_and_active_ones_kept() {
        let store = InMemorySessionStore::new();
        let stale = Session::new(Uuid::new_v4());
        let fresh = Session::new(Uuid::new_v4());
        store.save_session(stale.clone()).await.unwrap();
        store.save_session(fresh.clone()).await.unwrap();

        // Backdate one entry past the cutoff.
        store
            .sessions
            .write()
            .await
            .get_mut(&stale.id)
            .unwrap()
            .last_accessed_at = Utc::now() - chrono::Duration::hours(2);

        let removed = store
            .remove_idle_sessions(Utc::now() - chrono::Duration::hours(1))
            .await
            .unwrap();

        assert_eq!(removed, 1);
        assert!(store.get_session(stale.id).await.is_err());
        assert!(store.get_session(fresh.id).await.is_ok());
    }

    #[tokio::test]
    async fn sweeper_empties_the_store_once_sessions_go_idle() {
        let store = Arc::new(InMemorySessionStore::new());
        let mut session = Session::new(Uuid::new_v4());
        session.last_accessed_at = Utc::now() - chrono::Duration::hours(3);
        store.sessions.write().await.insert(session.id, session);

        let handle = spawn_idle_sweeper(
            store.clone(),
            Duration::from_secs(3600),
            Duration::from_secs(60),
        );
        // The first tick fires immediately.
        for _ in 0..100 {
            if store.is_empty().await {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert!(store.is_empty().await);
        handle.abort();
    }
}
