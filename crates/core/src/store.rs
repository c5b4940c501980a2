//! Session persistence seam.
//!
//! [`SessionStore`] is the only mutable state the lifecycle core shares
//! between requests. Implementations must make
//! [`compare_and_swap_refresh_hash`](SessionStore::compare_and_swap_refresh_hash)
//! a single atomic conditional write: that is what stops two concurrent
//! refreshes of one session from both succeeding.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::CoreError;
use crate::session::Session;

/// Durable keyed storage holding one [`Session`] per GUID.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the session for `guid`, or [`CoreError::NotFound`].
    async fn get(&self, guid: &str) -> Result<Session, CoreError>;

    /// Insert or replace the session keyed by `session.guid`.
    async fn upsert(&self, session: &Session) -> Result<(), CoreError>;

    /// Replace the session for `guid` only if its stored hash still equals
    /// `expected_old_hash`. Fails with [`CoreError::Conflict`] otherwise.
    async fn compare_and_swap_refresh_hash(
        &self,
        guid: &str,
        expected_old_hash: &str,
        new_session: &Session,
    ) -> Result<(), CoreError>;
}

/// In-process [`SessionStore`] backed by a `RwLock<HashMap>`.
///
/// Used by tests and for running without a database. Contents are lost on
/// restart.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether the store holds no sessions.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, guid: &str) -> Result<Session, CoreError> {
        self.sessions
            .read()
            .await
            .get(guid)
            .cloned()
            .ok_or(CoreError::NotFound)
    }

    async fn upsert(&self, session: &Session) -> Result<(), CoreError> {
        self.sessions
            .write()
            .await
            .insert(session.guid.clone(), session.clone());
        Ok(())
    }

    async fn compare_and_swap_refresh_hash(
        &self,
        guid: &str,
        expected_old_hash: &str,
        new_session: &Session,
    ) -> Result<(), CoreError> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(guid) {
            Some(current) if current.refresh_secret_hash == expected_old_hash => {
                *current = Session {
                    guid: guid.to_string(),
                    ..new_session.clone()
                };
                Ok(())
            }
            _ => Err(CoreError::Conflict),
        }
    }
}
