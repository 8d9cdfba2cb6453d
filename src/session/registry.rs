//! Session Registry
//!
//! Keeps every live session isolated under its own id and lock. The
//! per-session mutex serializes triggers: a second trigger for the same
//! session waits until the first has run to completion.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::state::SessionState;
use super::SessionError;

/// A session's state behind its trigger-serializing lock
pub type SharedSession = Arc<Mutex<SessionState>>;

/// Registry of live sessions
#[derive(Clone)]
pub struct SessionRegistry {
    inner: Arc<RwLock<HashMap<Uuid, SharedSession>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a new session and return its id
    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(SessionState::new(id)));

        let mut sessions = self.inner.write().await;
        sessions.insert(id, session);

        tracing::info!(session_id = %id, "Session created");
        id
    }

    /// Look up a session by id
    pub async fn get(&self, id: Uuid) -> Result<SharedSession, SessionError> {
        let sessions = self.inner.read().await;
        sessions
            .get(&id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    /// Look up a session by string id
    pub async fn get_by_str(&self, id: &str) -> Result<SharedSession, SessionError> {
        let uuid =
            Uuid::parse_str(id).map_err(|_| SessionError::NotFound(id.to_string()))?;
        self.get(uuid).await
    }

    /// Remove a session, returning it for final cleanup
    pub async fn remove(&self, id: Uuid) -> Result<SharedSession, SessionError> {
        let mut sessions = self.inner.write().await;
        let session = sessions
            .remove(&id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;

        tracing::info!(session_id = %id, "Session removed");
        Ok(session)
    }

    /// Ids of every live session
    pub async fn ids(&self) -> Vec<Uuid> {
        let sessions = self.inner.read().await;
        sessions.keys().copied().collect()
    }

    pub async fn count(&self) -> usize {
        let sessions = self.inner.read().await;
        sessions.len()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionPhase;

    #[tokio::test]
    async fn create_and_get_session() {
        let registry = SessionRegistry::new();
        let id = registry.create().await;

        let session = registry.get(id).await.unwrap();
        let state = session.lock().await;
        assert_eq!(state.id, id);
        assert_eq!(state.phase, SessionPhase::NoDocument);
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let registry = SessionRegistry::new();
        let a = registry.create().await;
        let b = registry.create().await;

        {
            let session = registry.get(a).await.unwrap();
            let mut state = session.lock().await;
            state.document_text = Some("text of a".to_string());
        }

        let session = registry.get(b).await.unwrap();
        let state = session.lock().await;
        assert!(state.document_text.is_none());
        assert_eq!(registry.count().await, 2);
    }

    #[tokio::test]
    async fn removed_session_is_gone() {
        let registry = SessionRegistry::new();
        let id = registry.create().await;

        registry.remove(id).await.unwrap();
        assert!(registry.get(id).await.is_err());
        assert!(registry.remove(id).await.is_err());
    }

    #[tokio::test]
    async fn unknown_and_malformed_ids_are_not_found() {
        let registry = SessionRegistry::new();

        assert!(matches!(
            registry.get(Uuid::new_v4()).await,
            Err(SessionError::NotFound(_))
        ));
        assert!(matches!(
            registry.get_by_str("not-a-uuid").await,
            Err(SessionError::NotFound(_))
        ));
    }
}
