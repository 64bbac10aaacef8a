//! In-memory session store adapter.
//!
//! Sessions are serialized to JSON at rest, so the stored value has the
//! same shape a durable backend would hold and persistence round-trips are
//! exercised on every turn. State is scoped to the running process; suited
//! to development and single-instance deployments.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::SessionId;
use crate::domain::planning::PlanningSession;
use crate::ports::{SessionStore, StoreError};

/// In-memory store for planning sessions.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Value>>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// True when no sessions are stored.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, id: &SessionId) -> Result<Option<PlanningSession>, StoreError> {
        let sessions = self.sessions.read().await;
        sessions
            .get(id)
            .map(|raw| {
                serde_json::from_value(raw.clone())
                    .map_err(|e| StoreError::Serialization(e.to_string()))
            })
            .transpose()
    }

    async fn save(&self, session: &PlanningSession) -> Result<(), StoreError> {
        let raw = serde_json::to_value(session)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let mut sessions = self.sessions.write().await;
        sessions.insert(*session.id(), raw);
        Ok(())
    }

    async fn delete(&self, id: &SessionId) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(id);
        Ok(())
    }
}
