//! Session store port - persistence contract for planning sessions.
//!
//! Sessions are persisted between turns keyed by identifier. All three
//! operations are atomic with respect to a single session id; the store's
//! locking discipline decides how concurrent turns on one id serialize.

use async_trait::async_trait;

use crate::domain::foundation::SessionId;
use crate::domain::planning::PlanningSession;

/// Repository port for planning session persistence.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Loads a session by id. Returns `None` when unknown.
    async fn get(&self, id: &SessionId) -> Result<Option<PlanningSession>, StoreError>;

    /// Persists a session (insert or overwrite).
    async fn save(&self, session: &PlanningSession) -> Result<(), StoreError>;

    /// Removes a session. Removing an unknown id is a no-op.
    async fn delete(&self, id: &SessionId) -> Result<(), StoreError>;
}

/// Session store errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// Session could not be (de)serialized at the storage boundary.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Backend failure (connectivity, I/O).
    #[error("storage backend error: {0}")]
    Backend(String),
}
