//! DeleteSessionHandler - removes a session from the store.

use std::sync::Arc;

use crate::domain::foundation::SessionId;
use crate::domain::planning::PlanningError;
use crate::ports::SessionStore;

/// Handler for session deletion.
pub struct DeleteSessionHandler {
    store: Arc<dyn SessionStore>,
}

impl DeleteSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Deletes the session; unknown ids are an error so the HTTP layer can
    /// answer 404 rather than silently succeeding.
    pub async fn handle(&self, session_id: SessionId) -> Result<(), PlanningError> {
        if self.store.get(&session_id).await?.is_none() {
            return Err(PlanningError::SessionNotFound(session_id));
        }
        self.store.delete(&session_id).await?;
        Ok(())
    }
}
