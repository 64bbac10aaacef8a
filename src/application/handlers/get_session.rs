//! GetSessionHandler - session summary lookup.

use std::sync::Arc;

use crate::domain::foundation::SessionId;
use crate::domain::planning::{PlanningError, PlanningSession};
use crate::ports::SessionStore;

/// Handler for session lookup.
pub struct GetSessionHandler {
    store: Arc<dyn SessionStore>,
}

impl GetSessionHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, session_id: SessionId) -> Result<PlanningSession, PlanningError> {
        self.store
            .get(&session_id)
            .await?
            .ok_or(PlanningError::SessionNotFound(session_id))
    }
}
