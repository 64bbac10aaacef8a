//! ProcessTurnHandler - runs one conversational turn against a session.

use std::sync::Arc;

use crate::domain::foundation::SessionId;
use crate::domain::planning::{PlanningError, PlanningSession, PlanningStateMachine};
use crate::ports::SessionStore;

/// Command to process one user turn.
#[derive(Debug, Clone)]
pub struct ProcessTurnCommand {
    /// Existing session to continue, or `None` to start a new one.
    pub session_id: Option<SessionId>,
    /// The raw user utterance.
    pub message: String,
}

/// Result of a processed turn.
#[derive(Debug, Clone)]
pub struct ProcessTurnResult {
    pub reply: String,
    pub session: PlanningSession,
}

/// Handler for conversational turns.
///
/// Loads (or creates) the session, delegates the turn to the state machine,
/// and persists the updated session. One turn in flight per session at a
/// time is the caller's responsibility; the store serializes concurrent
/// writes per id.
pub struct ProcessTurnHandler {
    store: Arc<dyn SessionStore>,
    state_machine: PlanningStateMachine,
}

impl ProcessTurnHandler {
    pub fn new(store: Arc<dyn SessionStore>, state_machine: PlanningStateMachine) -> Self {
        Self {
            store,
            state_machine,
        }
    }

    pub async fn handle(
        &self,
        cmd: ProcessTurnCommand,
    ) -> Result<ProcessTurnResult, PlanningError> {
        let mut session = match cmd.session_id {
            Some(id) => self
                .store
                .get(&id)
                .await?
                .ok_or(PlanningError::SessionNotFound(id))?,
            None => {
                let session = PlanningSession::new();
                self.store.save(&session).await?;
                session
            }
        };

        let reply = match self
            .state_machine
            .process_message(&mut session, &cmd.message)
            .await
        {
            Ok(reply) => reply,
            Err(err) => {
                // The user's turn stays on record even though no assistant
                // reply exists for it.
                self.store.save(&session).await?;
                return Err(err);
            }
        };

        self.store.save(&session).await?;

        Ok(ProcessTurnResult { reply, session })
    }
}
