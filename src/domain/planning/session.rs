//! Planning session aggregate.
//!
//! A session owns one guided planning conversation: the turn log, the
//! current stage, and the structured records committed by completed stages.
//! It is single-writer for the duration of a turn and persisted between
//! turns by a [`SessionStore`](crate::ports::SessionStore).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::{SessionId, Timestamp};

use super::stage::PlanningStage;

/// Who authored a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One entry of the session's turn log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: TurnRole,
    pub content: String,
    pub timestamp: Timestamp,
}

impl ConversationMessage {
    /// Creates a user turn stamped now.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
            timestamp: Timestamp::now(),
        }
    }

    /// Creates an assistant turn stamped now.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
            timestamp: Timestamp::now(),
        }
    }
}

/// Planning session aggregate.
///
/// # Invariants
///
/// - `stage_data` holds an entry for stage S iff S precedes `current_stage`
///   in stage order; once `is_complete`, all five data stages are present.
/// - Committed records are never revised in place; a later contradiction
///   blocks the next commit, it does not edit history.
/// - The turn log only grows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningSession {
    id: SessionId,
    current_stage: PlanningStage,
    messages: Vec<ConversationMessage>,
    stage_data: BTreeMap<PlanningStage, Value>,
    is_complete: bool,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl PlanningSession {
    /// Creates an empty session at the first stage.
    pub fn new() -> Self {
        let now = Timestamp::now();
        Self {
            id: SessionId::new(),
            current_stage: PlanningStage::DefineOutcome,
            messages: Vec::new(),
            stage_data: BTreeMap::new(),
            is_complete: false,
            created_at: now,
            updated_at: now,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn current_stage(&self) -> PlanningStage {
        self.current_stage
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    /// Raw committed records keyed by stage.
    pub fn stage_data(&self) -> &BTreeMap<PlanningStage, Value> {
        &self.stage_data
    }

    /// Returns the committed raw record for one stage, if present.
    pub fn stage_record(&self, stage: PlanningStage) -> Option<&Value> {
        self.stage_data.get(&stage)
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────
    // Mutations (turn pipeline only)
    // ─────────────────────────────────────────────────────────────────────

    /// Appends a turn to the log. Happens even on short-circuit and
    /// rejected-commit paths.
    pub fn append_message(&mut self, message: ConversationMessage) {
        self.messages.push(message);
        self.touch();
    }

    /// Commits an extracted record under the current stage and advances.
    ///
    /// Marks the session complete when the advance reaches the terminal
    /// stage. Never called for terminal sessions.
    pub fn commit_and_advance(&mut self, record: Value) {
        debug_assert!(!self.current_stage.is_terminal());

        self.stage_data.insert(self.current_stage, record);
        self.current_stage = self.current_stage.next();
        if self.current_stage.is_terminal() {
            self.is_complete = true;
        }
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

impl Default for PlanningSession {
    fn default() -> Self {
        Self::new()
    }
}
