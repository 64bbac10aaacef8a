//! Error types for the planning domain.

use thiserror::Error;

use crate::domain::foundation::SessionId;
use crate::ports::{AiError, StoreError};

use super::stage::PlanningStage;

/// Errors surfaced by the planning engine and its surfaces.
///
/// Contradictions are not errors: they substitute the reply and never take
/// an error path. Extraction declines and schema mismatches are recovered
/// inside the turn pipeline and never appear here.
#[derive(Debug, Error)]
pub enum PlanningError {
    /// No session exists under the given identifier.
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    /// Plan requested before all five stages committed.
    #[error("plan not ready: session is at stage {current_stage}")]
    PlanNotReady { current_stage: PlanningStage },

    /// A committed record does not match its stage schema.
    #[error("malformed record for stage {stage}: {reason}")]
    MalformedStageData {
        stage: PlanningStage,
        reason: String,
    },

    /// Reply generation failed; fatal to the turn.
    #[error("AI provider error: {0}")]
    Oracle(#[from] AiError),

    /// Session persistence failed.
    #[error("session store error: {0}")]
    Store(#[from] StoreError),
}
