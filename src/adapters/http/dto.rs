//! HTTP DTOs for the planning endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing
//! independent evolution.

use serde::{Deserialize, Serialize};

use crate::domain::planning::{PlanningSession, PlanningStage, ProjectPlan};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to process one conversational turn.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    /// Existing session to continue; omitted to start a new session.
    #[serde(default)]
    pub session_id: Option<String>,
    /// The user's message.
    pub message: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Response for a processed turn.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub reply: String,
    pub current_stage: PlanningStage,
    pub stage_label: String,
    pub is_complete: bool,
    pub progress_percent: u8,
}

impl ChatResponse {
    pub fn from_turn(reply: String, session: &PlanningSession) -> Self {
        let stage = session.current_stage();
        Self {
            session_id: session.id().to_string(),
            reply,
            current_stage: stage,
            stage_label: stage.label().to_string(),
            is_complete: session.is_complete(),
            progress_percent: stage.progress_percent(),
        }
    }
}

/// Session summary for lookup responses.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummaryResponse {
    pub session_id: String,
    pub current_stage: PlanningStage,
    pub stage_label: String,
    pub progress_percent: u8,
    pub is_complete: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&PlanningSession> for SessionSummaryResponse {
    fn from(session: &PlanningSession) -> Self {
        let stage = session.current_stage();
        Self {
            session_id: session.id().to_string(),
            current_stage: stage,
            stage_label: stage.label().to_string(),
            progress_percent: stage.progress_percent(),
            is_complete: session.is_complete(),
            created_at: session.created_at().to_rfc3339(),
            updated_at: session.updated_at().to_rfc3339(),
        }
    }
}

/// Response carrying the compiled plan and its rendering.
#[derive(Debug, Clone, Serialize)]
pub struct PlanResponse {
    pub session_id: String,
    pub plan: ProjectPlan,
    pub markdown: String,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("SESSION_NOT_FOUND", message)
    }
}
