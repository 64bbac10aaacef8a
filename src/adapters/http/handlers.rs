//! HTTP handlers for the planning endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::application::handlers::{
    DeleteSessionHandler, GetPlanHandler, GetSessionHandler, ProcessTurnCommand,
    ProcessTurnHandler,
};
use crate::domain::foundation::SessionId;
use crate::domain::planning::PlanningError;
use crate::ports::AiError;

use super::dto::{
    ChatRequest, ChatResponse, ErrorResponse, PlanResponse, SessionSummaryResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

/// Shared state wiring the HTTP layer to the use-case handlers.
#[derive(Clone)]
pub struct PlanningHandlers {
    process_turn: Arc<ProcessTurnHandler>,
    get_session: Arc<GetSessionHandler>,
    delete_session: Arc<DeleteSessionHandler>,
    get_plan: Arc<GetPlanHandler>,
}

impl PlanningHandlers {
    pub fn new(
        process_turn: Arc<ProcessTurnHandler>,
        get_session: Arc<GetSessionHandler>,
        delete_session: Arc<DeleteSessionHandler>,
        get_plan: Arc<GetPlanHandler>,
    ) -> Self {
        Self {
            process_turn,
            get_session,
            delete_session,
            get_plan,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/v1/chat - process one conversational turn
pub async fn chat(
    State(handlers): State<PlanningHandlers>,
    Json(request): Json<ChatRequest>,
) -> Response {
    let session_id = match request.session_id.as_deref() {
        Some(raw) => match raw.parse::<SessionId>() {
            Ok(id) => Some(id),
            Err(_) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::bad_request("Invalid session ID")),
                )
                    .into_response()
            }
        },
        None => None,
    };

    let cmd = ProcessTurnCommand {
        session_id,
        message: request.message,
    };

    match handlers.process_turn.handle(cmd).await {
        Ok(result) => {
            let response = ChatResponse::from_turn(result.reply, &result.session);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_planning_error(e),
    }
}

/// GET /api/v1/session/:id - session summary
pub async fn get_session(
    State(handlers): State<PlanningHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let Ok(session_id) = session_id.parse::<SessionId>() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid session ID")),
        )
            .into_response();
    };

    match handlers.get_session.handle(session_id).await {
        Ok(session) => {
            let response = SessionSummaryResponse::from(&session);
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_planning_error(e),
    }
}

/// DELETE /api/v1/session/:id - delete a session
pub async fn delete_session(
    State(handlers): State<PlanningHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let Ok(session_id) = session_id.parse::<SessionId>() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid session ID")),
        )
            .into_response();
    };

    match handlers.delete_session.handle(session_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => handle_planning_error(e),
    }
}

/// GET /api/v1/session/:id/plan - compile and render the plan
pub async fn get_plan(
    State(handlers): State<PlanningHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let Ok(session_id) = session_id.parse::<SessionId>() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid session ID")),
        )
            .into_response();
    };

    match handlers.get_plan.handle(session_id).await {
        Ok(artifacts) => {
            let response = PlanResponse {
                session_id: session_id.to_string(),
                plan: artifacts.plan,
                markdown: artifacts.markdown,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_planning_error(e),
    }
}

/// GET /health - liveness probe
pub async fn health() -> Response {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"}))).into_response()
}

// ════════════════════════════════════════════════════════════════════════════
// Error mapping
// ════════════════════════════════════════════════════════════════════════════

fn handle_planning_error(err: PlanningError) -> Response {
    match err {
        PlanningError::SessionNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found(format!("Session not found: {}", id))),
        )
            .into_response(),

        PlanningError::PlanNotReady { current_stage } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse::new(
                "PLAN_NOT_READY",
                format!(
                    "Plan not yet complete. Currently at stage: {}. \
                     Continue the conversation to finish all 5 stages.",
                    current_stage
                ),
            )),
        )
            .into_response(),

        PlanningError::Oracle(ai_err) => {
            error!(error = %ai_err, "AI provider error");
            let status = match ai_err {
                AiError::RateLimited { .. }
                | AiError::Unavailable(_)
                | AiError::Timeout { .. }
                | AiError::Network(_) => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::BAD_GATEWAY,
            };
            (
                status,
                Json(ErrorResponse::new(
                    "AI_PROVIDER_ERROR",
                    "The AI service is unavailable. Please retry.",
                )),
            )
                .into_response()
        }

        PlanningError::MalformedStageData { stage, reason } => {
            error!(stage = %stage, reason = %reason, "malformed committed stage data");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(
                    "INTERNAL_ERROR",
                    "Stored planning data could not be compiled",
                )),
            )
                .into_response()
        }

        PlanningError::Store(store_err) => {
            error!(error = %store_err, "session store error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("INTERNAL_ERROR", "Session storage failed")),
            )
                .into_response()
        }
    }
}
