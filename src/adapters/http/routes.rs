//! HTTP routes for the planning service.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    chat, delete_session, get_plan, get_session, health, PlanningHandlers,
};

/// Creates the full API router.
pub fn api_router(handlers: PlanningHandlers) -> Router {
    let api = Router::new()
        .route("/chat", post(chat))
        .route("/session/:id", get(get_session).delete(delete_session))
        .route("/session/:id/plan", get(get_plan))
        .with_state(handlers);

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
}
