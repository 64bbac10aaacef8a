//! HTTP adapter - REST API over the planning engine.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ChatRequest, ChatResponse, ErrorResponse, PlanResponse, SessionSummaryResponse,
};
pub use handlers::PlanningHandlers;
pub use routes::api_router;
