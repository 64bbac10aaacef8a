//! Plan Compass service binary.
//!
//! Wires configuration, the Anthropic provider, the in-memory session
//! store, and the HTTP router, then serves until shutdown. The store is
//! constructed once here and injected; there are no module-level
//! singletons.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use plan_compass::adapters::ai::{AnthropicConfig, AnthropicProvider};
use plan_compass::adapters::http::{api_router, PlanningHandlers};
use plan_compass::adapters::storage::InMemorySessionStore;
use plan_compass::application::handlers::{
    DeleteSessionHandler, GetPlanHandler, GetSessionHandler, ProcessTurnHandler,
};
use plan_compass::config::AppConfig;
use plan_compass::domain::planning::PlanningStateMachine;
use plan_compass::ports::{AiProvider, SessionStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    let provider: Arc<dyn AiProvider> = Arc::new(AnthropicProvider::new(
        AnthropicConfig::new(config.ai.anthropic_api_key.clone())
            .with_model(config.ai.model.clone())
            .with_timeout(config.ai.timeout())
            .with_max_retries(config.ai.max_retries),
    ));

    let info = provider.provider_info();
    info!(
        environment = ?config.server.environment,
        provider = %info.name,
        model = %info.model,
        "starting plan-compass"
    );

    let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());

    let handlers = PlanningHandlers::new(
        Arc::new(ProcessTurnHandler::new(
            Arc::clone(&store),
            PlanningStateMachine::new(Arc::clone(&provider), config.ai.max_tokens),
        )),
        Arc::new(GetSessionHandler::new(Arc::clone(&store))),
        Arc::new(DeleteSessionHandler::new(Arc::clone(&store))),
        Arc::new(GetPlanHandler::new(Arc::clone(&store))),
    );

    let cors = {
        let origins = config.server.cors_origins_list();
        if origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let parsed: Vec<HeaderValue> =
                origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(parsed))
                .allow_methods(Any)
                .allow_headers(Any)
        }
    };

    let app = api_router(handlers).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs,
            )))
            .layer(cors),
    );

    let addr = config.server.socket_addr();
    info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
