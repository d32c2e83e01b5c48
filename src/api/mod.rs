//! REST API layer: route handlers, DTOs, OpenAPI document and router
//! composition.
//!
//! Resource endpoints are mounted under `/api/v1`; `/health` and the
//! `/livefeed` socket sit at the root.

pub mod dto;
pub mod handlers;

use std::time::Duration;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::app_state::AppState;
use crate::ws::handler::livefeed_handler;

/// OpenAPI document for all REST endpoints.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "rps-livefeed", description = "Live rock-paper-scissors results"),
    paths(
        handlers::system::health_handler,
        handlers::games::list_live_games,
        handlers::games::ingest,
        handlers::games::list_history,
        handlers::games::sync_history,
        handlers::players::search_players,
        handlers::players::get_player,
    ),
    tags(
        (name = "System", description = "Service status"),
        (name = "Games", description = "Live games and finished results"),
        (name = "Players", description = "Player search and profiles"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
}

/// Builds the full application: REST routes, the `/livefeed` socket,
/// Swagger UI (with the `swagger-ui` feature) and the HTTP middleware
/// stack.
pub fn build_app(state: AppState, request_timeout: Duration) -> Router {
    let router = build_router().route("/livefeed", get(livefeed_handler));

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
