//! Player handlers: search and profile.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{PlayerListResponse, PlayerSearchParams};
use crate::app_state::AppState;
use crate::domain::PlayerId;
use crate::error::{ErrorResponse, LivefeedError};
use crate::service::PlayerProfile;

/// `GET /players` — Search players by name.
///
/// # Errors
///
/// Returns [`LivefeedError::PersistenceDisabled`] when running without a
/// database.
#[utoipa::path(
    get,
    path = "/api/v1/players",
    tag = "Players",
    summary = "Search players",
    description = "Returns players whose name contains the given fragment.",
    params(PlayerSearchParams),
    responses(
        (status = 200, description = "Matching players", body = PlayerListResponse),
        (status = 503, description = "Persistence disabled", body = ErrorResponse),
    )
)]
pub async fn search_players(
    State(state): State<AppState>,
    Query(params): Query<PlayerSearchParams>,
) -> Result<impl IntoResponse, LivefeedError> {
    let data = state
        .game_service
        .search_players(params.name.trim(), params.limit())
        .await?;
    Ok(Json(PlayerListResponse { data }))
}

/// `GET /players/{pid}` — Player profile.
///
/// # Errors
///
/// Returns [`LivefeedError::PlayerNotFound`] if the player does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/players/{pid}",
    tag = "Players",
    summary = "Get player profile",
    description = "Returns a player's win/loss totals, most played hand and recent games.",
    params(
        ("pid" = uuid::Uuid, Path, description = "Player UUID"),
    ),
    responses(
        (status = 200, description = "Player profile", body = PlayerProfile),
        (status = 404, description = "Player not found", body = ErrorResponse),
        (status = 503, description = "Persistence disabled", body = ErrorResponse),
    )
)]
pub async fn get_player(
    State(state): State<AppState>,
    Path(pid): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, LivefeedError> {
    let profile = state
        .game_service
        .player_profile(PlayerId::from_uuid(pid))
        .await?;
    Ok(Json(profile))
}

/// Player routes, nested under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/players", get(search_players))
        .route("/players/{pid}", get(get_player))
}
