//! Game handlers: live list, ingest, history and history sync.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    HistoryResponse, IngestResponse, LiveGameDto, LiveGamesResponse, PaginationMeta,
    PaginationParams,
};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, LivefeedError};
use crate::service::SyncReport;
use crate::upstream::models::ApiMessage;

/// `GET /live` — Games currently in progress.
#[utoipa::path(
    get,
    path = "/api/v1/live",
    tag = "Games",
    summary = "List live games",
    description = "Returns every game that has begun and not yet finished, oldest first.",
    responses(
        (status = 200, description = "Live games", body = LiveGamesResponse),
    )
)]
pub async fn list_live_games(State(state): State<AppState>) -> impl IntoResponse {
    let data: Vec<LiveGameDto> = state
        .game_service
        .live_games()
        .await
        .into_iter()
        .map(LiveGameDto::from)
        .collect();
    let count = data.len();
    Json(LiveGamesResponse { data, count })
}

/// `POST /ingest` — Feed one upstream message into the service.
///
/// # Errors
///
/// Returns [`LivefeedError`] for duplicate starts, invalid plays or
/// persistence failures.
#[utoipa::path(
    post,
    path = "/api/v1/ingest",
    tag = "Games",
    summary = "Ingest a game event",
    description = "Accepts a `GAME_BEGIN` or `GAME_RESULT` message in the upstream API format and broadcasts the matching livefeed event.",
    request_body = ApiMessage,
    responses(
        (status = 202, description = "Event accepted and broadcast", body = IngestResponse),
        (status = 400, description = "Invalid play", body = ErrorResponse),
        (status = 409, description = "Game already live", body = ErrorResponse),
    )
)]
pub async fn ingest(
    State(state): State<AppState>,
    Json(message): Json<ApiMessage>,
) -> Result<impl IntoResponse, LivefeedError> {
    state.game_service.ingest(&message).await?;

    let event = match message {
        ApiMessage::GameBegin(_) => "game_begin",
        ApiMessage::GameResult(_) => "game_result",
    };
    Ok((
        StatusCode::ACCEPTED,
        Json(IngestResponse {
            game_id: message.game_id().clone(),
            event: event.to_string(),
        }),
    ))
}

/// `GET /history` — Finished games with pagination.
///
/// # Errors
///
/// Returns [`LivefeedError::PersistenceDisabled`] when running without a
/// database.
#[utoipa::path(
    get,
    path = "/api/v1/history",
    tag = "Games",
    summary = "List finished games",
    description = "Returns stored game results, newest first.",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated game history", body = HistoryResponse),
        (status = 503, description = "Persistence disabled", body = ErrorResponse),
    )
)]
pub async fn list_history(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, LivefeedError> {
    let params = params.clamped();
    let (data, total) = state
        .game_service
        .history(params.page, params.per_page)
        .await?;

    Ok(Json(HistoryResponse {
        data,
        pagination: PaginationMeta::new(&params, total),
    }))
}

/// `POST /history/sync` — Backfill history from the upstream API.
///
/// # Errors
///
/// Returns [`LivefeedError`] if no upstream or database is configured, a
/// sync is already running, or the upstream fails.
#[utoipa::path(
    post,
    path = "/api/v1/history/sync",
    tag = "Games",
    summary = "Sync history from upstream",
    description = "Fetches history pages from the stored cursor onwards and stores every new game.",
    responses(
        (status = 200, description = "Sync finished", body = SyncReport),
        (status = 400, description = "No upstream configured", body = ErrorResponse),
        (status = 409, description = "Sync already running", body = ErrorResponse),
        (status = 502, description = "Upstream failure", body = ErrorResponse),
        (status = 503, description = "Persistence disabled", body = ErrorResponse),
    )
)]
pub async fn sync_history(State(state): State<AppState>) -> Result<impl IntoResponse, LivefeedError> {
    let store = state
        .game_service
        .store()
        .ok_or(LivefeedError::PersistenceDisabled)?;
    let syncer = state
        .history
        .as_ref()
        .ok_or_else(|| LivefeedError::InvalidRequest("no history upstream configured".to_string()))?;

    let report = syncer.run(store).await?;
    Ok(Json(report))
}

/// Game routes, nested under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/live", get(list_live_games))
        .route("/ingest", post(ingest))
        .route("/history", get(list_history))
        .route("/history/sync", post(sync_history))
}
