//! Axum WebSocket upgrade handler.

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;

use super::connection::run_connection;
use crate::app_state::AppState;

/// `GET /livefeed` — Upgrade HTTP connection to a livefeed WebSocket.
pub async fn livefeed_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    // Subscribe before taking the snapshot so no event falls in between.
    let event_rx = state.event_bus.subscribe();
    let live = state.game_service.live_games().await;

    ws.on_upgrade(move |socket| run_connection(socket, event_rx, live))
}
