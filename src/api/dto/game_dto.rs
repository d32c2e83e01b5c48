//! Game-related DTOs: live games, ingest and history.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::common_dto::PaginationMeta;
use crate::domain::{GameId, GameRecord, LiveGame, PlayerInfo};

/// A game in progress.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LiveGameDto {
    /// Game identifier.
    pub game_id: GameId,
    /// First player.
    pub player1: PlayerInfo,
    /// Second player.
    pub player2: PlayerInfo,
    /// When the server saw the game begin.
    pub started_at: DateTime<Utc>,
}

impl From<LiveGame> for LiveGameDto {
    fn from(game: LiveGame) -> Self {
        Self {
            game_id: game.info.game_id,
            player1: game.info.player1,
            player2: game.info.player2,
            started_at: game.started_at,
        }
    }
}

/// Response body for `GET /live`.
#[derive(Debug, Serialize, ToSchema)]
pub struct LiveGamesResponse {
    /// Live games, oldest first.
    pub data: Vec<LiveGameDto>,
    /// Number of live games.
    pub count: usize,
}

/// Response body for `POST /ingest` (202 Accepted).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    /// Game the message was about.
    pub game_id: GameId,
    /// Livefeed event emitted for it.
    pub event: String,
}

/// Paginated response for `GET /history`.
#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryResponse {
    /// Finished games, newest first.
    pub data: Vec<GameRecord>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}
