//! Message shapes of the upstream game API.
//!
//! Both the history endpoint and the live socket use the same game
//! objects, tagged by a `type` field.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::GameId;

/// A player as named by the upstream API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ApiPlayer {
    /// Display name. The upstream API has no player ids.
    pub name: String,
}

/// A player and the hand they played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ApiPlayerPlay {
    /// Display name.
    pub name: String,
    /// Hand as text, normally `ROCK`, `PAPER` or `SCISSORS`.
    pub played: String,
}

/// Upstream notification that a game has started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiGameBegin {
    /// Game identifier.
    pub game_id: GameId,
    /// First player.
    pub player_a: ApiPlayer,
    /// Second player.
    pub player_b: ApiPlayer,
}

/// Upstream result of a finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiGameResult {
    /// Game identifier.
    pub game_id: GameId,
    /// Finish time, milliseconds since the Unix epoch.
    pub t: i64,
    /// First player and their hand.
    pub player_a: ApiPlayerPlay,
    /// Second player and their hand.
    pub player_b: ApiPlayerPlay,
}

/// Any message the upstream API sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiMessage {
    /// A game started.
    GameBegin(ApiGameBegin),
    /// A game finished.
    GameResult(ApiGameResult),
}

impl ApiMessage {
    /// Parses a message from socket text.
    ///
    /// The upstream live socket sends each message as a JSON string that
    /// itself contains the JSON object, so a string value is decoded once
    /// more before giving up.
    ///
    /// # Errors
    ///
    /// Returns the [`serde_json::Error`] of the innermost decode attempt.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        match serde_json::from_str::<serde_json::Value>(text)? {
            serde_json::Value::String(inner) => serde_json::from_str(&inner),
            value => serde_json::from_value(value),
        }
    }

    /// Returns the game id the message is about.
    #[must_use]
    pub fn game_id(&self) -> &GameId {
        match self {
            Self::GameBegin(begin) => &begin.game_id,
            Self::GameResult(result) => &result.game_id,
        }
    }
}

/// One page of the history endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryPage {
    /// Relative URL of the next page, or `None` on the last page.
    pub cursor: Option<String>,
    /// Finished games on this page.
    #[serde(default)]
    pub data: Vec<ApiGameResult>,
}
