//! Game records: who is playing, and how a finished game ended.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::rps::{Outcome, Play};
use super::{GameId, PlayerId};

/// A player as shown on the livefeed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PlayerInfo {
    /// Player identifier.
    pub pid: PlayerId,
    /// Display name.
    pub name: String,
}

/// The two players of a game that has just started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameInfo {
    /// Upstream game identifier.
    pub game_id: GameId,
    /// First player.
    pub player1: PlayerInfo,
    /// Second player.
    pub player2: PlayerInfo,
}

/// One side of a finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PlayerPlay {
    /// Player identifier.
    pub pid: PlayerId,
    /// Display name.
    pub name: String,
    /// Hand the player chose.
    pub played: Play,
    /// Result from this player's perspective.
    pub result: Outcome,
}

impl PlayerPlay {
    /// Drops the play details, keeping who the player is.
    #[must_use]
    pub fn info(&self) -> PlayerInfo {
        PlayerInfo {
            pid: self.pid,
            name: self.name.clone(),
        }
    }
}

/// A finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    /// Upstream game identifier.
    pub game_id: GameId,
    /// Upstream timestamp, milliseconds since the Unix epoch.
    pub t: i64,
    /// First player and their play.
    pub player1: PlayerPlay,
    /// Second player and their play.
    pub player2: PlayerPlay,
}

impl GameRecord {
    /// Returns the winner, or `None` for a tie.
    #[must_use]
    pub fn winner(&self) -> Option<&PlayerPlay> {
        [&self.player1, &self.player2]
            .into_iter()
            .find(|p| p.result.is_win())
    }

    /// Returns the side played by `pid`, if they took part.
    #[must_use]
    pub fn side_of(&self, pid: PlayerId) -> Option<&PlayerPlay> {
        [&self.player1, &self.player2]
            .into_iter()
            .find(|p| p.pid == pid)
    }
}

/// A game currently in progress.
#[derive(Debug, Clone)]
pub struct LiveGame {
    /// Who is playing.
    pub info: GameInfo,
    /// When the server saw the game begin.
    pub started_at: DateTime<Utc>,
}

impl LiveGame {
    /// Wraps `info`, stamping the current time.
    #[must_use]
    pub fn new(info: GameInfo) -> Self {
        Self {
            info,
            started_at: Utc::now(),
        }
    }
}
