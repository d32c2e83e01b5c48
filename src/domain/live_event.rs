//! Livefeed events.
//!
//! Every change to the set of live games emits a [`LiveEvent`] through the
//! [`super::EventBus`]. Events are transient: they are broadcast to livefeed
//! subscribers and then dropped.

use chrono::{DateTime, Utc};

use super::GameId;
use super::game::{GameInfo, GameRecord};

/// Event emitted when a game starts or finishes.
#[derive(Debug, Clone)]
pub enum LiveEvent {
    /// A new game started.
    GameBegin {
        /// The two players.
        game_info: GameInfo,
        /// When the server saw the game begin.
        timestamp: DateTime<Utc>,
    },

    /// A game finished.
    GameResult {
        /// Finished game identifier.
        game_id: GameId,
        /// Full result, including both plays.
        record: GameRecord,
        /// When the server saw the result.
        timestamp: DateTime<Utc>,
    },

    /// A game was live for too long without a result and was dropped.
    GameExpired {
        /// Dropped game identifier.
        game_id: GameId,
        /// When the sweep dropped it.
        timestamp: DateTime<Utc>,
    },
}

impl LiveEvent {
    /// Returns the id of the game this event is about.
    #[must_use]
    pub fn game_id(&self) -> &GameId {
        match self {
            Self::GameBegin { game_info, .. } => &game_info.game_id,
            Self::GameResult { game_id, .. } | Self::GameExpired { game_id, .. } => game_id,
        }
    }

    /// Returns the livefeed event name.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::GameBegin { .. } => "game_begin",
            Self::GameResult { .. } => "game_result",
            Self::GameExpired { .. } => "game_expired",
        }
    }
}
