//! Livefeed wire format.
//!
//! Every frame is a JSON object `{ "event": <name>, "data": <payload> }`.
//! The payload shapes below are shared by the server and the subscriber.

use serde::{Deserialize, Serialize};

use crate::domain::{GameId, GameInfo, LiveEvent, LiveGame};

/// Sent once right after a subscriber connects.
pub const AFTER_CONNECT: &str = "after connect";
/// Sent when a game starts.
pub const GAME_BEGIN: &str = "game_begin";
/// Sent when a game finishes.
pub const GAME_RESULT: &str = "game_result";
/// Sent when a game is dropped without a result.
pub const GAME_EXPIRED: &str = "game_expired";

/// Top-level livefeed frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedFrame {
    /// Event name.
    pub event: String,
    /// Event-specific payload.
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Payload of [`AFTER_CONNECT`]: the games live at connect time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AfterConnectData {
    /// Live games, oldest first.
    #[serde(default)]
    pub live_games: Vec<GameInfo>,
}

/// Payload of [`GAME_BEGIN`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameBeginData {
    /// The two players of the new game.
    pub game_info: GameInfo,
}

/// Payload of [`GAME_RESULT`] and [`GAME_EXPIRED`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResultData {
    /// The finished game.
    pub game_id: GameId,
}

impl FeedFrame {
    /// Builds a frame from an event name and a serializable payload.
    ///
    /// # Errors
    ///
    /// Returns the [`serde_json::Error`] if the payload cannot be encoded.
    pub fn new<T: Serialize>(event: &str, data: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            event: event.to_string(),
            data: serde_json::to_value(data)?,
        })
    }

    /// Builds the greeting frame carrying the current live games.
    ///
    /// # Errors
    ///
    /// Returns the [`serde_json::Error`] if the payload cannot be encoded.
    pub fn after_connect(live: &[LiveGame]) -> Result<Self, serde_json::Error> {
        let data = AfterConnectData {
            live_games: live.iter().map(|g| g.info.clone()).collect(),
        };
        Self::new(AFTER_CONNECT, &data)
    }

    /// Builds the frame announcing `event`.
    ///
    /// # Errors
    ///
    /// Returns the [`serde_json::Error`] if the payload cannot be encoded.
    pub fn from_event(event: &LiveEvent) -> Result<Self, serde_json::Error> {
        match event {
            LiveEvent::GameBegin { game_info, .. } => Self::new(
                GAME_BEGIN,
                &GameBeginData {
                    game_info: game_info.clone(),
                },
            ),
            LiveEvent::GameResult { game_id, .. } => Self::new(
                GAME_RESULT,
                &GameResultData {
                    game_id: game_id.clone(),
                },
            ),
            LiveEvent::GameExpired { game_id, .. } => Self::new(
                GAME_EXPIRED,
                &GameResultData {
                    game_id: game_id.clone(),
                },
            ),
        }
    }

    /// Encodes the frame as JSON text.
    ///
    /// # Errors
    ///
    /// Returns the [`serde_json::Error`] if encoding fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
