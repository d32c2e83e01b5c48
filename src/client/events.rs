//! Decoding of livefeed frames into subscriber events.
//!
//! Senders have spelled the event names both with underscores and with
//! spaces (`game_begin` / `game begin`), so names are compared with spaces
//! and underscores treated alike.

use crate::domain::{GameId, GameInfo};
use crate::ws::messages::{AfterConnectData, FeedFrame, GameBeginData, GameResultData};

use super::error::ClientError;

/// A decoded livefeed event.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// The server accepted the connection; carries the games already live.
    Connected {
        /// Live games at connect time.
        live_games: Vec<GameInfo>,
    },
    /// A game started.
    GameBegin(GameInfo),
    /// A game finished.
    GameResult(GameId),
    /// The server dropped a game that never reported a result.
    GameExpired(GameId),
    /// An event this client does not know.
    Unknown(String),
}

/// Canonical event kinds after name normalisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Connect,
    Begin,
    Result,
    Expired,
}

fn kind_of(name: &str) -> Option<Kind> {
    let normalised: String = name
        .trim()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c.to_ascii_lowercase() })
        .collect();
    match normalised.as_str() {
        "after_connect" | "connect" => Some(Kind::Connect),
        "game_begin" => Some(Kind::Begin),
        "game_result" => Some(Kind::Result),
        "game_expired" => Some(Kind::Expired),
        _ => None,
    }
}

impl FeedEvent {
    /// Decodes a frame from socket text.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Frame`] if the text is not a frame and
    /// [`ClientError::Payload`] if a known event has a malformed payload.
    pub fn parse(text: &str) -> Result<Self, ClientError> {
        let frame: FeedFrame = serde_json::from_str(text).map_err(ClientError::Frame)?;
        Self::from_frame(frame)
    }

    /// Decodes an already parsed frame.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Payload`] if a known event has a malformed
    /// payload.
    pub fn from_frame(frame: FeedFrame) -> Result<Self, ClientError> {
        let FeedFrame { event, data } = frame;
        let payload_err = |source| ClientError::Payload {
            event: event.clone(),
            source,
        };

        match kind_of(&event) {
            Some(Kind::Connect) => {
                // Older senders greet with no payload at all.
                let data: AfterConnectData = if data.is_null() {
                    AfterConnectData::default()
                } else {
                    serde_json::from_value(data).map_err(payload_err)?
                };
                Ok(Self::Connected {
                    live_games: data.live_games,
                })
            }
            Some(Kind::Begin) => {
                let data: GameBeginData = serde_json::from_value(data).map_err(payload_err)?;
                Ok(Self::GameBegin(data.game_info))
            }
            Some(Kind::Result) => {
                let data: GameResultData = serde_json::from_value(data).map_err(payload_err)?;
                Ok(Self::GameResult(data.game_id))
            }
            Some(Kind::Expired) => {
                let data: GameResultData = serde_json::from_value(data).map_err(payload_err)?;
                Ok(Self::GameExpired(data.game_id))
            }
            None => Ok(Self::Unknown(event)),
        }
    }
}
