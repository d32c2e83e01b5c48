//! Database rows and conversions from upstream results.

use std::collections::HashMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{GameRecord, Play, PlayerId, PlayerPlay, outcome};
use crate::error::LivefeedError;
use crate::upstream::models::{ApiGameResult, ApiPlayerPlay};

/// A row of the `players` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PlayerRow {
    /// Player identifier.
    pub pid: PlayerId,
    /// Display name.
    pub name: String,
}

/// Game status stored in `games.status`.
pub const STATUS_FINISHED: i64 = 1;

/// Converts an upstream result into a [`GameRecord`], using `ids` to
/// resolve player names.
///
/// # Errors
///
/// Returns [`LivefeedError::InvalidPlay`] if either hand is not a valid
/// rock-paper-scissors play, [`LivefeedError::InvalidRequest`] if both
/// sides name the same player, and [`LivefeedError::Internal`] if a player
/// name is missing from `ids`.
pub fn result_from_api_result(
    api: &ApiGameResult,
    ids: &HashMap<String, PlayerId>,
) -> Result<GameRecord, LivefeedError> {
    if api.player_a.name == api.player_b.name {
        return Err(LivefeedError::InvalidRequest(format!(
            "{} cannot play against themselves",
            api.player_a.name
        )));
    }
    let play_a = parse_play(&api.player_a)?;
    let play_b = parse_play(&api.player_b)?;

    Ok(GameRecord {
        game_id: api.game_id.clone(),
        t: api.t,
        player1: PlayerPlay {
            pid: lookup(ids, &api.player_a.name)?,
            name: api.player_a.name.clone(),
            played: play_a,
            result: outcome(play_a, play_b),
        },
        player2: PlayerPlay {
            pid: lookup(ids, &api.player_b.name)?,
            name: api.player_b.name.clone(),
            played: play_b,
            result: outcome(play_b, play_a),
        },
    })
}

fn parse_play(side: &ApiPlayerPlay) -> Result<Play, LivefeedError> {
    Play::parse(&side.played).ok_or_else(|| {
        LivefeedError::InvalidPlay(format!("{} played {:?}", side.name, side.played))
    })
}

fn lookup(ids: &HashMap<String, PlayerId>, name: &str) -> Result<PlayerId, LivefeedError> {
    ids.get(name)
        .copied()
        .ok_or_else(|| LivefeedError::Internal(format!("no id resolved for player {name}")))
}
