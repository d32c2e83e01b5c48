//! Player search DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::persistence::PlayerRow;

/// Query parameters for `GET /players`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PlayerSearchParams {
    /// Case-insensitive name fragment. Empty lists all players.
    #[serde(default)]
    pub name: String,
    /// Maximum number of results (max 100). Defaults to 20.
    #[serde(default)]
    pub limit: Option<u32>,
}

impl PlayerSearchParams {
    /// Returns the requested limit clamped to `1..=100`.
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }
}

/// Response body for `GET /players`.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerListResponse {
    /// Matching players, alphabetically.
    pub data: Vec<PlayerRow>,
}
