//! Data Transfer Objects for REST request/response serialization.

pub mod common_dto;
pub mod game_dto;
pub mod player_dto;

pub use common_dto::*;
pub use game_dto::*;
pub use player_dto::*;
