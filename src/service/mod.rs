//! Service layer: business logic orchestration.
//!
//! [`GameService`] tracks live games, records results and emits events
//! through the [`super::domain::EventBus`]. [`history_sync`] backfills the
//! results database from the upstream history endpoint.

pub mod game_service;
pub mod history_sync;

pub use game_service::{GameService, PlayerProfile, PlayerStats};
pub use history_sync::{HistorySyncer, SyncReport, sync_history};
