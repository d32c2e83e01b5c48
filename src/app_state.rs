//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::service::{GameService, HistorySyncer};
use crate::upstream::HistoryClient;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Game service for all business logic.
    pub game_service: Arc<GameService>,
    /// Event bus for livefeed subscriptions.
    pub event_bus: EventBus,
    /// History backfill; `None` when no upstream is configured.
    pub history: Option<Arc<HistorySyncer<HistoryClient>>>,
}

impl AppState {
    /// Builds the state around `game_service`, sharing its event bus.
    #[must_use]
    pub fn new(game_service: GameService, history: Option<HistorySyncer<HistoryClient>>) -> Self {
        let event_bus = game_service.event_bus().clone();
        Self {
            game_service: Arc::new(game_service),
            event_bus,
            history: history.map(Arc::new),
        }
    }
}
