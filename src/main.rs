//! rps-livefeed server entry point.
//!
//! Starts the Axum HTTP server with the REST endpoints and the `/livefeed`
//! WebSocket, and optionally ingests games from the upstream live socket.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use rps_livefeed::api;
use rps_livefeed::app_state::AppState;
use rps_livefeed::config::{LivefeedConfig, LogFormat};
use rps_livefeed::domain::{EventBus, LiveGames};
use rps_livefeed::persistence::SqliteStore;
use rps_livefeed::service::{GameService, HistorySyncer};
use rps_livefeed::upstream::HistoryClient;
use rps_livefeed::upstream::live::run_upstream_feed;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = LivefeedConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting rps-livefeed");

    // Persistence
    let store = if config.persistence_enabled {
        let store =
            SqliteStore::connect(&config.database_url, config.database_max_connections).await?;
        tracing::info!(url = %config.database_url, "results database ready");
        Some(store)
    } else {
        tracing::warn!("persistence disabled; history and player endpoints unavailable");
        None
    };

    // Domain and service layers
    let live = Arc::new(LiveGames::new());
    let event_bus = EventBus::new(config.event_bus_capacity);
    let game_service = GameService::new(live, event_bus, store);

    let history = HistorySyncer::new(
        HistoryClient::new(&config.history_api_base)?,
        config.history_sync_max_pages,
    );
    let state = AppState::new(game_service, Some(history));

    // Startup backfill
    if config.history_sync_on_start
        && let (Some(store), Some(history)) = (state.game_service.store(), &state.history)
    {
        let store = store.clone();
        let history = Arc::clone(history);
        tokio::spawn(async move {
            if let Err(err) = history.run(&store).await {
                tracing::error!(error = %err, "startup history sync failed");
            }
        });
    }

    // Upstream live feed
    if let Some(url) = config.upstream_live_url.clone() {
        let service = GameService::clone(&state.game_service);
        tokio::spawn(async move {
            if let Err(err) = run_upstream_feed(&url, service).await {
                tracing::error!(error = %err, "upstream live feed failed");
            }
        });
    }

    // Drop games whose result never arrives
    if config.live_game_max_age_secs > 0 {
        let service = GameService::clone(&state.game_service);
        let max_age = Duration::from_secs(config.live_game_max_age_secs);
        tokio::spawn(async move { service.run_expiry_sweep(max_age).await });
    }

    // Build router
    let app = api::build_app(state, Duration::from_secs(config.request_timeout_secs));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
