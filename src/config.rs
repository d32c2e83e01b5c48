//! Server configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;

/// Default base URL of the upstream game API.
pub const DEFAULT_HISTORY_API_BASE: &str = "https://bad-api-assignment.reaktor.com/rps";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per line.
    Json,
}

/// Top-level server configuration.
///
/// Loaded once at startup via [`LivefeedConfig::from_env`].
#[derive(Debug, Clone)]
pub struct LivefeedConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// SQLite connection string.
    pub database_url: String,

    /// Maximum number of database connections in the pool.
    pub database_max_connections: u32,

    /// Master switch for the results database.
    pub persistence_enabled: bool,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,

    /// Base URL of the upstream game API.
    pub history_api_base: String,

    /// Whether to fetch missing history once at startup.
    pub history_sync_on_start: bool,

    /// Upper bound on history pages fetched per sync (0 = unlimited).
    pub history_sync_max_pages: u32,

    /// Upstream live socket to ingest games from. `None` disables it.
    pub upstream_live_url: Option<String>,

    /// Seconds a game may stay live without a result before it is dropped
    /// (0 = never).
    pub live_game_max_age_secs: u64,

    /// Per-request timeout for REST endpoints, in seconds.
    pub request_timeout_secs: u64,

    /// Log output format.
    pub log_format: LogFormat,
}

impl LivefeedConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set. Calls
    /// `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()?;

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://results.db".to_string());
        let database_max_connections = parse_env("DATABASE_MAX_CONNECTIONS", 5);
        let persistence_enabled = parse_env_bool("PERSISTENCE_ENABLED", true);

        let event_bus_capacity = parse_env("EVENT_BUS_CAPACITY", 1024);

        let history_api_base = std::env::var("HISTORY_API_BASE")
            .unwrap_or_else(|_| DEFAULT_HISTORY_API_BASE.to_string());
        let history_sync_on_start = parse_env_bool("HISTORY_SYNC_ON_START", false);
        let history_sync_max_pages = parse_env("HISTORY_SYNC_MAX_PAGES", 0);

        let upstream_live_url = std::env::var("UPSTREAM_LIVE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let live_game_max_age_secs = parse_env("LIVE_GAME_MAX_AGE_SECS", 300);

        let request_timeout_secs = parse_env("REQUEST_TIMEOUT_SECS", 30);

        let log_format = match std::env::var("LOG_FORMAT").ok().as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            listen_addr,
            database_url,
            database_max_connections,
            persistence_enabled,
            event_bus_capacity,
            history_api_base,
            history_sync_on_start,
            history_sync_max_pages,
            upstream_live_url,
            live_game_max_age_secs,
            request_timeout_secs,
            log_format,
        })
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().map(|v| v.to_lowercase()).as_deref() {
        Some("true") | Some("1") => true,
        Some("false") | Some("0") => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_variable_uses_default() {
        assert_eq!(parse_env("RPS_LIVEFEED_TEST_UNSET_NUMBER", 7u32), 7);
        assert!(parse_env_bool("RPS_LIVEFEED_TEST_UNSET_BOOL", true));
    }
}
