//! # rps-livefeed
//!
//! Live rock-paper-scissors results. Games reported by the upstream API are
//! tracked while they run, recorded in SQLite when they finish and pushed
//! to every subscriber of the `/livefeed` WebSocket. The [`client`] module
//! is the subscriber side: it keeps a live-games list in sync with the feed.
//!
//! ## Architecture
//!
//! ```text
//! Upstream (live socket, history API) / POST /api/v1/ingest
//!     │
//!     ├── GameService (service/)
//!     │       ├── LiveGames, PlayerDirectory (domain/)
//!     │       └── SqliteStore (persistence/)
//!     │
//!     ├── EventBus (domain/)
//!     │
//!     ├── /livefeed WebSocket (ws/)
//!     │
//!     └── LivefeedSubscriber → LiveGamesView (client/)
//! ```

pub mod api;
pub mod app_state;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod upstream;
pub mod ws;
