//! Livefeed WebSocket layer.
//!
//! The endpoint at `/livefeed` pushes `after connect`, `game_begin` and
//! `game_result` frames to every connected subscriber.

pub mod connection;
pub mod handler;
pub mod messages;
