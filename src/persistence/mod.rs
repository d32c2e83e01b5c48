//! Persistence layer: SQLite results database.
//!
//! Stores finished games, the players that took part and the cursor of the
//! last fetched history page. The concrete implementation uses
//! `sqlx::SqlitePool`; the schema lives in `migrations/`.

pub mod models;
pub mod sqlite;

pub use models::{PlayerRow, result_from_api_result};
pub use sqlite::SqliteStore;
