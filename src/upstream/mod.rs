//! Upstream game API: message shapes, the history endpoint and the live
//! socket.

pub mod history;
pub mod live;
pub mod models;

pub use history::{HistoryClient, HistorySource};
pub use models::{ApiGameBegin, ApiGameResult, ApiMessage};
