//! Domain layer: identifiers, game records, rock-paper-scissors rules, the
//! live-games registry and the event bus.

pub mod event_bus;
pub mod game;
pub mod ids;
pub mod live_event;
pub mod live_games;
pub mod players;
pub mod rps;

pub use event_bus::EventBus;
pub use game::{GameInfo, GameRecord, LiveGame, PlayerInfo, PlayerPlay};
pub use ids::{GameId, PlayerId};
pub use live_event::LiveEvent;
pub use live_games::LiveGames;
pub use players::PlayerDirectory;
pub use rps::{Outcome, Play, outcome};
