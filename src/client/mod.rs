//! Livefeed subscriber.
//!
//! Connects to `/livefeed`, decodes `after connect`, `game_begin` and
//! `game_result` frames and keeps a [`LiveGamesView`] in sync with them.

pub mod error;
pub mod events;
pub mod feed;
pub mod subscriber;
pub mod view;

pub use error::ClientError;
pub use events::FeedEvent;
pub use feed::FeedHandler;
pub use subscriber::LivefeedSubscriber;
pub use view::LiveGamesView;
