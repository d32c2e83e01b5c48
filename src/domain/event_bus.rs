//! Fan-out of game starts, results and expiries to `/livefeed` sockets.
//!
//! [`crate::service::GameService`] is the only publisher. Each `/livefeed`
//! connection subscribes before it snapshots the live games, so nothing
//! published after the greeting is missed. A socket that falls more than
//! `EVENT_BUS_CAPACITY` events behind loses the oldest ones: its connection
//! task logs the lag and keeps forwarding. That client's list can then hold
//! a finished game for the rest of the connection.

use tokio::sync::broadcast;

use super::LiveEvent;

/// Broadcast bus carrying [`LiveEvent`]s from the game service to every
/// livefeed connection.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<LiveEvent>,
}

impl EventBus {
    /// Creates a new `EventBus` with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event to every connected livefeed socket.
    ///
    /// Returns the number of sockets it reached. With nobody connected the
    /// event is dropped; live state is still recovered from the greeting.
    pub fn publish(&self, event: LiveEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Creates a new receiver for all future events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
