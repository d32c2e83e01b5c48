//! Applies livefeed events to a [`LiveGamesView`].

use super::events::FeedEvent;
use super::view::LiveGamesView;

/// Stateless event handler; each call runs to completion before the next
/// event is looked at.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedHandler;

impl FeedHandler {
    /// Applies `event` to `view`. Returns `true` if the view changed.
    pub fn handle(&self, event: &FeedEvent, view: &mut LiveGamesView) -> bool {
        match event {
            FeedEvent::Connected { live_games } => {
                tracing::debug!(live_games = live_games.len(), "connected!");
                view.reset(live_games);
                true
            }
            FeedEvent::GameBegin(info) => {
                tracing::debug!(
                    game_id = %info.game_id,
                    player1 = %info.player1.name,
                    player2 = %info.player2.name,
                    "begin!"
                );
                view.add_game(info)
            }
            FeedEvent::GameResult(game_id) => {
                tracing::debug!(%game_id, "result!");
                let removed = view.remove_game(game_id);
                if !removed {
                    tracing::debug!(%game_id, "result for a game not in the list");
                }
                removed
            }
            FeedEvent::GameExpired(game_id) => {
                tracing::debug!(%game_id, "expired!");
                view.remove_game(game_id)
            }
            FeedEvent::Unknown(name) => {
                tracing::debug!(event = %name, "ignoring unknown livefeed event");
                false
            }
        }
    }
}
