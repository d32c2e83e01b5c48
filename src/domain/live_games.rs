//! In-memory set of games currently in progress.
//!
//! [`LiveGames`] is the server-side counterpart of the live-games list every
//! livefeed client renders: a game is inserted on `game_begin` and removed on
//! `game_result`, or swept once it has been live for too long.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::GameId;
use super::game::{GameInfo, LiveGame};
use crate::error::LivefeedError;

/// Registry of live games keyed by [`GameId`].
///
/// Listing returns games in the order they started.
#[derive(Debug, Default)]
pub struct LiveGames {
    games: RwLock<HashMap<GameId, LiveGame>>,
}

impl LiveGames {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a game as started.
    ///
    /// # Errors
    ///
    /// Returns [`LivefeedError::DuplicateGame`] if a game with the same id
    /// is already live.
    pub async fn insert(&self, info: GameInfo) -> Result<(), LivefeedError> {
        let mut map = self.games.write().await;
        if map.contains_key(&info.game_id) {
            return Err(LivefeedError::DuplicateGame(info.game_id));
        }
        map.insert(info.game_id.clone(), LiveGame::new(info));
        Ok(())
    }

    /// Removes a finished game, returning its entry.
    ///
    /// # Errors
    ///
    /// Returns [`LivefeedError::GameNotFound`] if the game is not live.
    pub async fn remove(&self, game_id: &GameId) -> Result<LiveGame, LivefeedError> {
        self.games
            .write()
            .await
            .remove(game_id)
            .ok_or_else(|| LivefeedError::GameNotFound(game_id.clone()))
    }

    /// Removes every game that started before `cutoff`, returning them
    /// oldest first.
    pub async fn remove_started_before(&self, cutoff: DateTime<Utc>) -> Vec<LiveGame> {
        let mut map = self.games.write().await;
        let stale: Vec<GameId> = map
            .values()
            .filter(|g| g.started_at < cutoff)
            .map(|g| g.info.game_id.clone())
            .collect();
        let mut removed: Vec<LiveGame> = stale.iter().filter_map(|id| map.remove(id)).collect();
        removed.sort_by(|a, b| a.started_at.cmp(&b.started_at));
        removed
    }

    /// Returns `true` if the game is currently live.
    pub async fn contains(&self, game_id: &GameId) -> bool {
        self.games.read().await.contains_key(game_id)
    }

    /// Returns all live games, oldest first.
    pub async fn list(&self) -> Vec<LiveGame> {
        let map = self.games.read().await;
        let mut games: Vec<LiveGame> = map.values().cloned().collect();
        games.sort_by(|a, b| {
            a.started_at
                .cmp(&b.started_at)
                .then_with(|| a.info.game_id.cmp(&b.info.game_id))
        });
        games
    }

    /// Returns the number of live games.
    pub async fn len(&self) -> usize {
        self.games.read().await.len()
    }

    /// Returns `true` if no game is live.
    pub async fn is_empty(&self) -> bool {
        self.games.read().await.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::PlayerId;
    use crate::domain::game::PlayerInfo;

    fn info(id: &str) -> GameInfo {
        GameInfo {
            game_id: GameId::from(id),
            player1: PlayerInfo {
                pid: PlayerId::new(),
                name: "Ada".to_string(),
            },
            player2: PlayerInfo {
                pid: PlayerId::new(),
                name: "Bo".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn insert_and_remove() {
        let live = LiveGames::new();
        assert!(live.insert(info("g1")).await.is_ok());
        assert!(live.contains(&GameId::from("g1")).await);

        let Ok(removed) = live.remove(&GameId::from("g1")).await else {
            panic!("expected game to be removed");
        };
        assert_eq!(removed.info.game_id.as_str(), "g1");
        assert!(live.is_empty().await);
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let live = LiveGames::new();
        assert!(live.insert(info("g1")).await.is_ok());
        let result = live.insert(info("g1")).await;
        assert!(matches!(result, Err(LivefeedError::DuplicateGame(_))));
        assert_eq!(live.len().await, 1);
    }

    #[tokio::test]
    async fn remove_unknown_is_not_found() {
        let live = LiveGames::new();
        let result = live.remove(&GameId::from("nope")).await;
        assert!(matches!(result, Err(LivefeedError::GameNotFound(_))));
    }

    #[tokio::test]
    async fn sweep_removes_only_older_games() {
        let live = LiveGames::new();
        let _ = live.insert(info("old")).await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let cutoff = Utc::now();
        let _ = live.insert(info("new")).await;

        let removed = live.remove_started_before(cutoff).await;
        assert_eq!(removed.len(), 1);
        assert_eq!(removed.first().map(|g| g.info.game_id.as_str()), Some("old"));
        assert!(live.contains(&GameId::from("new")).await);
        assert!(live.remove_started_before(cutoff).await.is_empty());
    }

    #[tokio::test]
    async fn list_is_in_start_order() {
        let live = LiveGames::new();
        for id in ["b", "a", "c"] {
            let _ = live.insert(info(id)).await;
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }
        let ids: Vec<String> = live
            .list()
            .await
            .into_iter()
            .map(|g| g.info.game_id.to_string())
            .collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }
}
