//! Game service: tracks live games, records results and emits events.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{
    EventBus, GameInfo, GameRecord, LiveEvent, LiveGame, LiveGames, Outcome, Play,
    PlayerDirectory, PlayerId, PlayerInfo,
};
use crate::error::LivefeedError;
use crate::persistence::{PlayerRow, SqliteStore, result_from_api_result};
use crate::upstream::models::{ApiGameBegin, ApiGameResult, ApiMessage};

/// How many recent games a player profile includes.
pub const PROFILE_RECENT_GAMES: u32 = 20;

/// Orchestration layer for game starts and results.
///
/// Owns the [`LiveGames`] registry, the [`EventBus`] and, when persistence
/// is enabled, the [`SqliteStore`]. Every mutation follows the pattern:
/// resolve players → update state → persist → emit event.
#[derive(Debug, Clone)]
pub struct GameService {
    live: Arc<LiveGames>,
    event_bus: EventBus,
    directory: Arc<PlayerDirectory>,
    store: Option<SqliteStore>,
}

/// Aggregated results of one player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct PlayerStats {
    /// Number of finished games.
    pub games: u64,
    /// Games won.
    pub wins: u64,
    /// Games lost.
    pub losses: u64,
    /// Games tied.
    pub ties: u64,
    /// `wins / games`, 0 when no games were played.
    pub win_ratio: f64,
    /// The hand played most often; ties go to rock, then paper.
    pub most_played: Option<Play>,
}

impl PlayerStats {
    /// Folds per-hand, per-outcome counts into totals.
    #[must_use]
    pub fn from_counts(counts: &[(Play, Outcome, u64)]) -> Self {
        let mut stats = Self::default();
        let mut per_hand: [(Play, u64); 3] =
            [(Play::Rock, 0), (Play::Paper, 0), (Play::Scissors, 0)];

        for &(play, result, count) in counts {
            stats.games += count;
            match result {
                Outcome::Win => stats.wins += count,
                Outcome::Loss => stats.losses += count,
                Outcome::Tie => stats.ties += count,
            }
            if let Some(slot) = per_hand.iter_mut().find(|(p, _)| *p == play) {
                slot.1 += count;
            }
        }

        if stats.games > 0 {
            #[allow(clippy::cast_precision_loss)]
            let ratio = stats.wins as f64 / stats.games as f64;
            stats.win_ratio = ratio;
        }
        stats.most_played = per_hand
            .iter()
            .filter(|(_, n)| *n > 0)
            .fold(None::<(Play, u64)>, |best, &(p, n)| match best {
                Some((_, m)) if m >= n => best,
                _ => Some((p, n)),
            })
            .map(|(p, _)| p);
        stats
    }
}

/// A player with their totals and latest games.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlayerProfile {
    /// Who the player is.
    pub player: PlayerRow,
    /// Aggregated results.
    pub stats: PlayerStats,
    /// Most recent games, newest first.
    pub recent_games: Vec<GameRecord>,
}

impl GameService {
    /// Creates a new `GameService`. Pass `None` as `store` to run without
    /// the results database.
    #[must_use]
    pub fn new(live: Arc<LiveGames>, event_bus: EventBus, store: Option<SqliteStore>) -> Self {
        Self {
            live,
            event_bus,
            directory: Arc::new(PlayerDirectory::new()),
            store,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns the results store, if persistence is enabled.
    #[must_use]
    pub fn store(&self) -> Option<&SqliteStore> {
        self.store.as_ref()
    }

    /// Records a game as started and announces it on the livefeed.
    ///
    /// # Errors
    ///
    /// Returns [`LivefeedError::DuplicateGame`] if the game is already live,
    /// [`LivefeedError::InvalidRequest`] if both sides name the same player,
    /// or a persistence error if player ids cannot be resolved.
    pub async fn begin_game(&self, begin: &ApiGameBegin) -> Result<GameInfo, LivefeedError> {
        if begin.player_a.name == begin.player_b.name {
            return Err(LivefeedError::InvalidRequest(format!(
                "{} cannot play against themselves",
                begin.player_a.name
            )));
        }
        let ids = self
            .resolve_players(&[begin.player_a.name.as_str(), begin.player_b.name.as_str()])
            .await?;

        let info = GameInfo {
            game_id: begin.game_id.clone(),
            player1: player_info(&ids, &begin.player_a.name)?,
            player2: player_info(&ids, &begin.player_b.name)?,
        };
        self.live.insert(info.clone()).await?;

        let receivers = self.event_bus.publish(LiveEvent::GameBegin {
            game_info: info.clone(),
            timestamp: Utc::now(),
        });

        tracing::info!(
            game_id = %info.game_id,
            player1 = %info.player1.name,
            player2 = %info.player2.name,
            receivers,
            "game begin"
        );
        Ok(info)
    }

    /// Records a finished game, removes it from the live set and announces
    /// the result.
    ///
    /// A result for a game that was never seen live is still recorded and
    /// announced.
    ///
    /// # Errors
    ///
    /// Returns [`LivefeedError::InvalidPlay`] on an unknown hand, or a
    /// persistence error if storing fails.
    pub async fn finish_game(&self, result: &ApiGameResult) -> Result<GameRecord, LivefeedError> {
        let ids = self
            .resolve_players(&[result.player_a.name.as_str(), result.player_b.name.as_str()])
            .await?;
        let record = result_from_api_result(result, &ids)?;

        if let Some(store) = &self.store
            && !store.add_game_result(&record).await?
        {
            tracing::debug!(game_id = %record.game_id, "result already stored");
        }

        if let Err(LivefeedError::GameNotFound(game_id)) = self.live.remove(&record.game_id).await {
            tracing::debug!(%game_id, "result for a game that was not live");
        }

        let receivers = self.event_bus.publish(LiveEvent::GameResult {
            game_id: record.game_id.clone(),
            record: record.clone(),
            timestamp: Utc::now(),
        });

        tracing::info!(
            game_id = %record.game_id,
            winner = record.winner().map_or("tie", |w| w.name.as_str()),
            receivers,
            "game result"
        );
        Ok(record)
    }

    /// Dispatches an upstream message to [`Self::begin_game`] or
    /// [`Self::finish_game`].
    ///
    /// # Errors
    ///
    /// Propagates the error of the dispatched operation.
    pub async fn ingest(&self, message: &ApiMessage) -> Result<(), LivefeedError> {
        match message {
            ApiMessage::GameBegin(begin) => self.begin_game(begin).await.map(|_| ()),
            ApiMessage::GameResult(result) => self.finish_game(result).await.map(|_| ()),
        }
    }

    /// Drops games that have been live longer than `max_age` and announces
    /// each one as expired. Returns how many were dropped.
    pub async fn expire_stale(&self, max_age: Duration) -> usize {
        let Ok(max_age) = TimeDelta::from_std(max_age) else {
            return 0;
        };
        let Some(cutoff) = Utc::now().checked_sub_signed(max_age) else {
            return 0;
        };

        let expired = self.live.remove_started_before(cutoff).await;
        for game in &expired {
            let receivers = self.event_bus.publish(LiveEvent::GameExpired {
                game_id: game.info.game_id.clone(),
                timestamp: Utc::now(),
            });
            tracing::info!(
                game_id = %game.info.game_id,
                started_at = %game.started_at,
                receivers,
                "live game expired without a result"
            );
        }
        expired.len()
    }

    /// Runs [`Self::expire_stale`] forever, checking every `max_age / 2`
    /// (at least once a second).
    pub async fn run_expiry_sweep(&self, max_age: Duration) {
        let period = (max_age / 2).max(Duration::from_secs(1));
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.expire_stale(max_age).await;
        }
    }

    /// Returns all live games, oldest first.
    pub async fn live_games(&self) -> Vec<LiveGame> {
        self.live.list().await
    }

    /// Returns one page of finished games (newest first) and the total
    /// number of stored games.
    ///
    /// # Errors
    ///
    /// Returns [`LivefeedError::PersistenceDisabled`] without a store.
    pub async fn history(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<GameRecord>, u64), LivefeedError> {
        let store = self.require_store()?;
        let offset = page.saturating_sub(1).saturating_mul(per_page);
        let games = store.list_games(offset, per_page).await?;
        let total = store.count_games().await?;
        Ok((games, total))
    }

    /// Finds players whose name contains `fragment`.
    ///
    /// # Errors
    ///
    /// Returns [`LivefeedError::PersistenceDisabled`] without a store.
    pub async fn search_players(
        &self,
        fragment: &str,
        limit: u32,
    ) -> Result<Vec<PlayerRow>, LivefeedError> {
        self.require_store()?.search_players(fragment, limit).await
    }

    /// Builds the profile of a stored player.
    ///
    /// # Errors
    ///
    /// Returns [`LivefeedError::PlayerNotFound`] for an unknown id and
    /// [`LivefeedError::PersistenceDisabled`] without a store.
    pub async fn player_profile(&self, pid: PlayerId) -> Result<PlayerProfile, LivefeedError> {
        let store = self.require_store()?;
        let player = store
            .get_player(pid)
            .await?
            .ok_or(LivefeedError::PlayerNotFound(*pid.as_uuid()))?;
        let counts = store.play_counts(pid).await?;
        let recent_games = store.player_games(pid, PROFILE_RECENT_GAMES).await?;
        Ok(PlayerProfile {
            player,
            stats: PlayerStats::from_counts(&counts),
            recent_games,
        })
    }

    fn require_store(&self) -> Result<&SqliteStore, LivefeedError> {
        self.store.as_ref().ok_or(LivefeedError::PersistenceDisabled)
    }

    async fn resolve_players(
        &self,
        names: &[&str],
    ) -> Result<HashMap<String, PlayerId>, LivefeedError> {
        match &self.store {
            Some(store) => store.resolve_player_ids(names).await,
            None => Ok(self.directory.resolve(names).await),
        }
    }
}

fn player_info(ids: &HashMap<String, PlayerId>, name: &str) -> Result<PlayerInfo, LivefeedError> {
    let pid = ids
        .get(name)
        .copied()
        .ok_or_else(|| LivefeedError::Internal(format!("no id resolved for player {name}")))?;
    Ok(PlayerInfo {
        pid,
        name: name.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::GameId;
    use crate::upstream::models::{ApiPlayer, ApiPlayerPlay};

    fn make_service(store: Option<SqliteStore>) -> GameService {
        GameService::new(Arc::new(LiveGames::new()), EventBus::new(64), store)
    }

    fn begin(id: &str) -> ApiGameBegin {
        ApiGameBegin {
            game_id: GameId::from(id),
            player_a: ApiPlayer {
                name: "Ada".to_string(),
            },
            player_b: ApiPlayer {
                name: "Bo".to_string(),
            },
        }
    }

    fn result(id: &str, a: &str, b: &str) -> ApiGameResult {
        ApiGameResult {
            game_id: GameId::from(id),
            t: 1_000,
            player_a: ApiPlayerPlay {
                name: "Ada".to_string(),
                played: a.to_string(),
            },
            player_b: ApiPlayerPlay {
                name: "Bo".to_string(),
                played: b.to_string(),
            },
        }
    }

    #[tokio::test]
    async fn begin_game_emits_event_and_tracks_game() {
        let service = make_service(None);
        let mut rx = service.event_bus().subscribe();

        let Ok(info) = service.begin_game(&begin("g1")).await else {
            panic!("begin should succeed");
        };
        assert_eq!(info.player1.name, "Ada");
        assert_eq!(service.live_games().await.len(), 1);

        let Ok(event) = rx.recv().await else {
            panic!("expected event");
        };
        assert_eq!(event.event_name(), "game_begin");
    }

    #[tokio::test]
    async fn duplicate_begin_is_rejected() {
        let service = make_service(None);
        assert!(service.begin_game(&begin("g1")).await.is_ok());
        let again = service.begin_game(&begin("g1")).await;
        assert!(matches!(again, Err(LivefeedError::DuplicateGame(_))));
    }

    #[tokio::test]
    async fn player_ids_are_stable_between_begin_and_result() {
        let service = make_service(None);
        let Ok(info) = service.begin_game(&begin("g1")).await else {
            panic!("begin should succeed");
        };
        let Ok(record) = service.finish_game(&result("g1", "ROCK", "PAPER")).await else {
            panic!("finish should succeed");
        };
        assert_eq!(info.player1.pid, record.player1.pid);
        assert_eq!(info.player2.pid, record.player2.pid);
    }

    #[tokio::test]
    async fn finish_game_removes_live_game_and_emits_result() {
        let service = make_service(None);
        let mut rx = service.event_bus().subscribe();
        let _ = service.begin_game(&begin("g1")).await;
        // Drain the begin event
        let _ = rx.recv().await;

        let Ok(record) = service.finish_game(&result("g1", "ROCK", "SCISSORS")).await else {
            panic!("finish should succeed");
        };
        assert_eq!(record.player1.result, Outcome::Win);
        assert!(service.live_games().await.is_empty());

        let Ok(event) = rx.recv().await else {
            panic!("expected event");
        };
        assert_eq!(event.event_name(), "game_result");
        assert_eq!(event.game_id().as_str(), "g1");
    }

    #[tokio::test]
    async fn result_without_begin_is_still_announced() {
        let service = make_service(None);
        let mut rx = service.event_bus().subscribe();
        assert!(service.finish_game(&result("g9", "PAPER", "PAPER")).await.is_ok());
        let Ok(event) = rx.recv().await else {
            panic!("expected event");
        };
        assert_eq!(event.game_id().as_str(), "g9");
    }

    #[tokio::test]
    async fn invalid_play_is_rejected_before_any_change() {
        let service = make_service(None);
        let _ = service.begin_game(&begin("g1")).await;
        let outcome = service.finish_game(&result("g1", "ROCK", "SPOCK")).await;
        assert!(matches!(outcome, Err(LivefeedError::InvalidPlay(_))));
        assert_eq!(service.live_games().await.len(), 1);
    }

    #[tokio::test]
    async fn self_game_is_rejected_and_not_stored() {
        let Ok(store) = SqliteStore::in_memory().await else {
            panic!("in-memory database should open");
        };
        let service = make_service(Some(store));

        let mut begin = begin("g1");
        begin.player_b.name = "Ada".to_string();
        let started = service.begin_game(&begin).await;
        assert!(matches!(started, Err(LivefeedError::InvalidRequest(_))));
        assert!(service.live_games().await.is_empty());

        let mut finished = result("g1", "ROCK", "PAPER");
        finished.player_b.name = "Ada".to_string();
        let outcome = service.finish_game(&finished).await;
        assert!(matches!(outcome, Err(LivefeedError::InvalidRequest(_))));

        let Ok((games, total)) = service.history(1, 20).await else {
            panic!("history should load");
        };
        assert!(games.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn stale_games_expire_and_are_announced() {
        let service = make_service(None);
        let mut rx = service.event_bus().subscribe();
        let _ = service.begin_game(&begin("g1")).await;
        let _ = rx.recv().await;

        assert_eq!(service.expire_stale(Duration::from_secs(60)).await, 0);
        assert_eq!(service.live_games().await.len(), 1);

        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(service.expire_stale(Duration::from_millis(1)).await, 1);
        assert!(service.live_games().await.is_empty());

        let Ok(event) = rx.recv().await else {
            panic!("expected event");
        };
        assert_eq!(event.event_name(), "game_expired");
        assert_eq!(event.game_id().as_str(), "g1");
    }

    #[tokio::test]
    async fn history_requires_store() {
        let service = make_service(None);
        assert!(matches!(
            service.history(1, 20).await,
            Err(LivefeedError::PersistenceDisabled)
        ));
    }

    #[tokio::test]
    async fn results_are_stored_and_profiled() {
        let Ok(store) = SqliteStore::in_memory().await else {
            panic!("in-memory database should open");
        };
        let service = make_service(Some(store));
        let _ = service.finish_game(&result("g1", "ROCK", "SCISSORS")).await;
        let Ok(record) = service.finish_game(&result("g2", "ROCK", "PAPER")).await else {
            panic!("finish should succeed");
        };

        let Ok((games, total)) = service.history(1, 20).await else {
            panic!("history should load");
        };
        assert_eq!(total, 2);
        assert_eq!(games.len(), 2);

        let Ok(profile) = service.player_profile(record.player1.pid).await else {
            panic!("profile should load");
        };
        assert_eq!(profile.player.name, "Ada");
        assert_eq!(profile.stats.games, 2);
        assert_eq!(profile.stats.wins, 1);
        assert_eq!(profile.stats.most_played, Some(Play::Rock));
        assert_eq!(profile.recent_games.len(), 2);

        let missing = service.player_profile(PlayerId::new()).await;
        assert!(matches!(missing, Err(LivefeedError::PlayerNotFound(_))));
    }

    #[test]
    fn stats_from_counts() {
        let stats = PlayerStats::from_counts(&[
            (Play::Paper, Outcome::Win, 3),
            (Play::Rock, Outcome::Loss, 1),
            (Play::Paper, Outcome::Tie, 1),
        ]);
        assert_eq!(stats.games, 5);
        assert_eq!(stats.wins, 3);
        assert_eq!(stats.losses, 1);
        assert_eq!(stats.ties, 1);
        assert!((stats.win_ratio - 0.6).abs() < f64::EPSILON);
        assert_eq!(stats.most_played, Some(Play::Paper));
    }

    #[test]
    fn stats_without_games() {
        let stats = PlayerStats::from_counts(&[]);
        assert_eq!(stats.games, 0);
        assert!(stats.most_played.is_none());
        assert!(stats.win_ratio.abs() < f64::EPSILON);
    }
}
