//! SQLite implementation of the results database.

use std::collections::HashMap;
use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use super::models::{PlayerRow, STATUS_FINISHED};
use crate::domain::{GameId, GameRecord, Outcome, Play, PlayerId, PlayerPlay};
use crate::error::LivefeedError;

/// Columns of a joined game row, see [`GAME_SELECT`].
type GameRow = (
    String,
    i64,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
);

/// Selects a finished game together with both players and both plays.
const GAME_SELECT: &str = "SELECT g.game_id, g.time, \
     p1.player_id, p1.name, pl1.played, pl1.result, \
     p2.player_id, p2.name, pl2.played, pl2.result \
     FROM games g \
     JOIN players p1 ON p1.player_id = g.p1_id \
     JOIN players p2 ON p2.player_id = g.p2_id \
     JOIN plays pl1 ON pl1.game_id = g.game_id AND pl1.player_id = g.p1_id \
     JOIN plays pl2 ON pl2.game_id = g.game_id AND pl2.player_id = g.p2_id";

/// SQLite-backed results store using `sqlx::SqlitePool`.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if missing) the database at `url` and applies
    /// pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`LivefeedError::PersistenceError`] if the URL is invalid,
    /// the database cannot be opened or a migration fails.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, LivefeedError> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;
        Self::from_pool(pool).await
    }

    /// Opens a private in-memory database.
    ///
    /// The pool holds exactly one connection that is never recycled, since
    /// every SQLite memory connection is a separate database.
    ///
    /// # Errors
    ///
    /// Returns [`LivefeedError::PersistenceError`] if the database cannot
    /// be opened or migrated.
    pub async fn in_memory() -> Result<Self, LivefeedError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Self::from_pool(pool).await
    }

    /// Wraps an existing pool, applying pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`LivefeedError::PersistenceError`] if a migration fails.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, LivefeedError> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    /// Returns the stored key of the next unfetched history page.
    ///
    /// # Errors
    ///
    /// Returns [`LivefeedError::PersistenceError`] on database failure.
    pub async fn get_last_history_page(&self) -> Result<Option<String>, LivefeedError> {
        let page = sqlx::query_scalar::<_, Option<String>>("SELECT page FROM history_page LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;
        Ok(page.flatten().filter(|p| !p.is_empty()))
    }

    /// Stores the key of the next unfetched history page.
    ///
    /// # Errors
    ///
    /// Returns [`LivefeedError::PersistenceError`] on database failure.
    pub async fn update_history_page(&self, key: &str) -> Result<(), LivefeedError> {
        sqlx::query("UPDATE history_page SET page = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Returns the ids of those `names` that are already stored.
    ///
    /// # Errors
    ///
    /// Returns [`LivefeedError::PersistenceError`] on database failure.
    pub async fn get_player_ids_by_name(
        &self,
        names: &[&str],
    ) -> Result<HashMap<String, PlayerId>, LivefeedError> {
        if names.is_empty() {
            return Ok(HashMap::new());
        }
        let placeholders = vec!["?"; names.len()].join(",");
        let sql = format!("SELECT name, player_id FROM players WHERE name IN ({placeholders})");

        let mut query = sqlx::query_as::<_, (String, String)>(&sql);
        for name in names {
            query = query.bind(*name);
        }
        let rows = query.fetch_all(&self.pool).await?;

        rows.into_iter()
            .map(|(name, id)| Ok((name, parse_player_id(&id)?)))
            .collect()
    }

    /// Adds a player. Returns `false` if the name is already taken.
    ///
    /// # Errors
    ///
    /// Returns [`LivefeedError::PersistenceError`] on database failure.
    pub async fn create_player(&self, name: &str, pid: PlayerId) -> Result<bool, LivefeedError> {
        let result = sqlx::query("INSERT OR IGNORE INTO players (name, player_id) VALUES (?, ?)")
            .bind(name)
            .bind(pid.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Returns ids for all `names`, creating players that are not stored
    /// yet.
    ///
    /// # Errors
    ///
    /// Returns [`LivefeedError::PersistenceError`] on database failure.
    pub async fn resolve_player_ids(
        &self,
        names: &[&str],
    ) -> Result<HashMap<String, PlayerId>, LivefeedError> {
        let mut ids = self.get_player_ids_by_name(names).await?;
        let mut raced = Vec::new();
        for name in names {
            if ids.contains_key(*name) {
                continue;
            }
            let pid = PlayerId::new();
            if self.create_player(name, pid).await? {
                tracing::debug!(player = %name, %pid, "player created");
                ids.insert((*name).to_string(), pid);
            } else {
                raced.push(*name);
            }
        }
        // Someone else inserted these between our read and write.
        if !raced.is_empty() {
            ids.extend(self.get_player_ids_by_name(&raced).await?);
        }
        Ok(ids)
    }

    /// Stores a finished game with both plays.
    ///
    /// Returns `false` without changing anything if the game id is already
    /// stored.
    ///
    /// # Errors
    ///
    /// Returns [`LivefeedError::PersistenceError`] on database failure,
    /// including unknown player ids, or if either play row cannot be
    /// written (the same player on both sides). Nothing is stored then.
    pub async fn add_game_result(&self, record: &GameRecord) -> Result<bool, LivefeedError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            "INSERT OR IGNORE INTO games (game_id, time, p1_id, p2_id, status) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(record.game_id.as_str())
        .bind(record.t)
        .bind(record.player1.pid.to_string())
        .bind(record.player2.pid.to_string())
        .bind(STATUS_FINISHED)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted == 0 {
            return Ok(false);
        }

        for side in [&record.player1, &record.player2] {
            let written = sqlx::query(
                "INSERT OR IGNORE INTO plays (game_id, player_id, played, result) \
                 VALUES (?, ?, ?, ?)",
            )
            .bind(record.game_id.as_str())
            .bind(side.pid.to_string())
            .bind(side.played.code())
            .bind(side.result.code())
            .execute(&mut *tx)
            .await?
            .rows_affected();

            // Dropping `tx` rolls the game row back.
            if written != 1 {
                return Err(LivefeedError::PersistenceError(format!(
                    "play of {} in game {} was not stored",
                    side.name, record.game_id
                )));
            }
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Returns finished games, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`LivefeedError::PersistenceError`] on database failure or
    /// a corrupt row.
    pub async fn list_games(&self, offset: u32, limit: u32) -> Result<Vec<GameRecord>, LivefeedError> {
        let sql = format!("{GAME_SELECT} ORDER BY g.time DESC, g.game_id LIMIT ? OFFSET ?");
        let rows = sqlx::query_as::<_, GameRow>(&sql)
            .bind(i64::from(limit))
            .bind(i64::from(offset))
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(record_from_row).collect()
    }

    /// Returns the number of stored games.
    ///
    /// # Errors
    ///
    /// Returns [`LivefeedError::PersistenceError`] on database failure.
    pub async fn count_games(&self) -> Result<u64, LivefeedError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM games")
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Returns players whose name contains `fragment`, alphabetically.
    ///
    /// # Errors
    ///
    /// Returns [`LivefeedError::PersistenceError`] on database failure.
    pub async fn search_players(
        &self,
        fragment: &str,
        limit: u32,
    ) -> Result<Vec<PlayerRow>, LivefeedError> {
        let rows = sqlx::query_as::<_, (String, String)>(
            "SELECT player_id, name FROM players \
             WHERE name LIKE '%' || ? || '%' ORDER BY name LIMIT ?",
        )
        .bind(fragment)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(id, name)| {
                Ok(PlayerRow {
                    pid: parse_player_id(&id)?,
                    name,
                })
            })
            .collect()
    }

    /// Looks up a player by id.
    ///
    /// # Errors
    ///
    /// Returns [`LivefeedError::PersistenceError`] on database failure.
    pub async fn get_player(&self, pid: PlayerId) -> Result<Option<PlayerRow>, LivefeedError> {
        let name = sqlx::query_scalar::<_, String>("SELECT name FROM players WHERE player_id = ?")
            .bind(pid.to_string())
            .fetch_optional(&self.pool)
            .await?;
        Ok(name.map(|name| PlayerRow { pid, name }))
    }

    /// Returns the most recent games `pid` took part in, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`LivefeedError::PersistenceError`] on database failure or
    /// a corrupt row.
    pub async fn player_games(
        &self,
        pid: PlayerId,
        limit: u32,
    ) -> Result<Vec<GameRecord>, LivefeedError> {
        let sql = format!(
            "{GAME_SELECT} WHERE g.p1_id = ?1 OR g.p2_id = ?1 \
             ORDER BY g.time DESC, g.game_id LIMIT ?2"
        );
        let rows = sqlx::query_as::<_, GameRow>(&sql)
            .bind(pid.to_string())
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(record_from_row).collect()
    }

    /// Returns how often `pid` played each hand with each outcome.
    ///
    /// # Errors
    ///
    /// Returns [`LivefeedError::PersistenceError`] on database failure or
    /// a corrupt row.
    pub async fn play_counts(
        &self,
        pid: PlayerId,
    ) -> Result<Vec<(Play, Outcome, u64)>, LivefeedError> {
        let rows = sqlx::query_as::<_, (String, String, i64)>(
            "SELECT played, result, COUNT(*) FROM plays \
             WHERE player_id = ? GROUP BY played, result",
        )
        .bind(pid.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(played, result, count)| {
                Ok((
                    parse_play(&played)?,
                    parse_outcome(&result)?,
                    u64::try_from(count).unwrap_or(0),
                ))
            })
            .collect()
    }
}

fn record_from_row(row: GameRow) -> Result<GameRecord, LivefeedError> {
    let (game_id, t, p1_id, p1_name, p1_played, p1_result, p2_id, p2_name, p2_played, p2_result) =
        row;
    Ok(GameRecord {
        game_id: GameId::from(game_id),
        t,
        player1: PlayerPlay {
            pid: parse_player_id(&p1_id)?,
            name: p1_name,
            played: parse_play(&p1_played)?,
            result: parse_outcome(&p1_result)?,
        },
        player2: PlayerPlay {
            pid: parse_player_id(&p2_id)?,
            name: p2_name,
            played: parse_play(&p2_played)?,
            result: parse_outcome(&p2_result)?,
        },
    })
}

fn parse_player_id(s: &str) -> Result<PlayerId, LivefeedError> {
    uuid::Uuid::parse_str(s)
        .map(PlayerId::from_uuid)
        .map_err(|e| LivefeedError::PersistenceError(format!("corrupt player id {s:?}: {e}")))
}

fn parse_play(s: &str) -> Result<Play, LivefeedError> {
    Play::parse(s).ok_or_else(|| LivefeedError::PersistenceError(format!("corrupt play {s:?}")))
}

fn parse_outcome(s: &str) -> Result<Outcome, LivefeedError> {
    Outcome::parse(s)
        .ok_or_else(|| LivefeedError::PersistenceError(format!("corrupt result {s:?}")))
}
