//! Fetches finished games the database has not seen yet.
//!
//! Walks the upstream history pages starting at the stored cursor, stores
//! every game and saves the cursor after each page, so an interrupted sync
//! resumes where it stopped.

use std::collections::BTreeSet;

use serde::Serialize;
use tokio::sync::Mutex;
use utoipa::ToSchema;

use crate::error::LivefeedError;
use crate::persistence::{SqliteStore, result_from_api_result};
use crate::upstream::history::HistorySource;
use crate::upstream::models::ApiGameResult;

/// Outcome of one history sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct SyncReport {
    /// Pages fetched.
    pub pages: u32,
    /// Games newly stored.
    pub games_added: u64,
    /// Games skipped because they were already stored or invalid.
    pub games_skipped: u64,
}

/// Runs history syncs against one source, one at a time.
#[derive(Debug)]
pub struct HistorySyncer<S> {
    source: S,
    max_pages: u32,
    running: Mutex<()>,
}

impl<S: HistorySource> HistorySyncer<S> {
    /// Creates a syncer fetching at most `max_pages` per run (0 = no limit).
    #[must_use]
    pub fn new(source: S, max_pages: u32) -> Self {
        Self {
            source,
            max_pages,
            running: Mutex::new(()),
        }
    }

    /// Runs one sync into `store`.
    ///
    /// # Errors
    ///
    /// Returns [`LivefeedError::SyncInProgress`] if another run has not
    /// finished yet, otherwise the errors of [`sync_history`].
    pub async fn run(&self, store: &SqliteStore) -> Result<SyncReport, LivefeedError> {
        let _guard = self
            .running
            .try_lock()
            .map_err(|_| LivefeedError::SyncInProgress)?;
        sync_history(&self.source, store, self.max_pages).await
    }
}

/// Syncs history from `source` into `store`.
///
/// Stops after the last page (no next cursor) or after `max_pages` pages;
/// `0` means no limit.
///
/// # Errors
///
/// Returns [`LivefeedError::Upstream`] if a page cannot be fetched and a
/// persistence error if the store fails. Games stored before the error
/// stay stored.
pub async fn sync_history<S: HistorySource>(
    source: &S,
    store: &SqliteStore,
    max_pages: u32,
) -> Result<SyncReport, LivefeedError> {
    let mut report = SyncReport::default();
    let mut key = store.get_last_history_page().await?;
    tracing::info!(cursor = ?key, "history sync started");

    loop {
        let (next, data) = source.fetch_page(key.as_deref()).await?;
        report.pages += 1;

        let (added, skipped) = store_page(store, &data).await?;
        report.games_added += added;
        report.games_skipped += skipped;

        let Some(next) = next else {
            break;
        };
        store.update_history_page(&next).await?;
        tracing::debug!(cursor = %next, added, "history page stored");
        key = Some(next);

        if max_pages != 0 && report.pages >= max_pages {
            break;
        }
    }

    tracing::info!(
        pages = report.pages,
        added = report.games_added,
        skipped = report.games_skipped,
        "history sync finished"
    );
    Ok(report)
}

async fn store_page(
    store: &SqliteStore,
    data: &[ApiGameResult],
) -> Result<(u64, u64), LivefeedError> {
    if data.is_empty() {
        return Ok((0, 0));
    }

    let names: BTreeSet<&str> = data
        .iter()
        .flat_map(|g| [g.player_a.name.as_str(), g.player_b.name.as_str()])
        .collect();
    let names: Vec<&str> = names.into_iter().collect();
    let ids = store.resolve_player_ids(&names).await?;

    let (mut added, mut skipped) = (0, 0);
    for game in data {
        match result_from_api_result(game, &ids) {
            Ok(record) => {
                if store.add_game_result(&record).await? {
                    added += 1;
                } else {
                    skipped += 1;
                }
            }
            Err(err) => {
                tracing::warn!(game_id = %game.game_id, error = %err, "skipping history game");
                skipped += 1;
            }
        }
    }
    Ok((added, skipped))
}
