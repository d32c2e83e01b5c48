//! In-memory player directory.
//!
//! Assigns a [`PlayerId`] to each player name the first time it is seen.
//! Used when the results database is disabled; with a database the ids come
//! from the `players` table instead.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::PlayerId;

/// Name to [`PlayerId`] mapping.
#[derive(Debug, Default)]
pub struct PlayerDirectory {
    ids: RwLock<HashMap<String, PlayerId>>,
}

impl PlayerDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns ids for all `names`, creating new ones for unknown names.
    pub async fn resolve(&self, names: &[&str]) -> HashMap<String, PlayerId> {
        let mut ids = self.ids.write().await;
        names
            .iter()
            .map(|name| {
                let id = *ids.entry((*name).to_string()).or_default();
                ((*name).to_string(), id)
            })
            .collect()
    }

    /// Looks up a single name without creating it.
    pub async fn get(&self, name: &str) -> Option<PlayerId> {
        self.ids.read().await.get(name).copied()
    }

    /// Returns the number of known players.
    pub async fn len(&self) -> usize {
        self.ids.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolve_is_stable_per_name() {
        let dir = PlayerDirectory::new();
        let first = dir.resolve(&["Ada", "Bo"]).await;
        let second = dir.resolve(&["Bo"]).await;
        assert_eq!(first.get("Bo"), second.get("Bo"));
        assert_ne!(first.get("Ada"), first.get("Bo"));
        assert_eq!(dir.len().await, 2);
    }

    #[tokio::test]
    async fn get_does_not_create() {
        let dir = PlayerDirectory::new();
        assert!(dir.get("Ada").await.is_none());
        assert_eq!(dir.len().await, 0);
    }
}
