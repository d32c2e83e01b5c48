//! The live-games list a subscriber renders.
//!
//! Holds one list item per live game, in arrival order, and an empty-state
//! placeholder that is visible exactly when the list has no items.

use std::fmt;

use crate::domain::{GameId, GameInfo};

/// Text shown while no game is live.
pub const PLACEHOLDER_TEXT: &str = "No games in progress.";

/// One row of the live-games list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    /// Game this row stands for.
    pub game_id: GameId,
    /// Rendered label, `"<player1> vs <player2>"`.
    pub label: String,
}

impl ListItem {
    /// Builds the row for a game.
    #[must_use]
    pub fn for_game(info: &GameInfo) -> Self {
        Self {
            game_id: info.game_id.clone(),
            label: format!("{} vs {}", info.player1.name, info.player2.name),
        }
    }
}

/// Live-games list plus its empty-state placeholder.
#[derive(Debug, Clone, Default)]
pub struct LiveGamesView {
    items: Vec<ListItem>,
}

impl LiveGamesView {
    /// Creates an empty view; the placeholder is visible.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row for `info` and hides the placeholder.
    ///
    /// Returns `false` and changes nothing if the game already has a row.
    pub fn add_game(&mut self, info: &GameInfo) -> bool {
        if self.contains(&info.game_id) {
            return false;
        }
        self.items.push(ListItem::for_game(info));
        true
    }

    /// Removes the row of a finished game.
    ///
    /// Returns `false` if the game had no row. The placeholder becomes
    /// visible when the last row goes.
    pub fn remove_game(&mut self, game_id: &GameId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.game_id != game_id);
        self.items.len() != before
    }

    /// Replaces all rows with `games`, skipping repeated ids.
    pub fn reset(&mut self, games: &[GameInfo]) {
        self.items.clear();
        for info in games {
            self.add_game(info);
        }
    }

    /// Returns `true` if the game has a row.
    #[must_use]
    pub fn contains(&self, game_id: &GameId) -> bool {
        self.items.iter().any(|item| &item.game_id == game_id)
    }

    /// Rows in display order.
    #[must_use]
    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    /// Returns `true` when the empty-state placeholder is shown.
    #[must_use]
    pub fn placeholder_visible(&self) -> bool {
        self.items.is_empty()
    }

    /// Renders the view as text, one row per line.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LiveGamesView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.placeholder_visible() {
            return writeln!(f, "{PLACEHOLDER_TEXT}");
        }
        for item in &self.items {
            writeln!(f, "- {}", item.label)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PlayerId, PlayerInfo};

    fn info(id: &str, a: &str, b: &str) -> GameInfo {
        GameInfo {
            game_id: GameId::from(id),
            player1: PlayerInfo {
                pid: PlayerId::new(),
                name: a.to_string(),
            },
            player2: PlayerInfo {
                pid: PlayerId::new(),
                name: b.to_string(),
            },
        }
    }

    #[test]
    fn starts_with_placeholder() {
        let view = LiveGamesView::new();
        assert!(view.placeholder_visible());
        assert_eq!(view.render(), format!("{PLACEHOLDER_TEXT}\n"));
    }

    #[test]
    fn adding_hides_placeholder() {
        let mut view = LiveGamesView::new();
        assert!(view.add_game(&info("g1", "Ada", "Bo")));
        assert!(!view.placeholder_visible());
        assert_eq!(view.render(), "- Ada vs Bo\n");
    }

    #[test]
    fn adding_twice_keeps_one_row() {
        let mut view = LiveGamesView::new();
        view.add_game(&info("g1", "Ada", "Bo"));
        assert!(!view.add_game(&info("g1", "Ada", "Bo")));
        assert_eq!(view.items().len(), 1);
    }

    #[test]
    fn removing_last_row_shows_placeholder() {
        let mut view = LiveGamesView::new();
        view.add_game(&info("g1", "Ada", "Bo"));
        view.add_game(&info("g2", "Cy", "Dee"));

        assert!(view.remove_game(&GameId::from("g1")));
        assert!(!view.contains(&GameId::from("g1")));
        assert!(!view.placeholder_visible());

        assert!(view.remove_game(&GameId::from("g2")));
        assert!(view.placeholder_visible());
    }

    #[test]
    fn removing_unknown_game_changes_nothing() {
        let mut view = LiveGamesView::new();
        view.add_game(&info("g1", "Ada", "Bo"));
        assert!(!view.remove_game(&GameId::from("zzz")));
        assert_eq!(view.items().len(), 1);
    }

    #[test]
    fn reset_replaces_rows_in_order() {
        let mut view = LiveGamesView::new();
        view.add_game(&info("old", "X", "Y"));
        view.reset(&[info("g2", "Cy", "Dee"), info("g1", "Ada", "Bo")]);
        let ids: Vec<&str> = view.items().iter().map(|i| i.game_id.as_str()).collect();
        assert_eq!(ids, vec!["g2", "g1"]);
    }
}
