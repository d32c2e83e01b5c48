//! Rock-paper-scissors rules.
//!
//! [`Play`] is a single hand, [`Outcome`] the result of one hand against
//! another. Both have a one-letter storage form used by the results database.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single rock-paper-scissors hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Play {
    /// Beats scissors.
    Rock,
    /// Beats rock.
    Paper,
    /// Beats paper.
    Scissors,
}

impl Play {
    /// Parses a hand from upstream or user text.
    ///
    /// Case-insensitive; accepts the letter, the English word and the
    /// Finnish word (`r`/`rock`/`kivi`, `p`/`paper`/`paperi`,
    /// `s`/`scissors`/`sakset`).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "r" | "rock" | "kivi" => Some(Self::Rock),
            "p" | "paper" | "paperi" => Some(Self::Paper),
            "s" | "scissors" | "sakset" => Some(Self::Scissors),
            _ => None,
        }
    }

    /// One-letter storage code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Rock => "R",
            Self::Paper => "P",
            Self::Scissors => "S",
        }
    }

    /// Returns the hand this one beats.
    #[must_use]
    pub const fn beats(self) -> Self {
        match self {
            Self::Rock => Self::Scissors,
            Self::Paper => Self::Rock,
            Self::Scissors => Self::Paper,
        }
    }
}

impl fmt::Display for Play {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Rock => "ROCK",
            Self::Paper => "PAPER",
            Self::Scissors => "SCISSORS",
        };
        f.write_str(name)
    }
}

/// Result of a game from one player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// The player won.
    Win,
    /// The player lost.
    Loss,
    /// Both players chose the same hand.
    Tie,
}

impl Outcome {
    /// Parses an outcome from `w`/`win`, `l`/`loss` or `t`/`tie`
    /// (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "w" | "win" => Some(Self::Win),
            "l" | "loss" => Some(Self::Loss),
            "t" | "tie" => Some(Self::Tie),
            _ => None,
        }
    }

    /// One-letter storage code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Win => "W",
            Self::Loss => "L",
            Self::Tie => "T",
        }
    }

    /// Returns `true` only for [`Outcome::Win`].
    #[must_use]
    pub const fn is_win(self) -> bool {
        matches!(self, Self::Win)
    }
}

/// Returns the result of hand `a` against hand `b`, from A's perspective.
///
/// Rock against scissors is a [`Outcome::Win`] for rock.
#[must_use]
pub const fn outcome(a: Play, b: Play) -> Outcome {
    if a as u8 == b as u8 {
        Outcome::Tie
    } else if a.beats() as u8 == b as u8 {
        Outcome::Win
    } else {
        Outcome::Loss
    }
}
