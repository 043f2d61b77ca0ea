//! Game phases and the terminal winning side.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The current stage of the game loop.
///
/// The authoritative value always comes from the upstream source of truth;
/// clients project it, they never validate transitions. `Waiting` is the
/// initial state before the first phase event arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Waiting,
    Night,
    Day,
    Voting,
    Ended,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Waiting => "waiting",
            Phase::Night => "night",
            Phase::Day => "day",
            Phase::Voting => "voting",
            Phase::Ended => "ended",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting" => Ok(Phase::Waiting),
            "night" => Ok(Phase::Night),
            "day" => Ok(Phase::Day),
            "voting" => Ok(Phase::Voting),
            "ended" => Ok(Phase::Ended),
            other => Err(DomainError::UnknownPhase(other.to_string())),
        }
    }
}

/// The side that won once the game has ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Villagers,
    Werewolves,
}

impl Winner {
    /// Display name used in narration and end-of-game views.
    pub fn display_name(&self) -> &'static str {
        match self {
            Winner::Villagers => "Dân làng",
            Winner::Werewolves => "Sói",
        }
    }
}

impl FromStr for Winner {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "villagers" => Ok(Winner::Villagers),
            "werewolves" => Ok(Winner::Werewolves),
            other => Err(DomainError::UnknownWinner(other.to_string())),
        }
    }
}
