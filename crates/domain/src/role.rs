//! Role tags for the werewolf game.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The role a player was dealt at game start.
///
/// Night-acting roles (werewolf, seer, witch, bodyguard) each receive a
/// role-specific prompt during the night phase; villagers and the hunter
/// only act through daytime mechanics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleTag {
    Werewolf,
    Seer,
    Witch,
    Bodyguard,
    Hunter,
    Villager,
}

impl RoleTag {
    /// Stable wire name, used to build `night:<role>-action` event names.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleTag::Werewolf => "werewolf",
            RoleTag::Seer => "seer",
            RoleTag::Witch => "witch",
            RoleTag::Bodyguard => "bodyguard",
            RoleTag::Hunter => "hunter",
            RoleTag::Villager => "villager",
        }
    }

    /// Whether this role is prompted for a night action.
    pub fn acts_at_night(&self) -> bool {
        matches!(
            self,
            RoleTag::Werewolf | RoleTag::Seer | RoleTag::Witch | RoleTag::Bodyguard
        )
    }

    /// All roles that receive night prompts, in wake order.
    pub fn night_roles() -> &'static [RoleTag] {
        &[
            RoleTag::Werewolf,
            RoleTag::Seer,
            RoleTag::Witch,
            RoleTag::Bodyguard,
        ]
    }
}

impl fmt::Display for RoleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleTag {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "werewolf" => Ok(RoleTag::Werewolf),
            "seer" => Ok(RoleTag::Seer),
            "witch" => Ok(RoleTag::Witch),
            "bodyguard" => Ok(RoleTag::Bodyguard),
            "hunter" => Ok(RoleTag::Hunter),
            "villager" => Ok(RoleTag::Villager),
            other => Err(DomainError::UnknownRole(other.to_string())),
        }
    }
}
