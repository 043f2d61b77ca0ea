//! Night-phase data: prompts, results, and the moderator action log.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::player::Player;
use crate::role::RoleTag;

/// The currently open action request for a client's role.
///
/// At most one prompt is live per client at a time; a newly received prompt
/// unconditionally replaces the previous one. `candidates` is the
/// authoritative selectable set - candidate filtering (self-exclusion, dead
/// players) is done upstream before the prompt is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NightPrompt {
    /// Role this prompt is addressed to.
    #[serde(rename = "type")]
    pub role: RoleTag,
    pub message: String,
    #[serde(default)]
    pub candidates: Vec<Player>,
    /// Wolf-chosen victim for the witch, informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub killed_player_id: Option<String>,
    /// Whether a save action is offered this night.
    #[serde(default)]
    pub can_heal: bool,
    /// Whether a poison action is offered this night.
    #[serde(default)]
    pub can_poison: bool,
}

impl NightPrompt {
    /// Look up a candidate by id. Absence is tolerated, not fatal: a stale
    /// id simply yields no player to display.
    pub fn candidate(&self, id: &str) -> Option<&Player> {
        self.candidates.iter().find(|p| p.id == id)
    }
}

/// Snapshot of night-phase outcomes, consumed once to mark players dead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NightResult {
    pub died_player_ids: Vec<String>,
    pub cause: String,
}

/// One append-only entry in the moderator's night action log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NightActionRecord {
    pub step: String,
    pub action: String,
    pub message: String,
    /// Epoch milliseconds, as produced by the upstream server.
    pub timestamp: i64,
}

impl NightActionRecord {
    /// The record's timestamp as UTC time, if it is representable.
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }
}
