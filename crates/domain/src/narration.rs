//! Narration events consumed by the audio queue.

use serde::{Deserialize, Serialize};

use crate::role::RoleTag;

/// What kind of announcement an audio event narrates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnnouncementKind {
    NightStart,
    RoleWake,
    RoleSleep,
    NightEnd,
    GameEnded,
    NightAction,
    PhaseChange,
}

/// One unit of narration. Immutable once created; lives inside the
/// narration queue from enqueue to playback completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioEvent {
    #[serde(rename = "type")]
    pub kind: AnnouncementKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<RoleTag>,
    /// Epoch milliseconds, when the originating event carried one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl AudioEvent {
    pub fn new(kind: AnnouncementKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            role: None,
            timestamp: None,
        }
    }

    pub fn with_role(mut self, role: RoleTag) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}
