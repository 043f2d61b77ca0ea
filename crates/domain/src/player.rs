//! Players as they appear in a room roster.

use serde::{Deserialize, Serialize};

use crate::role::RoleTag;

/// Moderation status of a player inside a room.
///
/// Only approved players take part in the game; anything else is carried
/// through verbatim so the roster survives wire round-trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    #[default]
    Approved,
    #[serde(other)]
    Other,
}

/// A player in the room roster.
///
/// Identity is `id`; no two players share an id within a room. `alive` flips
/// to false through night-result reconciliation and never flips back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub username: String,
    #[serde(default = "default_alive")]
    pub alive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<RoleTag>,
    #[serde(default)]
    pub status: PlayerStatus,
}

fn default_alive() -> bool {
    true
}

impl Player {
    /// A freshly approved, living player with no role dealt yet.
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            alive: true,
            role: None,
            status: PlayerStatus::Approved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_is_alive_and_approved() {
        let player = Player::new("p1", "An");
        assert!(player.alive);
        assert_eq!(player.status, PlayerStatus::Approved);
        assert!(player.role.is_none());
    }

    #[test]
    fn test_wire_shape_is_camel_case() {
        let player = Player {
            id: "p1".into(),
            username: "An".into(),
            alive: true,
            role: Some(RoleTag::Seer),
            status: PlayerStatus::Approved,
        };
        let value = serde_json::to_value(&player).expect("serialize");
        assert_eq!(value["id"], "p1");
        assert_eq!(value["role"], "seer");
        assert_eq!(value["status"], "approved");
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let player: Player =
            serde_json::from_str(r#"{"id":"p2","username":"Binh"}"#).expect("deserialize");
        assert!(player.alive);
        assert_eq!(player.status, PlayerStatus::Approved);
    }

    #[test]
    fn test_unknown_status_maps_to_other() {
        let player: Player =
            serde_json::from_str(r#"{"id":"p3","username":"Chi","status":"pending"}"#)
                .expect("deserialize");
        assert_eq!(player.status, PlayerStatus::Other);
    }
}
