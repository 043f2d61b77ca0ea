//! Typed views of the named events exchanged with the room server.
//!
//! Inbound events become [`ServerEvent`]; outbound requests are built from
//! [`ClientEvent`]. Event names and payload field names are the stable wire
//! contract and must not drift.

use serde::{Deserialize, Serialize};
use serde_json::json;

use moonhowl_domain::{NightActionRecord, NightPrompt, NightResult, Phase, RoleTag, Winner};

use crate::envelope::EventEnvelope;
use crate::error::ProtocolError;

/// Stable event names.
pub mod names {
    pub const GM_CONNECTED: &str = "gm:connected";
    pub const PHASE_CHANGED: &str = "game:phaseChanged";
    pub const NIGHT_ACTION: &str = "gm:nightAction";
    pub const NIGHT_RESULT: &str = "game:nightResult";
    pub const HUNTER_SHOOT: &str = "game:hunterShoot";
    pub const GAME_ENDED: &str = "game:gameEnded";

    pub const CONNECT_GM_ROOM: &str = "rq_gm:connectGmRoom";
    pub const NEXT_PHASE: &str = "rq_gm:nextPhase";

    pub const NIGHT_PROMPT_PREFIX: &str = "night:";
    pub const NIGHT_PROMPT_SUFFIX: &str = "-action";
    pub const NIGHT_DONE_SUFFIX: &str = "-action:done";
}

/// Payload of `gm:connected`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GmConnected {
    pub room_code: String,
    pub gm_room_id: String,
    #[serde(default)]
    pub message: String,
}

/// Payload of `game:phaseChanged`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseChanged {
    pub phase: Phase,
}

/// Payload of `game:hunterShoot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HunterShoot {
    pub hunter_id: String,
}

/// Payload of `game:gameEnded`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEnded {
    pub winner: Winner,
}

/// An inbound event, already decoded into domain vocabulary.
#[derive(Debug, Clone)]
pub enum ServerEvent {
    GmConnected(GmConnected),
    PhaseChanged(PhaseChanged),
    NightAction(NightActionRecord),
    NightResult(NightResult),
    HunterShoot(HunterShoot),
    GameEnded(GameEnded),
    /// A `night:<role>-action` prompt addressed to this client's role.
    NightPrompt(NightPrompt),
}

impl ServerEvent {
    /// Decode an inbound envelope into a typed event.
    ///
    /// Returns `Ok(None)` for event names this client does not consume;
    /// the transport may carry events for other listeners on the same room.
    pub fn from_envelope(envelope: &EventEnvelope) -> Result<Option<ServerEvent>, ProtocolError> {
        let data = envelope.data.clone();
        let event = match envelope.event.as_str() {
            names::GM_CONNECTED => ServerEvent::GmConnected(serde_json::from_value(data)?),
            names::PHASE_CHANGED => ServerEvent::PhaseChanged(serde_json::from_value(data)?),
            names::NIGHT_ACTION => ServerEvent::NightAction(serde_json::from_value(data)?),
            names::NIGHT_RESULT => ServerEvent::NightResult(serde_json::from_value(data)?),
            names::HUNTER_SHOOT => ServerEvent::HunterShoot(serde_json::from_value(data)?),
            names::GAME_ENDED => ServerEvent::GameEnded(serde_json::from_value(data)?),
            name => {
                let Some(role) = prompt_role_from_name(name) else {
                    return Ok(None);
                };
                let prompt: NightPrompt = serde_json::from_value(data)?;
                if prompt.role != role {
                    return Err(ProtocolError::RoleMismatch {
                        event: name.to_string(),
                        payload_role: prompt.role.to_string(),
                    });
                }
                ServerEvent::NightPrompt(prompt)
            }
        };
        Ok(Some(event))
    }
}

/// Parse the role out of a `night:<role>-action` event name.
fn prompt_role_from_name(name: &str) -> Option<RoleTag> {
    let rest = name.strip_prefix(names::NIGHT_PROMPT_PREFIX)?;
    let role = rest.strip_suffix(names::NIGHT_PROMPT_SUFFIX)?;
    role.parse().ok()
}

/// The answer carried by a `night:<role>-action:done` submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NightAnswer {
    /// Witch composition: an optional save plus an optional poison target.
    Witch {
        heal: bool,
        poison_target_id: Option<String>,
    },
    /// Single-target roles (werewolf, seer, bodyguard). `None` is an
    /// explicit skip where the policy allows one.
    Target { target_id: Option<String> },
}

/// An outbound request to the room server.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    ConnectGmRoom {
        room_code: String,
        gm_room_id: String,
    },
    NextPhase {
        room_code: String,
    },
    NightActionDone {
        room_code: String,
        role: RoleTag,
        answer: NightAnswer,
    },
}

impl ClientEvent {
    /// The wire name of this event.
    pub fn event_name(&self) -> String {
        match self {
            ClientEvent::ConnectGmRoom { .. } => names::CONNECT_GM_ROOM.to_string(),
            ClientEvent::NextPhase { .. } => names::NEXT_PHASE.to_string(),
            ClientEvent::NightActionDone { role, .. } => format!(
                "{}{}{}",
                names::NIGHT_PROMPT_PREFIX,
                role.as_str(),
                names::NIGHT_DONE_SUFFIX
            ),
        }
    }

    /// Build the wire envelope. Payload field names are part of the
    /// contract; they are spelled out here rather than derived.
    pub fn to_envelope(&self) -> EventEnvelope {
        let data = match self {
            ClientEvent::ConnectGmRoom {
                room_code,
                gm_room_id,
            } => json!({ "roomCode": room_code, "gmRoomId": gm_room_id }),
            ClientEvent::NextPhase { room_code } => json!({ "roomCode": room_code }),
            ClientEvent::NightActionDone {
                room_code, answer, ..
            } => match answer {
                NightAnswer::Witch {
                    heal,
                    poison_target_id,
                } => json!({
                    "roomCode": room_code,
                    "heal": heal,
                    "poisonTargetId": poison_target_id,
                }),
                NightAnswer::Target { target_id } => json!({
                    "roomCode": room_code,
                    "targetId": target_id,
                }),
            },
        };
        EventEnvelope::new(self.event_name(), data)
    }
}
