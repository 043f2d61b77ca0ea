//! The JSON envelope carried in each websocket text frame.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProtocolError;

/// One named event on the wire: `{"event": <name>, "data": <payload>}`.
///
/// The envelope itself carries no ordering or delivery metadata; the
/// transport is at-least-once and unordered across event names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

impl EventEnvelope {
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }

    pub fn encode(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_decode() {
        let envelope = EventEnvelope::new("game:phaseChanged", json!({"phase": "night"}));
        let text = envelope.encode().expect("encode");
        let back = EventEnvelope::decode(&text).expect("decode");
        assert_eq!(back.event, "game:phaseChanged");
        assert_eq!(back.data["phase"], "night");
    }

    #[test]
    fn test_missing_data_defaults_to_null() {
        let envelope = EventEnvelope::decode(r#"{"event":"rq_gm:nextPhase"}"#).expect("decode");
        assert!(envelope.data.is_null());
    }

    #[test]
    fn test_garbage_frame_is_an_error() {
        assert!(EventEnvelope::decode("not json").is_err());
    }
}
