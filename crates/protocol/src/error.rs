//! Protocol-level decode errors.

use thiserror::Error;

/// Errors produced while decoding inbound envelopes.
///
/// These never abort the client; the channel adapter logs them and drops the
/// offending frame.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Malformed JSON or a payload that does not match the declared shape
    #[error("Invalid payload: {0}")]
    Json(#[from] serde_json::Error),

    /// A `night:<role>-action` event whose payload names a different role
    #[error("Role mismatch in event {event}: payload says {payload_role}")]
    RoleMismatch { event: String, payload_role: String },
}
