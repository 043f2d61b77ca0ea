//! Moonhowl Protocol - the room wire contract
//!
//! The transport delivers named events with JSON payloads, at-least-once and
//! unordered across names. This crate pins down the stable event names and
//! payload field shapes both peers depend on; any change here is a breaking
//! change against unmodified peers.

pub mod envelope;
pub mod error;
pub mod events;

pub use envelope::EventEnvelope;
pub use error::ProtocolError;
pub use events::{
    names, ClientEvent, GameEnded, GmConnected, HunterShoot, NightAnswer, PhaseChanged, ServerEvent,
};
