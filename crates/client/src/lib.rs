//! Moonhowl Client - the real-time coordination core of the werewolf room.
//!
//! Three tightly coupled pieces live here:
//!
//! - the phase/state reconciliation that projects inbound room events onto
//!   the shared [`state::GameStateStore`],
//! - the night prompt lifecycle (role-specific prompts, candidate toggling,
//!   one-shot answer submission),
//! - the narration queue that turns announcement events into strictly
//!   ordered, non-overlapping audio output.
//!
//! Everything is driven by named events arriving on an [`messaging::EventChannel`];
//! delivery is at-least-once and unordered across names, so every handler is
//! written to be safe under duplicates and reordering.

pub mod config;
pub mod messaging;
pub mod narration;
pub mod session;
pub mod state;

pub use config::{ClientConfig, SessionMode};
pub use narration::{NarrationQueue, SpeechSettings, SpeechSynthesizer, VisualAlertSynthesizer};
pub use session::{
    ModeratorSession, NightPromptController, PhaseReconciler, PlayerSession, SubmissionPolicy,
};
pub use state::GameStateStore;
