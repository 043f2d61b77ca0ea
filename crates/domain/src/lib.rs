//! Moonhowl Domain - pure game vocabulary
//!
//! This crate holds the types the rest of the workspace talks in: players,
//! phases, roles, night prompts and results, and narration events. It has no
//! I/O and no async; everything here is plain data plus the invariants that
//! can be expressed on it directly.

pub mod error;
pub mod narration;
pub mod night;
pub mod phase;
pub mod player;
pub mod role;

pub use error::DomainError;
pub use narration::{AnnouncementKind, AudioEvent};
pub use night::{NightActionRecord, NightPrompt, NightResult};
pub use phase::{Phase, Winner};
pub use player::{Player, PlayerStatus};
pub use role::RoleTag;
