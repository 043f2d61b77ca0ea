//! Room sessions: event handling for the player and moderator clients.

pub mod moderator;
pub mod player;
pub mod prompt;
pub mod reconciler;
pub mod view;

pub use moderator::ModeratorSession;
pub use player::PlayerSession;
pub use prompt::{NightPromptController, SubmissionPolicy};
pub use reconciler::PhaseReconciler;
pub use view::{select_view, ViewKind};
