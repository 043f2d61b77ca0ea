//! Phase reconciliation.
//!
//! The reconciler is a pure projection: the authoritative phase value comes
//! from the upstream source of truth, and these handlers map it (and night
//! results) onto the game state. No transition ordering is validated here.
//! Every handler is safe under at-least-once, out-of-order delivery.

use moonhowl_domain::{AnnouncementKind, AudioEvent, NightResult, Phase, Winner};

use crate::narration::NarrationQueue;
use crate::state::GameStateStore;

/// Narration announcing discussion time once the night resolves.
pub const DISCUSSION_MESSAGE: &str = "Mời mọi người bàn luận";

/// Projects inbound phase and result events onto the game state.
#[derive(Clone)]
pub struct PhaseReconciler {
    store: GameStateStore,
    narration: NarrationQueue,
}

impl PhaseReconciler {
    pub fn new(store: GameStateStore, narration: NarrationQueue) -> Self {
        Self { store, narration }
    }

    /// Overwrite the phase unconditionally and clear any live prompt.
    ///
    /// A phase boundary always invalidates pending prompts; a prompt from a
    /// prior night must never leak into the next phase.
    pub fn on_phase_changed(&self, phase: Phase) {
        tracing::debug!("Phase changed to {}", phase);
        self.store.set_phase(phase);
        self.store.set_prompt(None);
    }

    /// Apply a night result to the roster and announce discussion time.
    ///
    /// Idempotent with respect to the roster: re-delivery of the same result
    /// leaves alive flags exactly as a single delivery would.
    pub fn on_night_result(&self, result: &NightResult) {
        let newly_dead = self.store.apply_deaths(&result.died_player_ids);
        tracing::debug!(
            cause = %result.cause,
            newly_dead = newly_dead.len(),
            "Night result applied"
        );
        self.store.set_night_result(result.clone());
        self.narration
            .enqueue(AudioEvent::new(AnnouncementKind::NightEnd, DISCUSSION_MESSAGE));
    }

    /// Record the terminal winning side.
    ///
    /// Once set, the winner takes rendering precedence over phase-driven
    /// views (see [`crate::session::view::select_view`]).
    pub fn on_game_ended(&self, winner: Winner) {
        tracing::info!("Game ended, winner: {}", winner.display_name());
        self.store.set_winner(winner);
    }
}
