//! The shared game state container.
//!
//! One store per client, passed by handle to every component that needs it.
//! Mutation goes through the methods here only; each method takes the lock,
//! mutates, and releases before returning, so every handler invocation is
//! atomic with respect to readers. Nothing holds the lock across an await.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use moonhowl_domain::{
    NightActionRecord, NightPrompt, NightResult, Phase, Player, RoleTag, Winner,
};

/// Severity of a transient user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A toast-style transient notice for the out-of-scope UI to drain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: Uuid,
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
        }
    }
}

/// The full client-side game state.
#[derive(Debug, Clone, Default)]
pub struct GameState {
    pub phase: Phase,
    pub players: Vec<Player>,
    pub player_id: String,
    pub role: Option<RoleTag>,
    pub alive: bool,
    pub night_prompt: Option<NightPrompt>,
    pub winner: Option<Winner>,
    pub night_result: Option<NightResult>,
    /// Append-only for the whole game; never cleared between nights.
    pub night_actions: Vec<NightActionRecord>,
    pub connected: bool,
    notices: VecDeque<Notice>,
}

/// Handle to the process-wide game state.
///
/// Cheap to clone; all clones share the same state. Readers take snapshots,
/// writers go through the mutation methods below.
#[derive(Clone)]
pub struct GameStateStore {
    inner: Arc<Mutex<GameState>>,
}

impl GameStateStore {
    pub fn new(player_id: impl Into<String>) -> Self {
        let state = GameState {
            alive: true,
            player_id: player_id.into(),
            ..GameState::default()
        };
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GameState> {
        // A poisoned lock means a panic mid-mutation; the state is still the
        // best information we have, so keep serving it.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Full copy of the current state, for rendering and tests.
    pub fn snapshot(&self) -> GameState {
        self.lock().clone()
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    pub fn set_phase(&self, phase: Phase) {
        self.lock().phase = phase;
    }

    pub fn role(&self) -> Option<RoleTag> {
        self.lock().role
    }

    pub fn set_role(&self, role: Option<RoleTag>) {
        self.lock().role = role;
    }

    pub fn is_alive(&self) -> bool {
        self.lock().alive
    }

    pub fn winner(&self) -> Option<Winner> {
        self.lock().winner
    }

    pub fn set_winner(&self, winner: Winner) {
        self.lock().winner = Some(winner);
    }

    pub fn prompt(&self) -> Option<NightPrompt> {
        self.lock().night_prompt.clone()
    }

    pub fn set_prompt(&self, prompt: Option<NightPrompt>) {
        self.lock().night_prompt = prompt;
    }

    pub fn is_connected(&self) -> bool {
        self.lock().connected
    }

    pub fn set_connected(&self, connected: bool) {
        self.lock().connected = connected;
    }

    /// Bulk roster replace (roster-load path).
    pub fn set_players(&self, players: Vec<Player>) {
        self.lock().players = players;
    }

    pub fn players(&self) -> Vec<Player> {
        self.lock().players.clone()
    }

    /// Mark the listed players dead and flip the local alive flag if our own
    /// id is among them. Idempotent: an already-dead player stays dead, and
    /// re-applying the same list is a no-op. Unknown ids are tolerated.
    ///
    /// Returns the ids that actually transitioned alive -> dead this call.
    pub fn apply_deaths(&self, died_player_ids: &[String]) -> Vec<String> {
        let mut state = self.lock();
        let mut newly_dead = Vec::new();
        for id in died_player_ids {
            if let Some(player) = state.players.iter_mut().find(|p| &p.id == id) {
                if player.alive {
                    player.alive = false;
                    newly_dead.push(id.clone());
                }
            }
            if *id == state.player_id {
                state.alive = false;
            }
        }
        newly_dead
    }

    pub fn set_night_result(&self, result: NightResult) {
        self.lock().night_result = Some(result);
    }

    /// Append to the moderator-only action log. Append-only; the log
    /// accumulates for the whole game.
    pub fn push_night_action(&self, record: NightActionRecord) {
        self.lock().night_actions.push(record);
    }

    pub fn night_actions(&self) -> Vec<NightActionRecord> {
        self.lock().night_actions.clone()
    }

    pub fn push_notice(&self, level: NoticeLevel, message: impl Into<String>) {
        self.lock().notices.push_back(Notice::new(level, message));
    }

    /// Take all pending notices, oldest first.
    pub fn drain_notices(&self) -> Vec<Notice> {
        self.lock().notices.drain(..).collect()
    }
}

impl GameState {
    /// Pending notices, oldest first, without consuming them.
    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }
}
