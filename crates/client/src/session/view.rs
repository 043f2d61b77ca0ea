//! View selection.
//!
//! Rendering is out of scope; the only thing specified here is which view a
//! client should be showing, and in what precedence order the inputs are
//! consulted: eliminated/spectator state first, then game-ended state, then
//! the phase.

use moonhowl_domain::{Phase, Winner};

use crate::state::GameState;

/// Which view the client should render right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    /// The local player is eliminated; passive spectator view.
    Spectator,
    /// The game is over; takes precedence over any phase.
    GameOver(Winner),
    Waiting,
    Night,
    Day,
    Voting,
}

/// Derive the view for the given state.
pub fn select_view(state: &GameState) -> ViewKind {
    if !state.alive {
        return ViewKind::Spectator;
    }
    if let Some(winner) = state.winner {
        return ViewKind::GameOver(winner);
    }
    match state.phase {
        Phase::Night => ViewKind::Night,
        Phase::Day => ViewKind::Day,
        Phase::Voting => ViewKind::Voting,
        // An `ended` phase without a winner event has nothing to show yet;
        // the waiting view stands in until `gameEnded` arrives.
        Phase::Waiting | Phase::Ended => ViewKind::Waiting,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::GameStateStore;

    #[test]
    fn test_phase_drives_view_while_alive() {
        let store = GameStateStore::new("a");
        store.set_phase(Phase::Night);
        assert_eq!(select_view(&store.snapshot()), ViewKind::Night);
        store.set_phase(Phase::Voting);
        assert_eq!(select_view(&store.snapshot()), ViewKind::Voting);
    }

    #[test]
    fn test_winner_outranks_phase() {
        let store = GameStateStore::new("a");
        store.set_phase(Phase::Voting);
        store.set_winner(Winner::Werewolves);
        assert_eq!(
            select_view(&store.snapshot()),
            ViewKind::GameOver(Winner::Werewolves)
        );
    }

    #[test]
    fn test_elimination_outranks_everything() {
        let store = GameStateStore::new("a");
        store.set_players(vec![moonhowl_domain::Player::new("a", "An")]);
        store.set_phase(Phase::Day);
        store.set_winner(Winner::Villagers);
        store.apply_deaths(&["a".to_string()]);
        assert_eq!(select_view(&store.snapshot()), ViewKind::Spectator);
    }

    #[test]
    fn test_ended_phase_without_winner_shows_waiting() {
        let store = GameStateStore::new("a");
        store.set_phase(Phase::Ended);
        assert_eq!(select_view(&store.snapshot()), ViewKind::Waiting);
    }
}
