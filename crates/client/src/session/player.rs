//! The player session.
//!
//! Wires the reconciler and the night prompt controller to a room channel
//! for one player client. Handlers are registered once per join and torn
//! down on leave; rejoining replaces the subscription.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use moonhowl_protocol::ServerEvent;

use crate::messaging::{EventChannel, SubscriptionGuard};
use crate::narration::NarrationQueue;
use crate::session::prompt::{NightPromptController, SubmissionPolicy};
use crate::session::reconciler::PhaseReconciler;
use crate::session::view::{select_view, ViewKind};
use crate::state::{GameStateStore, NoticeLevel};

/// Notice shown when the hunter fires.
pub const HUNTER_SHOOT_MESSAGE: &str = "Thợ săn đã bắn!";

pub struct PlayerSession {
    store: GameStateStore,
    narration: NarrationQueue,
    channel: Arc<dyn EventChannel>,
    prompt: Arc<Mutex<NightPromptController>>,
    subscription: Option<SubscriptionGuard>,
}

fn lock_prompt(
    prompt: &Mutex<NightPromptController>,
) -> MutexGuard<'_, NightPromptController> {
    prompt.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PlayerSession {
    pub fn new(
        store: GameStateStore,
        narration: NarrationQueue,
        channel: Arc<dyn EventChannel>,
        room_code: impl Into<String>,
        policy: SubmissionPolicy,
    ) -> Self {
        let prompt = NightPromptController::new(
            store.clone(),
            Arc::clone(&channel),
            room_code,
            policy,
        );
        let mut session = Self {
            store: store.clone(),
            narration,
            channel,
            prompt: Arc::new(Mutex::new(prompt)),
            subscription: None,
        };
        session.join();
        session
    }

    /// (Re)register the room handlers. The previous subscription, if any,
    /// is dropped first so no event is ever handled twice.
    pub fn join(&mut self) {
        self.subscription = None;

        let store = self.store.clone();
        let reconciler = PhaseReconciler::new(store.clone(), self.narration.clone());
        let prompt = Arc::clone(&self.prompt);

        let guard = self.channel.events().subscribe(move |event| match event {
            ServerEvent::PhaseChanged(data) => {
                reconciler.on_phase_changed(data.phase);
                lock_prompt(&prompt).on_phase_boundary();
            }
            ServerEvent::NightResult(result) => reconciler.on_night_result(result),
            ServerEvent::HunterShoot(data) => {
                tracing::debug!(hunter = %data.hunter_id, "Hunter fired");
                store.push_notice(NoticeLevel::Info, HUNTER_SHOOT_MESSAGE);
            }
            ServerEvent::GameEnded(data) => reconciler.on_game_ended(data.winner),
            ServerEvent::NightPrompt(received) => {
                // Prompts are addressed per role; a prompt for a role we do
                // not hold is someone else's turn.
                if store.role() == Some(received.role) {
                    lock_prompt(&prompt).on_prompt_received(received.clone());
                } else {
                    tracing::debug!(role = %received.role, "Ignoring prompt for another role");
                }
            }
            // GM-channel events; not part of the player surface.
            ServerEvent::GmConnected(_) | ServerEvent::NightAction(_) => {}
        });
        self.subscription = Some(guard);
    }

    /// The night prompt controller, for the interactive (out of scope) UI.
    pub fn prompt_controller(&self) -> Arc<Mutex<NightPromptController>> {
        Arc::clone(&self.prompt)
    }

    /// Which view this client should render right now.
    pub fn view(&self) -> ViewKind {
        select_view(&self.store.snapshot())
    }

    /// Tear the handlers down. In-flight state does not survive a leave.
    pub fn leave(&mut self) {
        self.subscription = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::MemoryChannel;
    use crate::narration::VisualAlertSynthesizer;
    use crate::session::reconciler::DISCUSSION_MESSAGE;
    use moonhowl_domain::{
        NightPrompt, NightResult, Phase, Player, RoleTag, Winner,
    };
    use moonhowl_protocol::{GameEnded, HunterShoot, PhaseChanged};

    fn setup(role: RoleTag) -> (PlayerSession, MemoryChannel, GameStateStore, NarrationQueue) {
        let channel = MemoryChannel::new();
        let store = GameStateStore::new("a");
        store.set_role(Some(role));
        store.set_players(vec![Player::new("a", "An"), Player::new("b", "Binh")]);
        let narration = NarrationQueue::new(Arc::new(VisualAlertSynthesizer));
        let session = PlayerSession::new(
            store.clone(),
            narration.clone(),
            Arc::new(channel.clone()),
            "ABCD",
            SubmissionPolicy::RequireChoice,
        );
        (session, channel, store, narration)
    }

    fn witch_prompt() -> NightPrompt {
        NightPrompt {
            role: RoleTag::Witch,
            message: "Phù thủy muốn làm gì?".into(),
            candidates: vec![Player::new("b", "Binh")],
            killed_player_id: Some("b".into()),
            can_heal: true,
            can_poison: true,
        }
    }

    #[tokio::test]
    async fn test_night_result_scenario() {
        let (_session, channel, store, narration) = setup(RoleTag::Villager);

        channel.deliver(ServerEvent::NightResult(NightResult {
            died_player_ids: vec!["b".into()],
            cause: "wolf".into(),
        }));

        let players = store.players();
        assert!(players.iter().find(|p| p.id == "a").expect("a").alive);
        assert!(!players.iter().find(|p| p.id == "b").expect("b").alive);
        assert_eq!(
            narration.current().map(|e| e.message),
            Some(DISCUSSION_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn test_prompt_routed_to_matching_role() {
        let (session, channel, _store, _narration) = setup(RoleTag::Witch);

        channel.deliver(ServerEvent::NightPrompt(witch_prompt()));

        let controller = session.prompt_controller();
        assert!(lock_prompt(&controller).active_prompt().is_some());
    }

    #[tokio::test]
    async fn test_prompt_for_other_role_is_ignored() {
        let (session, channel, store, _narration) = setup(RoleTag::Villager);

        channel.deliver(ServerEvent::NightPrompt(witch_prompt()));

        let controller = session.prompt_controller();
        assert!(lock_prompt(&controller).active_prompt().is_none());
        assert!(store.prompt().is_none());
    }

    #[tokio::test]
    async fn test_phase_change_clears_live_prompt_and_selection() {
        let (session, channel, store, _narration) = setup(RoleTag::Witch);
        channel.deliver(ServerEvent::NightPrompt(witch_prompt()));
        {
            let controller = session.prompt_controller();
            let mut controller = lock_prompt(&controller);
            controller.toggle_poison_target("b");
            assert!(controller.selection_made());
        }

        channel.deliver(ServerEvent::PhaseChanged(PhaseChanged { phase: Phase::Day }));

        assert!(store.prompt().is_none());
        let controller = session.prompt_controller();
        let controller = lock_prompt(&controller);
        assert!(!controller.selection_made());
        assert!(controller.active_prompt().is_none());
    }

    #[tokio::test]
    async fn test_full_witch_round_trip() {
        let (session, channel, _store, _narration) = setup(RoleTag::Witch);
        channel.deliver(ServerEvent::NightPrompt(witch_prompt()));

        let controller = session.prompt_controller();
        {
            let mut controller = lock_prompt(&controller);
            controller.set_heal(true);
            assert!(controller.submit());
            // Defensive double-invoke stays a no-op.
            assert!(!controller.submit());
        }

        let emitted = channel.emitted();
        assert_eq!(emitted.len(), 1);
        let envelope = emitted[0].to_envelope();
        assert_eq!(envelope.event, "night:witch-action:done");
        assert_eq!(envelope.data["heal"], true);
    }

    #[tokio::test]
    async fn test_hunter_shoot_pushes_notice() {
        let (_session, channel, store, _narration) = setup(RoleTag::Villager);

        channel.deliver(ServerEvent::HunterShoot(HunterShoot {
            hunter_id: "h1".into(),
        }));

        let notices = store.drain_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, HUNTER_SHOOT_MESSAGE);
    }

    #[tokio::test]
    async fn test_game_ended_drives_view() {
        let (session, channel, _store, _narration) = setup(RoleTag::Villager);
        channel.deliver(ServerEvent::PhaseChanged(PhaseChanged { phase: Phase::Voting }));
        assert_eq!(session.view(), ViewKind::Voting);

        channel.deliver(ServerEvent::GameEnded(GameEnded {
            winner: Winner::Villagers,
        }));
        assert_eq!(session.view(), ViewKind::GameOver(Winner::Villagers));
    }

    #[tokio::test]
    async fn test_own_death_switches_to_spectator_view() {
        let (session, channel, _store, _narration) = setup(RoleTag::Villager);

        channel.deliver(ServerEvent::NightResult(NightResult {
            died_player_ids: vec!["a".into()],
            cause: "wolf".into(),
        }));

        assert_eq!(session.view(), ViewKind::Spectator);
    }

    #[tokio::test]
    async fn test_leave_stops_handling() {
        let (mut session, channel, store, _narration) = setup(RoleTag::Villager);
        session.leave();

        channel.deliver(ServerEvent::PhaseChanged(PhaseChanged { phase: Phase::Night }));
        assert_eq!(store.phase(), Phase::Waiting);
    }

    #[tokio::test]
    async fn test_rejoin_handles_events_exactly_once() {
        let (mut session, channel, store, narration) = setup(RoleTag::Villager);
        session.leave();
        session.join();
        session.join();

        channel.deliver(ServerEvent::NightResult(NightResult {
            died_player_ids: vec![],
            cause: "none".into(),
        }));
        assert_eq!(store.phase(), Phase::Waiting);
        // One subscription means exactly one discussion announcement.
        assert_eq!(narration.pending().len(), 1);
    }

    #[tokio::test]
    async fn test_out_of_order_result_after_phase_change() {
        // A late nightResult interleaved after phaseChanged must still apply
        // its deaths without resurrecting the cleared prompt.
        let (_session, channel, store, _narration) = setup(RoleTag::Witch);
        channel.deliver(ServerEvent::NightPrompt(witch_prompt()));
        channel.deliver(ServerEvent::PhaseChanged(PhaseChanged { phase: Phase::Day }));
        channel.deliver(ServerEvent::NightResult(NightResult {
            died_player_ids: vec!["b".into()],
            cause: "wolf".into(),
        }));

        assert!(store.prompt().is_none());
        assert!(!store.players().iter().find(|p| p.id == "b").expect("b").alive);
    }
}
