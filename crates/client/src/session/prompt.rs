//! The night prompt lifecycle.
//!
//! A server-pushed prompt becomes a bounded interactive decision: the
//! candidates in the prompt are the authoritative selectable set, selection
//! is toggle-semantics, and submission happens exactly once per prompt
//! instance. After submitting, the controller goes passive until the next
//! prompt or phase event arrives.

use std::sync::Arc;

use moonhowl_domain::{NightPrompt, RoleTag};
use moonhowl_protocol::{ClientEvent, NightAnswer};

use crate::messaging::EventChannel;
use crate::state::{GameStateStore, NoticeLevel};

/// Notice shown once an answer has been dispatched.
pub const SUBMITTED_MESSAGE: &str = "Đã gửi lựa chọn";

/// Which submission behavior the room runs with.
///
/// Both variants exist in the wild: one forbids a "do nothing" answer by
/// keeping submit disabled until a choice is made, the other always allows
/// an explicit empty submission. [`SubmissionPolicy::RequireChoice`] is the
/// default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionPolicy {
    /// Submit is enabled only once a non-trivial selection exists.
    #[default]
    RequireChoice,
    /// An explicit skip (empty selection) may be submitted at any time.
    AllowSkip,
}

/// Per-role prompt state machine: receipt, candidate selection, one-shot
/// answer submission, retirement.
pub struct NightPromptController {
    store: GameStateStore,
    channel: Arc<dyn EventChannel>,
    room_code: String,
    policy: SubmissionPolicy,
    // Transient selection state, reset whenever a prompt is replaced.
    heal: bool,
    poison_target: Option<String>,
    target: Option<String>,
    sending: bool,
}

impl NightPromptController {
    pub fn new(
        store: GameStateStore,
        channel: Arc<dyn EventChannel>,
        room_code: impl Into<String>,
        policy: SubmissionPolicy,
    ) -> Self {
        Self {
            store,
            channel,
            room_code: room_code.into(),
            policy,
            heal: false,
            poison_target: None,
            target: None,
            sending: false,
        }
    }

    fn reset_selection(&mut self) {
        self.heal = false;
        self.poison_target = None;
        self.target = None;
        self.sending = false;
    }

    /// A new prompt unconditionally replaces any prior one (no merge, no
    /// queueing) and clears all transient selection state.
    pub fn on_prompt_received(&mut self, prompt: NightPrompt) {
        tracing::debug!(role = %prompt.role, "Night prompt received");
        self.reset_selection();
        self.store.set_prompt(Some(prompt));
    }

    /// Called when a phase boundary arrives; the store's prompt is cleared
    /// by the reconciler, this clears the controller's local state.
    pub fn on_phase_boundary(&mut self) {
        self.reset_selection();
    }

    /// The prompt to render interactively, or `None` while sending (the
    /// passive waiting view replaces the interactive one until the next
    /// prompt or phase event).
    pub fn active_prompt(&self) -> Option<NightPrompt> {
        if self.sending {
            return None;
        }
        self.store.prompt()
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    pub fn heal_chosen(&self) -> bool {
        self.heal
    }

    pub fn poison_target(&self) -> Option<&str> {
        self.poison_target.as_deref()
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Choose or withdraw the save. Ignored unless the live prompt offers
    /// a heal this night.
    pub fn set_heal(&mut self, heal: bool) {
        let Some(prompt) = self.store.prompt() else {
            return;
        };
        if heal && !prompt.can_heal {
            return;
        }
        self.heal = heal;
    }

    /// Toggle the poison target: selecting the same candidate a second time
    /// deselects it. Unknown candidates and prompts without a poison offer
    /// are ignored.
    pub fn toggle_poison_target(&mut self, candidate_id: &str) {
        let Some(prompt) = self.store.prompt() else {
            return;
        };
        if !prompt.can_poison || prompt.candidate(candidate_id).is_none() {
            return;
        }
        self.poison_target = toggle(self.poison_target.take(), candidate_id);
    }

    /// Toggle the single target for werewolf/seer/bodyguard prompts.
    pub fn toggle_target(&mut self, candidate_id: &str) {
        let Some(prompt) = self.store.prompt() else {
            return;
        };
        if prompt.candidate(candidate_id).is_none() {
            return;
        }
        self.target = toggle(self.target.take(), candidate_id);
    }

    /// Whether the current selection is non-trivial.
    pub fn selection_made(&self) -> bool {
        self.heal || self.poison_target.is_some() || self.target.is_some()
    }

    /// Whether submit is currently enabled.
    pub fn can_submit(&self) -> bool {
        if self.sending || self.store.prompt().is_none() {
            return false;
        }
        match self.policy {
            SubmissionPolicy::RequireChoice => self.selection_made(),
            SubmissionPolicy::AllowSkip => true,
        }
    }

    /// Submit the current selection.
    ///
    /// Emits exactly one outbound answer per prompt instance: the sending
    /// flag gates the dispatch, so a defensive second invocation is a no-op.
    /// There is no retry - if the transport drops the event, nothing
    /// recovers it.
    pub fn submit(&mut self) -> bool {
        if !self.can_submit() {
            return false;
        }
        self.dispatch_answer()
    }

    /// Submit an explicitly empty selection. Only available under
    /// [`SubmissionPolicy::AllowSkip`].
    pub fn skip(&mut self) -> bool {
        if self.policy != SubmissionPolicy::AllowSkip {
            return false;
        }
        if self.sending || self.store.prompt().is_none() {
            return false;
        }
        self.heal = false;
        self.poison_target = None;
        self.target = None;
        self.dispatch_answer()
    }

    fn dispatch_answer(&mut self) -> bool {
        let Some(prompt) = self.store.prompt() else {
            return false;
        };
        self.sending = true;

        let answer = match prompt.role {
            RoleTag::Witch => NightAnswer::Witch {
                heal: self.heal,
                poison_target_id: self.poison_target.clone(),
            },
            _ => NightAnswer::Target {
                target_id: self.target.clone(),
            },
        };
        let event = ClientEvent::NightActionDone {
            room_code: self.room_code.clone(),
            role: prompt.role,
            answer,
        };

        if let Err(e) = self.channel.emit(event) {
            // Accepted gap: the answer is lost and the client stays in the
            // passive waiting state until the next prompt or phase event.
            tracing::warn!("Failed to submit night action: {}", e);
        }
        self.store.push_notice(NoticeLevel::Success, SUBMITTED_MESSAGE);
        true
    }
}

fn toggle(current: Option<String>, candidate_id: &str) -> Option<String> {
    match current {
        Some(existing) if existing == candidate_id => None,
        _ => Some(candidate_id.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::MemoryChannel;
    use moonhowl_domain::Player;

    fn witch_prompt(can_heal: bool, can_poison: bool) -> NightPrompt {
        NightPrompt {
            role: RoleTag::Witch,
            message: "Phù thủy muốn làm gì?".into(),
            candidates: vec![Player::new("x", "Xuan"), Player::new("y", "Yen")],
            killed_player_id: Some("x".into()),
            can_heal,
            can_poison,
        }
    }

    fn seer_prompt() -> NightPrompt {
        NightPrompt {
            role: RoleTag::Seer,
            message: "Tiên tri muốn soi ai?".into(),
            candidates: vec![Player::new("x", "Xuan"), Player::new("y", "Yen")],
            killed_player_id: None,
            can_heal: false,
            can_poison: false,
        }
    }

    fn controller(policy: SubmissionPolicy) -> (NightPromptController, MemoryChannel) {
        let channel = MemoryChannel::new();
        let store = GameStateStore::new("me");
        let controller =
            NightPromptController::new(store, Arc::new(channel.clone()), "ABCD", policy);
        (controller, channel)
    }

    #[test]
    fn test_toggle_same_poison_target_deselects() {
        let (mut controller, _channel) = controller(SubmissionPolicy::RequireChoice);
        controller.on_prompt_received(witch_prompt(false, true));

        controller.toggle_poison_target("x");
        assert_eq!(controller.poison_target(), Some("x"));
        controller.toggle_poison_target("x");
        assert_eq!(controller.poison_target(), None);
    }

    #[test]
    fn test_toggle_switches_between_candidates() {
        let (mut controller, _channel) = controller(SubmissionPolicy::RequireChoice);
        controller.on_prompt_received(witch_prompt(false, true));

        controller.toggle_poison_target("x");
        controller.toggle_poison_target("y");
        assert_eq!(controller.poison_target(), Some("y"));
    }

    #[test]
    fn test_unknown_candidate_is_ignored() {
        let (mut controller, _channel) = controller(SubmissionPolicy::RequireChoice);
        controller.on_prompt_received(witch_prompt(false, true));

        controller.toggle_poison_target("ghost");
        assert_eq!(controller.poison_target(), None);
    }

    #[test]
    fn test_heal_requires_offer() {
        let (mut controller, _channel) = controller(SubmissionPolicy::RequireChoice);
        controller.on_prompt_received(witch_prompt(false, true));

        controller.set_heal(true);
        assert!(!controller.heal_chosen());

        controller.on_prompt_received(witch_prompt(true, true));
        controller.set_heal(true);
        assert!(controller.heal_chosen());
    }

    #[test]
    fn test_submit_policies_on_empty_selection() {
        // No-op forbidden: submit stays disabled with nothing chosen.
        let (mut controller, channel) = controller(SubmissionPolicy::RequireChoice);
        controller.on_prompt_received(witch_prompt(false, true));
        controller.toggle_poison_target("x");
        controller.toggle_poison_target("x");
        assert!(!controller.can_submit());
        assert!(!controller.submit());
        assert!(channel.emitted().is_empty());

        // Skip allowed: an empty submission is always available.
        let (mut controller, channel) = self::controller(SubmissionPolicy::AllowSkip);
        controller.on_prompt_received(witch_prompt(false, true));
        assert!(controller.can_submit());
        assert!(controller.skip());
        assert_eq!(channel.emitted().len(), 1);
    }

    #[test]
    fn test_double_submit_dispatches_once() {
        let (mut controller, channel) = controller(SubmissionPolicy::RequireChoice);
        controller.on_prompt_received(witch_prompt(true, true));
        controller.set_heal(true);

        assert!(controller.submit());
        assert!(!controller.submit());

        assert_eq!(channel.emitted().len(), 1);
    }

    #[test]
    fn test_witch_answer_shape() {
        let (mut controller, channel) = controller(SubmissionPolicy::RequireChoice);
        controller.on_prompt_received(witch_prompt(true, true));
        controller.set_heal(true);
        controller.toggle_poison_target("y");
        controller.submit();

        let emitted = channel.emitted();
        assert_eq!(emitted.len(), 1);
        let envelope = emitted[0].to_envelope();
        assert_eq!(envelope.event, "night:witch-action:done");
        assert_eq!(envelope.data["roomCode"], "ABCD");
        assert_eq!(envelope.data["heal"], true);
        assert_eq!(envelope.data["poisonTargetId"], "y");
    }

    #[test]
    fn test_single_target_role_answer() {
        let (mut controller, channel) = controller(SubmissionPolicy::RequireChoice);
        controller.on_prompt_received(seer_prompt());
        controller.toggle_target("x");
        controller.submit();

        let emitted = channel.emitted();
        assert_eq!(emitted.len(), 1);
        let envelope = emitted[0].to_envelope();
        assert_eq!(envelope.event, "night:seer-action:done");
        assert_eq!(envelope.data["targetId"], "x");
    }

    #[test]
    fn test_new_prompt_replaces_and_resets() {
        let (mut controller, channel) = controller(SubmissionPolicy::RequireChoice);
        controller.on_prompt_received(witch_prompt(true, true));
        controller.set_heal(true);
        controller.submit();
        assert!(controller.is_sending());
        assert!(controller.active_prompt().is_none());

        // Next night: a fresh prompt reopens the controller.
        controller.on_prompt_received(witch_prompt(false, true));
        assert!(!controller.is_sending());
        assert!(!controller.heal_chosen());
        assert!(controller.active_prompt().is_some());
        assert_eq!(channel.emitted().len(), 1);
    }

    #[test]
    fn test_phase_boundary_resets_sending_state() {
        let (mut controller, _channel) = controller(SubmissionPolicy::RequireChoice);
        controller.on_prompt_received(witch_prompt(true, true));
        controller.set_heal(true);
        controller.submit();

        controller.on_phase_boundary();
        assert!(!controller.is_sending());
        assert!(!controller.selection_made());
    }

    #[test]
    fn test_no_prompt_means_no_submission() {
        let (mut controller, channel) = controller(SubmissionPolicy::AllowSkip);
        assert!(!controller.can_submit());
        assert!(!controller.submit());
        assert!(!controller.skip());
        assert!(channel.emitted().is_empty());
    }
}
