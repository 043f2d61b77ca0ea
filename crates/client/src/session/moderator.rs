//! The moderator (GM) session.
//!
//! The privileged connection: it receives the full night action log, owns
//! the narration controls, and issues phase-advance commands. Handlers are
//! registered once per connect; reconnecting replaces the subscription
//! instead of stacking a second one.

use std::sync::Arc;

use anyhow::Result;

use moonhowl_domain::{AnnouncementKind, AudioEvent};
use moonhowl_protocol::{ClientEvent, ServerEvent};

use crate::messaging::{EventChannel, SubscriptionGuard};
use crate::narration::NarrationQueue;
use crate::session::reconciler::PhaseReconciler;
use crate::state::{GameStateStore, NoticeLevel};

/// Notice shown when the GM channel handshake completes.
pub const GM_CONNECTED_MESSAGE: &str = "GM đã kết nối thành công";

/// Narration used by the moderator's sound-check control.
pub const TEST_SOUND_MESSAGE: &str = "Kiểm tra âm thanh";

pub struct ModeratorSession {
    store: GameStateStore,
    narration: NarrationQueue,
    channel: Arc<dyn EventChannel>,
    room_code: String,
    gm_room_id: String,
    subscription: Option<SubscriptionGuard>,
}

impl ModeratorSession {
    pub fn new(
        store: GameStateStore,
        narration: NarrationQueue,
        channel: Arc<dyn EventChannel>,
        room_code: impl Into<String>,
    ) -> Self {
        let room_code = room_code.into();
        let gm_room_id = format!("gm_{room_code}");
        Self {
            store,
            narration,
            channel,
            room_code,
            gm_room_id,
            subscription: None,
        }
    }

    /// Subscribe the GM handlers and request the moderator channel.
    ///
    /// Calling this again (reconnect path) first drops the previous
    /// subscription, so events are never handled twice.
    pub fn connect(&mut self) -> Result<()> {
        self.subscription = None;

        let store = self.store.clone();
        let narration = self.narration.clone();
        let reconciler = PhaseReconciler::new(store.clone(), narration.clone());

        let guard = self.channel.events().subscribe(move |event| match event {
            ServerEvent::GmConnected(data) => {
                tracing::info!(room = %data.room_code, "GM channel connected");
                store.set_connected(true);
                store.push_notice(NoticeLevel::Success, GM_CONNECTED_MESSAGE);
            }
            ServerEvent::PhaseChanged(data) => reconciler.on_phase_changed(data.phase),
            ServerEvent::NightAction(record) => {
                store.push_night_action(record.clone());
                narration.enqueue(
                    AudioEvent::new(AnnouncementKind::NightAction, record.message.clone())
                        .with_timestamp(record.timestamp),
                );
            }
            ServerEvent::NightResult(result) => reconciler.on_night_result(result),
            // Player-facing events; not part of the GM surface.
            ServerEvent::HunterShoot(_)
            | ServerEvent::GameEnded(_)
            | ServerEvent::NightPrompt(_) => {}
        });
        self.subscription = Some(guard);

        self.channel.emit(ClientEvent::ConnectGmRoom {
            room_code: self.room_code.clone(),
            gm_room_id: self.gm_room_id.clone(),
        })
    }

    /// Request the next phase from the authoritative server.
    pub fn next_phase(&self) -> Result<()> {
        self.channel.emit(ClientEvent::NextPhase {
            room_code: self.room_code.clone(),
        })
    }

    /// Sound check: enqueue a local narration event without touching the
    /// server.
    pub fn test_sound(&self) {
        self.narration
            .enqueue(AudioEvent::new(AnnouncementKind::NightAction, TEST_SOUND_MESSAGE));
    }

    /// Drop the subscription and mark the channel disconnected.
    pub fn disconnect(&mut self) {
        self.subscription = None;
        self.store.set_connected(false);
    }
}
