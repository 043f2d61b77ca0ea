//! The narration queue.
//!
//! Accepts announcement events from any source and plays their message on
//! the single audio channel, strictly one at a time, in arrival order, with
//! a fixed settle delay between items and no overlap. Synthesis failures
//! advance the queue exactly like success - narration never deadlocks on a
//! single bad message.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::Notify;

use moonhowl_domain::AudioEvent;

use crate::narration::speech::{SpeechSettings, SpeechSynthesizer};

/// Pause after each item before the next one may start.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);

struct QueueInner {
    queue: Mutex<VecDeque<AudioEvent>>,
    current: Mutex<Option<AudioEvent>>,
    /// Exclusive in-flight flag; the sole guard on the audio device.
    playing: AtomicBool,
    wakeup: Notify,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    settings: SpeechSettings,
    settle: Duration,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Ordered, exclusive-access audio announcement scheduler.
///
/// Cheap to clone; all clones feed the same queue. The playback driver is a
/// task spawned at construction, so a tokio runtime must be running.
///
/// "Current" is an eager preview for display: it moves to a newly enqueued
/// event the instant it is appended, before playback reaches it. This keeps
/// the moderator display showing the newest announcement while older ones
/// are still being spoken.
#[derive(Clone)]
pub struct NarrationQueue {
    inner: Arc<QueueInner>,
}

impl NarrationQueue {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        Self::with_settings(synthesizer, SpeechSettings::default(), DEFAULT_SETTLE_DELAY)
    }

    pub fn with_settings(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        settings: SpeechSettings,
        settle: Duration,
    ) -> Self {
        let inner = Arc::new(QueueInner {
            queue: Mutex::new(VecDeque::new()),
            current: Mutex::new(None),
            playing: AtomicBool::new(false),
            wakeup: Notify::new(),
            synthesizer,
            settings,
            settle,
        });

        let driver = Arc::clone(&inner);
        tokio::spawn(async move {
            loop {
                driver.wakeup.notified().await;
                Self::drain(&driver).await;
            }
        });

        Self { inner }
    }

    /// Append an event to the tail of the queue. Always succeeds.
    ///
    /// Also marks the event as "current" immediately (display-only preview,
    /// not a playback guarantee - see the type-level docs).
    pub fn enqueue(&self, event: AudioEvent) {
        *lock(&self.inner.current) = Some(event.clone());
        lock(&self.inner.queue).push_back(event);
        self.inner.wakeup.notify_one();
    }

    /// Clear the "current" pointer for display. Best-effort: does not cancel
    /// in-flight audio hardware playback.
    pub fn stop(&self) {
        *lock(&self.inner.current) = None;
    }

    /// The event shown as current for display purposes.
    pub fn current(&self) -> Option<AudioEvent> {
        lock(&self.inner.current).clone()
    }

    /// Snapshot of events not yet played, head first.
    pub fn pending(&self) -> Vec<AudioEvent> {
        lock(&self.inner.queue).iter().cloned().collect()
    }

    pub fn is_playing(&self) -> bool {
        self.inner.playing.load(Ordering::SeqCst)
    }

    /// True when nothing is in flight and nothing is queued.
    pub fn is_idle(&self) -> bool {
        !self.is_playing() && lock(&self.inner.queue).is_empty()
    }

    /// Play queued events until the queue is empty.
    ///
    /// A re-entrant call while playback is in flight is a no-op; the flag
    /// makes the audio device single-flight.
    async fn drain(inner: &Arc<QueueInner>) {
        loop {
            if inner.playing.swap(true, Ordering::SeqCst) {
                return;
            }
            let head = lock(&inner.queue).front().cloned();
            let Some(event) = head else {
                inner.playing.store(false, Ordering::SeqCst);
                return;
            };

            if let Err(e) = inner.synthesizer.speak(&event.message, &inner.settings).await {
                // Failure and success advance the queue identically.
                tracing::warn!("Narration failed for \"{}\": {}", event.message, e);
            }
            tokio::time::sleep(inner.settle).await;

            {
                let mut queue = lock(&inner.queue);
                queue.pop_front();
                *lock(&inner.current) = queue.front().cloned();
            }
            inner.playing.store(false, Ordering::SeqCst);
        }
    }
}
