//! Event bus for inbound room events.
//!
//! Push-based: subscribers register a callback and get every decoded
//! [`ServerEvent`]. Subscriptions are scoped - dropping the returned guard
//! removes the callback, so a reconnecting session can never end up
//! double-subscribed by re-registering without unsubscribing first.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use moonhowl_protocol::ServerEvent;

type Callback = Box<dyn FnMut(&ServerEvent) + Send>;

struct Registration {
    id: u64,
    callback: Callback,
}

/// Bus fanning inbound events out to subscribers in registration order.
#[derive(Clone)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<Registration>>>,
    next_id: Arc<AtomicU64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    fn lock(subscribers: &Mutex<Vec<Registration>>) -> MutexGuard<'_, Vec<Registration>> {
        subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a callback for every inbound event.
    ///
    /// The subscription lives exactly as long as the returned guard.
    #[must_use = "dropping the guard unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl FnMut(&ServerEvent) + Send + 'static) -> SubscriptionGuard {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        Self::lock(&self.subscribers).push(Registration {
            id,
            callback: Box::new(callback),
        });
        SubscriptionGuard {
            id,
            subscribers: Arc::downgrade(&self.subscribers),
        }
    }

    /// Deliver one event to every live subscriber, in registration order.
    pub fn dispatch(&self, event: &ServerEvent) {
        let mut subscribers = Self::lock(&self.subscribers);
        for registration in subscribers.iter_mut() {
            (registration.callback)(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        Self::lock(&self.subscribers).len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped subscription handle; unsubscribes on drop.
pub struct SubscriptionGuard {
    id: u64,
    subscribers: Weak<Mutex<Vec<Registration>>>,
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            EventBus::lock(&subscribers).retain(|r| r.id != self.id);
        }
    }
}
