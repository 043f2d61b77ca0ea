//! In-memory event channel.
//!
//! Used by tests and local loopback: inbound events are injected with
//! [`MemoryChannel::deliver`], outbound events are captured for inspection.

use std::sync::atomic::AtomicU8;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;

use moonhowl_protocol::{ClientEvent, ServerEvent};

use crate::messaging::bus::EventBus;
use crate::messaging::channel::EventChannel;
use crate::messaging::connection::{ConnectionState, ConnectionStateObserver};

/// A channel that never leaves the process.
#[derive(Clone)]
pub struct MemoryChannel {
    bus: EventBus,
    emitted: Arc<Mutex<Vec<ClientEvent>>>,
    state: Arc<AtomicU8>,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self {
            bus: EventBus::new(),
            emitted: Arc::new(Mutex::new(Vec::new())),
            state: Arc::new(AtomicU8::new(ConnectionState::Connected.to_u8())),
        }
    }

    /// Inject an inbound event, as if it had arrived from the server.
    pub fn deliver(&self, event: ServerEvent) {
        self.bus.dispatch(&event);
    }

    /// Everything emitted so far, in emit order.
    pub fn emitted(&self) -> Vec<ClientEvent> {
        self.emitted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for MemoryChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl EventChannel for MemoryChannel {
    fn emit(&self, event: ClientEvent) -> Result<()> {
        self.emitted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
        Ok(())
    }

    fn events(&self) -> &EventBus {
        &self.bus
    }

    fn connection(&self) -> ConnectionStateObserver {
        ConnectionStateObserver::new(Arc::clone(&self.state))
    }
}
