//! WebSocket event channel using tokio-tungstenite.
//!
//! Carries one JSON [`EventEnvelope`] per text frame. Inbound frames are
//! decoded and dispatched on the bus from a read task; outbound events go
//! through a bounded queue drained by a write task. An unexpected close
//! triggers reconnection with exponential backoff; subscriptions on the bus
//! survive the reconnect, in-flight state does not.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use moonhowl_protocol::{ClientEvent, EventEnvelope, ServerEvent};

use crate::messaging::bus::EventBus;
use crate::messaging::channel::EventChannel;
use crate::messaging::connection::{
    set_connection_state, ConnectionState, ConnectionStateObserver,
};

const MAX_RETRY_ATTEMPTS: u32 = 10;
const INITIAL_RETRY_DELAY_MS: u64 = 500;
const MAX_RETRY_DELAY_MS: u64 = 30_000;
const OUTBOUND_QUEUE_CAPACITY: usize = 32;

/// Exponential backoff schedule for reconnection attempts.
struct BackoffState {
    attempts: u32,
    delay_ms: u64,
}

impl Default for BackoffState {
    fn default() -> Self {
        Self {
            attempts: 0,
            delay_ms: INITIAL_RETRY_DELAY_MS,
        }
    }
}

impl BackoffState {
    fn attempts(&self) -> u32 {
        self.attempts
    }

    /// The delay to wait before the next attempt, or `None` once the retry
    /// budget is spent.
    fn next_delay_and_advance(&mut self) -> Option<u64> {
        if self.attempts >= MAX_RETRY_ATTEMPTS {
            return None;
        }
        self.attempts += 1;
        let delay = self.delay_ms;
        self.delay_ms = (self.delay_ms * 2).min(MAX_RETRY_DELAY_MS);
        Some(delay)
    }
}

/// WebSocket-backed [`EventChannel`].
pub struct SocketChannel {
    url: String,
    bus: EventBus,
    state: Arc<AtomicU8>,
    tx: Arc<Mutex<Option<mpsc::Sender<ClientEvent>>>>,
    /// Tracks whether a disconnect was requested (vs an unexpected close).
    intentional_disconnect: Arc<AtomicBool>,
}

impl SocketChannel {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            bus: EventBus::new(),
            state: Arc::new(AtomicU8::new(ConnectionState::Disconnected.to_u8())),
            tx: Arc::new(Mutex::new(None)),
            intentional_disconnect: Arc::new(AtomicBool::new(false)),
        }
    }

    fn set_state(&self, new_state: ConnectionState) {
        set_connection_state(&self.state, new_state);
    }

    fn set_sender(&self, sender: Option<mpsc::Sender<ClientEvent>>) {
        *self.tx.lock().unwrap_or_else(PoisonError::into_inner) = sender;
    }

    /// Internal connect logic - returns whether the connection closed
    /// unexpectedly.
    async fn connect_internal(&self) -> Result<bool> {
        self.set_state(ConnectionState::Connecting);

        let (ws_stream, _) = match connect_async(&self.url).await {
            Ok(ok) => ok,
            Err(e) => {
                tracing::error!("Failed to connect to room server: {}", e);
                self.set_state(ConnectionState::Failed);
                return Err(e.into());
            }
        };
        tracing::info!("Connected to room server at {}", self.url);
        self.set_state(ConnectionState::Connected);

        let (mut write, mut read) = ws_stream.split();

        let (tx, mut rx) = mpsc::channel::<ClientEvent>(OUTBOUND_QUEUE_CAPACITY);
        self.set_sender(Some(tx));

        let bus = self.bus.clone();
        let intentional_disconnect = Arc::clone(&self.intentional_disconnect);

        let read_handle = tokio::spawn(async move {
            let mut unexpected_close = false;
            while let Some(msg) = read.next().await {
                match msg {
                    Ok(Message::Text(text)) => dispatch_frame(&bus, &text),
                    Ok(Message::Close(_)) => {
                        tracing::info!("Server closed connection");
                        unexpected_close = !intentional_disconnect.load(Ordering::SeqCst);
                        break;
                    }
                    Ok(Message::Ping(_)) => {}
                    Err(e) => {
                        tracing::error!("WebSocket error: {}", e);
                        unexpected_close = true;
                        break;
                    }
                    _ => {}
                }
            }
            unexpected_close
        });

        let write_handle = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let text = match event.to_envelope().encode() {
                    Ok(t) => t,
                    Err(e) => {
                        tracing::error!("Failed to encode outbound event: {}", e);
                        continue;
                    }
                };
                if let Err(e) = write.send(Message::Text(text)).await {
                    tracing::error!("Failed to send event: {}", e);
                    break;
                }
            }
        });

        let unexpected_close = tokio::select! {
            result = read_handle => result.unwrap_or(false),
            _ = write_handle => true,
        };

        self.set_sender(None);
        self.set_state(ConnectionState::Disconnected);
        Ok(unexpected_close)
    }

    async fn reconnect_with_backoff(&self) {
        let mut backoff = BackoffState::default();

        loop {
            self.set_state(ConnectionState::Reconnecting);
            let Some(delay) = backoff.next_delay_and_advance() else {
                tracing::error!("Max reconnection attempts reached, giving up");
                self.set_state(ConnectionState::Failed);
                return;
            };
            tracing::info!(
                "Reconnection attempt {} of {}, waiting {}ms",
                backoff.attempts(),
                MAX_RETRY_ATTEMPTS,
                delay
            );
            tokio::time::sleep(Duration::from_millis(delay)).await;

            if self.intentional_disconnect.load(Ordering::SeqCst) {
                tracing::info!("Reconnection cancelled - intentional disconnect");
                self.set_state(ConnectionState::Disconnected);
                return;
            }

            match self.connect_internal().await {
                Ok(unexpected_close) => {
                    if unexpected_close && !self.intentional_disconnect.load(Ordering::SeqCst) {
                        continue;
                    }
                    return;
                }
                Err(e) => {
                    tracing::warn!("Reconnection attempt {} failed: {}", backoff.attempts(), e);
                }
            }
        }
    }

    /// Connect and service the channel until it closes for good.
    ///
    /// Reconnects with backoff after an unexpected close. Bus subscriptions
    /// survive reconnects; queued outbound events and any live prompt do not
    /// (the server re-issues prompts after its own handshake).
    pub async fn connect(&self) -> Result<()> {
        self.intentional_disconnect.store(false, Ordering::SeqCst);

        let unexpected_close = self.connect_internal().await?;
        if unexpected_close && !self.intentional_disconnect.load(Ordering::SeqCst) {
            tracing::info!("Connection closed unexpectedly, initiating reconnection");
            self.reconnect_with_backoff().await;
        }
        Ok(())
    }

    /// Close the connection and stop any reconnection attempts.
    pub fn disconnect(&self) {
        self.intentional_disconnect.store(true, Ordering::SeqCst);
        self.set_sender(None);
        self.set_state(ConnectionState::Disconnected);
    }
}

/// Decode one inbound frame and fan it out. Decode failures and unknown
/// event names are logged and dropped; the stream keeps flowing.
fn dispatch_frame(bus: &EventBus, text: &str) {
    let envelope = match EventEnvelope::decode(text) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!("Dropping malformed frame: {}", e);
            return;
        }
    };
    match ServerEvent::from_envelope(&envelope) {
        Ok(Some(event)) => bus.dispatch(&event),
        Ok(None) => tracing::debug!("Ignoring unhandled event {}", envelope.event),
        Err(e) => tracing::warn!("Dropping undecodable event {}: {}", envelope.event, e),
    }
}

impl EventChannel for SocketChannel {
    fn emit(&self, event: ClientEvent) -> Result<()> {
        let tx = self
            .tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let Some(tx) = tx else {
            anyhow::bail!("Not connected");
        };
        // Best-effort: a full queue drops the event, matching the wire
        // contract's lack of an acknowledgement protocol.
        tx.try_send(event)
            .map_err(|e| anyhow::anyhow!("Outbound queue unavailable: {e}"))
    }

    fn events(&self) -> &EventBus {
        &self.bus
    }

    fn connection(&self) -> ConnectionStateObserver {
        ConnectionStateObserver::new(Arc::clone(&self.state))
    }
}
