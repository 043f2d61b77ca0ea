//! The event channel port.

use anyhow::Result;

use moonhowl_protocol::ClientEvent;

use crate::messaging::bus::EventBus;
use crate::messaging::connection::ConnectionStateObserver;

/// A bidirectional, named-event transport.
///
/// Inbound events are fanned out through [`events`](Self::events); outbound
/// events are best-effort - `emit` hands the event to the transport and
/// returns, with no acknowledgement and no retry. The transport gives
/// at-least-once delivery with no ordering across event names, so consumers
/// must stay correct under duplicates and reordering.
pub trait EventChannel: Send + Sync {
    /// Send one event to the server. Best-effort: a saturated or closed
    /// transport drops the event and reports the error, nothing retries.
    fn emit(&self, event: ClientEvent) -> Result<()>;

    /// The bus carrying decoded inbound events.
    fn events(&self) -> &EventBus;

    /// Observer for the channel's connection state.
    fn connection(&self) -> ConnectionStateObserver;
}
