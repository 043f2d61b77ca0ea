//! Event channel plumbing: bus, connection lifecycle, and transports.

pub mod bus;
pub mod channel;
pub mod connection;
pub mod memory;
pub mod socket;

pub use bus::{EventBus, SubscriptionGuard};
pub use channel::EventChannel;
pub use connection::{ConnectionState, ConnectionStateObserver};
pub use memory::MemoryChannel;
pub use socket::SocketChannel;
