//! Real-time connection layer: registry, transports, wire envelope.
//!
//! The [`ConnectionRegistry`] keeps at most one transport per endpoint.
//! Each transport reconnects on its own (fixed delay, bounded attempts,
//! websocket first and polling as fallback) and reports everything that
//! happens to it as [`crate::domain::SocketEvent`]s; nothing is returned
//! to the caller as an error.
//!
//! # Example
//!
//! ```ignore
//! use messaging_manager::domain::SocketEvent;
//! use messaging_manager::socket::ConnectionRegistry;
//!
//! let registry = ConnectionRegistry::default();
//! let socket = registry.acquire("wss://api.example.com");
//! socket.on(SocketEvent::CONNECT, |event| tracing::info!(?event, "up"));
//! socket.on("messages.upsert", |event| tracing::info!(?event, "message"));
//! socket.connect();
//! // ...
//! registry.release_all();
//! ```

pub mod connector;
pub mod handle;
pub mod messages;
pub mod options;
pub mod registry;
pub mod subscription;
mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use connector::{Connector, FrameStream, NetworkConnector};
pub use handle::SocketHandle;
pub use messages::WireMessage;
pub use options::TransportOptions;
pub use registry::ConnectionRegistry;
pub use subscription::{Callback, Listeners};
