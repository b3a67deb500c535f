//! Domain layer: identifiers, socket events and notices.
//!
//! This module contains the value types shared by the connection registry,
//! the REST client and the failure notifier.

pub mod connection_state;
pub mod endpoint;
pub mod event_bus;
pub mod notice;
pub mod socket_event;
pub mod transport_id;

pub use connection_state::ConnectionState;
pub use endpoint::Endpoint;
pub use event_bus::NoticeBus;
pub use notice::{Notice, NoticeLevel};
pub use socket_event::{DisconnectReason, SocketEvent, TransportKind};
pub use transport_id::TransportId;
