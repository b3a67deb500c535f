//! Consumer-facing wrapper around a registry transport.

use std::sync::Arc;

use super::TransportOptions;
use super::transport::Transport;
use crate::domain::{ConnectionState, Endpoint, SocketEvent, TransportId};

/// Uniform on / off / connect / disconnect interface handed out by
/// [`super::ConnectionRegistry::acquire`].
///
/// Handles are cheap to clone. Every handle acquired for the same endpoint
/// (without an intervening release) drives the same transport, so a
/// callback registered through one handle replaces a callback of the same
/// name registered through another.
#[derive(Debug, Clone)]
pub struct SocketHandle {
    transport: Transport,
}

impl SocketHandle {
    pub(crate) fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub(crate) fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Registers `callback` for `event`, replacing any callback already
    /// registered under that name.
    ///
    /// Lifecycle names are the constants on [`SocketEvent`]; any other name
    /// matches server-pushed [`SocketEvent::Message`]s. Callbacks run on the
    /// driver task and must not block.
    pub fn on<F>(&self, event: impl Into<String>, callback: F)
    where
        F: Fn(&SocketEvent) + Send + Sync + 'static,
    {
        self.transport.on(event.into(), Arc::new(callback));
    }

    /// Removes the callback for `event`. No-op if none is registered.
    pub fn off(&self, event: &str) {
        self.transport.off(event);
    }

    /// Returns `true` if a callback is registered for `event`.
    #[must_use]
    pub fn has_listener(&self, event: &str) -> bool {
        self.transport.has_listener(event)
    }

    /// Starts connecting in the background. Does nothing while the
    /// transport is connecting, connected or reconnecting.
    ///
    /// Must be called from within a tokio runtime; otherwise the call is
    /// logged and ignored.
    pub fn connect(&self) {
        self.transport.connect();
    }

    /// Closes the transport and stops any pending reconnection. Idempotent.
    pub fn disconnect(&self) {
        self.transport.disconnect();
    }

    /// Returns the current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.transport.state()
    }

    /// Returns `true` while the stream is open.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Returns the endpoint this handle was acquired for.
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        self.transport.endpoint()
    }

    /// Returns the identity of the underlying transport.
    #[must_use]
    pub fn id(&self) -> TransportId {
        self.transport.id()
    }

    /// Returns the options the transport was created with.
    #[must_use]
    pub fn options(&self) -> &TransportOptions {
        self.transport.options()
    }

    /// Returns how many times a connection driver was started.
    #[must_use]
    pub fn connection_starts(&self) -> u64 {
        self.transport.driver_starts()
    }

    /// Returns `true` if both handles drive the same transport.
    #[must_use]
    pub fn shares_transport_with(&self, other: &Self) -> bool {
        self.transport.same_transport(&other.transport)
    }
}
