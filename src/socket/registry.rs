//! Process-wide registry of real-time transports, one per endpoint.
//!
//! [`ConnectionRegistry`] is constructed once at startup, shared through
//! [`crate::app_state::AppState`], and torn down with
//! [`ConnectionRegistry::release_all`]. None of its operations fail:
//! unknown handles and already-closed transports are no-ops.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::connector::{Connector, NetworkConnector};
use super::handle::SocketHandle;
use super::transport::Transport;
use super::TransportOptions;
use crate::domain::{Endpoint, TransportId};

/// Central store of transports keyed by endpoint.
///
/// # Concurrency
///
/// Lookups take a read lock; creation and removal take the write lock.
/// Transports are disconnected after the lock is released, so callbacks
/// fired by a disconnect may call back into the registry.
#[derive(Debug)]
pub struct ConnectionRegistry {
    options: TransportOptions,
    connector: Arc<dyn Connector>,
    entries: RwLock<HashMap<Endpoint, Transport>>,
}

impl ConnectionRegistry {
    /// Creates an empty registry whose transports use `options` and open
    /// through `connector`.
    #[must_use]
    pub fn new(options: TransportOptions, connector: Arc<dyn Connector>) -> Self {
        Self {
            options,
            connector,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the options applied to new transports.
    #[must_use]
    pub fn options(&self) -> &TransportOptions {
        &self.options
    }

    /// Returns a handle bound to the transport for `endpoint`, creating a
    /// disconnected transport on first use.
    pub fn acquire(&self, endpoint: impl Into<Endpoint>) -> SocketHandle {
        let endpoint = endpoint.into();
        if let Some(transport) = self.entries.read().get(&endpoint) {
            return SocketHandle::new(transport.clone());
        }

        let mut map = self.entries.write();
        let transport = map.entry(endpoint.clone()).or_insert_with(|| {
            let transport = Transport::new(
                endpoint.clone(),
                self.options.clone(),
                Arc::clone(&self.connector),
            );
            tracing::info!(endpoint = %endpoint, transport_id = %transport.id(), "transport created");
            transport
        });
        SocketHandle::new(transport.clone())
    }

    /// Returns a handle for `endpoint` only if a transport already exists.
    #[must_use]
    pub fn get(&self, endpoint: &Endpoint) -> Option<SocketHandle> {
        self.entries
            .read()
            .get(endpoint)
            .map(|transport| SocketHandle::new(transport.clone()))
    }

    /// Disconnects and removes the transport behind `handle`.
    ///
    /// Returns `false` (and changes nothing) if the transport is no longer
    /// registered.
    pub fn release(&self, handle: &SocketHandle) -> bool {
        let removed = {
            let mut map = self.entries.write();
            let key = map
                .iter()
                .find(|(_, transport)| transport.same_transport(handle.transport()))
                .map(|(endpoint, _)| endpoint.clone());
            key.and_then(|endpoint| map.remove(&endpoint))
        };
        self.finish_release(removed, handle.id())
    }

    /// Disconnects and removes the transport with the given id.
    ///
    /// Returns `false` (and changes nothing) if no such transport exists.
    pub fn release_id(&self, id: TransportId) -> bool {
        let removed = {
            let mut map = self.entries.write();
            let key = map
                .iter()
                .find(|(_, transport)| transport.id() == id)
                .map(|(endpoint, _)| endpoint.clone());
            key.and_then(|endpoint| map.remove(&endpoint))
        };
        self.finish_release(removed, id)
    }

    fn finish_release(&self, removed: Option<Transport>, id: TransportId) -> bool {
        match removed {
            Some(transport) => {
                transport.disconnect();
                tracing::info!(endpoint = %transport.endpoint(), transport_id = %id, "transport released");
                true
            }
            None => {
                tracing::debug!(transport_id = %id, "release ignored: unknown transport");
                false
            }
        }
    }

    /// Disconnects every transport and empties the registry. Returns how
    /// many transports were released.
    pub fn release_all(&self) -> usize {
        let drained: Vec<Transport> = self.entries.write().drain().map(|(_, t)| t).collect();
        for transport in &drained {
            transport.disconnect();
        }
        if !drained.is_empty() {
            tracing::info!(count = drained.len(), "all transports released");
        }
        drained.len()
    }

    /// Returns `true` if a transport exists for `endpoint`.
    #[must_use]
    pub fn contains(&self, endpoint: &Endpoint) -> bool {
        self.entries.read().contains_key(endpoint)
    }

    /// Returns the registered endpoints, sorted.
    #[must_use]
    pub fn endpoints(&self) -> Vec<Endpoint> {
        let mut endpoints: Vec<Endpoint> = self.entries.read().keys().cloned().collect();
        endpoints.sort();
        endpoints
    }

    /// Returns the number of registered transports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if no transport is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new(
            TransportOptions::default(),
            Arc::new(NetworkConnector::default()),
        )
    }
}

impl Drop for ConnectionRegistry {
    fn drop(&mut self) {
        // Drivers hold their own references; stop them with the registry.
        for transport in self.entries.get_mut().values() {
            transport.disconnect();
        }
    }
}
