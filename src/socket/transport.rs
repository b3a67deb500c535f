//! One reconnecting real-time transport and its background driver.
//!
//! A [`Transport`] is a cheap, clonable reference to shared state: the
//! connection state, the callback table and the shutdown signal of the
//! running driver. `connect` spawns the driver on the ambient tokio
//! runtime; `disconnect` signals it and bumps the session counter so a
//! driver that already moved on can no longer touch the state.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::StreamExt;
use parking_lot::{Mutex, RwLock};
use tokio::sync::oneshot;

use super::connector::{Connector, FrameStream};
use super::subscription::{Callback, Listeners};
use super::TransportOptions;
use crate::domain::{
    ConnectionState, DisconnectReason, Endpoint, SocketEvent, TransportId, TransportKind,
};
use crate::error::ManagerError;

/// Reference to one underlying transport.
#[derive(Clone)]
pub(crate) struct Transport {
    shared: Arc<Shared>,
}

struct Shared {
    id: TransportId,
    endpoint: Endpoint,
    options: TransportOptions,
    connector: Arc<dyn Connector>,
    inner: Mutex<Inner>,
    listeners: RwLock<Listeners>,
    driver_starts: AtomicU64,
}

#[derive(Default)]
struct Inner {
    state: ConnectionState,
    /// Incremented on every connect and disconnect; a driver only acts
    /// while its own session is current.
    session: u64,
    shutdown: Option<oneshot::Sender<()>>,
}

impl Transport {
    pub(crate) fn new(
        endpoint: Endpoint,
        options: TransportOptions,
        connector: Arc<dyn Connector>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                id: TransportId::new(),
                endpoint,
                options,
                connector,
                inner: Mutex::new(Inner::default()),
                listeners: RwLock::new(Listeners::new()),
                driver_starts: AtomicU64::new(0),
            }),
        }
    }

    pub(crate) fn id(&self) -> TransportId {
        self.shared.id
    }

    pub(crate) fn endpoint(&self) -> &Endpoint {
        &self.shared.endpoint
    }

    pub(crate) fn options(&self) -> &TransportOptions {
        &self.shared.options
    }

    pub(crate) fn state(&self) -> ConnectionState {
        self.shared.inner.lock().state
    }

    pub(crate) fn driver_starts(&self) -> u64 {
        self.shared.driver_starts.load(Ordering::Relaxed)
    }

    pub(crate) fn on(&self, name: String, callback: Callback) {
        let replaced = self.shared.listeners.write().insert(name.clone(), callback);
        tracing::trace!(endpoint = %self.shared.endpoint, event = %name, replaced, "listener registered");
    }

    pub(crate) fn off(&self, name: &str) {
        let removed = self.shared.listeners.write().remove(name);
        tracing::trace!(endpoint = %self.shared.endpoint, event = %name, removed, "listener removed");
    }

    pub(crate) fn has_listener(&self, name: &str) -> bool {
        self.shared.listeners.read().contains(name)
    }

    /// Starts the driver unless one is already running.
    pub(crate) fn connect(&self) {
        let mut inner = self.shared.inner.lock();
        if inner.state.is_active() {
            tracing::debug!(
                endpoint = %self.shared.endpoint,
                state = %inner.state,
                "connect ignored: transport already active"
            );
            return;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::error!(
                endpoint = %self.shared.endpoint,
                "connect ignored: no async runtime"
            );
            return;
        };

        inner.session = inner.session.wrapping_add(1);
        let session = inner.session;
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        inner.shutdown = Some(shutdown_tx);
        inner.state = ConnectionState::Connecting;
        drop(inner);

        self.shared.driver_starts.fetch_add(1, Ordering::Relaxed);
        tracing::info!(endpoint = %self.shared.endpoint, transport_id = %self.shared.id, "connecting");
        runtime.spawn(drive(Arc::clone(&self.shared), session, shutdown_rx));
    }

    /// Stops the driver, if any.
    pub(crate) fn disconnect(&self) {
        let mut inner = self.shared.inner.lock();
        if !inner.state.is_active() {
            return;
        }
        let was_connected = inner.state == ConnectionState::Connected;
        inner.state = ConnectionState::Disconnected;
        inner.session = inner.session.wrapping_add(1);
        let shutdown = inner.shutdown.take();
        drop(inner);

        if let Some(tx) = shutdown {
            let _ = tx.send(());
        }
        tracing::info!(endpoint = %self.shared.endpoint, transport_id = %self.shared.id, "disconnected");
        if was_connected {
            self.shared.dispatch(&SocketEvent::Disconnect {
                reason: DisconnectReason::ClientDisconnect,
            });
        }
    }

    pub(crate) fn same_transport(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("id", &self.shared.id)
            .field("endpoint", &self.shared.endpoint)
            .field("state", &self.state())
            .field("listeners", &*self.shared.listeners.read())
            .finish_non_exhaustive()
    }
}

impl Shared {
    fn is_current(&self, session: u64) -> bool {
        self.inner.lock().session == session
    }

    /// Moves to `state` if `session` is still current.
    fn transition(&self, session: u64, state: ConnectionState) -> bool {
        let mut inner = self.inner.lock();
        if inner.session != session {
            return false;
        }
        inner.state = state;
        if state == ConnectionState::Disconnected {
            inner.shutdown = None;
        }
        true
    }

    /// Dispatches `event` if `session` is still current.
    fn emit(&self, session: u64, event: &SocketEvent) -> bool {
        if !self.is_current(session) {
            return false;
        }
        self.dispatch(event);
        true
    }

    fn dispatch(&self, event: &SocketEvent) {
        // Clone the callback out so it runs without holding the lock.
        let callback = self.listeners.read().get(event.name());
        match callback {
            Some(callback) => callback(event),
            None => tracing::trace!(endpoint = %self.endpoint, event = %event.name(), "no listener"),
        }
    }
}

/// Why a connected stream stopped.
enum StreamEnd {
    Shutdown,
    Lost(DisconnectReason),
}

/// Background loop: open, pump frames, retry on the fixed delay until the
/// budget runs out or the session is superseded.
async fn drive(shared: Arc<Shared>, session: u64, mut shutdown: oneshot::Receiver<()>) {
    let options = &shared.options;
    let mut attempt: u32 = 0;

    loop {
        let opened = tokio::select! {
            _ = &mut shutdown => return,
            opened = open_first(&shared) => opened,
        };

        match opened {
            Ok((kind, frames)) => {
                if !shared.transition(session, ConnectionState::Connected) {
                    return;
                }
                tracing::info!(endpoint = %shared.endpoint, transport = %kind, attempt, "connected");
                if attempt > 0 && !shared.emit(session, &SocketEvent::Reconnect { attempt }) {
                    return;
                }
                if !shared.emit(session, &SocketEvent::Connect { transport: kind }) {
                    return;
                }
                attempt = 0;

                let reason = match pump(&shared, session, frames, &mut shutdown).await {
                    StreamEnd::Shutdown => return,
                    StreamEnd::Lost(reason) => reason,
                };
                tracing::warn!(endpoint = %shared.endpoint, reason = %reason, "connection lost");

                let next = if options.reconnection {
                    ConnectionState::Reconnecting
                } else {
                    ConnectionState::Disconnected
                };
                if !shared.transition(session, next) {
                    return;
                }
                if !shared.emit(session, &SocketEvent::Disconnect { reason }) {
                    return;
                }
                if !options.reconnection {
                    return;
                }
            }
            Err(e) => {
                tracing::warn!(endpoint = %shared.endpoint, attempt, error = %e, "connection attempt failed");
                if !shared.emit(session, &SocketEvent::Error { message: e.to_string() }) {
                    return;
                }
            }
        }

        if !options.should_reconnect(attempt) {
            tracing::error!(
                endpoint = %shared.endpoint,
                attempts = attempt,
                "giving up on reconnection"
            );
            if !shared.transition(session, ConnectionState::Disconnected) {
                return;
            }
            if options.reconnection {
                let _ = shared.emit(session, &SocketEvent::ReconnectFailed { attempts: attempt });
            }
            return;
        }

        attempt += 1;
        if !shared.transition(session, ConnectionState::Reconnecting) {
            return;
        }
        if !shared.emit(session, &SocketEvent::ReconnectAttempt { attempt }) {
            return;
        }
        tracing::debug!(
            endpoint = %shared.endpoint,
            attempt,
            max_attempts = options.reconnection_attempts,
            delay_ms = options.reconnection_delay_ms,
            "reconnecting"
        );
        tokio::select! {
            _ = &mut shutdown => return,
            () = tokio::time::sleep(options.reconnection_delay_duration()) => {}
        }
    }
}

/// Tries each configured transport in order, each bounded by the timeout.
async fn open_first(shared: &Shared) -> Result<(TransportKind, FrameStream), ManagerError> {
    let options = &shared.options;
    let mut last_error = ManagerError::Transport("no transports configured".to_string());

    for &kind in &options.transports {
        let open = shared.connector.open(&shared.endpoint, kind, options);
        match tokio::time::timeout(options.timeout_duration(), open).await {
            Ok(Ok(frames)) => return Ok((kind, frames)),
            Ok(Err(e)) => {
                tracing::debug!(endpoint = %shared.endpoint, transport = %kind, error = %e, "transport failed to open");
                last_error = e;
            }
            Err(_) => {
                tracing::debug!(endpoint = %shared.endpoint, transport = %kind, "transport open timed out");
                last_error = ManagerError::ConnectTimeout {
                    timeout_ms: options.timeout_ms,
                };
            }
        }
    }

    Err(last_error)
}

/// Forwards frames to listeners until the stream ends or shutdown fires.
async fn pump(
    shared: &Shared,
    session: u64,
    mut frames: FrameStream,
    shutdown: &mut oneshot::Receiver<()>,
) -> StreamEnd {
    loop {
        tokio::select! {
            _ = &mut *shutdown => return StreamEnd::Shutdown,
            frame = frames.next() => match frame {
                Some(Ok(envelope)) => {
                    let name = envelope.event.clone();
                    let Some(event) = envelope.into_event() else {
                        tracing::warn!(endpoint = %shared.endpoint, event = %name, "dropping server event with reserved name");
                        continue;
                    };
                    if !shared.emit(session, &event) {
                        return StreamEnd::Shutdown;
                    }
                }
                Some(Err(e)) => return StreamEnd::Lost(DisconnectReason::TransportError(e.to_string())),
                None => return StreamEnd::Lost(DisconnectReason::TransportClose),
            }
        }
    }
}
