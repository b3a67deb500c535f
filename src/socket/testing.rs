//! In-memory connector for exercising transports without a network.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures_util::future::{self, BoxFuture};
use futures_util::stream;
use futures_util::{FutureExt, StreamExt};
use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::connector::{Connector, FrameStream};
use super::handle::SocketHandle;
use super::messages::WireMessage;
use super::TransportOptions;
use crate::domain::{Endpoint, SocketEvent, TransportKind};
use crate::error::ManagerError;

type Feed = mpsc::UnboundedSender<Result<WireMessage, ManagerError>>;

/// Connector whose streams are fed by the test.
#[derive(Debug, Default)]
pub(crate) struct ScriptedConnector {
    opens: AtomicUsize,
    opened: Mutex<Vec<TransportKind>>,
    refused: Mutex<HashSet<TransportKind>>,
    hanging: Mutex<HashSet<TransportKind>>,
    feeds: Mutex<Vec<Feed>>,
}

impl ScriptedConnector {
    pub(crate) fn refuse(&self, kind: TransportKind) {
        self.refused.lock().insert(kind);
    }

    pub(crate) fn hang(&self, kind: TransportKind) {
        self.hanging.lock().insert(kind);
    }

    pub(crate) fn accept_all(&self) {
        self.refused.lock().clear();
        self.hanging.lock().clear();
    }

    pub(crate) fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub(crate) fn opened_kinds(&self) -> Vec<TransportKind> {
        self.opened.lock().clone()
    }

    /// Pushes an envelope into the most recently opened stream.
    pub(crate) fn push(&self, event: &str, data: serde_json::Value) {
        if let Some(feed) = self.feeds.lock().last() {
            let _ = feed.send(Ok(WireMessage::new(event, data)));
        }
    }

    /// Fails the most recently opened stream.
    pub(crate) fn fail_latest(&self, message: &str) {
        if let Some(feed) = self.feeds.lock().pop() {
            let _ = feed.send(Err(ManagerError::Transport(message.to_string())));
        }
    }

    /// Ends the most recently opened stream as if the server closed it.
    pub(crate) fn close_latest(&self) {
        drop(self.feeds.lock().pop());
    }
}

impl Connector for ScriptedConnector {
    fn open(
        &self,
        _endpoint: &Endpoint,
        kind: TransportKind,
        _options: &TransportOptions,
    ) -> BoxFuture<'static, Result<FrameStream, ManagerError>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        self.opened.lock().push(kind);

        if self.hanging.lock().contains(&kind) {
            return future::pending().boxed();
        }
        if self.refused.lock().contains(&kind) {
            return future::ready(Err(ManagerError::Transport(format!("{kind} refused")))).boxed();
        }

        let (tx, rx) = mpsc::unbounded_channel();
        self.feeds.lock().push(tx);
        let frames = stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        })
        .boxed();
        future::ready(Ok(frames)).boxed()
    }
}

/// Registers a forwarding callback for each name and returns the receiver.
pub(crate) fn record(
    handle: &SocketHandle,
    names: &[&str],
) -> mpsc::UnboundedReceiver<SocketEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    for name in names {
        let tx = tx.clone();
        handle.on(*name, move |event: &SocketEvent| {
            let _ = tx.send(event.clone());
        });
    }
    rx
}

/// Waits for the next recorded event, or `None` after 60 (virtual) seconds.
pub(crate) async fn next_event(rx: &mut mpsc::UnboundedReceiver<SocketEvent>) -> Option<SocketEvent> {
    tokio::time::timeout(Duration::from_secs(60), rx.recv())
        .await
        .ok()
        .flatten()
}
