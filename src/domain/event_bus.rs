//! Broadcast channel for user-visible notices.
//!
//! [`NoticeBus`] wraps a [`tokio::sync::broadcast`] channel. The failure
//! notifier publishes [`Notice`]s through it and every UI surface that
//! shows toasts subscribes.

use tokio::sync::broadcast;

use super::Notice;

/// Broadcast bus for [`Notice`]s.
///
/// Backed by a `tokio::broadcast` channel with a configurable capacity.
/// When the ring buffer is full, the oldest notices are dropped for
/// lagging receivers.
#[derive(Debug, Clone)]
pub struct NoticeBus {
    sender: broadcast::Sender<Notice>,
}

impl NoticeBus {
    /// Creates a new `NoticeBus` with the given channel capacity.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes a notice to all subscribers.
    ///
    /// Returns the number of receivers that got the notice. With no
    /// receivers the notice is silently dropped.
    pub fn publish(&self, notice: Notice) -> usize {
        self.sender.send(notice).unwrap_or(0)
    }

    /// Creates a new receiver for all future notices.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn publish_without_receivers_returns_zero() {
        let bus = NoticeBus::new(8);
        assert_eq!(bus.publish(Notice::error("errors.fetch", None)), 0);
    }

    #[tokio::test]
    async fn subscriber_receives_notice() {
        let bus = NoticeBus::new(8);
        let mut rx = bus.subscribe();

        bus.publish(Notice::error("errors.fetch", Some("timeout".to_string())));

        let Ok(notice) = rx.recv().await else {
            panic!("expected to receive notice");
        };
        assert_eq!(notice.key, "errors.fetch");
        assert_eq!(notice.detail.as_deref(), Some("timeout"));
    }

    #[test]
    fn receiver_count_tracks_subscribers() {
        let bus = NoticeBus::new(0);
        assert_eq!(bus.receiver_count(), 0);

        let rx1 = bus.subscribe();
        let _rx2 = bus.subscribe();
        assert_eq!(bus.receiver_count(), 2);

        drop(rx1);
        assert_eq!(bus.receiver_count(), 1);
    }
}
