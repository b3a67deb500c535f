//! One-shot notice for repeated request failures.
//!
//! [`FailureNotifier`] counts consecutive failed requests. When the count
//! reaches the threshold it publishes a single [`Notice`] on the
//! [`NoticeBus`]; further failures stay silent until the notice is
//! dismissed. A successful request resets the counter but leaves an
//! outstanding notice in place.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::{Notice, NoticeBus};
use crate::error::ManagerError;

/// Translation key of the notice published on repeated failures.
pub const REQUEST_FAILED_KEY: &str = "toast.requestFailed";

#[derive(Debug, Default)]
struct FailureState {
    consecutive: u32,
    outstanding: bool,
}

/// Shared failure counter. Clones observe the same state.
#[derive(Debug, Clone)]
pub struct FailureNotifier {
    threshold: u32,
    bus: NoticeBus,
    state: Arc<Mutex<FailureState>>,
}

impl FailureNotifier {
    /// Creates a notifier that publishes on `bus` after `threshold`
    /// consecutive failures. A threshold of zero is treated as one.
    #[must_use]
    pub fn new(threshold: u32, bus: NoticeBus) -> Self {
        Self {
            threshold: threshold.max(1),
            bus,
            state: Arc::new(Mutex::new(FailureState::default())),
        }
    }

    /// Records a failed request. Returns `true` if this failure raised the
    /// notice.
    pub fn record_failure(&self, error: &ManagerError) -> bool {
        let raise = {
            let mut state = self.state.lock();
            state.consecutive = state.consecutive.saturating_add(1);
            let raise = !state.outstanding && state.consecutive >= self.threshold;
            if raise {
                state.outstanding = true;
            }
            raise
        };

        if raise {
            tracing::warn!(code = error.error_code(), error = %error, "raising request failure notice");
            self.bus
                .publish(Notice::error(REQUEST_FAILED_KEY, Some(error.to_string())));
        } else {
            tracing::debug!(code = error.error_code(), error = %error, "request failed");
        }
        raise
    }

    /// Records a successful request.
    pub fn record_success(&self) {
        self.state.lock().consecutive = 0;
    }

    /// Marks the outstanding notice as seen so the next run of failures
    /// may raise a new one.
    pub fn dismiss(&self) {
        let mut state = self.state.lock();
        state.outstanding = false;
        state.consecutive = 0;
    }

    /// Returns `true` while a raised notice has not been dismissed.
    #[must_use]
    pub fn is_outstanding(&self) -> bool {
        self.state.lock().outstanding
    }

    /// Returns the current number of consecutive failures.
    #[must_use]
    pub fn consecutive_failures(&self) -> u32 {
        self.state.lock().consecutive
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn failure() -> ManagerError {
        ManagerError::Transport("refused".to_string())
    }

    #[test]
    fn raises_once_at_threshold() {
        let bus = NoticeBus::new(8);
        let mut rx = bus.subscribe();
        let notifier = FailureNotifier::new(3, bus);

        assert!(!notifier.record_failure(&failure()));
        assert!(!notifier.record_failure(&failure()));
        assert!(notifier.record_failure(&failure()));
        assert!(!notifier.record_failure(&failure()));
        assert!(!notifier.record_failure(&failure()));

        let Ok(notice) = rx.try_recv() else {
            panic!("expected a notice");
        };
        assert_eq!(notice.key, REQUEST_FAILED_KEY);
        assert!(rx.try_recv().is_err());
        assert!(notifier.is_outstanding());
    }

    #[test]
    fn success_resets_counter() {
        let notifier = FailureNotifier::new(2, NoticeBus::new(8));
        assert!(!notifier.record_failure(&failure()));
        notifier.record_success();
        assert_eq!(notifier.consecutive_failures(), 0);
        assert!(!notifier.record_failure(&failure()));
        assert!(notifier.record_failure(&failure()));
    }

    #[test]
    fn success_does_not_clear_outstanding_notice() {
        let notifier = FailureNotifier::new(1, NoticeBus::new(8));
        assert!(notifier.record_failure(&failure()));
        notifier.record_success();
        assert!(notifier.is_outstanding());
        assert!(!notifier.record_failure(&failure()));
    }

    #[test]
    fn dismiss_rearms() {
        let notifier = FailureNotifier::new(1, NoticeBus::new(8));
        assert!(notifier.record_failure(&failure()));
        notifier.dismiss();
        assert!(!notifier.is_outstanding());
        assert!(notifier.record_failure(&failure()));
    }

    #[test]
    fn clones_share_state() {
        let notifier = FailureNotifier::new(2, NoticeBus::new(8));
        let clone = notifier.clone();
        assert!(!notifier.record_failure(&failure()));
        assert!(clone.record_failure(&failure()));
        assert!(notifier.is_outstanding());
    }
}
