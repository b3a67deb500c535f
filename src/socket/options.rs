//! Transport configuration: reconnect policy, timeout and transport order.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::TransportKind;

/// Settings applied to every transport a registry creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportOptions {
    /// Whether lost or failed connections are retried.
    #[serde(default = "default_reconnection")]
    pub reconnection: bool,

    /// Maximum number of retries before giving up.
    #[serde(default = "default_reconnection_attempts")]
    pub reconnection_attempts: u32,

    /// Fixed delay between retries in milliseconds.
    #[serde(default = "default_reconnection_delay_ms")]
    pub reconnection_delay_ms: u64,

    /// Upper bound for opening one transport, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Transports to try, in order.
    #[serde(default = "default_transports")]
    pub transports: Vec<TransportKind>,

    /// Pause between two polling requests, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_reconnection() -> bool {
    true
}

fn default_reconnection_attempts() -> u32 {
    5
}

fn default_reconnection_delay_ms() -> u64 {
    1_000
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_transports() -> Vec<TransportKind> {
    vec![TransportKind::Websocket, TransportKind::Polling]
}

fn default_poll_interval_ms() -> u64 {
    1_000
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            reconnection: default_reconnection(),
            reconnection_attempts: default_reconnection_attempts(),
            reconnection_delay_ms: default_reconnection_delay_ms(),
            timeout_ms: default_timeout_ms(),
            transports: default_transports(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl TransportOptions {
    /// Sets whether reconnection is enabled.
    #[must_use]
    pub fn reconnection(mut self, enabled: bool) -> Self {
        self.reconnection = enabled;
        self
    }

    /// Sets the maximum number of retries.
    #[must_use]
    pub fn reconnection_attempts(mut self, attempts: u32) -> Self {
        self.reconnection_attempts = attempts;
        self
    }

    /// Sets the delay between retries.
    #[must_use]
    pub fn reconnection_delay(mut self, delay: Duration) -> Self {
        self.reconnection_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the timeout for opening a transport.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the transport order.
    #[must_use]
    pub fn transports(mut self, transports: Vec<TransportKind>) -> Self {
        self.transports = transports;
        self
    }

    /// Sets the pause between polling requests.
    #[must_use]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Returns the retry delay as a Duration.
    #[must_use]
    pub fn reconnection_delay_duration(&self) -> Duration {
        Duration::from_millis(self.reconnection_delay_ms)
    }

    /// Returns the open timeout as a Duration.
    #[must_use]
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Returns the polling pause as a Duration.
    #[must_use]
    pub fn poll_interval_duration(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Returns whether retry number `attempt + 1` may run, given that
    /// `attempt` retries already happened.
    #[must_use]
    pub fn should_reconnect(&self, attempt: u32) -> bool {
        self.reconnection && attempt < self.reconnection_attempts
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reconnect_policy() {
        let options = TransportOptions::default();
        assert!(options.reconnection);
        assert_eq!(options.reconnection_attempts, 5);
        assert_eq!(options.reconnection_delay_duration(), Duration::from_secs(1));
        assert_eq!(options.timeout_duration(), Duration::from_secs(20));
        assert_eq!(
            options.transports,
            vec![TransportKind::Websocket, TransportKind::Polling]
        );
    }

    #[test]
    fn retry_budget_is_bounded() {
        let options = TransportOptions::default();
        assert!(options.should_reconnect(0));
        assert!(options.should_reconnect(4));
        assert!(!options.should_reconnect(5));
    }

    #[test]
    fn disabled_reconnection_never_retries() {
        let options = TransportOptions::default().reconnection(false);
        assert!(!options.should_reconnect(0));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let parsed: Result<TransportOptions, _> =
            serde_json::from_str(r#"{"reconnection_attempts": 2}"#);
        let Ok(options) = parsed else {
            panic!("valid json");
        };
        assert_eq!(options.reconnection_attempts, 2);
        assert_eq!(options.timeout_ms, 20_000);
    }
}
