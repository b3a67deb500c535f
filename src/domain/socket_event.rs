//! Lifecycle and application events emitted by a real-time transport.
//!
//! Every state change of a transport is reported as a [`SocketEvent`] to
//! the callback registered under [`SocketEvent::name`]. Application events
//! pushed by the server arrive as [`SocketEvent::Message`] and are keyed by
//! their own event name.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which kind of transport carried a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    /// Persistent websocket stream.
    Websocket,
    /// Repeated HTTP requests.
    Polling,
}

impl TransportKind {
    /// Returns the transport name as a static string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Websocket => "websocket",
            Self::Polling => "polling",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "websocket" | "ws" => Ok(Self::Websocket),
            "polling" | "poll" => Ok(Self::Polling),
            other => Err(format!("unknown transport: {other}")),
        }
    }
}

/// Why a transport stopped being connected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum DisconnectReason {
    /// The consumer called `disconnect`.
    ClientDisconnect,
    /// The server closed the stream.
    TransportClose,
    /// The stream failed.
    TransportError(String),
}

impl fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClientDisconnect => f.write_str("client disconnect"),
            Self::TransportClose => f.write_str("transport close"),
            Self::TransportError(msg) => write!(f, "transport error: {msg}"),
        }
    }
}

/// Event delivered to socket callbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum SocketEvent {
    /// Connection established.
    Connect {
        /// Transport that succeeded.
        transport: TransportKind,
    },
    /// Connection lost or closed.
    Disconnect {
        /// Why the connection ended.
        reason: DisconnectReason,
    },
    /// Connection re-established after retries.
    Reconnect {
        /// Number of retries it took.
        attempt: u32,
    },
    /// A retry is about to start.
    ReconnectAttempt {
        /// 1-based retry number.
        attempt: u32,
    },
    /// Retry budget exhausted; the transport is now disconnected.
    ReconnectFailed {
        /// Number of retries that were made.
        attempts: u32,
    },
    /// A connection attempt failed.
    Error {
        /// Failure description.
        message: String,
    },
    /// Application event pushed by the server.
    Message {
        /// Server-side event name.
        event: String,
        /// Event payload.
        data: serde_json::Value,
    },
}

/// Names of the lifecycle events. Server messages may not use them.
pub const LIFECYCLE_EVENTS: [&str; 6] = [
    SocketEvent::CONNECT,
    SocketEvent::DISCONNECT,
    SocketEvent::RECONNECT,
    SocketEvent::RECONNECT_ATTEMPT,
    SocketEvent::RECONNECT_FAILED,
    SocketEvent::ERROR,
];

impl SocketEvent {
    /// Callback name of [`SocketEvent::Connect`].
    pub const CONNECT: &'static str = "connect";
    /// Callback name of [`SocketEvent::Disconnect`].
    pub const DISCONNECT: &'static str = "disconnect";
    /// Callback name of [`SocketEvent::Reconnect`].
    pub const RECONNECT: &'static str = "reconnect";
    /// Callback name of [`SocketEvent::ReconnectAttempt`].
    pub const RECONNECT_ATTEMPT: &'static str = "reconnect_attempt";
    /// Callback name of [`SocketEvent::ReconnectFailed`].
    pub const RECONNECT_FAILED: &'static str = "reconnect_failed";
    /// Callback name of [`SocketEvent::Error`].
    pub const ERROR: &'static str = "error";

    /// Returns the name callbacks are registered under for this event.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Connect { .. } => Self::CONNECT,
            Self::Disconnect { .. } => Self::DISCONNECT,
            Self::Reconnect { .. } => Self::RECONNECT,
            Self::ReconnectAttempt { .. } => Self::RECONNECT_ATTEMPT,
            Self::ReconnectFailed { .. } => Self::RECONNECT_FAILED,
            Self::Error { .. } => Self::ERROR,
            Self::Message { event, .. } => event,
        }
    }

    /// Returns `true` if `name` belongs to a lifecycle event.
    #[must_use]
    pub fn is_lifecycle_name(name: &str) -> bool {
        LIFECYCLE_EVENTS.contains(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_names() {
        let event = SocketEvent::Connect {
            transport: TransportKind::Polling,
        };
        assert_eq!(event.name(), "connect");
        let event = SocketEvent::ReconnectAttempt { attempt: 2 };
        assert_eq!(event.name(), "reconnect_attempt");
    }

    #[test]
    fn message_uses_own_name() {
        let event = SocketEvent::Message {
            event: "messages.upsert".to_string(),
            data: serde_json::json!({"id": "1"}),
        };
        assert_eq!(event.name(), "messages.upsert");
        assert!(!SocketEvent::is_lifecycle_name(event.name()));
        assert!(SocketEvent::is_lifecycle_name("disconnect"));
    }

    #[test]
    fn disconnect_serializes_with_tag() {
        let event = SocketEvent::Disconnect {
            reason: DisconnectReason::TransportError("reset".to_string()),
        };
        let json = serde_json::to_string(&event).unwrap_or_default();
        assert!(json.contains("\"event_type\":\"disconnect\""));
        assert!(json.contains("transport_error"));
    }

    #[test]
    fn transport_kind_parses() {
        assert_eq!("WebSocket".parse::<TransportKind>(), Ok(TransportKind::Websocket));
        assert_eq!(" polling ".parse::<TransportKind>(), Ok(TransportKind::Polling));
        assert!("carrier-pigeon".parse::<TransportKind>().is_err());
    }
}
