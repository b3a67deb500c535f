//! Wire envelope for server-pushed events.
//!
//! Websocket text frames carry one envelope; polling responses carry a
//! JSON array of envelopes (a single object is accepted too).
//!
//! ```json
//! { "event": "messages.upsert", "data": { "instance": "main" } }
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::SocketEvent;
use crate::error::ManagerError;

/// One server-pushed event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    /// Event name.
    pub event: String,
    /// Event payload; `null` when absent.
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Batch {
    Many(Vec<WireMessage>),
    One(WireMessage),
}

impl WireMessage {
    /// Creates an envelope.
    #[must_use]
    pub fn new(event: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }

    /// Parses a single envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Serialization`] if `text` is not an envelope.
    pub fn parse(text: &str) -> Result<Self, ManagerError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parses a polling response body. An empty body is an empty batch.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Serialization`] if the body is neither an
    /// envelope nor an array of envelopes.
    pub fn parse_batch(text: &str) -> Result<Vec<Self>, ManagerError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        match serde_json::from_str::<Batch>(text)? {
            Batch::Many(messages) => Ok(messages),
            Batch::One(message) => Ok(vec![message]),
        }
    }

    /// Turns the envelope into a [`SocketEvent::Message`].
    ///
    /// Returns `None` when the name is reserved for a lifecycle event.
    #[must_use]
    pub fn into_event(self) -> Option<SocketEvent> {
        if SocketEvent::is_lifecycle_name(&self.event) {
            return None;
        }
        Some(SocketEvent::Message {
            event: self.event,
            data: self.data,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parses_envelope_without_data() {
        let Ok(msg) = WireMessage::parse(r#"{"event":"qrcode.updated"}"#) else {
            panic!("valid envelope");
        };
        assert_eq!(msg.event, "qrcode.updated");
        assert!(msg.data.is_null());
    }

    #[test]
    fn batch_accepts_array_object_and_empty() {
        let many = WireMessage::parse_batch(r#"[{"event":"a"},{"event":"b","data":1}]"#);
        assert_eq!(many.map(|m| m.len()).unwrap_or_default(), 2);

        let one = WireMessage::parse_batch(r#"{"event":"a"}"#);
        assert_eq!(one.map(|m| m.len()).unwrap_or_default(), 1);

        let empty = WireMessage::parse_batch("  ");
        assert!(empty.is_ok_and(|m| m.is_empty()));
    }

    #[test]
    fn malformed_is_an_error() {
        assert!(WireMessage::parse("{\"data\":1}").is_err());
        assert!(WireMessage::parse_batch("[1,2]").is_err());
    }

    #[test]
    fn lifecycle_names_are_not_messages() {
        assert!(WireMessage::new("connect", serde_json::Value::Null).into_event().is_none());
        let event = WireMessage::new("chats.update", serde_json::json!([1]))
            .into_event();
        assert_eq!(
            event,
            Some(SocketEvent::Message {
                event: "chats.update".to_string(),
                data: serde_json::json!([1]),
            })
        );
    }
}
