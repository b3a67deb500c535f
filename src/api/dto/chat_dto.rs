//! Chat and message DTOs for the read-only chat views.

use serde::{Deserialize, Serialize};

use super::common_dto::PaginationMeta;

/// One chat as returned by `POST /chat/findChats/{name}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatDto {
    /// Server-side identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Remote JID of the chat.
    #[serde(default)]
    pub remote_jid: String,
    /// Contact or group name.
    #[serde(default)]
    pub push_name: Option<String>,
    /// Profile picture URL.
    #[serde(default)]
    pub profile_pic_url: Option<String>,
    /// Unread message count.
    #[serde(default)]
    pub unread_count: Option<u32>,
}

/// Key identifying a message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageKey {
    /// Message id.
    #[serde(default)]
    pub id: String,
    /// Chat the message belongs to.
    #[serde(default)]
    pub remote_jid: String,
    /// Whether the instance sent it.
    #[serde(default)]
    pub from_me: bool,
}

/// One stored message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    /// Message key.
    pub key: MessageKey,
    /// Sender display name.
    #[serde(default)]
    pub push_name: Option<String>,
    /// Message type (e.g. `conversation`, `imageMessage`).
    #[serde(default)]
    pub message_type: Option<String>,
    /// Raw message content.
    #[serde(default)]
    pub message: serde_json::Value,
    /// Unix timestamp in seconds.
    #[serde(default)]
    pub message_timestamp: Option<i64>,
}

impl MessageDto {
    /// Returns the plain text of a text message, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.message
            .get("conversation")
            .or_else(|| self.message.pointer("/extendedTextMessage/text"))
            .and_then(serde_json::Value::as_str)
    }
}

/// Page of messages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessagePage {
    /// Paging information.
    #[serde(flatten)]
    pub meta: PaginationMeta,
    /// Messages on this page.
    #[serde(default)]
    pub records: Vec<MessageDto>,
}

/// Response of `POST /chat/findMessages/{name}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FindMessagesResponse {
    /// The requested page.
    pub messages: MessagePage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_reads_plain_and_extended() {
        let plain = MessageDto {
            message: serde_json::json!({"conversation": "hi"}),
            ..MessageDto::default()
        };
        assert_eq!(plain.text(), Some("hi"));

        let extended = MessageDto {
            message: serde_json::json!({"extendedTextMessage": {"text": "link"}}),
            ..MessageDto::default()
        };
        assert_eq!(extended.text(), Some("link"));

        assert_eq!(MessageDto::default().text(), None);
    }

    #[test]
    fn message_page_flattens_meta() {
        let response: FindMessagesResponse = serde_json::from_str(
            r#"{"messages":{"total":1,"pages":1,"currentPage":1,"records":[{"key":{"id":"A","remoteJid":"1@s","fromMe":true}}]}}"#,
        )
        .unwrap_or_default();
        assert_eq!(response.messages.meta.total, 1);
        assert_eq!(response.messages.records.len(), 1);
        assert!(response.messages.records.iter().all(|m| m.key.from_me));
    }
}
