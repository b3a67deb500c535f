//! Per-instance configuration DTOs: webhook, proxy and behaviour settings.

use serde::{Deserialize, Serialize};

/// Webhook configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookConfig {
    /// Whether events are delivered.
    #[serde(default)]
    pub enabled: bool,
    /// Target URL.
    #[serde(default)]
    pub url: String,
    /// Events to deliver (e.g. `MESSAGES_UPSERT`).
    #[serde(default)]
    pub events: Vec<String>,
    /// Append the event name to the URL path.
    #[serde(default)]
    pub by_events: bool,
    /// Send media inline as base64.
    #[serde(default)]
    pub base64: bool,
}

/// Request body for `POST /webhook/set/{name}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetWebhookRequest<'a> {
    /// Configuration to store.
    pub webhook: &'a WebhookConfig,
}

/// Outbound proxy protocol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyProtocol {
    /// Plain HTTP proxy.
    #[default]
    Http,
    /// HTTPS proxy.
    Https,
    /// SOCKS4.
    Socks4,
    /// SOCKS5.
    Socks5,
}

/// Proxy configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Whether traffic goes through the proxy.
    #[serde(default)]
    pub enabled: bool,
    /// Proxy host.
    #[serde(default)]
    pub host: String,
    /// Proxy port, as the API stores it (string).
    #[serde(default)]
    pub port: String,
    /// Proxy protocol.
    #[serde(default)]
    pub protocol: ProxyProtocol,
    /// Optional user name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Optional password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl ProxyConfig {
    /// Checks the fields the API would otherwise reject.
    ///
    /// # Errors
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }
        if self.host.trim().is_empty() {
            return Err("proxy host is required".to_string());
        }
        match self.port.parse::<u16>() {
            Ok(0) | Err(_) => Err(format!("invalid proxy port: {}", self.port)),
            Ok(_) => Ok(()),
        }
    }
}

/// Instance behaviour settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceSettings {
    /// Reject incoming calls.
    #[serde(default)]
    pub reject_call: bool,
    /// Message sent when a call is rejected.
    #[serde(default)]
    pub msg_call: String,
    /// Ignore group messages.
    #[serde(default)]
    pub groups_ignore: bool,
    /// Keep presence online.
    #[serde(default)]
    pub always_online: bool,
    /// Mark messages as read.
    #[serde(default)]
    pub read_messages: bool,
    /// Mark status updates as read.
    #[serde(default)]
    pub read_status: bool,
    /// Sync the full history on pairing.
    #[serde(default)]
    pub sync_full_history: bool,
}
