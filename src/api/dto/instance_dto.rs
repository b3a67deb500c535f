//! Instance DTOs: listing, creation, QR connection and state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Integration backing an instance.
pub const DEFAULT_INTEGRATION: &str = "WHATSAPP-BAILEYS";

/// One instance as returned by `GET /instance/fetchInstances`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceDto {
    /// Server-side identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Unique instance name.
    pub name: String,
    /// `open`, `connecting` or `close`.
    #[serde(default)]
    pub connection_status: Option<String>,
    /// Account JID once paired.
    #[serde(default)]
    pub owner_jid: Option<String>,
    /// Profile display name.
    #[serde(default)]
    pub profile_name: Option<String>,
    /// Profile picture URL.
    #[serde(default)]
    pub profile_pic_url: Option<String>,
    /// Integration type.
    #[serde(default)]
    pub integration: Option<String>,
    /// Phone number.
    #[serde(default)]
    pub number: Option<String>,
    /// Instance-scoped API token.
    #[serde(default)]
    pub token: Option<String>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl InstanceDto {
    /// Returns `true` if the instance reports an open connection.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.connection_status.as_deref() == Some("open")
    }
}

/// Request body for `POST /instance/create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstanceRequest {
    /// Unique instance name.
    pub instance_name: String,
    /// Optional fixed instance token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Optional phone number for pairing-code login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    /// Whether to return a QR code right away.
    pub qrcode: bool,
    /// Integration type.
    pub integration: String,
}

impl CreateInstanceRequest {
    /// Creates a request with the default integration and QR code enabled.
    #[must_use]
    pub fn new(instance_name: impl Into<String>) -> Self {
        Self {
            instance_name: instance_name.into(),
            token: None,
            number: None,
            qrcode: true,
            integration: DEFAULT_INTEGRATION.to_string(),
        }
    }
}

/// Summary of the created instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedInstance {
    /// Instance name.
    pub instance_name: String,
    /// Server-side identifier.
    #[serde(default)]
    pub instance_id: Option<String>,
    /// Initial status.
    #[serde(default)]
    pub status: Option<String>,
}

/// Response body for `POST /instance/create`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateInstanceResponse {
    /// The created instance.
    pub instance: CreatedInstance,
    /// Instance token (string or `{"apikey": ...}` depending on version).
    #[serde(default)]
    pub hash: serde_json::Value,
    /// QR code, if requested.
    #[serde(default)]
    pub qrcode: Option<QrCodeDto>,
}

/// Response of `GET /instance/connect/{name}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeDto {
    /// Pairing code for phone-number login.
    #[serde(default)]
    pub pairing_code: Option<String>,
    /// Raw QR payload.
    #[serde(default)]
    pub code: Option<String>,
    /// QR image as a data URL.
    #[serde(default)]
    pub base64: Option<String>,
    /// How many QR codes were generated so far.
    #[serde(default)]
    pub count: Option<u32>,
}

/// Inner part of [`ConnectionStateResponse`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceState {
    /// Instance name.
    pub instance_name: String,
    /// `open`, `connecting` or `close`.
    pub state: String,
}

/// Response of `GET /instance/connectionState/{name}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionStateResponse {
    /// Instance and its state.
    pub instance: InstanceState,
}
