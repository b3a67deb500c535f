//! Shared DTO types used across multiple endpoints.

use serde::{Deserialize, Serialize};

/// Response of `GET /`: identifies the API server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    /// HTTP-style status echoed in the body.
    #[serde(default)]
    pub status: Option<u16>,
    /// Welcome message.
    #[serde(default)]
    pub message: Option<String>,
    /// Server version.
    #[serde(default)]
    pub version: Option<String>,
    /// Client name configured on the server.
    #[serde(default)]
    pub client_name: Option<String>,
}

/// Page request for list endpoints. Pages are 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Page number (1-indexed). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (max 100). Defaults to 20.
    #[serde(default = "default_per_page", rename = "offset")]
    pub per_page: u32,
}

/// Pagination metadata returned by list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Total number of items.
    #[serde(default)]
    pub total: u32,
    /// Total number of pages.
    #[serde(default)]
    pub pages: u32,
    /// Current page number.
    #[serde(default)]
    pub current_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PaginationParams {
    /// Clamps `page` to at least 1 and `per_page` to 1..=100.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, 100),
        }
    }
}

/// Generic acknowledgement body (`{"status": "SUCCESS", ...}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Status string.
    #[serde(default)]
    pub status: Option<String>,
    /// Whether the server reported an error.
    #[serde(default)]
    pub error: Option<bool>,
    /// Free-form response payload.
    #[serde(default)]
    pub response: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_pagination() {
        let params = PaginationParams {
            page: 0,
            per_page: 500,
        }
        .clamped();
        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, 100);
    }

    #[test]
    fn server_info_reads_camel_case() {
        let info: ServerInfo = serde_json::from_str(
            r#"{"status":200,"message":"Welcome","version":"2.1.0","clientName":"main"}"#,
        )
        .unwrap_or_default();
        assert_eq!(info.version.as_deref(), Some("2.1.0"));
        assert_eq!(info.client_name.as_deref(), Some("main"));
    }
}
