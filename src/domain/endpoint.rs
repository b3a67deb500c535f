//! Endpoint keys for the connection registry.
//!
//! An [`Endpoint`] is the exact URL string a consumer asked for. Registry
//! lookups compare the raw string; the scheme mapping to a websocket or
//! polling URL only happens when a transport is opened.

use std::fmt;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::ManagerError;

/// URL string identifying a remote real-time server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Endpoint(String);

impl Endpoint {
    /// Wraps a URL string. No validation happens here.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Returns the endpoint key as given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the URL to open a websocket against: `http` becomes `ws`,
    /// `https` becomes `wss`.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::InvalidEndpoint`] if the string is not a URL
    /// or uses a scheme other than `ws`, `wss`, `http` or `https`.
    pub fn websocket_url(&self) -> Result<Url, ManagerError> {
        self.with_scheme(|scheme| match scheme {
            "ws" | "http" => Some("ws"),
            "wss" | "https" => Some("wss"),
            _ => None,
        })
    }

    /// Returns the URL to poll over plain HTTP: `ws` becomes `http`,
    /// `wss` becomes `https`.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::InvalidEndpoint`] under the same conditions as
    /// [`Endpoint::websocket_url`].
    pub fn polling_url(&self) -> Result<Url, ManagerError> {
        self.with_scheme(|scheme| match scheme {
            "ws" | "http" => Some("http"),
            "wss" | "https" => Some("https"),
            _ => None,
        })
    }

    fn with_scheme(
        &self,
        map: impl FnOnce(&str) -> Option<&'static str>,
    ) -> Result<Url, ManagerError> {
        let mut url = Url::parse(&self.0)
            .map_err(|e| ManagerError::InvalidEndpoint(format!("{}: {e}", self.0)))?;
        let Some(target) = map(url.scheme()) else {
            return Err(ManagerError::InvalidEndpoint(format!(
                "{}: unsupported scheme {}",
                self.0,
                url.scheme()
            )));
        };
        if url.scheme() != target && url.set_scheme(target).is_err() {
            return Err(ManagerError::InvalidEndpoint(format!(
                "{}: cannot switch scheme to {target}",
                self.0
            )));
        }
        Ok(url)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Endpoint {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

impl From<String> for Endpoint {
    fn from(url: String) -> Self {
        Self(url)
    }
}
