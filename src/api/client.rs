//! Authenticated HTTP client for the messaging-platform API.
//!
//! Every request carries the `apikey` header. Non-success statuses are
//! mapped to [`ManagerError`]s, and every outcome is reported to the
//! optional [`FailureNotifier`].

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ManagerError;
use crate::service::FailureNotifier;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "apikey";

/// Longest response body quoted in an error message.
const MAX_ERROR_BODY: usize = 200;

/// HTTP client bound to one API base URL and key.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
    notifier: Option<FailureNotifier>,
}

impl ApiClient {
    /// Creates a client for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::InvalidEndpoint`] if `base_url` is not an
    /// absolute `http(s)` URL, or [`ManagerError::Http`] if the HTTP client
    /// cannot be built.
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ManagerError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ManagerError::InvalidEndpoint(format!("{base_url}: {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ManagerError::InvalidEndpoint(format!(
                "{base_url}: api url must be http or https"
            )));
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            api_key,
            notifier: None,
        })
    }

    /// Reports request outcomes to `notifier`.
    #[must_use]
    pub fn with_notifier(mut self, notifier: FailureNotifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Returns a copy of this client using a different API key.
    #[must_use]
    pub fn with_api_key(&self, api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..self.clone()
        }
    }

    /// Returns the API base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns `true` if an API key is configured.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Builds the URL for the given path segments. Segments are
    /// percent-encoded, so instance names may contain any character.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::InvalidEndpoint`] if the base URL cannot
    /// carry a path.
    pub fn url(&self, segments: &[&str]) -> Result<Url, ManagerError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ManagerError::InvalidEndpoint(format!("{}: cannot be a base", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<T, ManagerError> {
        self.execute(Method::GET, segments, None::<&()>).await
    }

    pub(crate) async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ManagerError> {
        self.execute(Method::POST, segments, Some(body)).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<T, ManagerError> {
        self.execute(Method::DELETE, segments, None::<&()>).await
    }

    async fn execute<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<T, ManagerError> {
        let url = self.url(segments)?;
        tracing::debug!(method = %method, url = %url, "sending request");

        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let result = self.send(request).await;

        if let Some(notifier) = &self.notifier {
            match &result {
                Ok(_) => notifier.record_success(),
                Err(e) => {
                    notifier.record_failure(e);
                }
            }
        }
        result
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ManagerError> {
        let request = match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        };
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            tracing::warn!(status = status.as_u16(), "api rejected credentials");
            return Err(ManagerError::Unauthorized);
        }
        if !status.is_success() {
            let message = error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
            tracing::warn!(status = status.as_u16(), message = %message, "api request failed");
            return Err(ManagerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = if body.trim().is_empty() { "null" } else { body.as_str() };
        Ok(serde_json::from_str(body)?)
    }
}

/// Pulls a readable message out of an error body.
///
/// Understands `{"response": {"message": ...}}`, `{"message": ...}` and
/// `{"error": ...}`, where the message may be a string or a list of
/// strings. Falls back to the (truncated) raw body.
fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    let Ok(json) = serde_json::from_str::<serde_json::Value>(trimmed) else {
        return Some(trimmed.chars().take(MAX_ERROR_BODY).collect());
    };

    let candidates = [
        json.pointer("/response/message"),
        json.get("message"),
        json.get("error"),
    ];
    candidates.into_iter().flatten().find_map(|value| match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .map(|item| match item {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => None,
    })
}
