//! Per-instance configuration calls: webhook, proxy and settings.

use crate::api::client::ApiClient;
use crate::api::dto::{InstanceSettings, ProxyConfig, SetWebhookRequest, WebhookConfig};
use crate::error::ManagerError;

impl ApiClient {
    /// `POST /webhook/set/{name}`.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Validation`] if an enabled webhook has
    /// no absolute URL, otherwise on transport failure or a non-success
    /// status.
    pub async fn set_webhook(
        &self,
        instance: &str,
        webhook: &WebhookConfig,
    ) -> Result<serde_json::Value, ManagerError> {
        if webhook.enabled && reqwest::Url::parse(&webhook.url).is_err() {
            return Err(ManagerError::Validation(format!(
                "invalid webhook url: {}",
                webhook.url
            )));
        }
        self.post(&["webhook", "set", instance], &SetWebhookRequest { webhook })
            .await
    }

    /// `GET /webhook/find/{name}`. `None` when nothing is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] on transport failure or a non-success status.
    pub async fn find_webhook(&self, instance: &str) -> Result<Option<WebhookConfig>, ManagerError> {
        self.get(&["webhook", "find", instance]).await
    }

    /// `POST /proxy/set/{name}`.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Validation`] if the proxy is incomplete,
    /// otherwise on transport failure or a non-success status.
    pub async fn set_proxy(
        &self,
        instance: &str,
        proxy: &ProxyConfig,
    ) -> Result<serde_json::Value, ManagerError> {
        proxy.validate().map_err(ManagerError::Validation)?;
        self.post(&["proxy", "set", instance], proxy).await
    }

    /// `GET /proxy/find/{name}`. `None` when nothing is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] on transport failure or a non-success status.
    pub async fn find_proxy(&self, instance: &str) -> Result<Option<ProxyConfig>, ManagerError> {
        self.get(&["proxy", "find", instance]).await
    }

    /// `POST /settings/set/{name}`.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] on transport failure or a non-success status.
    pub async fn set_settings(
        &self,
        instance: &str,
        settings: &InstanceSettings,
    ) -> Result<serde_json::Value, ManagerError> {
        self.post(&["settings", "set", instance], settings).await
    }

    /// `GET /settings/find/{name}`.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] on transport failure or a non-success status.
    pub async fn find_settings(&self, instance: &str) -> Result<InstanceSettings, ManagerError> {
        self.get(&["settings", "find", instance]).await
    }
}
