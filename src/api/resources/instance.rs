//! Instance lifecycle calls: list, create, connect, restart, logout, delete.

use crate::api::client::ApiClient;
use crate::api::dto::{
    ConnectionStateResponse, CreateInstanceRequest, CreateInstanceResponse, InstanceDto,
    QrCodeDto, ServerInfo, StatusResponse,
};
use crate::error::ManagerError;

impl ApiClient {
    /// `GET /`: identifies the server; used to verify credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] on transport failure or a non-success status.
    pub async fn server_info(&self) -> Result<ServerInfo, ManagerError> {
        self.get(&[]).await
    }

    /// `GET /instance/fetchInstances`: all instances visible to the key.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] on transport failure or a non-success status.
    pub async fn fetch_instances(&self) -> Result<Vec<InstanceDto>, ManagerError> {
        self.get(&["instance", "fetchInstances"]).await
    }

    /// `POST /instance/create`: creates an instance.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Validation`] for an empty name without
    /// calling the API, otherwise as [`ApiClient::fetch_instances`].
    pub async fn create_instance(
        &self,
        request: &CreateInstanceRequest,
    ) -> Result<CreateInstanceResponse, ManagerError> {
        if request.instance_name.trim().is_empty() {
            return Err(ManagerError::Validation(
                "instance name must not be empty".to_string(),
            ));
        }
        tracing::info!(instance = %request.instance_name, "creating instance");
        self.post(&["instance", "create"], request).await
    }

    /// `GET /instance/connect/{name}`: requests a QR / pairing code.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] on transport failure or a non-success status.
    pub async fn connect_instance(&self, instance: &str) -> Result<QrCodeDto, ManagerError> {
        self.get(&["instance", "connect", instance]).await
    }

    /// `POST /instance/restart/{name}`.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] on transport failure or a non-success status.
    pub async fn restart_instance(&self, instance: &str) -> Result<serde_json::Value, ManagerError> {
        self.post(&["instance", "restart", instance], &serde_json::json!({}))
            .await
    }

    /// `DELETE /instance/logout/{name}`: unpairs the account.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] on transport failure or a non-success status.
    pub async fn logout_instance(&self, instance: &str) -> Result<StatusResponse, ManagerError> {
        tracing::info!(instance, "logging out instance");
        self.delete(&["instance", "logout", instance]).await
    }

    /// `DELETE /instance/delete/{name}`.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] on transport failure or a non-success status.
    pub async fn delete_instance(&self, instance: &str) -> Result<StatusResponse, ManagerError> {
        tracing::info!(instance, "deleting instance");
        self.delete(&["instance", "delete", instance]).await
    }

    /// `GET /instance/connectionState/{name}`.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] on transport failure or a non-success status.
    pub async fn connection_state(
        &self,
        instance: &str,
    ) -> Result<ConnectionStateResponse, ManagerError> {
        self.get(&["instance", "connectionState", instance]).await
    }
}
