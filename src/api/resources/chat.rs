//! Read-only chat data: chats of an instance and messages of a chat.

use crate::api::client::ApiClient;
use crate::api::dto::{ChatDto, FindMessagesResponse, PaginationParams};
use crate::error::ManagerError;

impl ApiClient {
    /// `POST /chat/findChats/{name}`.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] on transport failure or a non-success status.
    pub async fn find_chats(&self, instance: &str) -> Result<Vec<ChatDto>, ManagerError> {
        self.post(
            &["chat", "findChats", instance],
            &serde_json::json!({ "where": {} }),
        )
        .await
    }

    /// `POST /chat/findMessages/{name}`: one page of a chat's messages.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] on transport failure or a non-success status.
    pub async fn find_messages(
        &self,
        instance: &str,
        remote_jid: &str,
        page: PaginationParams,
    ) -> Result<FindMessagesResponse, ManagerError> {
        let page = page.clamped();
        let body = serde_json::json!({
            "where": { "key": { "remoteJid": remote_jid } },
            "page": page.page,
            "offset": page.per_page,
        });
        self.post(&["chat", "findMessages", instance], &body).await
    }
}
