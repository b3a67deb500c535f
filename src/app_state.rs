//! Shared application state, constructed once at startup.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::api::dto::ServerInfo;
use crate::config::ManagerConfig;
use crate::domain::NoticeBus;
use crate::error::ManagerError;
use crate::i18n::Translator;
use crate::service::FailureNotifier;
use crate::session::{FileStore, KeyValueStore, MemoryStore, Session};
use crate::socket::{ConnectionRegistry, NetworkConnector, SocketHandle};

/// Everything the manager's views share: the connection registry, the
/// REST client, the session and the translator.
///
/// Cloning is cheap; clones share the registry and the notice bus.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Configuration the state was built from.
    pub config: Arc<ManagerConfig>,
    /// Real-time connection registry.
    pub registry: Arc<ConnectionRegistry>,
    /// REST client for the configured API.
    pub api: ApiClient,
    /// Persisted session and preferences.
    pub session: Session,
    /// Translation catalogs.
    pub translator: Arc<Translator>,
    /// Bus carrying user-visible notices.
    pub notices: NoticeBus,
    /// Failure counter shared by every API client built from this state.
    pub failures: FailureNotifier,
}

impl AppState {
    /// Builds the state from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] if the API URL is unusable, the session
    /// file cannot be opened, or a locale catalog is malformed.
    pub fn build(config: ManagerConfig) -> Result<Self, ManagerError> {
        let notices = NoticeBus::new(config.notice_bus_capacity);
        let failures = FailureNotifier::new(config.failure_notice_threshold, notices.clone());

        let api = ApiClient::new(&config.api_url, config.api_key.clone(), config.http_timeout())?
            .with_notifier(failures.clone());

        let store: Arc<dyn KeyValueStore> = match &config.session_file {
            Some(path) => Arc::new(FileStore::open(path)?),
            None => Arc::new(MemoryStore::new()),
        };
        let session = Session::new(store);

        let mut translator = Translator::with_builtin(config.default_language.clone())?;
        if let Some(dir) = &config.locales_dir {
            let loaded = translator.load_dir(dir)?;
            tracing::info!(dir = %dir.display(), loaded, "locale catalogs loaded");
        }

        let registry = Arc::new(ConnectionRegistry::new(
            config.socket.clone(),
            Arc::new(NetworkConnector::default()),
        ));

        Ok(Self {
            config: Arc::new(config),
            registry,
            api,
            session,
            translator: Arc::new(translator),
            notices,
            failures,
        })
    }

    /// Verifies `api_key` against `api_url` and stores the session.
    ///
    /// On success the returned state talks to the new API with the new
    /// key; `self` is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Unauthorized`] for a rejected key, or any
    /// other error from the request or the session store.
    pub async fn login(
        &self,
        api_url: &str,
        api_key: &str,
    ) -> Result<(Self, ServerInfo), ManagerError> {
        let same_server = reqwest::Url::parse(api_url).is_ok_and(|url| &url == self.api.base_url());
        let api = if same_server {
            self.api.with_api_key(api_key)
        } else {
            ApiClient::new(api_url, Some(api_key.to_string()), self.config.http_timeout())?
                .with_notifier(self.failures.clone())
        };
        let info = api.server_info().await?;
        self.session.login(api_url, api_key, &info)?;
        Ok((Self { api, ..self.clone() }, info))
    }

    /// Clears the stored credentials and closes every real-time connection.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] if the session store cannot persist the
    /// change.
    pub fn logout(&self) -> Result<(), ManagerError> {
        self.registry.release_all();
        self.session.logout()
    }

    /// Returns the current display language: the session's choice or the
    /// configured default.
    #[must_use]
    pub fn language(&self) -> String {
        self.session
            .language()
            .unwrap_or_else(|| self.config.default_language.clone())
    }

    /// Translates `key` into the current language.
    #[must_use]
    pub fn t(&self, key: &str) -> String {
        self.translator.translate(&self.language(), key)
    }

    /// Returns the real-time socket for the API this state talks to.
    #[must_use]
    pub fn socket(&self) -> SocketHandle {
        self.registry.acquire(self.api.base_url().as_str())
    }

    /// Closes every real-time connection. Returns how many were open.
    pub fn shutdown(&self) -> usize {
        let released = self.registry.release_all();
        tracing::info!(released, "connection registry released");
        released
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn state() -> AppState {
        let Ok(state) = AppState::build(ManagerConfig::default()) else {
            panic!("default config builds");
        };
        state
    }

    #[test]
    fn socket_is_shared_per_api_url() {
        let state = state();
        let a = state.socket();
        let b = state.clone().socket();
        assert!(a.shares_transport_with(&b));
        assert_eq!(state.registry.len(), 1);

        assert_eq!(state.shutdown(), 1);
        assert!(state.registry.is_empty());
    }

    #[test]
    fn language_falls_back_to_config() {
        let state = state();
        assert_eq!(state.language(), "en-US");
        assert!(state.session.set_language("pt-BR").is_ok());
        assert_eq!(state.language(), "pt-BR");
        assert_eq!(state.t("login.message.invalidServer"), "Servidor inválido");
    }

    #[tokio::test]
    async fn login_to_unusable_url_leaves_session_untouched() {
        let state = state();
        let result = state.login("not a url", "key").await;
        assert!(matches!(result, Err(ManagerError::InvalidEndpoint(_))));
        assert!(!state.session.is_authenticated());
    }

    #[test]
    fn invalid_api_url_fails_to_build() {
        let config = ManagerConfig {
            api_url: "not a url".to_string(),
            ..ManagerConfig::default()
        };
        assert!(matches!(
            AppState::build(config),
            Err(ManagerError::InvalidEndpoint(_))
        ));
    }
}
