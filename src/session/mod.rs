//! Session state kept in local storage, and the route guard built on it.
//!
//! [`Session`] stores the API URL and token obtained at login together
//! with UI preferences (language, theme). [`Session::is_authenticated`] is
//! the check every protected view runs before rendering.

pub mod store;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use store::{FileStore, KeyValueStore, MemoryStore};

use crate::api::dto::ServerInfo;
use crate::error::ManagerError;

const TOKEN_KEY: &str = "token";
const API_URL_KEY: &str = "apiUrl";
const VERSION_KEY: &str = "version";
const CLIENT_NAME_KEY: &str = "clientName";
const LANGUAGE_KEY: &str = "i18nextLng";
const THEME_KEY: &str = "theme";

/// Colour scheme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light scheme.
    Light,
    /// Dark scheme.
    Dark,
    /// Follow the operating system.
    #[default]
    System,
}

impl Theme {
    /// Returns the stored form of the theme.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

/// Session and preference accessors over a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct Session {
    store: Arc<dyn KeyValueStore>,
}

impl Session {
    /// Wraps a store.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Records a successful login.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] if the store cannot persist the values.
    pub fn login(&self, api_url: &str, token: &str, info: &ServerInfo) -> Result<(), ManagerError> {
        self.store.set(API_URL_KEY, api_url)?;
        self.store.set(TOKEN_KEY, token)?;
        match &info.version {
            Some(version) => self.store.set(VERSION_KEY, version)?,
            None => self.store.remove(VERSION_KEY)?,
        }
        match &info.client_name {
            Some(name) => self.store.set(CLIENT_NAME_KEY, name)?,
            None => self.store.remove(CLIENT_NAME_KEY)?,
        }
        tracing::info!(api_url, "session started");
        Ok(())
    }

    /// Forgets the credentials. Preferences are kept.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] if the store cannot persist the change.
    pub fn logout(&self) -> Result<(), ManagerError> {
        for key in [TOKEN_KEY, API_URL_KEY, VERSION_KEY, CLIENT_NAME_KEY] {
            self.store.remove(key)?;
        }
        tracing::info!("session cleared");
        Ok(())
    }

    /// Route guard: `true` iff both a token and an API URL are stored.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        let present = |key| self.store.get(key).is_some_and(|v| !v.is_empty());
        present(TOKEN_KEY) && present(API_URL_KEY)
    }

    /// Returns the stored API token.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY)
    }

    /// Returns the stored API URL.
    #[must_use]
    pub fn api_url(&self) -> Option<String> {
        self.store.get(API_URL_KEY)
    }

    /// Returns the server version recorded at login.
    #[must_use]
    pub fn server_version(&self) -> Option<String> {
        self.store.get(VERSION_KEY)
    }

    /// Returns the selected language tag.
    #[must_use]
    pub fn language(&self) -> Option<String> {
        self.store.get(LANGUAGE_KEY)
    }

    /// Stores the selected language tag.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] if the store cannot persist the value.
    pub fn set_language(&self, language: &str) -> Result<(), ManagerError> {
        self.store.set(LANGUAGE_KEY, language)
    }

    /// Returns the theme preference; unknown stored values read as
    /// [`Theme::System`].
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.store
            .get(THEME_KEY)
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    /// Stores the theme preference.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError`] if the store cannot persist the value.
    pub fn set_theme(&self, theme: Theme) -> Result<(), ManagerError> {
        self.store.set(THEME_KEY, theme.as_str())
    }
}
