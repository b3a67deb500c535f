//! Manager configuration loaded from environment variables.
//!
//! All settings come from environment variables (or a `.env` file via
//! `dotenvy`). Missing or unparsable values fall back to defaults; only an
//! `API_URL` that is set but is not a URL is an error.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

use crate::domain::TransportKind;
use crate::error::ManagerError;
use crate::i18n::DEFAULT_LANGUAGE;
use crate::socket::TransportOptions;

/// Top-level manager configuration.
///
/// Loaded once at startup via [`ManagerConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Base URL of the messaging-platform API (also the real-time
    /// endpoint).
    pub api_url: String,

    /// API key sent in the `apikey` header, if known ahead of login.
    pub api_key: Option<String>,

    /// File backing the session store. `None` keeps the session in memory.
    pub session_file: Option<PathBuf>,

    /// Language used when the session has none.
    pub default_language: String,

    /// Directory of extra `<lang>.json` catalogs.
    pub locales_dir: Option<PathBuf>,

    /// Options applied to every real-time transport.
    pub socket: TransportOptions,

    /// Timeout of a single REST request, in seconds.
    pub http_timeout_secs: u64,

    /// Consecutive request failures before the failure notice is shown.
    pub failure_notice_threshold: u32,

    /// Capacity of the notice broadcast channel.
    pub notice_bus_capacity: usize,
}

impl ManagerConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Config`] if `API_URL` is set but cannot be
    /// parsed as a URL.
    pub fn from_env() -> Result<Self, ManagerError> {
        dotenvy::dotenv().ok();

        let api_url =
            std::env::var("API_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
        Url::parse(&api_url).map_err(|e| ManagerError::Config(format!("API_URL {api_url}: {e}")))?;

        let api_key = non_empty_env("API_KEY");
        let session_file = non_empty_env("SESSION_FILE").map(PathBuf::from);
        let default_language =
            non_empty_env("DEFAULT_LANGUAGE").unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        let locales_dir = non_empty_env("LOCALES_DIR").map(PathBuf::from);

        let defaults = TransportOptions::default();
        let socket = TransportOptions {
            reconnection: parse_env_bool("SOCKET_RECONNECT_ENABLED", defaults.reconnection),
            reconnection_attempts: parse_env(
                "SOCKET_RECONNECT_ATTEMPTS",
                defaults.reconnection_attempts,
            ),
            reconnection_delay_ms: parse_env(
                "SOCKET_RECONNECT_DELAY_MS",
                defaults.reconnection_delay_ms,
            ),
            timeout_ms: parse_env("SOCKET_TIMEOUT_MS", defaults.timeout_ms),
            transports: non_empty_env("SOCKET_TRANSPORTS")
                .and_then(|raw| parse_transports(&raw))
                .unwrap_or(defaults.transports),
            poll_interval_ms: parse_env("SOCKET_POLL_INTERVAL_MS", defaults.poll_interval_ms),
        };

        let http_timeout_secs = parse_env("HTTP_TIMEOUT_SECS", 30);
        let failure_notice_threshold = parse_env("FAILURE_NOTICE_THRESHOLD", 3);
        let notice_bus_capacity = parse_env("NOTICE_BUS_CAPACITY", 256);

        Ok(Self {
            api_url,
            api_key,
            session_file,
            default_language,
            locales_dir,
            socket,
            http_timeout_secs,
            failure_notice_threshold,
            notice_bus_capacity,
        })
    }

    /// Returns the REST request timeout.
    #[must_use]
    pub const fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".to_string(),
            api_key: None,
            session_file: None,
            default_language: DEFAULT_LANGUAGE.to_string(),
            locales_dir: None,
            socket: TransportOptions::default(),
            http_timeout_secs: 30,
            failure_notice_threshold: 3,
            notice_bus_capacity: 256,
        }
    }
}

/// Parses a comma-separated transport list (`"websocket,polling"`).
/// Unknown names are skipped; returns `None` if nothing usable remains.
fn parse_transports(raw: &str) -> Option<Vec<TransportKind>> {
    let kinds: Vec<TransportKind> = raw
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter_map(|name| match name.parse() {
            Ok(kind) => Some(kind),
            Err(_) => {
                tracing::warn!(transport = name, "ignoring unknown transport");
                None
            }
        })
        .collect();
    (!kinds.is_empty()).then_some(kinds)
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().as_deref() {
        Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => true,
        Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_list_parses_in_order() {
        assert_eq!(
            parse_transports("polling, websocket"),
            Some(vec![TransportKind::Polling, TransportKind::Websocket])
        );
    }

    #[test]
    fn transport_list_skips_unknown_names() {
        assert_eq!(
            parse_transports("carrier-pigeon,websocket"),
            Some(vec![TransportKind::Websocket])
        );
        assert_eq!(parse_transports("carrier-pigeon"), None);
        assert_eq!(parse_transports(" , "), None);
    }

    #[test]
    fn defaults_match_transport_policy() {
        let config = ManagerConfig::default();
        assert!(config.socket.reconnection);
        assert_eq!(config.socket.reconnection_attempts, 5);
        assert_eq!(config.socket.reconnection_delay_ms, 1000);
        assert_eq!(config.socket.timeout_ms, 20_000);
        assert_eq!(config.failure_notice_threshold, 3);
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
    }
}
