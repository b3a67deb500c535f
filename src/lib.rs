//! # messaging-manager
//!
//! Client-side core of an administrative manager for a messaging-platform
//! API.
//!
//! The central piece is the [`socket::ConnectionRegistry`]: one live
//! real-time connection per server endpoint, shared by every view that
//! asks for it, with websocket-then-polling fallback and a bounded,
//! fixed-delay reconnect policy. Around it sit the REST client, the
//! persisted session, the translator and the one-shot failure notice.
//!
//! ## Architecture
//!
//! ```text
//! main
//!     │
//!     ├── AppState (app_state)
//!     │     │
//!     │     ├── ConnectionRegistry (socket/)
//!     │     │     └── Transport ── Connector (websocket | polling)
//!     │     ├── ApiClient (api/)
//!     │     │     └── FailureNotifier (service/) ── NoticeBus (domain/)
//!     │     ├── Session (session/) ── KeyValueStore (file | memory)
//!     │     └── Translator (i18n)
//!     │
//!     └── ManagerConfig (config, environment / .env)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod i18n;
pub mod service;
pub mod session;
pub mod socket;
