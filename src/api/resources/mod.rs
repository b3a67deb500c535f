//! API calls grouped by resource. Each file adds methods to
//! [`super::ApiClient`].

pub mod chat;
pub mod configuration;
pub mod instance;
