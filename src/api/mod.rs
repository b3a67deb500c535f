//! REST client layer: HTTP client, DTOs and per-resource calls.
//!
//! All calls go through [`ApiClient`], which adds the `apikey` header,
//! maps error statuses and feeds the failure notifier.

pub mod client;
pub mod dto;
pub mod resources;

pub use client::{API_KEY_HEADER, ApiClient};
