//! Service layer: cross-cutting behaviour shared by the API client and UI.
//!
//! [`FailureNotifier`] turns runs of failed requests into one notice on
//! the [`super::domain::NoticeBus`].

pub mod failure_notice;

pub use failure_notice::{FailureNotifier, REQUEST_FAILED_KEY};
