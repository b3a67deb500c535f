//! Data Transfer Objects for the messaging-platform REST API.
//!
//! Field names follow the API's camelCase JSON. Unknown fields are
//! ignored so that newer server versions keep deserializing.

pub mod chat_dto;
pub mod common_dto;
pub mod config_dto;
pub mod instance_dto;

pub use chat_dto::*;
pub use common_dto::*;
pub use config_dto::*;
pub use instance_dto::*;
