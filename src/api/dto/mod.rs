//! Data Transfer Objects for REST request/response serialization.
//!
//! Chat envelopes themselves are served as [`crate::domain::ChatMessage`].

pub mod history_dto;
pub mod system_dto;

pub use history_dto::*;
pub use system_dto::*;
