//! Data models shared across the service.
//!
//! Weather readings as delivered by the provider, the chat conversation
//! types, and the request/response bodies of the HTTP endpoints.

pub mod api;
pub mod chat;
pub mod weather;

pub use api::*;
pub use chat::*;
pub use weather::*;
