//! Utility functions and helper modules.
//!
//! This module contains the pure helpers used across the dashboard:
//! unit conversion, icon lookup, HTML escaping, credential redaction,
//! and request inspection.

pub mod html;
pub mod http;
pub mod redact;
pub mod route;
pub mod units;

pub use html::*;
pub use http::*;
pub use redact::*;
pub use route::*;
pub use units::*;
