//! Middleware wrapped around every route.
//!
//! Request ids and access logs, security headers for the dashboard page,
//! and Prometheus request metrics.

pub mod metrics;
pub mod request_id;
pub mod security;

pub use metrics::*;
pub use request_id::*;
pub use security::*;
