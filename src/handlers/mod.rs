//! HTTP request handlers.
//!
//! The dashboard page and its chat form, the JSON weather and chat API,
//! and the service endpoints (health, version, metrics).

pub mod chat;
pub mod dashboard;
pub mod health;
pub mod metrics;
pub mod openapi;
pub mod version;
pub mod weather;

pub use chat::*;
pub use dashboard::*;
pub use health::*;
pub use metrics::*;
pub use openapi::*;
pub use version::*;
pub use weather::*;

use crate::services::AppServices;
use actix_web::{Error, HttpRequest, web};

/// Shared services registered on the app
pub(crate) fn app_services(req: &HttpRequest) -> Result<&AppServices, Error> {
    req.app_data::<web::Data<AppServices>>()
        .map(|data| data.get_ref())
        .ok_or_else(|| actix_web::error::ErrorServiceUnavailable("Services not configured"))
}
