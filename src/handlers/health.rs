//! Health check endpoint handler.

use crate::{handlers::app_services, models::HealthResponse};
use actix_web::{Error, HttpRequest, Result, web};
use paperclip::actix::api_v2_operation;

/// Health check endpoint
///
/// Does not call any provider, so it stays cheap for probes.
#[api_v2_operation(
    summary = "Health Check Endpoint",
    description = "Returns the current health status of the service and the number of live chat sessions.",
    tags("Health"),
    responses(
        (status = 200, description = "Successful response", body = HealthResponse)
    )
)]
pub async fn health(req: HttpRequest) -> Result<web::Json<HealthResponse>, Error> {
    let services = app_services(&req)?;

    Ok(web::Json(HealthResponse {
        status: "healthy".to_string(),
        active_sessions: services.sessions.active_sessions(),
    }))
}
