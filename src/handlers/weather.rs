//! Weather endpoint handler.

use crate::{
    handlers::app_services,
    models::WeatherQuery,
    services::{rate_limit::rate_limit_middleware, weather::WeatherError},
    views::DashboardView,
};
use actix_web::{Error, HttpRequest, HttpResponse, Result, web};
use paperclip::actix::api_v2_operation;

/// Map a failed current-conditions lookup onto an HTTP error
pub(crate) fn weather_error_response(error: &WeatherError) -> Error {
    match error {
        WeatherError::NotFound(_) => actix_web::error::ErrorNotFound(error.to_string()),
        WeatherError::Provider(_) => actix_web::error::ErrorBadGateway(error.to_string()),
    }
}

/// Weather endpoint
///
/// Runs the same lookup as the dashboard's "Get Weather" button and
/// returns the display-ready report as JSON.
#[api_v2_operation(
    summary = "Weather Report Endpoint",
    description = "Fetches current conditions for a city, generates an AI summary, and fetches the 5-day/3-hour forecast. Returns formatted metrics, the daily forecast grid, chart series, and map data. A failed forecast or an invalid map coordinate is reported inside the response instead of failing the request.",
    tags("Weather"),
    parameters(
        ("city" = String, Query, description = "City name (e.g., Paris)"),
    ),
    responses(
        (status = 200, description = "Successful response", body = DashboardView),
        (status = 400, description = "Bad Request - Missing or empty city"),
        (status = 404, description = "City not found"),
        (status = 429, description = "Too Many Requests"),
        (status = 502, description = "Weather provider error")
    )
)]
pub async fn weather(
    req: HttpRequest,
    query: web::Query<WeatherQuery>,
) -> Result<HttpResponse, Error> {
    let services = app_services(&req)?;

    let Some(city) = query.city.as_deref().map(str::trim).filter(|c| !c.is_empty()) else {
        return Err(actix_web::error::ErrorBadRequest("City cannot be empty"));
    };

    if let Err(response) = rate_limit_middleware(&req, &services.limiter) {
        return Ok(response);
    }

    let result = services.dashboard.lookup(city).await;
    services.metrics.record_lookup(&result);

    match result {
        Ok(report) => Ok(HttpResponse::Ok().json(DashboardView::from_report(&report))),
        Err(e) => {
            tracing::info!(city, outcome = e.outcome(), "Weather lookup rejected");
            Err(weather_error_response(&e))
        }
    }
}
