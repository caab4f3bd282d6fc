//! Dashboard page, chat form, and background image handlers.

use crate::{
    config::ServerConfig,
    handlers::{
        app_services,
        chat::{requested_session, run_turn, session_cookie},
    },
    models::{ChatForm, DashboardQuery},
    services::{rate_limit::rate_limit_middleware, weather::WeatherError},
    views::{ActiveTab, DashboardView, PageContext, WeatherPanel, render_page},
};
use actix_web::{
    Error, HttpRequest, HttpResponse, Result,
    http::header::{self, ContentType},
    web,
};
use paperclip::actix::api_v2_operation;

/// Dashboard page
///
/// Without a city the intro banner is shown. With a city, every request
/// fetches fresh data.
#[api_v2_operation(
    summary = "Dashboard Page",
    description = "Renders the HTML dashboard. A non-empty city runs a full weather lookup; view selects the forecast or chat tab.",
    tags("Dashboard"),
    parameters(
        ("city" = Option<String>, Query, description = "City to look up"),
        ("view" = Option<String>, Query, description = "forecast (default) or chat"),
    ),
    responses(
        (status = 200, description = "HTML page", content_type = "text/html"),
        (status = 429, description = "Too Many Requests")
    )
)]
pub async fn dashboard_page(
    req: HttpRequest,
    query: web::Query<DashboardQuery>,
) -> Result<HttpResponse, Error> {
    let services = app_services(&req)?;
    let tab = ActiveTab::parse(query.view.as_deref());
    let city = query.city.as_deref().map(str::trim).filter(|c| !c.is_empty());

    let panel = match city {
        None => WeatherPanel::Intro,
        Some(city) => {
            if let Err(response) = rate_limit_middleware(&req, &services.limiter) {
                return Ok(response);
            }

            let result = services.dashboard.lookup(city).await;
            services.metrics.record_lookup(&result);

            match result {
                Ok(report) => WeatherPanel::Report(Box::new(DashboardView::from_report(&report))),
                Err(e) => WeatherPanel::LookupFailed {
                    city: city.to_string(),
                    detail: match &e {
                        WeatherError::NotFound(_) => None,
                        WeatherError::Provider(_) => Some(e.to_string()),
                    },
                },
            }
        }
    };

    let transcript = requested_session(&req)
        .map(|id| services.sessions.transcript(id))
        .unwrap_or_default();

    tracing::debug!(tab = tab.as_str(), city = ?city, "Rendering dashboard");

    let html = render_page(&PageContext {
        city,
        tab,
        panel: &panel,
        transcript: &transcript,
    });

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(html))
}

/// Chat form submission
///
/// Runs one chat turn and redirects back to the chat tab, so a reload does
/// not resubmit the message.
#[api_v2_operation(
    summary = "Chat Form Submission",
    description = "Runs one chat turn from the dashboard form and redirects to the chat tab with 303 See Other.",
    tags("Dashboard"),
    responses(
        (status = 303, description = "Redirect to /?view=chat"),
        (status = 429, description = "Too Many Requests")
    )
)]
pub async fn chat_form(req: HttpRequest, form: web::Form<ChatForm>) -> Result<HttpResponse, Error> {
    let services = app_services(&req)?;

    let mut response = HttpResponse::SeeOther();
    response.insert_header((header::LOCATION, "/?view=chat"));

    if form.message.trim().is_empty() {
        return Ok(response.finish());
    }

    if let Err(limited) = rate_limit_middleware(&req, &services.limiter) {
        return Ok(limited);
    }

    let (session_id, _, _) = run_turn(&req, services, &form.message).await;
    Ok(response.cookie(session_cookie(session_id, services)).finish())
}

/// Content type for a background image, by extension
fn image_content_type(name: &str) -> Option<&'static str> {
    let (_, extension) = name.rsplit_once('.')?;
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Plain file names only: no separators, no parent or hidden entries
fn is_safe_asset_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
}

/// Background image endpoint
#[api_v2_operation(
    summary = "Background Image",
    description = "Serves a background image from the configured assets directory.",
    tags("Dashboard"),
    responses(
        (status = 200, description = "Image bytes"),
        (status = 404, description = "Unknown image")
    )
)]
pub async fn asset(req: HttpRequest) -> Result<HttpResponse, Error> {
    let name = req.match_info().get("name").unwrap_or_default();

    let content_type = match image_content_type(name) {
        Some(content_type) if is_safe_asset_name(name) => content_type,
        _ => return Err(actix_web::error::ErrorNotFound("Asset not found")),
    };

    let assets_dir = req
        .app_data::<web::Data<ServerConfig>>()
        .map(|config| config.assets_dir.clone())
        .unwrap_or_else(|| ServerConfig::default().assets_dir);

    match tokio::fs::read(assets_dir.join(name)).await {
        Ok(bytes) => Ok(HttpResponse::Ok()
            .content_type(content_type)
            .insert_header((header::CACHE_CONTROL, "public, max-age=86400"))
            .body(bytes)),
        Err(e) => {
            tracing::debug!(asset = name, error = %e, "Asset not readable");
            Err(actix_web::error::ErrorNotFound("Asset not found"))
        }
    }
}
