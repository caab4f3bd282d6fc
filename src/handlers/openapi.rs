//! OpenAPI specification generation and app factory.

use crate::{
    config::AppConfig,
    handlers::{
        asset, chat, chat_form, chat_history, dashboard_page, get_metrics, health, version,
        weather,
    },
    middleware::{MetricsMiddleware, RequestIdMiddleware, SecurityHeaders},
    services::AppServices,
};
use actix_web::App;
use paperclip::actix::{OpenApiExt, web};
use paperclip::v2::models::{DefaultApiRaw, Info};

/// Creates the OpenAPI specification served at `/api/spec/v2`
pub fn create_openapi_spec() -> DefaultApiRaw {
    DefaultApiRaw {
        info: Info {
            title: "Weather Chat Dashboard".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            description: Some(
                "A weather dashboard with an AI summary and a weather chatbot.\n\n\
                ## Weather lookups\n\
                `GET /api/weather?city=` fetches current conditions and the 5-day/3-hour forecast \
                from OpenWeatherMap and summarizes them with the configured text generation provider \
                (`cohere`, `openai`, or the offline `mock`). Each lookup makes fresh provider calls; \
                nothing is cached.\n\
                \n\
                ## Chat\n\
                `POST /api/chat` answers one message. A message containing a capitalized run of words \
                (e.g. `Tell me about Paris`) is answered with a weather summary for the last such run; \
                other messages are answered by the text generation provider.\n\
                \n\
                **Sessions:** the conversation is kept per browser session, identified by the \
                `wx_session` cookie, and discarded once the session has been idle for \
                `SESSION_TTL_SECONDS`.\n\
                \n\
                ## Rate limiting\n\
                Endpoints that call providers are limited per client IP (`RATE_LIMIT_RPM` per \
                `RATE_LIMIT_PERIOD` seconds) and answer `429 Too Many Requests` beyond that."
                    .into(),
            ),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Creates the application with all routes, middleware, and shared state
///
/// Used by `main` for every worker and by the integration tests.
pub fn create_app(
    config: &AppConfig,
    services: AppServices,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    App::new()
        .wrap(SecurityHeaders::new(config.security.clone()))
        .wrap(RequestIdMiddleware)
        .wrap(MetricsMiddleware)
        .wrap_api_with_spec(create_openapi_spec())
        .app_data(web::Data::new(services.metrics.clone()))
        .app_data(web::Data::new(services))
        .app_data(web::Data::new(config.server.clone()))
        .app_data(web::Data::new(config.metrics.clone()))
        .service(web::resource("/").route(web::get().to(dashboard_page)))
        .service(web::resource("/chat").route(web::post().to(chat_form)))
        .service(web::resource("/assets/{name}").route(web::get().to(asset)))
        .service(web::resource("/api/health").route(web::get().to(health)))
        .service(web::resource("/api/version").route(web::get().to(version)))
        .service(web::resource("/api/weather").route(web::get().to(weather)))
        .service(web::resource("/api/chat").route(web::post().to(chat)))
        .service(web::resource("/api/chat/history").route(web::get().to(chat_history)))
        .service(web::resource("/api/metrics").route(web::get().to(get_metrics)))
        .with_json_spec_at("/api/spec/v2")
        .build()
}
