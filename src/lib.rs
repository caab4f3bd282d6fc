//! Weather Chat Dashboard - a weather dashboard with an AI summary and a chatbot
//!
//! Built with Actix Web and Paperclip. For a city the user enters it:
//! - fetches current conditions and a 5-day/3-hour forecast from OpenWeatherMap
//! - asks a text generation provider (Cohere, OpenAI, or an offline mock) for a summary
//! - renders metrics, a daily forecast grid, charts, and a map
//!
//! A chat box answers weather questions by looking up the city named in the
//! message, and passes anything else to the text generation provider.
//!
//! ## Architecture
//!
//! - `models/` - Weather readings, chat conversation, request/response bodies
//! - `services/` - Provider clients, the lookup pipeline, chat dispatch, sessions, metrics
//! - `views/` - Display-ready projections and the HTML page
//! - `handlers/` - HTTP handlers and the app factory
//! - `middleware/` - Request ids, security headers, request metrics
//! - `config/` - Configuration structures and environment loading
//! - `utils/` - Unit conversion, icons, escaping, request helpers
//!
//! ## Quick Start
//!
//! ```no_run
//! use actix_web::HttpServer;
//! use weather_chat_dashboard::{AppConfig, AppServices, create_app};
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let config = AppConfig::from_env();
//!     let services = AppServices::from_config(&config).map_err(std::io::Error::other)?;
//!     let bind_address = config.server.bind_address.clone();
//!     HttpServer::new(move || create_app(&config, services.clone()))
//!         .bind(bind_address)?
//!         .run()
//!         .await
//! }
//! ```

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;
pub mod views;

pub use config::{
    AppConfig, MetricsConfig, RateLimitConfig, SecurityHeadersConfig, ServerConfig,
    TextGenerationConfig, TextProvider, WeatherProviderConfig,
};
pub use handlers::{create_app, create_openapi_spec};
pub use middleware::{MetricsMiddleware, RequestIdMiddleware, SecurityHeaders};
pub use models::{
    ChatMessage, ChatRoute, ConversationLog, CurrentConditions, ForecastEntry, ForecastSeries,
    Speaker,
};
pub use services::{
    AppMetrics, AppServices, ChatDispatcher, ChatReply, CityReport, ResilientClient,
    ResilientClientConfig, ResilientClientError, SessionStore, SimpleRateLimiter,
    SummaryGenerator, TextGenerationError, TextGenerator, WeatherClient, WeatherDashboard,
    WeatherError,
};
pub use utils::{kelvin_to_celsius, weather_icon};
pub use views::{DashboardView, RenderError};
