//! Business logic and service layer modules.
//!
//! Provider clients (weather, text generation) sit on the shared resilient
//! HTTP client. The dashboard pipeline and the chat dispatcher compose them,
//! and the session store keeps each visitor's conversation.

pub mod chat;
pub mod dashboard;
pub mod metrics;
pub mod rate_limit;
pub mod resilient_client;
pub mod session;
pub mod summarizer;
pub mod text_generation;
pub mod weather;

pub use chat::*;
pub use dashboard::*;
pub use metrics::*;
pub use rate_limit::*;
pub use resilient_client::*;
pub use session::*;
pub use summarizer::*;
pub use text_generation::*;
pub use weather::*;

use crate::config::AppConfig;
use std::time::Duration;

/// Failures while wiring services at startup
#[derive(Debug, thiserror::Error)]
pub enum ServiceInitError {
    #[error("Failed to create metrics: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Every service a request handler may need, built once per process
#[derive(Clone)]
pub struct AppServices {
    pub metrics: AppMetrics,
    pub dashboard: WeatherDashboard,
    pub chat: ChatDispatcher,
    pub sessions: SessionStore,
    pub limiter: SimpleRateLimiter,
}

impl AppServices {
    pub fn from_config(config: &AppConfig) -> Result<Self, ServiceInitError> {
        let metrics = AppMetrics::new()?;
        let client = ResilientClient::new(
            config.http_client.clone(),
            Some(metrics.provider_metrics()?),
        )?;

        let weather = WeatherClient::new(config.weather.clone(), client.clone());
        let generator = TextGenerator::new(config.text_generation.clone(), client);
        let summarizer = SummaryGenerator::new(generator.clone());

        Ok(Self {
            dashboard: WeatherDashboard::new(weather.clone(), summarizer.clone()),
            chat: ChatDispatcher::new(weather, summarizer, generator),
            sessions: SessionStore::new(Duration::from_secs(config.server.session_ttl_seconds)),
            limiter: SimpleRateLimiter::new(config.rate_limit.clone()),
            metrics,
        })
    }
}
