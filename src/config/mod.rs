//! Configuration structures and loading utilities.
//!
//! Every structure loads from environment variables with `from_env()` and
//! falls back to its `Default` values, so the dashboard starts with no
//! configuration beyond provider credentials.

pub mod metrics;
pub mod rate_limit;
pub mod resilient_client;
pub mod security;
pub mod server;
pub mod text_generation;
pub mod weather;

pub use metrics::*;
pub use rate_limit::*;
pub use security::*;
pub use server::*;
pub use text_generation::*;
pub use weather::*;

use crate::services::resilient_client::ResilientClientConfig;

/// Complete application configuration assembled at process start
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub weather: WeatherProviderConfig,
    pub text_generation: TextGenerationConfig,
    pub http_client: ResilientClientConfig,
    pub rate_limit: RateLimitConfig,
    pub security: SecurityHeadersConfig,
    pub metrics: MetricsConfig,
}

impl AppConfig {
    /// Load every section from environment variables
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            weather: WeatherProviderConfig::from_env(),
            text_generation: TextGenerationConfig::from_env(),
            http_client: ResilientClientConfig::from_env(),
            rate_limit: RateLimitConfig::from_env(),
            security: SecurityHeadersConfig::from_env(),
            metrics: MetricsConfig::from_env(),
        }
    }
}

/// Serializes tests that modify process environment variables
#[cfg(test)]
pub(crate) static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
