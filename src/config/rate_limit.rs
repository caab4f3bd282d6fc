//! Rate limiting configuration.

use std::env;

/// Configuration for limiting provider-backed requests per client
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Weather lookups and chat turns allowed per client per period
    pub requests_per_minute: usize,
    pub period_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: 30,
            period_seconds: 60,
        }
    }
}

impl RateLimitConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let requests_per_minute = env::var("RATE_LIMIT_RPM")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.requests_per_minute);

        let period_seconds = env::var("RATE_LIMIT_PERIOD")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.period_seconds);

        Self {
            requests_per_minute,
            period_seconds,
        }
    }
}
