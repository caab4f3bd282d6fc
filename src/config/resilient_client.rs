//! Configuration for the outbound provider HTTP client
//!
//! Provides environment-based configuration for the resilient HTTP client.
//! Retries are off by default: every user action makes at most one round
//! trip per provider call.

use std::env;
use crate::services::resilient_client::{ResilientClientConfig, RetryConfig, CircuitBreakerConfig};

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl ResilientClientConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            read_timeout_seconds: env_parse("HTTP_CLIENT_READ_TIMEOUT")
                .unwrap_or(defaults.read_timeout_seconds),
            write_timeout_seconds: env_parse("HTTP_CLIENT_WRITE_TIMEOUT")
                .unwrap_or(defaults.write_timeout_seconds),
            connect_timeout_seconds: env_parse("HTTP_CLIENT_CONNECT_TIMEOUT")
                .unwrap_or(defaults.connect_timeout_seconds),
            retry: RetryConfig::from_env(),
            circuit_breaker: CircuitBreakerConfig::from_env(),
            enable_detailed_logging: env_parse("HTTP_CLIENT_DETAILED_LOGGING")
                .unwrap_or(defaults.enable_detailed_logging),
        }
    }
}

impl RetryConfig {
    /// Load retry configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        // Comma-separated status codes, e.g. "502,503"
        let retry_on_status = env::var("HTTP_CLIENT_RETRY_ON_STATUS")
            .ok()
            .map(|v| {
                v.split(',')
                    .filter_map(|s| s.trim().parse::<u16>().ok())
                    .collect()
            })
            .unwrap_or(defaults.retry_on_status);

        Self {
            max_attempts: env_parse("HTTP_CLIENT_RETRY_MAX_ATTEMPTS")
                .unwrap_or(defaults.max_attempts),
            initial_delay_ms: env_parse("HTTP_CLIENT_RETRY_INITIAL_DELAY_MS")
                .unwrap_or(defaults.initial_delay_ms),
            max_delay_ms: env_parse("HTTP_CLIENT_RETRY_MAX_DELAY_MS")
                .unwrap_or(defaults.max_delay_ms),
            retry_on_status,
        }
    }
}

impl CircuitBreakerConfig {
    /// Load circuit breaker configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            failure_threshold: env_parse("HTTP_CLIENT_CB_FAILURE_THRESHOLD")
                .unwrap_or(defaults.failure_threshold),
            success_threshold: env_parse("HTTP_CLIENT_CB_SUCCESS_THRESHOLD")
                .unwrap_or(defaults.success_threshold),
            timeout_seconds: env_parse("HTTP_CLIENT_CB_TIMEOUT_SECONDS")
                .unwrap_or(defaults.timeout_seconds),
        }
    }
}
