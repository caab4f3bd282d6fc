//! Metrics configuration.

use std::env;

/// Configuration for Prometheus metrics collection and exposure
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Serve `/api/metrics`; collection continues either way
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl MetricsConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let enabled = env::var("METRICS_ENABLED")
            .ok()
            .and_then(|v| v.trim().to_lowercase().parse().ok())
            .unwrap_or(true);

        Self { enabled }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENV_MUTEX;

    #[test]
    fn test_metrics_toggle() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

        unsafe {
            env::set_var("METRICS_ENABLED", "FALSE");
        }
        assert!(!MetricsConfig::from_env().enabled);

        unsafe {
            env::set_var("METRICS_ENABLED", "not-a-bool");
        }
        assert!(MetricsConfig::from_env().enabled);

        unsafe {
            env::remove_var("METRICS_ENABLED");
        }
        assert!(MetricsConfig::from_env().enabled);
    }
}
