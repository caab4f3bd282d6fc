//! Security headers configuration.

use std::env;

/// Content-Security-Policy for the dashboard page.
///
/// The page inlines its chart/map bootstrap script and pulls Chart.js and
/// Leaflet from public CDNs; map tiles come from OpenStreetMap.
pub const DEFAULT_CSP_DIRECTIVES: &str = "default-src 'self'; \
script-src 'self' 'unsafe-inline' https://cdn.jsdelivr.net https://unpkg.com; \
style-src 'self' 'unsafe-inline' https://unpkg.com; \
img-src 'self' data: https://*.tile.openstreetmap.org https://unpkg.com; \
frame-ancestors 'none'";

/// Content-Security-Policy for everything that is not the HTML page: JSON,
/// images, and the OpenAPI document never load subresources.
pub const NON_DOCUMENT_CSP: &str = "default-src 'none'; frame-ancestors 'none'";

/// Configuration for security headers middleware
#[derive(Debug, Clone)]
pub struct SecurityHeadersConfig {
    pub csp_enabled: bool,
    pub csp_directives: String,
    pub hsts_enabled: bool,
    pub hsts_max_age: u32,
    pub frame_options: String,
    pub content_type_options: bool,
    pub referrer_policy: String,
}

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self {
            csp_enabled: true,
            csp_directives: DEFAULT_CSP_DIRECTIVES.to_string(),
            // Usually served over plain HTTP on localhost
            hsts_enabled: false,
            hsts_max_age: 31536000, // 1 year
            frame_options: "DENY".to_string(),
            content_type_options: true,
            referrer_policy: "no-referrer".to_string(),
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|v| v.to_lowercase() == "true")
        .unwrap_or(default)
}

impl SecurityHeadersConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            csp_enabled: env_flag("SECURITY_CSP_ENABLED", defaults.csp_enabled),
            csp_directives: env::var("CSP_DIRECTIVES").unwrap_or(defaults.csp_directives),
            hsts_enabled: env_flag("HSTS_ENABLED", defaults.hsts_enabled),
            hsts_max_age: env::var("HSTS_MAX_AGE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.hsts_max_age),
            frame_options: env::var("X_FRAME_OPTIONS").unwrap_or(defaults.frame_options),
            content_type_options: env_flag("X_CONTENT_TYPE_OPTIONS", defaults.content_type_options),
            referrer_policy: env::var("REFERRER_POLICY").unwrap_or(defaults.referrer_policy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENV_MUTEX;

    #[test]
    fn test_default_csp_allows_map_and_chart_sources() {
        let config = SecurityHeadersConfig::default();
        assert!(config.csp_directives.contains("https://cdn.jsdelivr.net"));
        assert!(config.csp_directives.contains("https://unpkg.com"));
        assert!(config.csp_directives.contains("tile.openstreetmap.org"));
        assert!(!config.hsts_enabled);
    }

    #[test]
    fn test_security_from_env() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

        unsafe {
            env::set_var("HSTS_ENABLED", "true");
            env::set_var("X_FRAME_OPTIONS", "SAMEORIGIN");
        }
        let config = SecurityHeadersConfig::from_env();
        assert!(config.hsts_enabled);
        assert_eq!(config.frame_options, "SAMEORIGIN");
        assert!(config.csp_enabled);

        unsafe {
            env::remove_var("HSTS_ENABLED");
            env::remove_var("X_FRAME_OPTIONS");
        }
    }
}
