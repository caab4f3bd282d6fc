//! Server, session, and asset configuration.

use std::{env, path::PathBuf};

const DEFAULT_PORT: u16 = 8080;

/// Process-level settings for the HTTP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address the server binds to
    pub bind_address: String,
    /// Idle time after which a session (and its conversation) ends
    pub session_ttl_seconds: u64,
    /// Directory holding background images served under `/assets`
    pub assets_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: format!("127.0.0.1:{DEFAULT_PORT}"),
            session_ttl_seconds: 1800,
            assets_dir: PathBuf::from("assets"),
        }
    }
}

/// Whether the process appears to run inside Kubernetes or Docker
pub fn is_container_environment(
    k8s_service_host: Option<&str>,
    docker_container: Option<&str>,
    dockerenv_exists: bool,
) -> bool {
    k8s_service_host.is_some() || docker_container.is_some() || dockerenv_exists
}

/// Pick the bind address: an explicit override wins, containers listen on
/// all interfaces, local runs stay on loopback.
pub fn detect_bind_address(bind_override: Option<&str>, in_container: bool, port: u16) -> String {
    if let Some(bind) = bind_override {
        return bind.to_string();
    }

    if in_container {
        format!("0.0.0.0:{port}")
    } else {
        format!("127.0.0.1:{port}")
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let in_container = is_container_environment(
            env::var("KUBERNETES_SERVICE_HOST").ok().as_deref(),
            env::var("DOCKER_CONTAINER").ok().as_deref(),
            std::path::Path::new("/.dockerenv").exists(),
        );

        let bind_address =
            detect_bind_address(env::var("BIND_ADDRESS").ok().as_deref(), in_container, port);

        let session_ttl_seconds = env::var("SESSION_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|ttl| *ttl > 0)
            .unwrap_or(defaults.session_ttl_seconds);

        let assets_dir = env::var("DASHBOARD_ASSETS_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.assets_dir);

        Self {
            bind_address,
            session_ttl_seconds,
            assets_dir,
        }
    }
}
