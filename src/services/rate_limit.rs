//! Per-client rate limiting for the endpoints that call providers.

use crate::config::RateLimitConfig;
use crate::utils::http::extract_client_ip;
use actix_web::{HttpRequest, HttpResponse};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};
use tracing::warn;

/// Simple in-memory fixed-window rate limiter
///
/// Each client key gets `requests_per_minute` requests per window of
/// `period_seconds`; the window starts at the key's first request.
#[derive(Clone)]
pub struct SimpleRateLimiter {
    config: RateLimitConfig,
    storage: Arc<Mutex<HashMap<String, (usize, Instant)>>>,
}

impl SimpleRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            storage: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns `true` if the request should be allowed, `false` if rate limited.
    pub fn check_rate_limit(&self, key: &str) -> bool {
        let mut storage = self.storage.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        let period = Duration::from_secs(self.config.period_seconds);

        storage.retain(|_, (_, started)| now.duration_since(*started) < period);

        match storage.get_mut(key) {
            Some((count, _)) if *count >= self.config.requests_per_minute => false,
            Some((count, _)) => {
                *count += 1;
                true
            }
            None => {
                storage.insert(key.to_string(), (1, now));
                true
            }
        }
    }
}

/// Check the requesting client against the limiter
///
/// Returns the 429 response to send when the limit is exceeded.
pub fn rate_limit_middleware(
    req: &HttpRequest,
    limiter: &SimpleRateLimiter,
) -> Result<(), HttpResponse> {
    let ip = extract_client_ip(req);

    if !limiter.check_rate_limit(&ip) {
        warn!(ip_address = %ip, path = %req.path(), "Rate limit exceeded");
        return Err(HttpResponse::TooManyRequests().json(serde_json::json!({
            "error": "Too Many Requests",
            "message": "Rate limit exceeded. Please try again later."
        })));
    }

    Ok(())
}
