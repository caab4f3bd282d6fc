//! Resilient HTTP client shared by the weather and text-generation providers.
//!
//! This module provides a configurable HTTP client that implements:
//! - Per-operation timeouts (reads for weather lookups, writes for completions)
//! - Optional exponential backoff retries (disabled by default)
//! - A circuit breaker per destination host
//! - Structured logging with credentials redacted, and Prometheus metrics

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use prometheus::{CounterVec, HistogramVec, GaugeVec, Opts, Registry};
use reqwest::Client;
use tokio_retry::{strategy::ExponentialBackoff, Retry};
use tracing::{error, warn, info};

use crate::utils::redact::redact_credentials;

/// Configuration for resilient HTTP client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResilientClientConfig {
    /// Timeout for read operations (GET), in seconds
    pub read_timeout_seconds: u64,

    /// Timeout for write operations (POST), in seconds
    pub write_timeout_seconds: u64,

    /// Connection timeout, in seconds
    pub connect_timeout_seconds: u64,

    pub retry: RetryConfig,

    pub circuit_breaker: CircuitBreakerConfig,

    /// Log every request outcome, not just failures
    pub enable_detailed_logging: bool,
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt; 0 means exactly one attempt
    pub max_attempts: usize,

    /// Initial retry delay in milliseconds
    pub initial_delay_ms: u64,

    /// Maximum retry delay in milliseconds
    pub max_delay_ms: u64,

    /// HTTP status codes treated as transient failures
    pub retry_on_status: Vec<u16>,
}

/// Simple circuit breaker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures that open the circuit
    pub failure_threshold: usize,

    /// Successes in half-open state that close the circuit
    pub success_threshold: usize,

    /// Seconds to wait before probing an open circuit
    pub timeout_seconds: u64,
}

/// Circuit breaker state
#[derive(Debug, Clone, PartialEq)]
pub enum CircuitBreakerState {
    Closed,
    Open,
    HalfOpen,
}

impl CircuitBreakerState {
    fn gauge_value(&self) -> f64 {
        match self {
            CircuitBreakerState::Closed => 0.0,
            CircuitBreakerState::Open => 1.0,
            CircuitBreakerState::HalfOpen => 2.0,
        }
    }
}

/// Simple circuit breaker implementation
#[derive(Debug)]
pub struct SimpleCircuitBreaker {
    state: CircuitBreakerState,
    failure_count: usize,
    success_count: usize,
    config: CircuitBreakerConfig,
    last_failure_time: Option<Instant>,
}

impl SimpleCircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            state: CircuitBreakerState::Closed,
            failure_count: 0,
            success_count: 0,
            config,
            last_failure_time: None,
        }
    }

    pub fn call_allowed(&mut self) -> bool {
        match self.state {
            CircuitBreakerState::Closed | CircuitBreakerState::HalfOpen => true,
            CircuitBreakerState::Open => {
                let cooled_down = self.last_failure_time.is_some_and(|last_failure| {
                    last_failure.elapsed() >= Duration::from_secs(self.config.timeout_seconds)
                });
                if cooled_down {
                    self.state = CircuitBreakerState::HalfOpen;
                    self.success_count = 0;
                }
                cooled_down
            }
        }
    }

    pub fn on_success(&mut self) {
        self.failure_count = 0;

        if self.state == CircuitBreakerState::HalfOpen {
            self.success_count += 1;
            if self.success_count >= self.config.success_threshold {
                self.state = CircuitBreakerState::Closed;
            }
        }
    }

    pub fn on_failure(&mut self) {
        self.failure_count += 1;
        self.last_failure_time = Some(Instant::now());

        if self.state == CircuitBreakerState::HalfOpen
            || self.failure_count >= self.config.failure_threshold
        {
            self.state = CircuitBreakerState::Open;
        }
    }

    pub fn state(&self) -> &CircuitBreakerState {
        &self.state
    }
}

impl Default for ResilientClientConfig {
    fn default() -> Self {
        Self {
            read_timeout_seconds: 10,
            write_timeout_seconds: 30,
            connect_timeout_seconds: 5,
            retry: RetryConfig::default(),
            circuit_breaker: CircuitBreakerConfig::default(),
            enable_detailed_logging: true,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 0,
            initial_delay_ms: 200,
            max_delay_ms: 2000,
            retry_on_status: vec![429, 500, 502, 503, 504],
        }
    }
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            success_threshold: 1,
            timeout_seconds: 30,
        }
    }
}

/// Metrics for outbound provider calls
#[derive(Clone)]
pub struct ResilientClientMetrics {
    /// Requests by destination, method, and outcome
    pub http_requests_total: CounterVec,

    /// Request duration by destination and method
    pub http_request_duration_seconds: HistogramVec,

    /// Circuit breaker state by destination
    pub circuit_breaker_state: GaugeVec,

    /// Timeout occurrences by destination and type
    pub timeouts_total: CounterVec,
}

impl ResilientClientMetrics {
    /// Create and register the collectors on `registry`
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let http_requests_total = CounterVec::new(
            Opts::new("provider_http_requests_total", "Outbound provider requests by destination, method, and outcome"),
            &["destination", "method", "outcome"]
        )?;

        let http_request_duration_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "provider_http_request_duration_seconds",
                "Duration of outbound provider requests"
            ).buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
            &["destination", "method"]
        )?;

        let circuit_breaker_state = GaugeVec::new(
            Opts::new("provider_http_circuit_breaker_state", "Circuit breaker state (0=closed, 1=open, 2=half-open)"),
            &["destination"]
        )?;

        let timeouts_total = CounterVec::new(
            Opts::new("provider_http_timeouts_total", "Outbound timeouts by destination and type"),
            &["destination", "timeout_type"]
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(circuit_breaker_state.clone()))?;
        registry.register(Box::new(timeouts_total.clone()))?;

        Ok(Self {
            http_requests_total,
            http_request_duration_seconds,
            circuit_breaker_state,
            timeouts_total,
        })
    }
}

/// Request context for logging and metrics
#[derive(Debug, Clone)]
struct RequestContext {
    destination: String,
    method: &'static str,
    /// URL with credentials redacted
    url: String,
}

/// Resilient HTTP client with timeouts and circuit breakers
///
/// Cloning is cheap; clones share the connection pool and breaker state.
#[derive(Clone)]
pub struct ResilientClient {
    client: Client,
    config: ResilientClientConfig,
    metrics: Option<ResilientClientMetrics>,
    circuit_breakers: Arc<Mutex<HashMap<String, SimpleCircuitBreaker>>>,
}

impl ResilientClient {
    /// Create a new resilient HTTP client
    pub fn new(config: ResilientClientConfig, metrics: Option<ResilientClientMetrics>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(std::cmp::max(config.read_timeout_seconds, config.write_timeout_seconds)))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            config,
            metrics,
            circuit_breakers: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Execute an HTTP GET request
    pub async fn get(&self, url: &str) -> Result<reqwest::Response, ResilientClientError> {
        self.execute_request(url, None, None, OperationType::Read).await
    }

    /// Execute an HTTP POST request with a JSON body and optional bearer token
    pub async fn post_json<T: Serialize>(
        &self,
        url: &str,
        json: &T,
        bearer_token: Option<&str>,
    ) -> Result<reqwest::Response, ResilientClientError> {
        let body = serde_json::to_value(json)
            .map_err(|e| ResilientClientError::SerializationError(e.to_string()))?;
        self.execute_request(url, Some(body), bearer_token, OperationType::Write).await
    }

    /// Current breaker state for a destination host, if one has been created
    pub fn circuit_state(&self, destination: &str) -> Option<CircuitBreakerState> {
        self.breakers().get(destination).map(|cb| cb.state().clone())
    }

    fn breakers(&self) -> MutexGuard<'_, HashMap<String, SimpleCircuitBreaker>> {
        self.circuit_breakers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Extract destination (host) from URL for metrics and circuit breaker grouping
    fn extract_destination(url: &str) -> String {
        url::Url::parse(url)
            .map(|u| u.host_str().unwrap_or("unknown").to_string())
            .unwrap_or_else(|_| "invalid_url".to_string())
    }

    async fn execute_request(
        &self,
        url: &str,
        json: Option<Value>,
        bearer_token: Option<&str>,
        operation_type: OperationType,
    ) -> Result<reqwest::Response, ResilientClientError> {
        let context = RequestContext {
            destination: Self::extract_destination(url),
            method: operation_type.method(),
            url: redact_credentials(url),
        };
        let destination = context.destination.as_str();

        // Breaker lock is released before any await
        let admitted_state = {
            let mut breakers = self.breakers();
            let breaker = breakers
                .entry(destination.to_string())
                .or_insert_with(|| SimpleCircuitBreaker::new(self.config.circuit_breaker.clone()));
            breaker.call_allowed().then(|| breaker.state().clone())
        };

        let Some(state) = admitted_state else {
            self.record_circuit_breaker_state(destination, CircuitBreakerState::Open.gauge_value());
            warn!(
                destination = %destination,
                url = %context.url,
                "Circuit breaker is open, rejecting request"
            );
            return Err(ResilientClientError::CircuitBreakerOpen);
        };
        self.record_circuit_breaker_state(destination, state.gauge_value());

        let timeout = match operation_type {
            OperationType::Read => Duration::from_secs(self.config.read_timeout_seconds),
            OperationType::Write => Duration::from_secs(self.config.write_timeout_seconds),
        };

        let retry_strategy = ExponentialBackoff::from_millis(self.config.retry.initial_delay_ms)
            .max_delay(Duration::from_millis(self.config.retry.max_delay_ms))
            .map(tokio_retry::strategy::jitter)
            .take(self.config.retry.max_attempts);

        let started = Instant::now();
        let bearer_header = bearer_token.map(|token| format!("Bearer {token}"));

        let result = Retry::spawn(retry_strategy, || {
            let request_builder = match &json {
                Some(body) => self.client.post(url).json(body),
                None => self.client.get(url),
            };
            let request_builder = match &bearer_header {
                Some(header) => request_builder.header(reqwest::header::AUTHORIZATION, header),
                None => request_builder,
            };
            let context = &context;
            let config = &self.config;

            async move {
                let attempt_start = Instant::now();
                let result = tokio::time::timeout(timeout, request_builder.send()).await;
                let duration_ms = attempt_start.elapsed().as_millis();

                match result {
                    Ok(Ok(response)) => {
                        let status = response.status().as_u16();
                        if config.retry.retry_on_status.contains(&status) {
                            warn!(
                                destination = %context.destination,
                                method = context.method,
                                url = %context.url,
                                status,
                                duration_ms,
                                "Provider responded with transient failure status"
                            );
                            Err(ResilientClientError::RetryableStatus(status))
                        } else {
                            if config.enable_detailed_logging {
                                info!(
                                    destination = %context.destination,
                                    method = context.method,
                                    url = %context.url,
                                    status,
                                    duration_ms,
                                    "Provider request completed"
                                );
                            }
                            Ok(response)
                        }
                    }
                    Ok(Err(e)) => {
                        error!(
                            destination = %context.destination,
                            method = context.method,
                            url = %context.url,
                            error = %redact_credentials(&e.to_string()),
                            duration_ms,
                            "Provider request failed with network error"
                        );
                        Err(ResilientClientError::NetworkError(e))
                    }
                    Err(_) => {
                        warn!(
                            destination = %context.destination,
                            method = context.method,
                            url = %context.url,
                            timeout_seconds = timeout.as_secs(),
                            "Provider request timed out"
                        );
                        Err(ResilientClientError::Timeout)
                    }
                }
            }
        })
        .await;

        let elapsed = started.elapsed();
        let outcome = match &result {
            Ok(_) => "success",
            Err(ResilientClientError::RetryableStatus(_)) => "retryable_status",
            Err(ResilientClientError::NetworkError(_)) => "network_error",
            Err(ResilientClientError::Timeout) => {
                self.record_timeout(&context, &operation_type);
                "timeout"
            }
            Err(_) => "error",
        };
        self.record_request_metrics(&context, outcome, elapsed);

        if let Some(cb) = self.breakers().get_mut(destination) {
            if result.is_ok() {
                cb.on_success();
            } else {
                cb.on_failure();
            }
        }

        result
    }

    fn record_request_metrics(&self, context: &RequestContext, outcome: &str, duration: Duration) {
        if let Some(metrics) = &self.metrics {
            metrics.http_requests_total
                .with_label_values(&[context.destination.as_str(), context.method, outcome])
                .inc();

            metrics.http_request_duration_seconds
                .with_label_values(&[context.destination.as_str(), context.method])
                .observe(duration.as_secs_f64());
        }
    }

    fn record_timeout(&self, context: &RequestContext, operation_type: &OperationType) {
        if let Some(metrics) = &self.metrics {
            let timeout_type = match operation_type {
                OperationType::Read => "read",
                OperationType::Write => "write",
            };
            metrics.timeouts_total
                .with_label_values(&[context.destination.as_str(), timeout_type])
                .inc();
        }
    }

    fn record_circuit_breaker_state(&self, destination: &str, state: f64) {
        if let Some(metrics) = &self.metrics {
            metrics.circuit_breaker_state
                .with_label_values(&[destination])
                .set(state);
        }
    }
}

/// Operation type for determining appropriate timeout
#[derive(Debug, Clone)]
enum OperationType {
    Read,
    Write,
}

impl OperationType {
    fn method(&self) -> &'static str {
        match self {
            OperationType::Read => "GET",
            OperationType::Write => "POST",
        }
    }
}

/// Errors that can occur with the resilient client
#[derive(Debug, thiserror::Error)]
pub enum ResilientClientError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Circuit breaker is open")]
    CircuitBreakerOpen,

    #[error("Provider returned status {0}")]
    RetryableStatus(u16),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl ResilientClientError {
    /// Get a user-friendly error message for display
    pub fn user_message(&self) -> String {
        match self {
            ResilientClientError::NetworkError(_) => "Service temporarily unavailable due to network issues".to_string(),
            ResilientClientError::Timeout => "Service temporarily unavailable due to timeout".to_string(),
            ResilientClientError::CircuitBreakerOpen => "Service temporarily unavailable, please try again later".to_string(),
            ResilientClientError::RetryableStatus(status) => format!("Service returned error status {status}, please try again"),
            ResilientClientError::SerializationError(_) => "Invalid request data".to_string(),
        }
    }
}
