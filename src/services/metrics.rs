//! Metrics collection and Prometheus integration service.

use crate::models::ChatRoute;
use crate::services::chat::ChatReply;
use crate::services::dashboard::CityReport;
use crate::services::resilient_client::ResilientClientMetrics;
use crate::services::weather::WeatherError;
use prometheus::{
    Counter, CounterVec, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::time::{Duration, Instant};

/// Application metrics collector for Prometheus integration
#[derive(Clone)]
pub struct AppMetrics {
    pub registry: Registry,
    pub http_requests_total: CounterVec,
    pub http_request_duration_seconds: HistogramVec,
    pub app_uptime_seconds: Gauge,
    pub app_info: CounterVec,
    /// Provider lookups by kind ("current", "forecast") and outcome
    pub weather_lookups_total: CounterVec,
    pub chat_turns_total: CounterVec,
    /// Summaries replaced by an error message
    pub summary_fallbacks_total: Counter,
    pub start_time: Instant,
}

impl AppMetrics {
    /// Create a new metrics collector with default Prometheus metrics
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // HTTP request counter by method, status, and route
        let http_requests_total = CounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "status", "route"],
        )?;

        // HTTP request duration histogram
        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["method", "route"],
        )?;

        // Application uptime gauge
        let app_uptime_seconds = Gauge::new("app_uptime_seconds", "Application uptime in seconds")?;

        // Application info counter
        let app_info = CounterVec::new(
            Opts::new("app_info", "Application information"),
            &["version", "commit", "build_time"],
        )?;

        let weather_lookups_total = CounterVec::new(
            Opts::new("weather_lookups_total", "Weather provider lookups"),
            &["kind", "outcome"],
        )?;

        let chat_turns_total = CounterVec::new(
            Opts::new("chat_turns_total", "Chat turns by dispatch route"),
            &["route"],
        )?;

        let summary_fallbacks_total = Counter::new(
            "summary_fallbacks_total",
            "Weather summaries that fell back to an error message",
        )?;

        // Register all metrics
        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(app_uptime_seconds.clone()))?;
        registry.register(Box::new(app_info.clone()))?;
        registry.register(Box::new(weather_lookups_total.clone()))?;
        registry.register(Box::new(chat_turns_total.clone()))?;
        registry.register(Box::new(summary_fallbacks_total.clone()))?;

        let start_time = Instant::now();

        // Set application info
        app_info
            .with_label_values(&[
                env!("CARGO_PKG_VERSION"),
                option_env!("VERGEN_GIT_SHA").unwrap_or("unknown"),
                env!("VERGEN_BUILD_TIMESTAMP"),
            ])
            .inc();

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            app_uptime_seconds,
            app_info,
            weather_lookups_total,
            chat_turns_total,
            summary_fallbacks_total,
            start_time,
        })
    }

    /// Outbound provider metrics registered in this collector's registry
    pub fn provider_metrics(&self) -> Result<ResilientClientMetrics, prometheus::Error> {
        ResilientClientMetrics::new(&self.registry)
    }

    /// Record the outcome of a dashboard lookup
    pub fn record_lookup(&self, result: &Result<CityReport, WeatherError>) {
        match result {
            Ok(report) => {
                self.record_weather_lookup("current", None);
                self.record_weather_lookup("forecast", report.forecast.as_ref().err());
                if report.summary.is_fallback {
                    self.summary_fallbacks_total.inc();
                }
            }
            Err(e) => self.record_weather_lookup("current", Some(e)),
        }
    }

    /// Count one provider call of `kind`; `None` means it succeeded
    pub fn record_weather_lookup(&self, kind: &str, error: Option<&WeatherError>) {
        let outcome = error.map_or("success", WeatherError::outcome);
        self.weather_lookups_total
            .with_label_values(&[kind, outcome])
            .inc();
    }

    /// Record one chat turn, including the city lookup and summary it ran
    pub fn record_chat_reply(&self, reply: &ChatReply) {
        self.chat_turns_total
            .with_label_values(&[reply.route.as_str()])
            .inc();

        if reply.route == ChatRoute::CityLookup {
            self.record_weather_lookup("current", reply.lookup_error.as_ref());
        }
        if reply.summary_is_fallback {
            self.summary_fallbacks_total.inc();
        }
    }

    /// Record an HTTP request with method, route, status, and duration
    pub fn record_request(&self, method: &str, route: &str, status: u16, duration: Duration) {
        if route == "/api/metrics" {
            // Don't record metrics for the metrics endpoint itself to avoid noise
            return;
        }

        self.http_requests_total
            .with_label_values(&[method, &status.to_string(), route])
            .inc();

        self.http_request_duration_seconds
            .with_label_values(&[method, route])
            .observe(duration.as_secs_f64());
    }

    /// Update the application uptime gauge
    pub fn update_uptime(&self) {
        let uptime = self.start_time.elapsed().as_secs_f64();
        self.app_uptime_seconds.set(uptime);
    }

    /// Render metrics in Prometheus text format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder.encode_to_string(&metric_families)
    }
}
