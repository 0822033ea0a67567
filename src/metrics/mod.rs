/*!
 * # Metrics Module
 *
 * Prometheus metrics for the API, exposed in text format at `/metrics`.
 */

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};
use std::time::Duration;

use crate::errors::ServiceError;

pub struct AppMetrics {
    pub registry: Registry,
    pub http_requests_total: IntCounterVec,
    pub http_request_duration_seconds: HistogramVec,
    pub events_emitted_total: IntCounterVec,
    pub db_connections_max: IntGauge,
}

impl AppMetrics {
    fn new() -> Self {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests processed"),
            &["method", "status"],
        )
        .expect("valid metric definition");

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request latency in seconds",
            ),
            &["method"],
        )
        .expect("valid metric definition");

        let events_emitted_total = IntCounterVec::new(
            Opts::new("events_emitted_total", "Domain events emitted"),
            &["event"],
        )
        .expect("valid metric definition");

        let db_connections_max =
            IntGauge::new("db_connections_max", "Configured DB pool size").expect("valid metric");

        registry
            .register(Box::new(http_requests_total.clone()))
            .expect("metric registration");
        registry
            .register(Box::new(http_request_duration_seconds.clone()))
            .expect("metric registration");
        registry
            .register(Box::new(events_emitted_total.clone()))
            .expect("metric registration");
        registry
            .register(Box::new(db_connections_max.clone()))
            .expect("metric registration");

        Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            events_emitted_total,
            db_connections_max,
        }
    }

    pub fn record_request(&self, method: &str, status: u16, duration: Duration) {
        self.http_requests_total
            .with_label_values(&[method, &status.to_string()])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[method])
            .observe(duration.as_secs_f64());
    }

    pub fn record_event(&self, event: &str) {
        self.events_emitted_total.with_label_values(&[event]).inc();
    }
}

pub static APP_METRICS: Lazy<AppMetrics> = Lazy::new(AppMetrics::new);

/// Renders the registry in Prometheus text format.
pub async fn metrics_handler() -> Result<String, ServiceError> {
    let encoder = TextEncoder::new();
    let metric_families = APP_METRICS.registry.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| ServiceError::InternalError(format!("metrics encoding failed: {e}")))?;
    String::from_utf8(buffer)
        .map_err(|e| ServiceError::InternalError(format!("metrics encoding failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn metrics_render_in_text_format() {
        APP_METRICS.record_request("GET", 200, Duration::from_millis(5));
        APP_METRICS.record_event("project.created");

        let body = metrics_handler().await.unwrap();
        assert!(body.contains("http_requests_total"));
        assert!(body.contains("events_emitted_total"));
    }
}
