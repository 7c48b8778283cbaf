//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): requests by method, path, status
//! - `relay_token_cache_total` (counter): token cache events (hit/refresh)
//! - `relay_upstream_total` (counter): upstream calls by kind and outcome
//! - `relay_request_duration_seconds` (histogram): latency distribution

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            describe_counter!("relay_requests_total", "Requests by method, path, status");
            describe_counter!("relay_token_cache_total", "Token cache events");
            describe_counter!("relay_upstream_total", "Upstream calls by kind and outcome");
            describe_histogram!("relay_request_duration_seconds", "Request latency");
            tracing::info!(address = %addr, "Metrics exporter listening");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to install metrics exporter");
        }
    }
}

/// Record one handled request.
pub fn record_request(method: &str, path: &str, status: u16, start: Instant) {
    counter!(
        "relay_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string(),
    )
    .increment(1);
    histogram!("relay_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record a token cache event ("hit" or "refresh").
pub fn record_token_cache(event: &'static str) {
    counter!("relay_token_cache_total", "event" => event).increment(1);
}

/// Record an upstream call outcome ("ok" or an error code).
pub fn record_upstream(kind: &'static str, outcome: &str) {
    counter!(
        "relay_upstream_total",
        "kind" => kind,
        "outcome" => outcome.to_string(),
    )
    .increment(1);
}
