//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by upstream, method, status
//! - `gateway_request_duration_seconds` (histogram): latency distribution
//! - `gateway_publish_total` (counter): publish attempts by topic and outcome
//! - `gateway_aborted_total` (counter): connections torn down on unreadable request bodies

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one completed request against `upstream` (backend authority or topic).
pub fn record_request(upstream: &str, method: &str, status: u16, start_time: Instant) {
    let labels = [
        ("upstream", upstream.to_string()),
        ("method", method.to_string()),
        ("status", status.to_string()),
    ];
    metrics::counter!("gateway_requests_total", &labels).increment(1);
    metrics::histogram!("gateway_request_duration_seconds", &labels)
        .record(start_time.elapsed().as_secs_f64());
}

/// Record a request whose connection was aborted instead of answered.
pub fn record_aborted(upstream: &str, method: &str) {
    metrics::counter!(
        "gateway_aborted_total",
        "upstream" => upstream.to_string(),
        "method" => method.to_string()
    )
    .increment(1);
}

/// Record a publish attempt outcome (`accepted`, `failed`, `aborted`).
pub fn record_publish(topic: &str, outcome: &'static str) {
    metrics::counter!(
        "gateway_publish_total",
        "topic" => topic.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}
