//! Metrics collection and exposition.
//!
//! # Metrics
//! - `cms_requests_total` (counter): requests by method, status
//! - `cms_request_duration_seconds` (histogram): latency distribution
//! - `cms_rate_limited_total` (counter): rejected requests by endpoint family
//! - `cms_auth_rejections_total` (counter): gate rejections by reason
//! - `cms_content_mutations_total` (counter): writes by kind and operation
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "cms_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("cms_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_rate_limited(endpoint: &str) {
    counter!("cms_rate_limited_total", "endpoint" => endpoint.to_string()).increment(1);
}

pub fn record_auth_rejection(reason: &'static str) {
    counter!("cms_auth_rejections_total", "reason" => reason).increment(1);
}

pub fn record_mutation(kind: &'static str, op: &'static str) {
    counter!("cms_content_mutations_total", "kind" => kind, "op" => op).increment(1);
}

/// Middleware recording request count and latency.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let response = next.run(request).await;
    record_request(&method, response.status().as_u16(), start);
    response
}
