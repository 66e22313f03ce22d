//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define gateway metrics (requests, latency, upstream calls, sessions)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by route, status
//! - `gateway_request_duration_seconds` (histogram): latency by route
//! - `gateway_upstream_calls_total` (counter): upstream calls by call, outcome
//! - `gateway_upstream_call_duration_seconds` (histogram): latency by call
//! - `gateway_upstream_sessions_active` (gauge): sessions currently held
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed, so tests need no setup
//! - Route labels use the matched route template, never the raw path

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one finished HTTP request.
pub fn record_request(route: &str, status: u16, start: Instant) {
    ::metrics::counter!(
        "gateway_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("gateway_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record one upstream call and its outcome (`found`, `empty`, `error`).
pub fn record_upstream_call(call: &'static str, outcome: &'static str, start: Instant) {
    ::metrics::counter!("gateway_upstream_calls_total", "call" => call, "outcome" => outcome)
        .increment(1);
    ::metrics::histogram!("gateway_upstream_call_duration_seconds", "call" => call)
        .record(start.elapsed().as_secs_f64());
}

pub fn set_active_sessions(count: usize) {
    ::metrics::gauge!("gateway_upstream_sessions_active").set(count as f64);
}
