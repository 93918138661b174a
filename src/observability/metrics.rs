//! Metrics collection and exposition.
//!
//! # Metrics
//! - `dashboard_cache_lookups_total` (counter): cache decisions by outcome
//! - `dashboard_cache_entries` (gauge): number of stored upstream responses
//! - `dashboard_upstream_requests_total` (counter): upstream calls by endpoint, status
//! - `dashboard_upstream_duration_seconds` (histogram): upstream latency
//! - `dashboard_requests_total` (counter): API responses by route, status

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus exporter on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one cache decision (`fresh`, `fetched`, `stale`, `cooldown`, `unavailable`, `failed`).
pub fn record_cache_lookup(outcome: &'static str) {
    counter!("dashboard_cache_lookups_total", "outcome" => outcome).increment(1);
}

pub fn record_cache_entries(len: usize) {
    gauge!("dashboard_cache_entries").set(len as f64);
}

/// Record a finished upstream call. `status` is 0 when no response arrived.
pub fn record_upstream_request(endpoint: &'static str, status: u16, start: Instant) {
    counter!(
        "dashboard_upstream_requests_total",
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("dashboard_upstream_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_request(route: &'static str, status: u16) {
    counter!(
        "dashboard_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
}
