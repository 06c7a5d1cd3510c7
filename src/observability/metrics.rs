//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define router metrics (dispatches, latency, misses, reloads)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `router_requests_total` (counter): dispatched requests by route, status
//! - `router_dispatch_duration_seconds` (histogram): time spent in dispatch
//! - `router_no_match_total` (counter): requests no route matched
//! - `router_table_reloads_total` (counter): route table swaps by outcome
//! - `router_routes` (gauge): routes in the active table
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op, so tests need no setup

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a request that reached a resource.
pub fn record_dispatch(route: &str, status: u16, start: Instant) {
    metrics::counter!(
        "router_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("router_dispatch_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record a request no route matched.
pub fn record_no_match() {
    metrics::counter!("router_no_match_total").increment(1);
}

/// Record a route table reload attempt (`"applied"` or `"rejected"`).
pub fn record_table_reload(outcome: &'static str) {
    metrics::counter!("router_table_reloads_total", "outcome" => outcome).increment(1);
}

/// Record the size of the active route table.
pub fn record_route_count(count: usize) {
    metrics::gauge!("router_routes").set(count as f64);
}
