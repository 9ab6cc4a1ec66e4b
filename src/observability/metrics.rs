//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_dispatch_total` (counter): dispatches by outcome
//! - `router_dispatch_duration_seconds` (histogram): dispatch latency
//! - `router_route_table_builds_total` (counter): cache misses that rebuilt the table
//! - `router_route_table_routes` (gauge): routes in the last built table
//! - `router_seo_redirects_total` (counter): superseded SEO paths requested

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_dispatch(outcome: &'static str, start: Instant) {
    counter!("router_dispatch_total", "outcome" => outcome).increment(1);
    histogram!("router_dispatch_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_route_table_build(routes: usize) {
    counter!("router_route_table_builds_total").increment(1);
    gauge!("router_route_table_routes").set(routes as f64);
}

pub fn record_seo_redirect() {
    counter!("router_seo_redirects_total").increment(1);
}
