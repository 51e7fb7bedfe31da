//! Metrics collection and exposition.
//!
//! # Metrics
//! - `ingress_failures_total` (counter): failures answered by the interceptor, by status
//! - `ingress_not_found_total` (counter): requests that matched no route
//! - `ingress_origin_rejections_total` (counter): requests refused by the origin gate
//! - `ingress_webhook_dispatch_total` (counter): error event deliveries, by outcome
//! - `ingress_provisioning_total` (counter): deferred provisioning calls, by outcome
//!
//! Recording is a no-op until a recorder is installed.

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_failure(status: u16) {
    counter!("ingress_failures_total", "status" => status.to_string()).increment(1);
}

pub fn record_not_found() {
    counter!("ingress_not_found_total").increment(1);
}

pub fn record_origin_rejection() {
    counter!("ingress_origin_rejections_total").increment(1);
}

pub fn record_webhook_dispatch(delivered: bool) {
    counter!("ingress_webhook_dispatch_total", "outcome" => outcome(delivered)).increment(1);
}

pub fn record_provisioning(succeeded: bool) {
    counter!("ingress_provisioning_total", "outcome" => outcome(succeeded)).increment(1);
}

fn outcome(ok: bool) -> &'static str {
    if ok {
        "success"
    } else {
        "failure"
    }
}
