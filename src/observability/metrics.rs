//! Metrics collection and exposition.
//!
//! # Metrics
//! - `config_refresh_total` (counter): completed refreshes by source
//! - `config_watch_retries_total` (counter): watch re-subscription attempts
//! - `config_watch_failures_total` (counter): subscriptions that exhausted
//!   their retry budget
//! - `config_sources` (gauge): registered config sources

use std::net::SocketAddr;

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and bind the scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => {
            describe_counter!("config_refresh_total", "Completed refreshes by source");
            describe_counter!(
                "config_watch_retries_total",
                "Watch re-subscription attempts by path"
            );
            describe_counter!(
                "config_watch_failures_total",
                "Watch subscriptions that exhausted their retry budget"
            );
            describe_gauge!("config_sources", "Registered config sources");
            tracing::info!(address = %addr, "Metrics endpoint started");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to start metrics endpoint");
        }
    }
}

pub fn record_refresh(source: &str) {
    counter!("config_refresh_total", "source" => source.to_string()).increment(1);
}

pub fn record_watch_retry(path: &str) {
    counter!("config_watch_retries_total", "path" => path.to_string()).increment(1);
}

pub fn record_watch_failure(path: &str) {
    counter!("config_watch_failures_total", "path" => path.to_string()).increment(1);
}

pub fn set_source_count(count: usize) {
    gauge!("config_sources").set(count as f64);
}
