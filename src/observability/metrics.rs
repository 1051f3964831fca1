//! Metrics collection and exposition.
//!
//! # Metrics
//! - `edge_router_matches_total` (counter): lookups by outcome
//! - `edge_router_reloads_total` (counter): reloads by result
//! - `edge_router_rules` (gauge): rules in the live configuration
//! - `edge_router_manifest_entries` (gauge): manifest size of the live configuration

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// How a lookup ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Filesystem,
    Pattern,
    NoMatch,
}

impl MatchOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchOutcome::Filesystem => "filesystem",
            MatchOutcome::Pattern => "pattern",
            MatchOutcome::NoMatch => "no_match",
        }
    }
}

/// Install the Prometheus recorder with an HTTP scrape listener.
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_match(outcome: MatchOutcome) {
    metrics::counter!("edge_router_matches_total", "outcome" => outcome.as_str()).increment(1);
}

pub fn record_reload(applied: bool) {
    let result = if applied { "applied" } else { "rejected" };
    metrics::counter!("edge_router_reloads_total", "result" => result).increment(1);
}

pub fn record_config_size(rules: usize, manifest_entries: usize) {
    metrics::gauge!("edge_router_rules").set(rules as f64);
    metrics::gauge!("edge_router_manifest_entries").set(manifest_entries as f64);
}
