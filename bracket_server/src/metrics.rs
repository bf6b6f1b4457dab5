//! Prometheus metrics for request traffic and tournament activity.
//!
//! Metrics are exposed in Prometheus text format on a dedicated listener when
//! `METRICS_BIND` is set. Without an installed recorder every call here is a
//! no-op.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use bracket_server::metrics;
//! use std::net::SocketAddr;
//!
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//!
//! metrics::http_requests_total("POST", "/api/v1/tournaments", 201);
//! metrics::tournament_created(6);
//! ```

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record HTTP request.
///
/// `path` should be the matched route template so ids don't explode label cardinality.
pub fn http_requests_total(method: &str, path: &str, status: u16) {
    metrics::counter!("http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record HTTP request duration in milliseconds.
pub fn http_request_duration_ms(method: &str, path: &str, duration_ms: f64) {
    metrics::histogram!("http_request_duration_ms",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(duration_ms);
}

// ============================================================================
// Tournament Metrics
// ============================================================================

/// Count a created tournament and the fixtures generated for it.
pub fn tournament_created(fixtures: usize) {
    metrics::counter!("tournaments_created_total").increment(1);
    metrics::counter!("fixtures_generated_total").increment(fixtures as u64);
}

/// Count a registration attempt by outcome (`accepted` or an error kind).
pub fn registration_attempt(outcome: &str) {
    metrics::counter!("registration_attempts_total",
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

pub fn result_reported() {
    metrics::counter!("results_reported_total").increment(1);
}

// ============================================================================
// Team Metrics
// ============================================================================

pub fn team_created() {
    metrics::counter!("teams_created_total").increment(1);
}

pub fn member_added() {
    metrics::counter!("team_members_added_total").increment(1);
}

// ============================================================================
// Auth Metrics
// ============================================================================

/// Increment login attempts counter.
pub fn login_attempts_total(success: bool) {
    metrics::counter!("login_attempts_total",
        "success" => success.to_string()
    )
    .increment(1);
}
