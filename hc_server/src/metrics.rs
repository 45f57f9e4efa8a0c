//! Prometheus metrics for monitoring the tournament server.
//!
//! Metrics are exposed in Prometheus text format when an exporter address is
//! configured. Without an installed recorder every helper is a no-op.
//!
//! # Metrics Categories
//!
//! - **HTTP Metrics**: Request counts, duration, status codes
//! - **Tournament Metrics**: Registrations, turns, completed rounds, rejections
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use hc_server::metrics;
//! use std::net::SocketAddr;
//!
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//!
//! metrics::http_requests_total("POST", "/play/register", 200);
//! metrics::registrations_total();
//! ```

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
///
/// # Errors
///
/// Returns an error message if the exporter cannot be installed
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record HTTP request.
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

/// Increment successful registrations counter.
pub fn registrations_total() {
    metrics::counter!("tournament_registrations_total").increment(1);
}

/// Set current registered players count.
pub fn registered_players(count: usize) {
    metrics::gauge!("tournament_registered_players").set(count as f64);
}

/// Increment turns counter.
pub fn turns_total(is_out: bool) {
    metrics::counter!("tournament_turns_total",
        "out" => is_out.to_string()
    )
    .increment(1);
}

/// Record the final score of a completed round.
pub fn round_score_runs(score: u32) {
    metrics::histogram!("tournament_round_score_runs").record(score as f64);
}

/// Increment rejected operations counter.
pub fn rejections_total(action: &str, kind: &str) {
    metrics::counter!("tournament_rejections_total",
        "action" => action.to_string(),
        "kind" => kind.to_string()
    )
    .increment(1);
}

/// Increment ended tournaments counter.
pub fn tournaments_ended_total() {
    metrics::counter!("tournament_ended_total").increment(1);
}

/// Record prize pot size in lamports.
pub fn prize_pot_lamports(pot: u64) {
    metrics::gauge!("tournament_prize_pot_lamports").set(pot as f64);
}
