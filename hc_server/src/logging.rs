//! Structured logging configuration.
//!
//! Installs a `tracing` subscriber and bridges `log` records emitted by the
//! tournament library, so tracker and actor messages land in the same output.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var and default to
/// `info` with noisy transport crates turned down.
///
/// # Example
///
/// ```no_run
/// use hc_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,tower_http=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    // `init` also installs the `log` bridge
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log a tournament event with structured data
///
/// # Arguments
///
/// * `event_type` - Event name (register, turn, out, end)
/// * `account` - Optional account the event concerns
/// * `message` - Event message
///
/// # Example
///
/// ```
/// use hc_server::logging::log_tournament_event;
///
/// log_tournament_event(
///     "register",
///     Some("9AhjZ7ybup47fvJNvFMCxhxVz3qs4serqVEXWmGAoMTx"),
///     "Player registered"
/// );
/// ```
pub fn log_tournament_event(event_type: &str, account: Option<&str>, message: &str) {
    tracing::info!(
        event_type = event_type,
        account = account,
        "TOURNAMENT: {}",
        message
    );
}

/// Log a rejected action
///
/// Rejections are expected traffic, so they stay at `debug` unless the
/// caller tried an administrator action.
pub fn log_rejection(action: &str, kind: &str, account: Option<&str>) {
    if action == "end" {
        tracing::warn!(action = action, kind = kind, account = account, "Action rejected");
    } else {
        tracing::debug!(action = action, kind = kind, account = account, "Action rejected");
    }
}

/// Log API request/response
///
/// # Arguments
///
/// * `method` - HTTP method
/// * `path` - Request path
/// * `status_code` - Response status code
/// * `duration_ms` - Request duration in milliseconds
/// * `request_id` - Correlation id of the request
///
pub fn log_api_request(
    method: &str,
    path: &str,
    status_code: u16,
    duration_ms: u64,
    request_id: &str,
) {
    if duration_ms > 1000 {
        tracing::warn!(
            http_method = method,
            http_path = path,
            http_status = status_code,
            duration_ms = duration_ms,
            request_id = request_id,
            "PERFORMANCE: Slow request"
        );
    } else {
        tracing::info!(
            http_method = method,
            http_path = path,
            http_status = status_code,
            duration_ms = duration_ms,
            request_id = request_id,
            "API request completed"
        );
    }
}
