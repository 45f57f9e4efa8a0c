//! HTTP API for the tournament server.
//!
//! # Modules
//!
//! - [`actions`]: Blink action endpoints (register, play, leaderboard, end)
//! - [`tournament`]: JSON read endpoints
//! - [`errors`]: Uniform `{"message": ...}` error envelope
//! - [`request_id`]: Request correlation middleware
//!
//! # Endpoints Overview
//!
//! ```text
//! GET  /play                       - Action metadata
//! POST /play/register              - Register the caller
//! POST /play/game                  - Play one hand
//! POST /play/leaderboard           - Leaderboard as action text
//! POST /play/end                   - End the tournament (administrator)
//! POST /play/{other}               - Error envelope
//! GET  /api/v1/tournament          - Tournament status
//! GET  /api/v1/leaderboard         - Ranked best scores
//! GET  /api/v1/players/{account}   - Player statistics
//! GET  /health                     - Health check
//! ```
//!
//! # CORS
//!
//! Blink clients call from arbitrary origins, so CORS is permissive and
//! every response carries the action protocol headers.

pub mod actions;
pub mod errors;
pub mod request_id;
pub mod tournament;

use crate::config::ActionConfig;
use axum::{
    Router,
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use hand_cricket::{TournamentHandle, chain::ChainGateway};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Action protocol version advertised to clients
pub const ACTION_VERSION: &str = "2.4";

/// CAIP-2 id of the cluster the program lives on (devnet)
pub const BLOCKCHAIN_IDS: &str = "solana:EtWTRABZaYq6iMfeYKouRu166VU2xqa1";

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request; every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    /// Tournament actor handle
    pub tournament: TournamentHandle,
    /// Transaction encoder
    pub gateway: Arc<dyn ChainGateway>,
    pub action: Arc<ActionConfig>,
}

/// Create the complete router with all endpoints and middleware.
///
/// # Example
///
/// ```rust,no_run
/// # use hc_server::api::{create_router, AppState};
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// # let state: AppState = unimplemented!();
/// let app = create_router(state);
/// let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```
pub fn create_router(state: AppState) -> Router {
    let action_routes = Router::new()
        .route("/play", get(actions::get_action))
        .route("/play/register", post(actions::register))
        .route("/play/game", post(actions::play_game))
        .route("/play/leaderboard", post(actions::leaderboard))
        .route("/play/end", post(actions::end_tournament))
        .route("/play/{action}", post(actions::unknown_action));

    let v1_routes = Router::new()
        .route("/tournament", get(tournament::get_tournament))
        .route("/leaderboard", get(tournament::get_leaderboard))
        .route("/players/{account}", get(tournament::get_player));

    Router::new()
        .route("/health", get(health_check))
        .merge(action_routes)
        .nest("/api/v1", v1_routes)
        .layer(axum::middleware::from_fn(action_headers))
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Attach the action protocol headers to every response
async fn action_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert("x-action-version", HeaderValue::from_static(ACTION_VERSION));
    headers.insert("x-blockchain-ids", HeaderValue::from_static(BLOCKCHAIN_IDS));
    response
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` while the tournament actor answers, `503 Service
/// Unavailable` once it has stopped.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/health
/// # {"status":"healthy","tournament":{"open":true,"active":true},"timestamp":"..."}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.tournament.status().await.ok();
    let healthy = status.is_some();

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "tournament": {
            "open": healthy,
            "active": status.as_ref().is_some_and(|s| s.active),
            "registered_count": status.as_ref().map_or(0, |s| s.registered_count),
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
