//! JSON read endpoints for dashboards and the command-line client.

use axum::{
    Json,
    extract::{Path, State},
};
use hand_cricket::{
    LeaderboardEntry, PlayerId,
    tournament::{PlayerStats, TournamentStatus},
};
use serde::{Deserialize, Serialize};

use super::{AppState, errors::ApiResult};

/// Leaderboard body. `entries` is empty until a round completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    pub entries: Vec<LeaderboardEntry>,
}

/// Tournament summary.
///
/// # Response
///
/// ```json
/// {
///   "active": true,
///   "capacity": 100,
///   "registered_count": 2,
///   "entry_fee": 100000000,
///   "prize_pot": 200000000,
///   "started_at": "2025-01-01T00:00:00Z",
///   "ended_at": null
/// }
/// ```
pub async fn get_tournament(State(state): State<AppState>) -> ApiResult<Json<TournamentStatus>> {
    Ok(Json(state.tournament.status().await?))
}

/// Ranked best scores
pub async fn get_leaderboard(State(state): State<AppState>) -> ApiResult<Json<LeaderboardResponse>> {
    let entries = state.tournament.leaderboard().await?;
    Ok(Json(LeaderboardResponse { entries }))
}

/// Statistics for one account.
///
/// # Errors
///
/// - `400 Bad Request`: malformed account
pub async fn get_player(
    State(state): State<AppState>,
    Path(account): Path<String>,
) -> ApiResult<Json<PlayerStats>> {
    let player = PlayerId::parse(&account)?;
    Ok(Json(state.tournament.player_stats(player).await?))
}
