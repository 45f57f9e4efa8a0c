//! Blink action handlers.
//!
//! Each POST parses the caller account, asks the tournament actor for a
//! decision, then describes the matching program call through the chain
//! gateway. The gateway is only reached after the actor has replied.
//!
//! # Examples
//!
//! Register:
//! ```bash
//! curl -X POST http://localhost:8080/play/register \
//!   -H "Content-Type: application/json" \
//!   -d '{"account": "9AhjZ7ybup47fvJNvFMCxhxVz3qs4serqVEXWmGAoMTx"}'
//! ```
//!
//! Play a hand of 4:
//! ```bash
//! curl -X POST http://localhost:8080/play/game \
//!   -H "Content-Type: application/json" \
//!   -d '{"account": "9AhjZ7ybup47fvJNvFMCxhxVz3qs4serqVEXWmGAoMTx", "data": {"options": "4"}}'
//! ```

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
};
use hand_cricket::{
    LeaderboardEntry, PlayerId, TrackerError,
    chain::InstructionRequest,
    tournament::{PayoutPlan, models::LAMPORTS_PER_SOL},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use super::{
    AppState,
    errors::{ApiError, ApiResult},
    request_id::RequestId,
};
use crate::{logging, metrics};

const ACTION_TYPE: &str = "action";
const TRANSACTION_TYPE: &str = "transaction";
const INLINE_TYPE: &str = "inline";

/// Action metadata rendered by Blink clients
#[derive(Debug, Clone, Serialize)]
pub struct ActionMetadata {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub icon: String,
    pub label: String,
    pub title: String,
    pub description: String,
    pub links: ActionLinks,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionLinks {
    pub actions: Vec<LinkedAction>,
}

/// One button of an action
#[derive(Debug, Clone, Serialize)]
pub struct LinkedAction {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub label: String,
    pub parameters: Vec<ActionParameter>,
    pub href: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionParameter {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: String,
    pub options: Vec<ParameterOption>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParameterOption {
    pub label: String,
    pub value: String,
    pub selected: bool,
}

/// Response to an action POST
#[derive(Debug, Clone, Serialize)]
pub struct ActionPostResponse {
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Encoded unsigned transaction, absent for read-only actions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction: Option<String>,
    pub message: String,
    pub links: NextLinks,
}

#[derive(Debug, Clone, Serialize)]
pub struct NextLinks {
    pub next: NextAction,
}

#[derive(Debug, Clone, Serialize)]
pub struct NextAction {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub action: ActionMetadata,
}

/// Response to the administrator's end request
#[derive(Debug, Clone, Serialize)]
pub struct EndTournamentResponse {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub transaction: String,
    pub message: String,
    pub winners: Vec<LeaderboardEntry>,
    pub payouts: PayoutPlan,
}

/// Body of an action POST
#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub account: String,
    #[serde(default)]
    pub data: Option<ActionData>,
    #[serde(default)]
    pub params: Option<ActionData>,
}

/// Parameters chosen in the client
#[derive(Debug, Default, Deserialize)]
pub struct ActionData {
    #[serde(default)]
    pub options: Option<Value>,
}

/// Body of the administrator's end request
#[derive(Debug, Deserialize)]
pub struct EndTournamentRequest {
    #[serde(default)]
    pub admin: Option<String>,
}

/// Describe the tournament action.
///
/// # Response
///
/// Returns `200 OK` with the action metadata: a register button and a play
/// button carrying the six hand values.
pub async fn get_action(State(state): State<AppState>) -> Json<ActionMetadata> {
    let fee = format_sol(state.action.entry_fee);
    Json(state.metadata(
        "Hand Cricket Tournament 🏆",
        "Hand Cricket Tournament 🏆",
        format!("Join the Hand Cricket Tournament! Entry fee: {} SOL", fee),
        vec![
            LinkedAction::new("Register for Tournament", "/play/register", vec![]),
            play_action("Play Hand Cricket"),
        ],
    ))
}

/// Register the caller for the tournament.
///
/// # Errors
///
/// - `400 Bad Request`: malformed account, tournament closed or full, already registered
/// - `503 Service Unavailable`: tournament actor stopped
pub async fn register(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<ActionPostResponse>> {
    let request: ActionRequest = parse_body(&body)?;
    let player = PlayerId::parse(&request.account)?;

    state
        .tournament
        .register(player.clone())
        .await
        .map_err(|e| reject("register", Some(&player), e))?;

    metrics::registrations_total();
    if let Ok(status) = state.tournament.status().await {
        metrics::registered_players(status.registered_count);
        metrics::prize_pot_lamports(status.prize_pot);
    }
    logging::log_tournament_event("register", Some(player.as_str()), "Player registered");

    let instruction = InstructionRequest::register(state.action.program_id.clone(), player);
    let prepared = state.gateway.prepare(&instruction).await?;

    let message = format!(
        "Registration successful! You've paid {} SOL to enter the tournament. You can now play the game.",
        format_sol(state.action.entry_fee)
    );
    let next = state.metadata(
        "Play Hand Cricket",
        "Hand Cricket Tournament 🏏",
        "You're registered! Play your turn now.".to_string(),
        vec![play_action("Play Turn")],
    );

    Ok(Json(ActionPostResponse::new(
        Some(prepared.transaction),
        message,
        next,
    )))
}

/// Play one hand.
///
/// The hand is read from `params.options`, falling back to `data.options`.
///
/// # Errors
///
/// - `400 Bad Request`: malformed account, missing or invalid hand, not registered
/// - `503 Service Unavailable`: tournament actor stopped
pub async fn play_game(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<ActionPostResponse>> {
    let request: ActionRequest = parse_body(&body)?;
    let player = PlayerId::parse(&request.account)?;
    let choice = requested_choice(&request).map_err(|e| reject("game", Some(&player), e))?;

    let outcome = state
        .tournament
        .play_turn(player.clone(), choice)
        .await
        .map_err(|e| reject("game", Some(&player), e))?;

    metrics::turns_total(outcome.is_out);

    let instruction = InstructionRequest::play_turn(
        state.action.program_id.clone(),
        player.clone(),
        outcome.player_choice,
    );
    let prepared = state.gateway.prepare(&instruction).await?;

    let (message, next) = if outcome.is_out {
        metrics::round_score_runs(outcome.score);
        logging::log_tournament_event(
            "out",
            Some(player.as_str()),
            &format!("Round over with {} runs", outcome.score),
        );

        (
            format!(
                "OUT! Computer played {}. Game Over! Final Score: {} runs 🏏",
                outcome.computer_choice, outcome.score
            ),
            state.metadata(
                "Game Over",
                "Hand Cricket - Game Over! 🏏",
                format!("Game Over! Final Score: {} runs 🎯", outcome.score),
                vec![play_action("Play Again"), leaderboard_action()],
            ),
        )
    } else {
        (
            format!(
                "You played {}, Computer played {}. Current Score: {} runs 🏏",
                outcome.player_choice, outcome.computer_choice, outcome.score
            ),
            state.metadata(
                "Continue Playing",
                "Play Hand Cricket ☝️ ✌️ 🖐️",
                format!(
                    "Current Score: {} runs. Play your next turn! 🏏",
                    outcome.score
                ),
                vec![play_action("Play Turn")],
            ),
        )
    };

    Ok(Json(ActionPostResponse::new(
        Some(prepared.transaction),
        message,
        next,
    )))
}

/// Show the leaderboard as action text. Read-only, no transaction.
///
/// # Errors
///
/// - `400 Bad Request`: malformed account
/// - `503 Service Unavailable`: tournament actor stopped
pub async fn leaderboard(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<ActionPostResponse>> {
    let request: ActionRequest = parse_body(&body)?;
    PlayerId::parse(&request.account)?;

    let entries = state.tournament.leaderboard().await?;
    let next = state.metadata(
        "Back to Game",
        "Hand Cricket Tournament 🏏",
        "Play the Hand Cricket tournament game".to_string(),
        vec![play_action("Play Turn")],
    );

    Ok(Json(ActionPostResponse::new(
        None,
        format_leaderboard(&entries),
        next,
    )))
}

/// End the tournament and describe the reward distribution.
///
/// # Errors
///
/// - `400 Bad Request`: malformed admin key, caller is not the administrator,
///   tournament already ended
/// - `503 Service Unavailable`: tournament actor stopped
pub async fn end_tournament(
    State(state): State<AppState>,
    request_id: RequestId,
    body: Bytes,
) -> ApiResult<Json<EndTournamentResponse>> {
    let request: EndTournamentRequest = parse_body(&body)?;
    let admin = request
        .admin
        .as_deref()
        .map(PlayerId::parse)
        .and_then(Result::ok)
        .ok_or_else(|| reject("end", None, ApiError::InvalidAdmin))?;

    let result = state
        .tournament
        .end_tournament(admin.clone())
        .await
        .map_err(|e| reject("end", Some(&admin), e))?;

    let payouts = PayoutPlan::compute(result.prize_pot, &result.winners);
    metrics::tournaments_ended_total();
    tracing::info!(
        request_id = %request_id.as_str(),
        winners = result.winners.len(),
        prize_pot = result.prize_pot,
        "Tournament ended"
    );

    let winner_keys = result.winners.iter().map(|w| w.player.clone()).collect();
    let instruction = InstructionRequest::end_tournament(
        state.action.program_id.clone(),
        admin,
        winner_keys,
    );
    let prepared = state.gateway.prepare(&instruction).await?;

    let message = if result.winners.is_empty() {
        "Tournament ended. No completed rounds to reward.".to_string()
    } else {
        format!(
            "Tournament ended. Rewards distributed to top {} players.",
            result.winners.len()
        )
    };

    Ok(Json(EndTournamentResponse {
        kind: TRANSACTION_TYPE,
        transaction: prepared.transaction,
        message,
        winners: result.winners,
        payouts,
    }))
}

/// Fallback for unknown action paths
pub async fn unknown_action(Path(action): Path<String>) -> ApiError {
    reject("unknown", None, ApiError::UnknownAction(action))
}

impl AppState {
    fn metadata(
        &self,
        label: &str,
        title: &str,
        description: String,
        actions: Vec<LinkedAction>,
    ) -> ActionMetadata {
        ActionMetadata {
            kind: ACTION_TYPE,
            icon: self.action.icon_url.clone(),
            label: label.to_string(),
            title: title.to_string(),
            description,
            links: ActionLinks { actions },
        }
    }
}

impl LinkedAction {
    fn new(label: &str, href: &str, parameters: Vec<ActionParameter>) -> Self {
        Self {
            kind: TRANSACTION_TYPE,
            label: label.to_string(),
            parameters,
            href: href.to_string(),
        }
    }
}

impl ActionPostResponse {
    fn new(transaction: Option<String>, message: String, next: ActionMetadata) -> Self {
        Self {
            kind: TRANSACTION_TYPE,
            transaction,
            message,
            links: NextLinks {
                next: NextAction {
                    kind: INLINE_TYPE,
                    action: next,
                },
            },
        }
    }
}

fn hand_parameter() -> ActionParameter {
    ActionParameter {
        kind: "radio",
        name: "options".to_string(),
        options: (1..=6)
            .map(|n| ParameterOption {
                label: format!("Play {}", n),
                value: n.to_string(),
                selected: false,
            })
            .collect(),
    }
}

fn play_action(label: &str) -> LinkedAction {
    LinkedAction::new(label, "/play/game", vec![hand_parameter()])
}

fn leaderboard_action() -> LinkedAction {
    LinkedAction::new("View Tournament Leaderboard", "/play/leaderboard", vec![])
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    serde_json::from_slice(body).map_err(|e| ApiError::InvalidBody(e.to_string()))
}

/// Hand value from `params.options` or `data.options`, as a string or number.
///
/// A well-formed number that is not a whole `i64` (too large, or with a
/// fraction) is an invalid choice rather than invalid options.
fn requested_choice(request: &ActionRequest) -> ApiResult<i64> {
    let value = request
        .params
        .as_ref()
        .and_then(|p| p.options.as_ref())
        .or_else(|| request.data.as_ref().and_then(|d| d.options.as_ref()))
        .ok_or(ApiError::InvalidOptions)?;

    let number = match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(choice) = s.parse::<i64>() {
                return Ok(choice);
            }
            s.parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .ok_or(ApiError::InvalidOptions)?
        }
        Value::Number(n) => match n.as_i64() {
            Some(choice) => return Ok(choice),
            None => n.as_f64().ok_or(ApiError::InvalidOptions)?,
        },
        _ => return Err(ApiError::InvalidOptions),
    };

    // `as` saturates out-of-range floats
    Err(TrackerError::InvalidChoice(number as i64).into())
}

/// Log and count a rejected action
fn reject(action: &str, account: Option<&PlayerId>, err: impl Into<ApiError>) -> ApiError {
    let err = err.into();
    metrics::rejections_total(action, err.kind());
    logging::log_rejection(action, err.kind(), account.map(PlayerId::as_str));
    err
}

/// Render the leaderboard as action text
pub fn format_leaderboard(entries: &[LeaderboardEntry]) -> String {
    let mut text = String::from("🏆 Tournament Leaderboard 🏆\n\n");

    if entries.is_empty() {
        text.push_str("No scores recorded yet!");
        return text;
    }

    for entry in entries {
        text.push_str(&format!(
            "{}. {}: {} runs\n",
            entry.rank,
            entry.player.short(),
            entry.score
        ));
    }

    text
}

/// Render lamports as a decimal SOL amount without float rounding
pub fn format_sol(lamports: u64) -> String {
    let whole = lamports / LAMPORTS_PER_SOL;
    let fraction = lamports % LAMPORTS_PER_SOL;
    if fraction == 0 {
        return whole.to_string();
    }

    let digits = format!("{:09}", fraction);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}
