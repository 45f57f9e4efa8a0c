//! HTTP API client for the tournament action server.

use anyhow::{Context, Result};
use hand_cricket::{
    LeaderboardEntry, PlayerId,
    tournament::{PayoutPlan, PlayerStats, TournamentStatus},
};
use serde::{Deserialize, Serialize};

/// API client acting on behalf of one account
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
    account: PlayerId,
}

#[derive(Debug, Serialize)]
struct ActionRequest<'a> {
    account: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<ActionData>,
}

#[derive(Debug, Serialize)]
struct ActionData {
    options: String,
}

#[derive(Debug, Serialize)]
struct EndRequest<'a> {
    admin: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Reply to an action POST
#[derive(Debug, Clone, Deserialize)]
pub struct ActionReply {
    pub message: String,
    /// Unsigned transaction to sign, absent for read-only actions
    #[serde(default)]
    pub transaction: Option<String>,
}

/// Reply to the end request
#[derive(Debug, Clone, Deserialize)]
pub struct EndReply {
    pub message: String,
    pub transaction: String,
    pub winners: Vec<LeaderboardEntry>,
    pub payouts: PayoutPlan,
}

#[derive(Debug, Deserialize)]
struct LeaderboardBody {
    entries: Vec<LeaderboardEntry>,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: String, account: PlayerId) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            account,
        }
    }

    /// Account the client acts for
    pub fn account(&self) -> &PlayerId {
        &self.account
    }

    /// Register for the tournament
    pub async fn register(&self) -> Result<ActionReply> {
        self.post_action("register", None)
            .await
            .context("Registration failed")
    }

    /// Play one hand
    pub async fn play(&self, hand: u8) -> Result<ActionReply> {
        let data = ActionData {
            options: hand.to_string(),
        };
        self.post_action("game", Some(data))
            .await
            .context("Turn failed")
    }

    /// Leaderboard rendered as action text
    pub async fn leaderboard_text(&self) -> Result<ActionReply> {
        self.post_action("leaderboard", None)
            .await
            .context("Leaderboard request failed")
    }

    /// End the tournament as administrator
    pub async fn end_tournament(&self) -> Result<EndReply> {
        let request = EndRequest {
            admin: self.account.as_str(),
        };

        let response = self
            .client
            .post(format!("{}/play/end", self.base_url))
            .json(&request)
            .send()
            .await
            .context("Failed to send end request")?;

        if !response.status().is_success() {
            anyhow::bail!("Ending tournament failed: {}", error_message(response).await);
        }

        response
            .json()
            .await
            .context("Failed to parse end response")
    }

    /// Tournament summary
    pub async fn status(&self) -> Result<TournamentStatus> {
        self.get_json("/api/v1/tournament").await
    }

    /// Ranked best scores
    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        let body: LeaderboardBody = self.get_json("/api/v1/leaderboard").await?;
        Ok(body.entries)
    }

    /// Statistics of the client's account
    pub async fn player_stats(&self) -> Result<PlayerStats> {
        self.get_json(&format!("/api/v1/players/{}", self.account))
            .await
    }

    async fn post_action(&self, action: &str, data: Option<ActionData>) -> Result<ActionReply> {
        let request = ActionRequest {
            account: self.account.as_str(),
            data,
        };

        let response = self
            .client
            .post(format!("{}/play/{}", self.base_url, action))
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Failed to send {} request", action))?;

        if !response.status().is_success() {
            anyhow::bail!("{}", error_message(response).await);
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", action))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .with_context(|| format!("Failed to request {}", path))?;

        if !response.status().is_success() {
            anyhow::bail!("{}", error_message(response).await);
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse {}", path))
    }
}

/// Message from the server's error envelope, or the raw body
async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    match response.text().await {
        Ok(text) => serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.message)
            .unwrap_or_else(|_| format!("{} {}", status, text)),
        Err(e) => format!("Failed to read error response: {}", e),
    }
}
