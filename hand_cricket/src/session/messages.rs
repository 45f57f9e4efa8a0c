//! Session actor message types.

use crate::identity::PlayerId;
use crate::tournament::{
    LeaderboardEntry, PlayerStats, TournamentResult, TournamentStatus, TrackerResult, TurnOutcome,
};
use tokio::sync::oneshot;

/// Messages that can be sent to a [`TournamentActor`](super::TournamentActor)
#[derive(Debug)]
pub enum TournamentMessage {
    /// Register a player
    Register {
        player: PlayerId,
        response: oneshot::Sender<TrackerResult<()>>,
    },

    /// Play one turn
    PlayTurn {
        player: PlayerId,
        choice: i64,
        response: oneshot::Sender<TrackerResult<TurnOutcome>>,
    },

    /// End the tournament (admin only)
    EndTournament {
        admin: PlayerId,
        response: oneshot::Sender<TrackerResult<TournamentResult>>,
    },

    /// Read the leaderboard
    GetLeaderboard {
        response: oneshot::Sender<Vec<LeaderboardEntry>>,
    },

    /// Read the tournament summary
    GetStatus {
        response: oneshot::Sender<TournamentStatus>,
    },

    /// Read one player's statistics
    GetPlayerStats {
        player: PlayerId,
        response: oneshot::Sender<PlayerStats>,
    },

    /// Stop the actor
    Close,
}
