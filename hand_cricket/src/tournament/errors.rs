//! Tracker error types.

use crate::identity::PlayerId;
use thiserror::Error;

/// Errors returned by tracker operations.
///
/// A failed operation leaves the tracker state unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    /// Tournament has ended
    #[error("Tournament is no longer active")]
    TournamentClosed,

    /// Capacity reached
    #[error("Tournament is full ({capacity} players max)")]
    TournamentFull { capacity: usize },

    /// Player already paid entry
    #[error("Player {0} is already registered")]
    AlreadyRegistered(PlayerId),

    /// Player must register before playing
    #[error("Player {0} is not registered")]
    NotRegistered(PlayerId),

    /// Hand value outside 1..=6
    #[error("Invalid choice {0}: must be between 1 and 6")]
    InvalidChoice(i64),

    /// Caller is not the tournament administrator
    #[error("Unauthorized: {0} is not the tournament administrator")]
    Unauthorized(PlayerId),
}

impl TrackerError {
    /// Get a client-safe error message.
    ///
    /// Account identifiers are left out so responses never echo state.
    pub fn client_message(&self) -> String {
        match self {
            TrackerError::TournamentClosed => "Tournament is no longer active".to_string(),
            TrackerError::TournamentFull { capacity } => {
                format!("Tournament is full ({} players max)", capacity)
            }
            TrackerError::AlreadyRegistered(_) => {
                "You are already registered for this tournament".to_string()
            }
            TrackerError::NotRegistered(_) => {
                "You must register for the tournament before playing".to_string()
            }
            TrackerError::InvalidChoice(_) => {
                "Invalid choice. Please choose a number between 1 and 6.".to_string()
            }
            TrackerError::Unauthorized(_) => "Unauthorized access".to_string(),
        }
    }

    /// Short machine-readable kind, used for logs and metrics labels
    pub fn kind(&self) -> &'static str {
        match self {
            TrackerError::TournamentClosed => "tournament_closed",
            TrackerError::TournamentFull { .. } => "tournament_full",
            TrackerError::AlreadyRegistered(_) => "already_registered",
            TrackerError::NotRegistered(_) => "not_registered",
            TrackerError::InvalidChoice(_) => "invalid_choice",
            TrackerError::Unauthorized(_) => "unauthorized",
        }
    }
}

/// Result type for tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;
