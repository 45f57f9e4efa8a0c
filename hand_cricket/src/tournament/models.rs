//! Tournament data models.

use crate::identity::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lamports per SOL
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Default entry fee (0.1 SOL)
pub const DEFAULT_ENTRY_FEE: u64 = LAMPORTS_PER_SOL / 10;

/// Default maximum number of registrants
pub const DEFAULT_CAPACITY: usize = 100;

/// Default leaderboard length
pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

/// Default number of ranked winners returned when the tournament ends
pub const DEFAULT_WINNER_COUNT: usize = 5;

/// Lowest legal hand value
pub const MIN_CHOICE: u8 = 1;

/// Highest legal hand value
pub const MAX_CHOICE: u8 = 6;

/// Tournament configuration supplied at construction time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Maximum registrants
    pub capacity: usize,
    /// Identity authorized to end the tournament
    pub admin: PlayerId,
    /// Entry fee in lamports (informational, used for pot and payouts)
    pub entry_fee: u64,
    /// Whether turns are still honored after the tournament ends
    pub allow_play_after_end: bool,
    /// Length of the public leaderboard
    pub leaderboard_size: usize,
    /// Number of ranked winners returned by end of tournament
    pub winner_count: usize,
}

impl TrackerConfig {
    /// Create a configuration with default capacity, fee and sizes
    pub fn new(admin: PlayerId) -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            admin,
            entry_fee: DEFAULT_ENTRY_FEE,
            allow_play_after_end: true,
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
            winner_count: DEFAULT_WINNER_COUNT,
        }
    }

    /// Set capacity
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set entry fee
    pub fn with_entry_fee(mut self, entry_fee: u64) -> Self {
        self.entry_fee = entry_fee;
        self
    }

    /// Set the play-after-end policy
    pub fn with_play_after_end(mut self, allow: bool) -> Self {
        self.allow_play_after_end = allow;
        self
    }
}

/// Tournament-wide state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentState {
    /// Accepting registrations
    pub active: bool,
    /// Maximum registrants
    pub capacity: usize,
    /// Current registrants
    pub registered_count: usize,
}

impl TournamentState {
    /// Fresh tournament with no registrants
    pub fn new(capacity: usize) -> Self {
        Self {
            active: true,
            capacity,
            registered_count: 0,
        }
    }

    /// Whether another registration fits
    pub fn has_room(&self) -> bool {
        self.registered_count < self.capacity
    }
}

/// Outcome of a single turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    /// Hand the player showed
    pub player_choice: u8,
    /// Hand the computer drew
    pub computer_choice: u8,
    /// Whether the hands matched
    pub is_out: bool,
    /// Running total, or the final score when out
    pub score: u32,
    /// Whether this round set a new personal best
    pub new_best: bool,
}

/// One ranked leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-indexed rank
    pub rank: usize,
    /// Player
    pub player: PlayerId,
    /// Best completed-round score
    pub score: u32,
}

/// Per-player lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerPhase {
    /// Not yet paid entry
    Unregistered,
    /// Registered, no turn taken yet
    Registered,
    /// Round live, score accumulating
    InRound,
    /// Last round ended with an out
    RoundOver,
}

/// Player statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub player: PlayerId,
    pub phase: PlayerPhase,
    /// Score of the live round, if any
    pub round_score: Option<u32>,
    pub best_score: u32,
    /// Completed rounds
    pub games_played: u32,
}

/// Tournament status summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentStatus {
    pub active: bool,
    pub capacity: usize,
    pub registered_count: usize,
    /// Entry fee in lamports
    pub entry_fee: u64,
    /// Collected fees in lamports
    pub prize_pot: u64,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

/// Result of ending the tournament
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentResult {
    /// Ranked winners, best first
    pub winners: Vec<LeaderboardEntry>,
    /// Collected fees in lamports
    pub prize_pot: u64,
    pub ended_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> PlayerId {
        PlayerId::from_bytes([9; 32])
    }

    #[test]
    fn test_default_config() {
        let config = TrackerConfig::new(admin());
        assert_eq!(config.capacity, 100);
        assert_eq!(config.entry_fee, 100_000_000);
        assert!(config.allow_play_after_end);
        assert_eq!(config.leaderboard_size, 10);
        assert_eq!(config.winner_count, 5);
    }

    #[test]
    fn test_config_builders() {
        let config = TrackerConfig::new(admin())
            .with_capacity(2)
            .with_entry_fee(5)
            .with_play_after_end(false);
        assert_eq!(config.capacity, 2);
        assert_eq!(config.entry_fee, 5);
        assert!(!config.allow_play_after_end);
    }

    #[test]
    fn test_state_has_room() {
        let mut state = TournamentState::new(1);
        assert!(state.active);
        assert!(state.has_room());
        state.registered_count = 1;
        assert!(!state.has_room());
    }
}
