//! Tournament session tracking.
//!
//! This module mirrors the on-chain tournament in process memory:
//! - Player registration against a fixed capacity
//! - Turn resolution against an injectable dice source
//! - Running round scores and monotonic best scores
//! - Leaderboard ranking and end-of-tournament winners
//!
//! ## Example
//!
//! ```
//! use hand_cricket::identity::PlayerId;
//! use hand_cricket::tournament::{ScriptedDice, SessionTracker, TrackerConfig};
//!
//! let admin = PlayerId::from_bytes([9; 32]);
//! let player = PlayerId::from_bytes([1; 32]);
//!
//! let config = TrackerConfig::new(admin).with_capacity(2);
//! let mut tracker = SessionTracker::new(config, Box::new(ScriptedDice::new([5, 4])));
//!
//! tracker.register(player.clone()).unwrap();
//! assert_eq!(tracker.play_turn(&player, 3).unwrap().score, 3);
//!
//! let out = tracker.play_turn(&player, 4).unwrap();
//! assert!(out.is_out);
//! assert_eq!(out.score, 3);
//! assert_eq!(tracker.leaderboard()[0].score, 3);
//! ```

pub mod dice;
pub mod errors;
pub mod models;
pub mod payout;
pub mod store;
pub mod tracker;

pub use dice::{DiceRoller, RandomDice, ScriptedDice};
pub use errors::{TrackerError, TrackerResult};
pub use models::{
    LeaderboardEntry, PlayerPhase, PlayerStats, TournamentResult, TournamentState,
    TournamentStatus, TrackerConfig, TurnOutcome,
};
pub use payout::{Payout, PayoutPlan};
pub use store::{MemoryStore, TournamentStore};
pub use tracker::SessionTracker;
