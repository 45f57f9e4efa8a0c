//! # Hand Cricket
//!
//! Session tracking for a hand cricket dice tournament played through
//! blockchain action links.
//!
//! A player registers by paying an entry fee, then plays turns: each turn
//! they show a hand from 1 to 6 while the computer draws one at random.
//! Different hands add the player's value to the running score; matching
//! hands put the player out and close the round. The best completed round
//! counts for the leaderboard, and the administrator ends the tournament
//! to rank the winners.
//!
//! ## Core Modules
//!
//! - [`identity`]: Base58 account identifiers
//! - [`tournament`]: Tracker state machine, store, dice, and payouts
//! - [`session`]: Async actor serializing tracker access
//! - [`chain`]: Descriptions of the external program calls
//!
//! ## Example
//!
//! ```
//! use hand_cricket::{PlayerId, SessionTracker, TrackerConfig, ScriptedDice};
//!
//! let admin = PlayerId::from_bytes([9; 32]);
//! let mut tracker = SessionTracker::new(TrackerConfig::new(admin), Box::new(ScriptedDice::new([2])));
//!
//! let player = PlayerId::from_bytes([1; 32]);
//! tracker.register(player.clone()).unwrap();
//! assert_eq!(tracker.play_turn(&player, 5).unwrap().score, 5);
//! ```

pub mod chain;
pub mod identity;
pub mod session;
pub mod tournament;

pub use identity::{IdentifierError, PlayerId};
pub use session::{SessionError, TournamentActor, TournamentHandle};
pub use tournament::{
    DiceRoller, LeaderboardEntry, RandomDice, ScriptedDice, SessionTracker, TrackerConfig,
    TrackerError, TurnOutcome,
};
