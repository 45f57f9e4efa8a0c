//! Session module serializing tracker access through an async actor.
//!
//! The tracker runs inside a single Tokio task with an mpsc inbox. Request
//! handlers hold a cloneable [`TournamentHandle`] and receive each result on
//! a oneshot channel, so no two operations ever interleave.
//!
//! ## Example
//!
//! ```
//! use hand_cricket::identity::PlayerId;
//! use hand_cricket::session::TournamentActor;
//! use hand_cricket::tournament::{RandomDice, SessionTracker, TrackerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let admin = PlayerId::from_bytes([9; 32]);
//!     let tracker = SessionTracker::new(TrackerConfig::new(admin), Box::new(RandomDice::new()));
//!     let handle = TournamentActor::spawn(tracker);
//!
//!     handle.register(PlayerId::from_bytes([1; 32])).await.unwrap();
//!     assert_eq!(handle.status().await.unwrap().registered_count, 1);
//! }
//! ```

pub mod actor;
pub mod messages;

pub use actor::{SessionError, SessionResult, TournamentActor, TournamentHandle};
pub use messages::TournamentMessage;
