//! Tournament actor serializing every tracker operation.

use super::messages::TournamentMessage;
use crate::identity::PlayerId;
use crate::tournament::{
    LeaderboardEntry, PlayerStats, SessionTracker, TournamentResult, TournamentStatus,
    TrackerError, TurnOutcome,
};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

/// Inbox capacity
const INBOX_CAPACITY: usize = 256;

/// Errors returned through a [`TournamentHandle`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The tracker rejected the operation
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    /// The actor has stopped
    #[error("Tournament session is closed")]
    Closed,
}

impl SessionError {
    /// Get a client-safe error message
    pub fn client_message(&self) -> String {
        match self {
            SessionError::Tracker(e) => e.client_message(),
            SessionError::Closed => "Tournament service unavailable".to_string(),
        }
    }
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Tournament actor handle for sending messages
#[derive(Clone)]
pub struct TournamentHandle {
    sender: mpsc::Sender<TournamentMessage>,
}

impl TournamentHandle {
    /// Create a new handle
    pub fn new(sender: mpsc::Sender<TournamentMessage>) -> Self {
        Self { sender }
    }

    /// Send a raw message to the actor
    pub async fn send(&self, message: TournamentMessage) -> SessionResult<()> {
        self.sender
            .send(message)
            .await
            .map_err(|_| SessionError::Closed)
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> TournamentMessage,
    ) -> SessionResult<T> {
        let (response_tx, response_rx) = oneshot::channel();
        self.send(build(response_tx)).await?;
        response_rx.await.map_err(|_| SessionError::Closed)
    }

    /// Register a player
    pub async fn register(&self, player: PlayerId) -> SessionResult<()> {
        self.request(|response| TournamentMessage::Register { player, response })
            .await?
            .map_err(SessionError::from)
    }

    /// Play one turn
    pub async fn play_turn(&self, player: PlayerId, choice: i64) -> SessionResult<TurnOutcome> {
        self.request(|response| TournamentMessage::PlayTurn {
            player,
            choice,
            response,
        })
        .await?
        .map_err(SessionError::from)
    }

    /// End the tournament
    pub async fn end_tournament(&self, admin: PlayerId) -> SessionResult<TournamentResult> {
        self.request(|response| TournamentMessage::EndTournament { admin, response })
            .await?
            .map_err(SessionError::from)
    }

    /// Current leaderboard
    pub async fn leaderboard(&self) -> SessionResult<Vec<LeaderboardEntry>> {
        self.request(|response| TournamentMessage::GetLeaderboard { response })
            .await
    }

    /// Tournament summary
    pub async fn status(&self) -> SessionResult<TournamentStatus> {
        self.request(|response| TournamentMessage::GetStatus { response })
            .await
    }

    /// Player statistics
    pub async fn player_stats(&self, player: PlayerId) -> SessionResult<PlayerStats> {
        self.request(|response| TournamentMessage::GetPlayerStats { player, response })
            .await
    }

    /// Ask the actor to stop
    pub async fn close(&self) -> SessionResult<()> {
        self.send(TournamentMessage::Close).await
    }

    /// Whether the actor is still accepting messages
    pub fn is_open(&self) -> bool {
        !self.sender.is_closed()
    }
}

/// Actor owning the session tracker.
///
/// Each message is handled to completion before the next is received, so
/// the check-then-write sequence of one operation never interleaves with
/// another. Handlers do no I/O.
pub struct TournamentActor {
    tracker: SessionTracker,
    inbox: mpsc::Receiver<TournamentMessage>,
}

impl TournamentActor {
    /// Create a new actor and its handle
    pub fn new(tracker: SessionTracker) -> (Self, TournamentHandle) {
        let (sender, inbox) = mpsc::channel(INBOX_CAPACITY);
        let actor = Self { tracker, inbox };
        (actor, TournamentHandle::new(sender))
    }

    /// Create the actor and spawn it on the current Tokio runtime
    pub fn spawn(tracker: SessionTracker) -> TournamentHandle {
        let (actor, handle) = Self::new(tracker);
        tokio::spawn(actor.run());
        handle
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        log::info!(
            "Tournament session starting (capacity {})",
            self.tracker.config().capacity
        );

        while let Some(message) = self.inbox.recv().await {
            if !self.handle_message(message) {
                break;
            }
        }

        log::info!("Tournament session closed");
    }

    /// Handle one message, returning false once the actor should stop
    fn handle_message(&mut self, message: TournamentMessage) -> bool {
        match message {
            TournamentMessage::Register { player, response } => {
                let result = self.tracker.register(player);
                if let Err(ref e) = result {
                    log::debug!("Registration rejected: {}", e);
                }
                let _ = response.send(result);
            }

            TournamentMessage::PlayTurn {
                player,
                choice,
                response,
            } => {
                let result = self.tracker.play_turn(&player, choice);
                if let Err(ref e) = result {
                    log::debug!("Turn rejected: {}", e);
                }
                let _ = response.send(result);
            }

            TournamentMessage::EndTournament { admin, response } => {
                let result = self.tracker.end_tournament(&admin);
                if let Err(ref e) = result {
                    log::warn!("End of tournament rejected: {}", e);
                }
                let _ = response.send(result);
            }

            TournamentMessage::GetLeaderboard { response } => {
                let _ = response.send(self.tracker.leaderboard());
            }

            TournamentMessage::GetStatus { response } => {
                let _ = response.send(self.tracker.status());
            }

            TournamentMessage::GetPlayerStats { player, response } => {
                let _ = response.send(self.tracker.player_stats(&player));
            }

            TournamentMessage::Close => return false,
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::{ScriptedDice, TrackerConfig};

    fn player(n: u8) -> PlayerId {
        PlayerId::from_bytes([n; 32])
    }

    fn spawn(capacity: usize, dice: ScriptedDice) -> TournamentHandle {
        let config = TrackerConfig::new(player(200)).with_capacity(capacity);
        TournamentActor::spawn(SessionTracker::new(config, Box::new(dice)))
    }

    #[tokio::test]
    async fn test_register_through_handle() {
        let handle = spawn(2, ScriptedDice::default());
        handle.register(player(1)).await.unwrap();
        assert_eq!(
            handle.register(player(1)).await,
            Err(SessionError::Tracker(TrackerError::AlreadyRegistered(
                player(1)
            )))
        );
        assert_eq!(handle.status().await.unwrap().registered_count, 1);
    }

    #[tokio::test]
    async fn test_concurrent_registrations_never_overshoot() {
        let handle = spawn(10, ScriptedDice::default());

        let mut tasks = Vec::new();
        for n in 0..50u8 {
            let handle = handle.clone();
            tasks.push(tokio::spawn(async move { handle.register(player(n)).await }));
        }

        let mut accepted = 0;
        let mut full = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(()) => accepted += 1,
                Err(SessionError::Tracker(TrackerError::TournamentFull { .. })) => full += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(accepted, 10);
        assert_eq!(full, 40);
        assert_eq!(handle.status().await.unwrap().registered_count, 10);
    }

    #[tokio::test]
    async fn test_turn_and_leaderboard() {
        let handle = spawn(2, ScriptedDice::new([5, 4]));
        handle.register(player(1)).await.unwrap();

        let turn = handle.play_turn(player(1), 3).await.unwrap();
        assert_eq!(turn.score, 3);
        let out = handle.play_turn(player(1), 4).await.unwrap();
        assert!(out.is_out);

        let board = handle.leaderboard().await.unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].player, player(1));
        assert_eq!(board[0].score, 3);
    }

    #[tokio::test]
    async fn test_closed_actor_reports_closed() {
        let handle = spawn(2, ScriptedDice::default());
        handle.close().await.unwrap();

        // Wait for the actor to drop its inbox
        while handle.is_open() {
            tokio::task::yield_now().await;
        }

        assert_eq!(handle.register(player(1)).await, Err(SessionError::Closed));
        assert_eq!(
            SessionError::Closed.client_message(),
            "Tournament service unavailable"
        );
    }
}
