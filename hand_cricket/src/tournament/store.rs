//! Storage abstraction for tracker state.
//!
//! The tracker owns exactly one store for its whole lifetime. It is created
//! at service start and never implicitly reset.

use super::models::TournamentState;
use crate::identity::PlayerId;
use std::collections::{HashMap, HashSet};

/// Trait for tournament state storage.
///
/// Implementations do no validation; the tracker checks every precondition
/// before calling a mutating method.
pub trait TournamentStore: Send {
    /// Tournament-wide state
    fn state(&self) -> TournamentState;

    /// Flip the active flag
    fn set_active(&mut self, active: bool);

    /// Whether the player has registered
    fn is_registered(&self, player: &PlayerId) -> bool;

    /// Add a registration and bump the registered count
    fn add_registration(&mut self, player: PlayerId);

    /// Score of the live round, if one is in progress
    fn round_score(&self, player: &PlayerId) -> Option<u32>;

    /// Store the live round score
    fn set_round_score(&mut self, player: PlayerId, score: u32);

    /// Remove and return the live round score
    fn take_round_score(&mut self, player: &PlayerId) -> Option<u32>;

    /// Best completed-round score
    fn best_score(&self, player: &PlayerId) -> Option<u32>;

    /// Overwrite the best score, keeping the entry's original position
    fn set_best_score(&mut self, player: PlayerId, score: u32);

    /// All best scores in the order the entries were first recorded
    fn best_scores(&self) -> Vec<(PlayerId, u32)>;

    /// Completed rounds for a player
    fn games_played(&self, player: &PlayerId) -> u32;

    /// Record a completed round
    fn increment_games_played(&mut self, player: &PlayerId);
}

#[derive(Debug, Clone, Copy)]
struct BestEntry {
    score: u32,
    seq: u64,
}

/// In-memory store
#[derive(Debug)]
pub struct MemoryStore {
    state: TournamentState,
    registered: HashSet<PlayerId>,
    round_scores: HashMap<PlayerId, u32>,
    best_scores: HashMap<PlayerId, BestEntry>,
    games_played: HashMap<PlayerId, u32>,
    next_seq: u64,
}

impl MemoryStore {
    /// Create an empty store for a tournament of the given capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            state: TournamentState::new(capacity),
            registered: HashSet::new(),
            round_scores: HashMap::new(),
            best_scores: HashMap::new(),
            games_played: HashMap::new(),
            next_seq: 0,
        }
    }
}

impl TournamentStore for MemoryStore {
    fn state(&self) -> TournamentState {
        self.state
    }

    fn set_active(&mut self, active: bool) {
        self.state.active = active;
    }

    fn is_registered(&self, player: &PlayerId) -> bool {
        self.registered.contains(player)
    }

    fn add_registration(&mut self, player: PlayerId) {
        if self.registered.insert(player) {
            self.state.registered_count += 1;
        }
    }

    fn round_score(&self, player: &PlayerId) -> Option<u32> {
        self.round_scores.get(player).copied()
    }

    fn set_round_score(&mut self, player: PlayerId, score: u32) {
        self.round_scores.insert(player, score);
    }

    fn take_round_score(&mut self, player: &PlayerId) -> Option<u32> {
        self.round_scores.remove(player)
    }

    fn best_score(&self, player: &PlayerId) -> Option<u32> {
        self.best_scores.get(player).map(|entry| entry.score)
    }

    fn set_best_score(&mut self, player: PlayerId, score: u32) {
        match self.best_scores.get_mut(&player) {
            Some(entry) => entry.score = score,
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.best_scores.insert(player, BestEntry { score, seq });
            }
        }
    }

    fn best_scores(&self) -> Vec<(PlayerId, u32)> {
        let mut entries: Vec<(&PlayerId, &BestEntry)> = self.best_scores.iter().collect();
        entries.sort_by_key(|(_, entry)| entry.seq);
        entries
            .into_iter()
            .map(|(player, entry)| (player.clone(), entry.score))
            .collect()
    }

    fn games_played(&self, player: &PlayerId) -> u32 {
        self.games_played.get(player).copied().unwrap_or(0)
    }

    fn increment_games_played(&mut self, player: &PlayerId) {
        *self.games_played.entry(player.clone()).or_insert(0) += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(n: u8) -> PlayerId {
        PlayerId::from_bytes([n; 32])
    }

    #[test]
    fn test_registration_counts_once() {
        let mut store = MemoryStore::new(10);
        store.add_registration(player(1));
        store.add_registration(player(1));
        assert_eq!(store.state().registered_count, 1);
        assert!(store.is_registered(&player(1)));
        assert!(!store.is_registered(&player(2)));
    }

    #[test]
    fn test_take_round_score_clears() {
        let mut store = MemoryStore::new(10);
        store.set_round_score(player(1), 7);
        assert_eq!(store.take_round_score(&player(1)), Some(7));
        assert_eq!(store.round_score(&player(1)), None);
    }

    #[test]
    fn test_best_scores_keep_first_recorded_order() {
        let mut store = MemoryStore::new(10);
        store.set_best_score(player(3), 5);
        store.set_best_score(player(1), 9);
        store.set_best_score(player(3), 12);

        assert_eq!(
            store.best_scores(),
            vec![(player(3), 12), (player(1), 9)]
        );
    }

    #[test]
    fn test_games_played_default_zero() {
        let mut store = MemoryStore::new(10);
        assert_eq!(store.games_played(&player(1)), 0);
        store.increment_games_played(&player(1));
        store.increment_games_played(&player(1));
        assert_eq!(store.games_played(&player(1)), 2);
    }
}
