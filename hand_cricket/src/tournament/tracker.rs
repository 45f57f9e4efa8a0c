//! Tournament session tracker.
//!
//! The tracker is the single authority on whether a request is valid. It
//! mirrors the external program's tournament state in memory and decides
//! the outcome of each turn before any transaction is described.

use super::{
    dice::DiceRoller,
    errors::{TrackerError, TrackerResult},
    models::{
        LeaderboardEntry, MAX_CHOICE, MIN_CHOICE, PlayerPhase, PlayerStats, TournamentResult,
        TournamentStatus, TrackerConfig, TurnOutcome,
    },
    store::{MemoryStore, TournamentStore},
};
use crate::identity::PlayerId;
use chrono::{DateTime, Utc};

/// Session tracker
pub struct SessionTracker {
    config: TrackerConfig,
    store: Box<dyn TournamentStore>,
    dice: Box<dyn DiceRoller>,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
}

impl SessionTracker {
    /// Create a tracker with a fresh in-memory store
    pub fn new(config: TrackerConfig, dice: Box<dyn DiceRoller>) -> Self {
        let store = Box::new(MemoryStore::new(config.capacity));
        Self::with_store(config, store, dice)
    }

    /// Create a tracker over an existing store.
    ///
    /// The store's capacity is authoritative; the config is updated to match.
    pub fn with_store(
        mut config: TrackerConfig,
        store: Box<dyn TournamentStore>,
        dice: Box<dyn DiceRoller>,
    ) -> Self {
        let capacity = store.state().capacity;
        if config.capacity != capacity {
            log::warn!(
                "Configured capacity {} differs from store capacity {}; using the store's",
                config.capacity,
                capacity
            );
            config.capacity = capacity;
        }

        Self {
            config,
            store,
            dice,
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Register a player.
    ///
    /// # Errors
    ///
    /// - `TournamentClosed` once the tournament has ended
    /// - `TournamentFull` when capacity is reached
    /// - `AlreadyRegistered` on a repeat registration
    pub fn register(&mut self, player: PlayerId) -> TrackerResult<()> {
        let state = self.store.state();

        if !state.active {
            return Err(TrackerError::TournamentClosed);
        }

        if !state.has_room() {
            return Err(TrackerError::TournamentFull {
                capacity: state.capacity,
            });
        }

        if self.store.is_registered(&player) {
            return Err(TrackerError::AlreadyRegistered(player));
        }

        log::info!(
            "Player {} registered ({}/{})",
            player,
            state.registered_count + 1,
            state.capacity
        );
        self.store.add_registration(player);

        Ok(())
    }

    /// Play one turn.
    ///
    /// The choice is validated before registration so an out-of-range hand
    /// is always reported as such. The out turn's own choice never counts.
    ///
    /// # Errors
    ///
    /// - `TournamentClosed` if the tournament ended and play after end is disabled
    /// - `InvalidChoice` for a hand outside 1..=6
    /// - `NotRegistered` if the player never registered
    pub fn play_turn(&mut self, player: &PlayerId, choice: i64) -> TrackerResult<TurnOutcome> {
        if !self.config.allow_play_after_end && !self.store.state().active {
            return Err(TrackerError::TournamentClosed);
        }

        let player_choice = validate_choice(choice)?;

        if !self.store.is_registered(player) {
            return Err(TrackerError::NotRegistered(player.clone()));
        }

        let computer_choice = self.dice.roll();
        let current = self.store.round_score(player).unwrap_or(0);

        if player_choice != computer_choice {
            let score = current.saturating_add(player_choice as u32);
            self.store.set_round_score(player.clone(), score);

            log::debug!(
                "Player {} played {}, computer {}: score {}",
                player,
                player_choice,
                computer_choice,
                score
            );

            return Ok(TurnOutcome {
                player_choice,
                computer_choice,
                is_out: false,
                score,
                new_best: false,
            });
        }

        // Out: close the round
        let final_score = self.store.take_round_score(player).unwrap_or(0);
        let best = self.store.best_score(player).unwrap_or(0);
        let new_best = final_score > best;
        if new_best {
            self.store.set_best_score(player.clone(), final_score);
        }
        self.store.increment_games_played(player);

        log::info!(
            "Player {} out on {} with {} runs{}",
            player,
            computer_choice,
            final_score,
            if new_best { " (new best)" } else { "" }
        );

        Ok(TurnOutcome {
            player_choice,
            computer_choice,
            is_out: true,
            score: final_score,
            new_best,
        })
    }

    /// End the tournament and rank the winners.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` unless `admin` is the configured administrator
    /// - `TournamentClosed` if the tournament already ended
    pub fn end_tournament(&mut self, admin: &PlayerId) -> TrackerResult<TournamentResult> {
        if *admin != self.config.admin {
            return Err(TrackerError::Unauthorized(admin.clone()));
        }

        if !self.store.state().active {
            return Err(TrackerError::TournamentClosed);
        }

        let winners = self.ranked(self.config.winner_count);
        let ended_at = Utc::now();

        self.store.set_active(false);
        self.ended_at = Some(ended_at);

        log::info!(
            "Tournament ended by {} with {} ranked winner(s)",
            admin,
            winners.len()
        );

        Ok(TournamentResult {
            winners,
            prize_pot: self.prize_pot(),
            ended_at,
        })
    }

    /// Best scores, highest first. Empty until a round completes.
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        self.ranked(self.config.leaderboard_size)
    }

    /// Tournament summary
    pub fn status(&self) -> TournamentStatus {
        let state = self.store.state();
        TournamentStatus {
            active: state.active,
            capacity: state.capacity,
            registered_count: state.registered_count,
            entry_fee: self.config.entry_fee,
            prize_pot: self.prize_pot(),
            started_at: self.started_at,
            ended_at: self.ended_at,
        }
    }

    /// Statistics for one player
    pub fn player_stats(&self, player: &PlayerId) -> PlayerStats {
        let round_score = self.store.round_score(player);
        let games_played = self.store.games_played(player);

        let phase = if !self.store.is_registered(player) {
            PlayerPhase::Unregistered
        } else if round_score.is_some() {
            PlayerPhase::InRound
        } else if games_played > 0 {
            PlayerPhase::RoundOver
        } else {
            PlayerPhase::Registered
        };

        PlayerStats {
            player: player.clone(),
            phase,
            round_score,
            best_score: self.store.best_score(player).unwrap_or(0),
            games_played,
        }
    }

    fn prize_pot(&self) -> u64 {
        (self.store.state().registered_count as u64).saturating_mul(self.config.entry_fee)
    }

    fn ranked(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let mut scores = self.store.best_scores();
        // Stable sort keeps first-recorded order among equal scores
        scores.sort_by(|a, b| b.1.cmp(&a.1));

        scores
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(idx, (player, score))| LeaderboardEntry {
                rank: idx + 1,
                player,
                score,
            })
            .collect()
    }
}

fn validate_choice(choice: i64) -> TrackerResult<u8> {
    if (MIN_CHOICE as i64..=MAX_CHOICE as i64).contains(&choice) {
        Ok(choice as u8)
    } else {
        Err(TrackerError::InvalidChoice(choice))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::dice::ScriptedDice;

    fn player(n: u8) -> PlayerId {
        PlayerId::from_bytes([n; 32])
    }

    fn admin() -> PlayerId {
        player(200)
    }

    fn tracker(capacity: usize, dice: &ScriptedDice) -> SessionTracker {
        let config = TrackerConfig::new(admin()).with_capacity(capacity);
        SessionTracker::new(config, Box::new(dice.clone()))
    }

    #[test]
    fn test_store_capacity_wins_over_config() {
        let dice = ScriptedDice::default();
        let config = TrackerConfig::new(admin()).with_capacity(50);
        let mut t = SessionTracker::with_store(
            config,
            Box::new(MemoryStore::new(1)),
            Box::new(dice),
        );

        assert_eq!(t.config().capacity, 1);
        assert_eq!(t.status().capacity, 1);
        t.register(player(1)).unwrap();
        assert_eq!(
            t.register(player(2)),
            Err(TrackerError::TournamentFull { capacity: 1 })
        );
    }

    #[test]
    fn test_end_with_no_registrations_closes_tournament() {
        let dice = ScriptedDice::default();
        let mut t = tracker(5, &dice);

        let result = t.end_tournament(&admin()).unwrap();
        assert!(result.winners.is_empty());
        assert_eq!(result.prize_pot, 0);
        assert!(!t.status().active);
        assert_eq!(t.register(player(1)), Err(TrackerError::TournamentClosed));
    }

    #[test]
    fn test_register_increments_count() {
        let dice = ScriptedDice::default();
        let mut t = tracker(3, &dice);
        t.register(player(1)).unwrap();
        t.register(player(2)).unwrap();
        assert_eq!(t.status().registered_count, 2);
    }

    #[test]
    fn test_register_full() {
        let dice = ScriptedDice::default();
        let mut t = tracker(1, &dice);
        t.register(player(1)).unwrap();
        assert_eq!(
            t.register(player(2)),
            Err(TrackerError::TournamentFull { capacity: 1 })
        );
        assert_eq!(t.status().registered_count, 1);
    }

    #[test]
    fn test_register_twice() {
        let dice = ScriptedDice::default();
        let mut t = tracker(5, &dice);
        t.register(player(1)).unwrap();
        assert_eq!(
            t.register(player(1)),
            Err(TrackerError::AlreadyRegistered(player(1)))
        );
        assert_eq!(t.status().registered_count, 1);
    }

    #[test]
    fn test_register_after_end() {
        let dice = ScriptedDice::default();
        let mut t = tracker(5, &dice);
        t.end_tournament(&admin()).unwrap();
        assert_eq!(t.register(player(1)), Err(TrackerError::TournamentClosed));
    }

    #[test]
    fn test_play_requires_registration() {
        let dice = ScriptedDice::new([2]);
        let mut t = tracker(5, &dice);
        assert_eq!(
            t.play_turn(&player(1), 3),
            Err(TrackerError::NotRegistered(player(1)))
        );
        // No draw consumed by a rejected turn
        assert_eq!(dice.remaining(), 1);
    }

    #[test]
    fn test_invalid_choice_regardless_of_registration() {
        let dice = ScriptedDice::default();
        let mut t = tracker(5, &dice);
        for choice in [0, 7, -1, 100] {
            assert_eq!(
                t.play_turn(&player(1), choice),
                Err(TrackerError::InvalidChoice(choice))
            );
        }
        t.register(player(1)).unwrap();
        assert_eq!(
            t.play_turn(&player(1), 0),
            Err(TrackerError::InvalidChoice(0))
        );
    }

    #[test]
    fn test_round_accumulates_then_out() {
        let dice = ScriptedDice::new([5, 1, 2]);
        let mut t = tracker(5, &dice);
        t.register(player(1)).unwrap();

        let first = t.play_turn(&player(1), 3).unwrap();
        assert!(!first.is_out);
        assert_eq!(first.score, 3);

        let second = t.play_turn(&player(1), 6).unwrap();
        assert_eq!(second.score, 9);
        assert_eq!(t.player_stats(&player(1)).phase, PlayerPhase::InRound);

        let out = t.play_turn(&player(1), 2).unwrap();
        assert!(out.is_out);
        assert!(out.new_best);
        assert_eq!(out.computer_choice, 2);
        assert_eq!(out.score, 9);

        let stats = t.player_stats(&player(1));
        assert_eq!(stats.phase, PlayerPhase::RoundOver);
        assert_eq!(stats.round_score, None);
        assert_eq!(stats.best_score, 9);
        assert_eq!(stats.games_played, 1);
    }

    #[test]
    fn test_out_on_first_turn_scores_zero() {
        let dice = ScriptedDice::new([4]);
        let mut t = tracker(5, &dice);
        t.register(player(1)).unwrap();
        let out = t.play_turn(&player(1), 4).unwrap();
        assert!(out.is_out);
        assert_eq!(out.score, 0);
        assert!(!out.new_best);
        // A zero round records no leaderboard entry
        assert!(t.leaderboard().is_empty());
        assert_eq!(t.player_stats(&player(1)).games_played, 1);
    }

    #[test]
    fn test_best_score_is_monotonic() {
        let dice = ScriptedDice::new([1, 6, 6, 1, 2, 1, 5]);
        let mut t = tracker(5, &dice);
        t.register(player(1)).unwrap();

        // Round 1: 6 + 5 = 11, out on 6
        t.play_turn(&player(1), 6).unwrap();
        t.play_turn(&player(1), 5).unwrap();
        assert!(t.play_turn(&player(1), 6).unwrap().is_out);
        assert_eq!(t.player_stats(&player(1)).best_score, 11);

        // Round 2: 4, out on 1 -> best stays 11
        t.play_turn(&player(1), 4).unwrap();
        t.play_turn(&player(1), 3).unwrap();
        let out = t.play_turn(&player(1), 1).unwrap();
        assert!(out.is_out);
        assert_eq!(out.score, 7);
        assert!(!out.new_best);
        assert_eq!(t.player_stats(&player(1)).best_score, 11);
        assert_eq!(t.player_stats(&player(1)).games_played, 2);
    }

    #[test]
    fn test_next_turn_after_out_starts_fresh() {
        let dice = ScriptedDice::new([3, 1]);
        let mut t = tracker(5, &dice);
        t.register(player(1)).unwrap();
        t.play_turn(&player(1), 3).unwrap();
        let next = t.play_turn(&player(1), 2).unwrap();
        assert_eq!(next.score, 2);
    }

    #[test]
    fn test_leaderboard_ties_keep_first_recorded_order() {
        let dice = ScriptedDice::new([1, 3, 1, 3, 1, 5]);
        let mut t = tracker(5, &dice);
        for n in 1..=3 {
            t.register(player(n)).unwrap();
        }
        // player 2 records 3 first, then player 1 records 3, then player 3 records 4
        t.play_turn(&player(2), 3).unwrap();
        t.play_turn(&player(2), 3).unwrap();
        t.play_turn(&player(1), 3).unwrap();
        t.play_turn(&player(1), 3).unwrap();
        t.play_turn(&player(3), 4).unwrap();
        t.play_turn(&player(3), 5).unwrap();

        let board = t.leaderboard();
        let order: Vec<_> = board.iter().map(|e| (e.player.clone(), e.score)).collect();
        assert_eq!(
            order,
            vec![(player(3), 4), (player(2), 3), (player(1), 3)]
        );
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[2].rank, 3);
    }

    #[test]
    fn test_leaderboard_truncates() {
        let dice = ScriptedDice::default();
        let config = TrackerConfig::new(admin()).with_capacity(20);
        let mut t = SessionTracker::new(config, Box::new(dice.clone()));
        for n in 1..=12u8 {
            t.register(player(n)).unwrap();
            dice.push(1);
            t.play_turn(&player(n), (n % 5 + 2) as i64).unwrap();
            dice.push(1);
            t.play_turn(&player(n), 1).unwrap();
        }
        let board = t.leaderboard();
        assert_eq!(board.len(), 10);
        assert!(board.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(t.leaderboard(), board);
    }

    #[test]
    fn test_end_tournament_unauthorized() {
        let dice = ScriptedDice::default();
        let mut t = tracker(5, &dice);
        assert_eq!(
            t.end_tournament(&player(1)),
            Err(TrackerError::Unauthorized(player(1)))
        );
        assert!(t.status().active);
    }

    #[test]
    fn test_end_tournament_ranks_top_five() {
        let dice = ScriptedDice::default();
        let mut t = tracker(10, &dice);
        for n in 1..=7u8 {
            t.register(player(n)).unwrap();
            dice.push(1);
            t.play_turn(&player(n), (n % 5 + 2) as i64).unwrap();
            dice.push(6);
            t.play_turn(&player(n), 6).unwrap();
        }

        let result = t.end_tournament(&admin()).unwrap();
        assert_eq!(result.winners.len(), 5);
        assert!(result.winners.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(result.prize_pot, 7 * 100_000_000);

        let status = t.status();
        assert!(!status.active);
        assert!(status.ended_at.is_some());

        assert_eq!(
            t.end_tournament(&admin()),
            Err(TrackerError::TournamentClosed)
        );
    }

    #[test]
    fn test_play_after_end_policy() {
        let dice = ScriptedDice::new([1]);
        let mut open = tracker(5, &dice);
        open.register(player(1)).unwrap();
        open.end_tournament(&admin()).unwrap();
        assert!(open.play_turn(&player(1), 2).is_ok());

        let config = TrackerConfig::new(admin()).with_play_after_end(false);
        let mut closed = SessionTracker::new(config, Box::new(ScriptedDice::new([1])));
        closed.register(player(1)).unwrap();
        closed.end_tournament(&admin()).unwrap();
        assert_eq!(
            closed.play_turn(&player(1), 2),
            Err(TrackerError::TournamentClosed)
        );
    }

    #[test]
    fn test_player_phases() {
        let dice = ScriptedDice::new([2]);
        let mut t = tracker(5, &dice);
        assert_eq!(t.player_stats(&player(1)).phase, PlayerPhase::Unregistered);
        t.register(player(1)).unwrap();
        assert_eq!(t.player_stats(&player(1)).phase, PlayerPhase::Registered);
    }
}
