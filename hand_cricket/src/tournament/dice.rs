//! Sources for the computer's hand.

use super::models::{MAX_CHOICE, MIN_CHOICE};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Uniform draw over 1..=6.
///
/// Every call is an independent draw.
pub trait DiceRoller: Send {
    /// Draw the computer's hand
    fn roll(&mut self) -> u8;
}

/// Production dice backed by a CSPRNG-seeded `StdRng`
pub struct RandomDice {
    rng: StdRng,
}

impl RandomDice {
    /// Seed from the operating system
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible dice for a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomDice {
    fn default() -> Self {
        Self::new()
    }
}

impl DiceRoller for RandomDice {
    fn roll(&mut self) -> u8 {
        self.rng.random_range(MIN_CHOICE..=MAX_CHOICE)
    }
}

/// Dice that replay a queue of forced outcomes.
///
/// Clones share the queue, so a test can keep one clone and push outcomes
/// after handing the other to a tracker. An empty queue rolls 1.
#[derive(Clone, Default)]
pub struct ScriptedDice {
    queue: Arc<Mutex<VecDeque<u8>>>,
}

impl ScriptedDice {
    /// Create dice that will roll the given outcomes in order
    pub fn new(rolls: impl IntoIterator<Item = u8>) -> Self {
        Self {
            queue: Arc::new(Mutex::new(rolls.into_iter().collect())),
        }
    }

    /// Append a forced outcome
    pub fn push(&self, roll: u8) {
        self.queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(roll);
    }

    /// Outcomes not yet rolled
    pub fn remaining(&self) -> usize {
        self.queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

impl DiceRoller for ScriptedDice {
    fn roll(&mut self) -> u8 {
        self.queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or(MIN_CHOICE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_dice_in_range() {
        let mut dice = RandomDice::new();
        for _ in 0..1000 {
            let roll = dice.roll();
            assert!((1..=6).contains(&roll));
        }
    }

    #[test]
    fn test_random_dice_covers_all_faces() {
        let mut dice = RandomDice::seeded(42);
        let mut seen = [0u32; 6];
        for _ in 0..6000 {
            seen[(dice.roll() - 1) as usize] += 1;
        }
        // Each face should land roughly 1000 times
        for count in seen {
            assert!(count > 800 && count < 1200, "face count {count} out of band");
        }
    }

    #[test]
    fn test_seeded_dice_are_reproducible() {
        let mut a = RandomDice::seeded(7);
        let mut b = RandomDice::seeded(7);
        let rolls_a: Vec<u8> = (0..20).map(|_| a.roll()).collect();
        let rolls_b: Vec<u8> = (0..20).map(|_| b.roll()).collect();
        assert_eq!(rolls_a, rolls_b);
    }

    #[test]
    fn test_scripted_dice_replay_in_order() {
        let mut dice = ScriptedDice::new([5, 4, 6]);
        assert_eq!(dice.roll(), 5);
        assert_eq!(dice.roll(), 4);
        assert_eq!(dice.roll(), 6);
        assert_eq!(dice.roll(), 1);
    }

    #[test]
    fn test_scripted_dice_clones_share_queue() {
        let script = ScriptedDice::default();
        let mut dice = script.clone();
        script.push(3);
        assert_eq!(script.remaining(), 1);
        assert_eq!(dice.roll(), 3);
        assert_eq!(script.remaining(), 0);
    }
}
