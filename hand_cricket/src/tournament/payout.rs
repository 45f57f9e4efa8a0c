//! Reward split applied by the on-chain program when the tournament ends.
//!
//! The tracker does not move funds. The plan is computed so the action layer
//! can tell the administrator what the program will pay out.

use super::models::LeaderboardEntry;
use crate::identity::PlayerId;
use serde::{Deserialize, Serialize};

/// Share of the pot paid to winners, in percent
pub const WINNER_POOL_PERCENT: u64 = 80;

/// Split of the winner pool by rank, in percent
pub const RANK_SPLIT_PERCENT: [u64; 5] = [40, 25, 15, 10, 10];

/// A single payout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub rank: usize,
    pub player: PlayerId,
    /// Amount in lamports
    pub amount: u64,
}

/// Full payout plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutPlan {
    /// Total collected fees
    pub total_pot: u64,
    /// Portion shared among winners
    pub winner_pool: u64,
    /// Per-winner payouts, best first
    pub payouts: Vec<Payout>,
    /// Amount returned to the administrator
    pub admin_share: u64,
}

impl PayoutPlan {
    /// Compute the plan for ranked winners.
    ///
    /// Winners beyond the split table receive nothing. Shares of ranks with
    /// no winner stay unpaid, exactly as the program leaves them in escrow.
    pub fn compute(total_pot: u64, winners: &[LeaderboardEntry]) -> Self {
        let winner_pool = percent_of(total_pot, WINNER_POOL_PERCENT);
        let admin_share = total_pot - winner_pool;

        let payouts = winners
            .iter()
            .zip(RANK_SPLIT_PERCENT.iter())
            .map(|(entry, pct)| Payout {
                rank: entry.rank,
                player: entry.player.clone(),
                amount: percent_of(winner_pool, *pct),
            })
            .filter(|payout| payout.amount > 0)
            .collect();

        Self {
            total_pot,
            winner_pool,
            payouts,
            admin_share,
        }
    }

    /// Sum of all winner payouts
    pub fn total_paid(&self) -> u64 {
        self.payouts.iter().map(|p| p.amount).sum()
    }

    /// Payout for a specific rank (1-indexed)
    pub fn payout_for_rank(&self, rank: usize) -> Option<u64> {
        self.payouts
            .iter()
            .find(|p| p.rank == rank)
            .map(|p| p.amount)
    }
}

fn percent_of(amount: u64, pct: u64) -> u64 {
    // u128 keeps the product exact for any u64 amount
    ((amount as u128 * pct as u128) / 100) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(n: usize) -> Vec<LeaderboardEntry> {
        (0..n)
            .map(|i| LeaderboardEntry {
                rank: i + 1,
                player: PlayerId::from_bytes([i as u8 + 1; 32]),
                score: (100 - i) as u32,
            })
            .collect()
    }

    #[test]
    fn test_full_split() {
        // 10 players at 0.1 SOL
        let plan = PayoutPlan::compute(1_000_000_000, &ranked(5));
        assert_eq!(plan.winner_pool, 800_000_000);
        assert_eq!(plan.admin_share, 200_000_000);
        assert_eq!(plan.payout_for_rank(1), Some(320_000_000));
        assert_eq!(plan.payout_for_rank(2), Some(200_000_000));
        assert_eq!(plan.payout_for_rank(3), Some(120_000_000));
        assert_eq!(plan.payout_for_rank(4), Some(80_000_000));
        assert_eq!(plan.payout_for_rank(5), Some(80_000_000));
        assert_eq!(plan.total_paid(), plan.winner_pool);
    }

    #[test]
    fn test_fewer_winners_leave_remainder() {
        let plan = PayoutPlan::compute(100_000_000, &ranked(2));
        assert_eq!(plan.payouts.len(), 2);
        assert_eq!(plan.total_paid(), 52_000_000);
        assert!(plan.total_paid() + plan.admin_share <= plan.total_pot);
    }

    #[test]
    fn test_extra_winners_ignored() {
        let plan = PayoutPlan::compute(1_000, &ranked(8));
        assert_eq!(plan.payouts.len(), 5);
        assert_eq!(plan.payout_for_rank(6), None);
    }

    #[test]
    fn test_empty_pot() {
        let plan = PayoutPlan::compute(0, &ranked(3));
        assert!(plan.payouts.is_empty());
        assert_eq!(plan.admin_share, 0);
    }

    #[test]
    fn test_payout_never_exceeds_pot() {
        for pot in [1u64, 7, 99, 12_345, u64::MAX] {
            let plan = PayoutPlan::compute(pot, &ranked(5));
            assert!(plan.total_paid() <= plan.winner_pool);
            assert_eq!(plan.winner_pool + plan.admin_share, pot);
        }
    }
}
