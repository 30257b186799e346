//! Savings-goal heuristics.
//!
//! Two heuristics exist in the product lineage and are mutually exclusive
//! policies. `Tiered` is the canonical one; `FlatPercent` stays available as
//! a named strategy so a caller can opt in, but the two are never blended.

use serde::{Deserialize, Serialize};

const TIER_ONE_CEILING: f64 = 5_000.0;
const TIER_TWO_CEILING: f64 = 15_000.0;
const TIER_ONE_GOAL: u64 = 500;
const TIER_TWO_GOAL: u64 = 2_000;
const TIER_TOP_RATE: f64 = 0.2;
const FLAT_RATE: f64 = 0.3;

/// A named, swappable savings-goal policy.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum GoalStrategy {
    /// Fixed goals for low spend tiers, 20% of total above them.
    #[default]
    Tiered,
    /// A flat 30% of total spend.
    FlatPercent,
}

impl GoalStrategy {
    /// Recommends a monthly savings amount from total spend.
    ///
    /// Always a non-negative rounded integer, monotonic non-decreasing in
    /// total spend, and zero when nothing was spent. There is deliberately
    /// no cap against the budget: a goal above total spend signals an
    /// unrealistic target and is reported as-is.
    pub fn suggest(&self, total_spent: f64) -> u64 {
        if total_spent <= 0.0 {
            return 0;
        }
        match self {
            GoalStrategy::Tiered => {
                if total_spent < TIER_ONE_CEILING {
                    TIER_ONE_GOAL
                } else if total_spent < TIER_TWO_CEILING {
                    TIER_TWO_GOAL
                } else {
                    (TIER_TOP_RATE * total_spent).round() as u64
                }
            }
            GoalStrategy::FlatPercent => (FLAT_RATE * total_spent).round() as u64,
        }
    }
}
