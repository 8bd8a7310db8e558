//! Configuration for the colony engine

use serde::{Deserialize, Serialize};

/// Four weeks in seconds, the issuance rate change cooldown
pub const ISSUANCE_COOLDOWN_SECS: u64 = 4 * 7 * 24 * 60 * 60;

/// Policy knobs for a colony
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColonyConfig {
    /// Hard ceiling on total token supply
    pub supply_ceiling: u128,
    /// Minimum seconds between issuance rate changes
    pub issuance_cooldown_secs: u64,
    /// Seconds after a task's due date during which ratings may still be
    /// revealed; finalization before this window closes requires both
    /// ratings revealed
    pub rating_reveal_window_secs: u64,
    /// Score assigned to a rating never revealed before finalization
    pub default_rating: u8,
    /// Lowest accepted rating score
    pub min_rating: u8,
    /// Highest accepted rating score
    pub max_rating: u8,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            supply_ceiling: u128::MAX,
            issuance_cooldown_secs: ISSUANCE_COOLDOWN_SECS,
            rating_reveal_window_secs: 5 * 24 * 60 * 60,
            default_rating: 2,
            min_rating: 1,
            max_rating: 3,
        }
    }
}

impl ColonyConfig {
    /// Check whether a rating score falls in the accepted range
    pub fn rating_in_range(&self, score: u8) -> bool {
        score >= self.min_rating && score <= self.max_rating
    }
}
