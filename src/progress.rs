//! Best-star bookkeeping
//!
//! Kept in memory for the lifetime of a session, one table per game.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Maximum stars a level can award
pub const MAX_STARS: u8 = 3;

/// Best stars earned per level id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub best: BTreeMap<u32, u8>,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a result, keeping the best. Returns true if it improved.
    pub fn record(&mut self, level_id: u32, stars: u8) -> bool {
        let stars = stars.min(MAX_STARS);
        if stars == 0 {
            return false;
        }
        let entry = self.best.entry(level_id).or_insert(0);
        if stars > *entry {
            log::debug!("Level {} best stars {} -> {}", level_id, *entry, stars);
            *entry = stars;
            true
        } else {
            false
        }
    }

    /// Best stars for a level (0 if never completed)
    pub fn best(&self, level_id: u32) -> u8 {
        self.best.get(&level_id).copied().unwrap_or(0)
    }

    /// Sum of best stars across all levels
    pub fn total_stars(&self) -> u32 {
        self.best.values().map(|&s| s as u32).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_max() {
        let mut p = Progress::new();
        assert!(p.record(1, 2));
        assert!(!p.record(1, 1));
        assert_eq!(p.best(1), 2);
        assert!(p.record(1, 3));
        assert_eq!(p.best(1), 3);
    }

    #[test]
    fn test_zero_stars_not_recorded() {
        let mut p = Progress::new();
        assert!(!p.record(4, 0));
        assert!(p.is_empty());
        assert_eq!(p.best(4), 0);
    }

    #[test]
    fn test_total_stars_and_clamp() {
        let mut p = Progress::new();
        p.record(1, 9);
        p.record(2, 1);
        assert_eq!(p.best(1), MAX_STARS);
        assert_eq!(p.total_stars(), 4);
    }
}
