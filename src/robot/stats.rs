//! Search statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

/// Statistics collected during a search.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Completed playouts.
    pub playouts: u32,

    /// Moves made during playouts, root moves included.
    pub moves_made: u64,

    /// Sampled moves the board refused, each followed by a resample.
    pub rejected_samples: u32,

    /// Longest playout, in plies.
    pub max_depth: u16,

    /// Total time spent searching (microseconds).
    pub time_us: u64,

    /// The search stopped on the cancel flag rather than finishing.
    pub cancelled: bool,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Fold in a parallel worker's numbers. Time is wall-clock, so the
    /// longest worker counts.
    pub fn merge(&mut self, other: &SearchStats) {
        self.playouts += other.playouts;
        self.moves_made += other.moves_made;
        self.rejected_samples += other.rejected_samples;
        self.max_depth = self.max_depth.max(other.max_depth);
        self.time_us = self.time_us.max(other.time_us);
        self.cancelled |= other.cancelled;
    }

    #[must_use]
    pub fn playouts_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            f64::from(self.playouts) / (self.time_us as f64 / 1_000_000.0)
        }
    }

    #[must_use]
    pub fn avg_playout_length(&self) -> f64 {
        if self.playouts == 0 {
            0.0
        } else {
            self.moves_made as f64 / f64::from(self.playouts)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default() {
        let stats = SearchStats::new();
        assert_eq!(stats.playouts, 0);
        assert_eq!(stats.avg_playout_length(), 0.0);
    }

    #[test]
    fn test_stats_playouts_per_second() {
        let mut stats = SearchStats::new();
        stats.playouts = 1000;
        stats.time_us = 1_000_000;

        assert_eq!(stats.playouts_per_second(), 1000.0);
    }

    #[test]
    fn test_stats_merge() {
        let mut a = SearchStats {
            playouts: 10,
            moves_made: 100,
            max_depth: 12,
            time_us: 500,
            ..SearchStats::default()
        };
        let b = SearchStats {
            playouts: 5,
            moves_made: 20,
            rejected_samples: 3,
            max_depth: 4,
            time_us: 800,
            cancelled: true,
        };
        a.merge(&b);

        assert_eq!(a.playouts, 15);
        assert_eq!(a.moves_made, 120);
        assert_eq!(a.rejected_samples, 3);
        assert_eq!(a.max_depth, 12);
        assert_eq!(a.time_us, 800);
        assert!(a.cancelled);
    }

    #[test]
    fn test_stats_reset() {
        let mut stats = SearchStats::new();
        stats.playouts = 100;
        stats.reset();
        assert_eq!(stats, SearchStats::default());
    }
}
