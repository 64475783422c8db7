//! Search configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Scale of [`SearchAdapter::evaluate`](super::SearchAdapter::evaluate).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scoring {
    /// `[-1, 1]`, for Monte-Carlo drivers.
    #[default]
    Normalized,
    /// Large magnitudes, for alpha-beta style drivers.
    Unbounded,
}

/// Search configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Random seed for playouts.
    /// Same seed and same position produce the same search.
    pub seed: u64,

    /// Playouts per root move.
    pub playouts_per_move: u32,

    /// Maximum plies per playout, the root move included (0 = unlimited).
    pub max_depth: u32,

    /// Wall-clock budget in milliseconds (0 = no deadline).
    pub time_budget_ms: u64,

    /// Root-parallel workers.
    pub threads: usize,

    pub scoring: Scoring,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            playouts_per_move: 32,
            max_depth: 40,
            time_budget_ms: 0,
            threads: 1,
            scoring: Scoring::Normalized,
        }
    }
}

impl SearchConfig {
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_playouts(mut self, playouts: u32) -> Self {
        self.playouts_per_move = playouts;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    #[must_use]
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget_ms = u64::try_from(budget.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    #[must_use]
    pub fn with_scoring(mut self, scoring: Scoring) -> Self {
        self.scoring = scoring;
        self
    }

    #[must_use]
    pub fn time_budget(&self) -> Option<Duration> {
        (self.time_budget_ms > 0).then(|| Duration::from_millis(self.time_budget_ms))
    }

    /// Playout length cap, with 0 meaning none.
    #[must_use]
    pub fn depth_limit(&self) -> usize {
        if self.max_depth == 0 {
            usize::MAX
        } else {
            self.max_depth as usize
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.seed, 42);
        assert_eq!(config.threads, 1);
        assert_eq!(config.time_budget(), None);
        assert_eq!(config.scoring, Scoring::Normalized);
    }

    #[test]
    fn test_builder_pattern() {
        let config = SearchConfig::default()
            .with_seed(123)
            .with_playouts(8)
            .with_max_depth(0)
            .with_time_budget(Duration::from_millis(250))
            .with_threads(4)
            .with_scoring(Scoring::Unbounded);

        assert_eq!(config.seed, 123);
        assert_eq!(config.playouts_per_move, 8);
        assert_eq!(config.depth_limit(), usize::MAX);
        assert_eq!(config.time_budget(), Some(Duration::from_millis(250)));
        assert_eq!(config.threads, 4);
        assert_eq!(config.scoring, Scoring::Unbounded);
    }

    #[test]
    fn test_serialization() {
        let config = SearchConfig::default().with_seed(7);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: SearchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
