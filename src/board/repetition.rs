//! Position-repetition table keyed by board digest.
//!
//! Callers record only digestible positions (see
//! [`Board::is_digestible`](super::Board::is_digestible)), so pick/drop
//! intermediates never count as repeats.

use rustc_hash::FxHashMap;

#[derive(Clone, Debug)]
pub struct RepeatedPositions {
    counts: FxHashMap<u64, u32>,
    threshold: u32,
}

impl Default for RepeatedPositions {
    fn default() -> Self {
        Self::new(3)
    }
}

impl RepeatedPositions {
    /// A position occurring `threshold` times is a draw.
    #[must_use]
    pub fn new(threshold: u32) -> Self {
        assert!(threshold > 0, "Repetition threshold must be positive");
        Self {
            counts: FxHashMap::default(),
            threshold,
        }
    }

    #[must_use]
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Count one more occurrence; returns the new count.
    pub fn record(&mut self, digest: u64) -> u32 {
        let count = self.counts.entry(digest).or_insert(0);
        *count += 1;
        *count
    }

    /// Take back one occurrence, as when the move that produced it is undone.
    pub fn remove(&mut self, digest: u64) {
        if let Some(count) = self.counts.get_mut(&digest) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(&digest);
            }
        }
    }

    #[must_use]
    pub fn count(&self, digest: u64) -> u32 {
        self.counts.get(&digest).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn is_drawn(&self, digest: u64) -> bool {
        self.count(digest) >= self.threshold
    }

    /// Distinct positions recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }
}
