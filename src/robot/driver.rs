//! Search drivers.
//!
//! A driver only talks to a [`SearchAdapter`]; it never sees the board.
//! [`FlatMonteCarlo`] is the reference driver: every root move gets the
//! same number of random playouts, round-robin, until the playouts run out,
//! the deadline passes or the cancel flag is raised. Cancellation is checked
//! between playouts, so a playout in flight always finishes.

use std::time::{Duration, Instant};

use log::debug;

use super::adapter::SearchAdapter;
use super::config::SearchConfig;
use super::stats::SearchStats;
use super::worker::CancelFlag;
use crate::core::{EngineError, GameRng, PlayerId};
use crate::moves::Move;

/// Resamples before a playout falls back to a uniform legal move.
const RESAMPLE_LIMIT: usize = 8;

/// When a search has to stop.
#[derive(Clone, Debug, Default)]
pub struct Budget {
    deadline: Option<Instant>,
    cancel: CancelFlag,
}

impl Budget {
    /// No deadline, never cancelled.
    #[must_use]
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Deadline `time` from now, if any, plus `cancel`.
    #[must_use]
    pub fn new(time: Option<Duration>, cancel: CancelFlag) -> Self {
        Self {
            deadline: time.map(|t| Instant::now() + t),
            cancel,
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Accumulated playout values for one root move.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveTally {
    pub mv: Move,
    pub visits: u32,
    pub total: f64,
}

impl MoveTally {
    #[must_use]
    pub fn new(mv: Move) -> Self {
        Self {
            mv,
            visits: 0,
            total: 0.0,
        }
    }

    pub fn record(&mut self, value: f64) {
        self.visits += 1;
        self.total += value;
    }

    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total / f64::from(self.visits)
        }
    }
}

/// Result of one search: the move to play and how it was chosen.
#[derive(Clone, Debug, Default)]
pub struct SearchOutcome {
    pub best: Option<Move>,
    /// One entry per root move, in legal-move order.
    pub tallies: Vec<MoveTally>,
    pub stats: SearchStats,
}

impl SearchOutcome {
    /// Highest mean; the earliest move wins ties. Moves never played out
    /// rank below every visited move.
    #[must_use]
    pub fn select_best(tallies: &[MoveTally]) -> Option<Move> {
        let mut best: Option<&MoveTally> = None;
        for tally in tallies {
            let better = match best {
                None => true,
                Some(b) if b.visits == 0 => tally.visits > 0,
                Some(b) => tally.visits > 0 && tally.mean() > b.mean(),
            };
            if better {
                best = Some(tally);
            }
        }
        best.map(|t| t.mv.clone())
    }

    /// Combine root-parallel results. Every worker searched the same
    /// position, so tallies line up index by index.
    pub fn merge(outcomes: Vec<SearchOutcome>) -> Result<SearchOutcome, EngineError> {
        let mut iter = outcomes.into_iter();
        let Some(mut merged) = iter.next() else {
            return Ok(SearchOutcome::default());
        };
        for outcome in iter {
            if outcome.tallies.len() != merged.tallies.len() {
                return Err(EngineError::Worker(format!(
                    "workers disagree on root moves: {} vs {}",
                    merged.tallies.len(),
                    outcome.tallies.len()
                )));
            }
            for (into, from) in merged.tallies.iter_mut().zip(&outcome.tallies) {
                if into.mv != from.mv {
                    return Err(EngineError::Worker(format!(
                        "workers disagree on root move `{}` vs `{}`",
                        into.mv, from.mv
                    )));
                }
                into.visits += from.visits;
                into.total += from.total;
            }
            merged.stats.merge(&outcome.stats);
        }
        merged.best = Self::select_best(&merged.tallies);
        Ok(merged)
    }
}

/// A search algorithm.
pub trait SearchDriver {
    /// Pick a move for the player to move. The adapter is back at its
    /// starting position when this returns, error or not.
    fn search<A: SearchAdapter>(
        &mut self,
        adapter: &mut A,
        budget: &Budget,
    ) -> Result<SearchOutcome, EngineError>;
}

/// Flat Monte-Carlo: uniform playouts per root move, best mean wins.
#[derive(Clone, Debug)]
pub struct FlatMonteCarlo {
    config: SearchConfig,
    rng: GameRng,
}

impl FlatMonteCarlo {
    #[must_use]
    pub fn new(config: SearchConfig) -> Self {
        let rng = GameRng::new(config.seed);
        Self { config, rng }
    }

    /// Use a forked stream, as root-parallel workers do.
    #[must_use]
    pub fn with_rng(config: SearchConfig, rng: GameRng) -> Self {
        Self { config, rng }
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Play `first`, then random moves until the game ends or the depth
    /// limit, score for `player`, and unwind.
    fn playout<A: SearchAdapter>(
        &mut self,
        adapter: &mut A,
        first: &Move,
        player: PlayerId,
        stats: &mut SearchStats,
    ) -> Result<f64, EngineError> {
        adapter.make_move(first)?;
        let mut made = vec![first.clone()];
        let limit = self.config.depth_limit();

        while made.len() < limit && !adapter.is_terminal() {
            match self.make_random_move(adapter, stats) {
                Some(mv) => made.push(mv),
                None => break,
            }
        }
        let value = adapter.evaluate(player);

        for mv in made.iter().rev() {
            adapter.unmake_move(mv)?;
        }
        stats.playouts += 1;
        stats.moves_made += made.len() as u64;
        stats.max_depth = stats.max_depth.max(u16::try_from(made.len()).unwrap_or(u16::MAX));
        Ok(value)
    }

    /// Sample and make a move, resampling when the board refuses a sample.
    fn make_random_move<A: SearchAdapter>(
        &mut self,
        adapter: &mut A,
        stats: &mut SearchStats,
    ) -> Option<Move> {
        for _ in 0..RESAMPLE_LIMIT {
            let mv = adapter.random_move(&mut self.rng)?;
            if adapter.make_move(&mv).is_ok() {
                return Some(mv);
            }
            stats.rejected_samples += 1;
        }
        let moves = adapter.legal_moves();
        let mv = self.rng.choose(&moves)?.clone();
        adapter.make_move(&mv).ok()?;
        Some(mv)
    }
}

impl SearchDriver for FlatMonteCarlo {
    fn search<A: SearchAdapter>(
        &mut self,
        adapter: &mut A,
        budget: &Budget,
    ) -> Result<SearchOutcome, EngineError> {
        let start = Instant::now();
        let player = adapter.to_move();
        let mut tallies: Vec<MoveTally> =
            adapter.legal_moves().into_iter().map(MoveTally::new).collect();
        let mut stats = SearchStats::new();

        if tallies.len() > 1 {
            'rounds: for _ in 0..self.config.playouts_per_move {
                for tally in &mut tallies {
                    if budget.is_exhausted() {
                        stats.cancelled = budget.is_cancelled();
                        break 'rounds;
                    }
                    let mv = tally.mv.clone();
                    let value = self.playout(adapter, &mv, player, &mut stats)?;
                    tally.record(value);
                }
            }
        }
        stats.time_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);

        let best = SearchOutcome::select_best(&tallies);
        if let Some(mv) = &best {
            if !adapter.legal_moves().contains(mv) {
                return Err(EngineError::Worker(format!("search chose illegal move `{mv}`")));
            }
        }
        debug!(
            "flat MC for {player}: {} playouts over {} moves in {}us, best {:?}",
            stats.playouts,
            tallies.len(),
            stats.time_us,
            best.as_ref().map(ToString::to_string)
        );
        Ok(SearchOutcome {
            best,
            tallies,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::core::GameInit;
    use crate::games::capture::CaptureRules;
    use crate::moves::parse;
    use crate::robot::{Robot, Scoring};
    use std::sync::Arc;

    fn robot() -> Robot<CaptureRules> {
        let init: GameInit = "capture 2 1 0".parse().unwrap();
        let rules = Arc::new(CaptureRules::new(&init).unwrap());
        Robot::new(Board::new(rules, init).unwrap(), Scoring::Normalized)
    }

    fn make(robot: &mut Robot<CaptureRules>, text: &str) {
        let mv = parse(text, robot.to_move()).unwrap();
        robot.make_move(&mv).unwrap();
    }

    #[test]
    fn test_search_returns_legal_move_and_unwinds() {
        let mut robot = robot();
        let before = robot.board().digest();
        let config = SearchConfig::default().with_playouts(2).with_max_depth(6);

        let outcome = FlatMonteCarlo::new(config)
            .search(&mut robot, &Budget::unlimited())
            .unwrap();

        let best = outcome.best.unwrap();
        assert!(robot.legal_moves().contains(&best));
        assert_eq!(robot.board().digest(), before);
        assert_eq!(robot.board().undo_depth(), 0);
        assert_eq!(outcome.tallies.len(), 25);
        assert_eq!(outcome.stats.playouts, 50);
        assert!(outcome.tallies.iter().all(|t| t.visits == 2));
    }

    #[test]
    fn test_same_seed_same_search() {
        let config = SearchConfig::default().with_playouts(3).with_max_depth(8).with_seed(9);
        let a = FlatMonteCarlo::new(config.clone())
            .search(&mut robot(), &Budget::unlimited())
            .unwrap();
        let b = FlatMonteCarlo::new(config)
            .search(&mut robot(), &Budget::unlimited())
            .unwrap();
        assert_eq!(a.best, b.best);
        assert_eq!(a.tallies, b.tallies);
    }

    #[test]
    fn test_greedy_search_takes_capture() {
        let mut robot = robot();
        make(&mut robot, "place R0 C 3");
        make(&mut robot, "place R1 C 4");

        let config = SearchConfig::default().with_playouts(1).with_max_depth(1);
        let outcome = FlatMonteCarlo::new(config)
            .search(&mut robot, &Budget::unlimited())
            .unwrap();
        assert_eq!(outcome.best.unwrap().to_string(), "move C 3 C 4");
    }

    #[test]
    fn test_cancelled_search_still_answers() {
        let mut robot = robot();
        let cancel = CancelFlag::new();
        cancel.cancel();
        let budget = Budget::new(None, cancel);

        let outcome = FlatMonteCarlo::new(SearchConfig::default())
            .search(&mut robot, &budget)
            .unwrap();
        assert_eq!(outcome.stats.playouts, 0);
        assert!(outcome.stats.cancelled);
        assert_eq!(outcome.best.unwrap().to_string(), "place R0 A 1");
    }

    #[test]
    fn test_merge_sums_tallies() {
        let mv = |text: &str| parse(text, PlayerId::new(0)).unwrap();
        let a = SearchOutcome {
            best: None,
            tallies: vec![
                MoveTally {
                    mv: mv("pass"),
                    visits: 2,
                    total: 1.0,
                },
                MoveTally {
                    mv: mv("resign"),
                    visits: 2,
                    total: -2.0,
                },
            ],
            stats: SearchStats::default(),
        };
        let mut b = a.clone();
        b.tallies[1].total = 4.0;

        let merged = SearchOutcome::merge(vec![a.clone(), b]).unwrap();
        assert_eq!(merged.tallies[0].visits, 4);
        assert_eq!(merged.tallies[1].total, 2.0);
        assert_eq!(merged.best, Some(mv("pass")));

        let mut other = a.clone();
        other.tallies.pop();
        assert!(SearchOutcome::merge(vec![a, other]).is_err());
    }
}
