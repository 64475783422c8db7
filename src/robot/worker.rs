//! Off-thread search.
//!
//! The live board never leaves its thread. A worker gets a snapshot at the
//! start of a turn and hands back exactly one outcome. The only shared
//! state is the cancel flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::debug;
use rayon::prelude::*;

use super::adapter::Robot;
use super::config::SearchConfig;
use super::driver::{Budget, FlatMonteCarlo, SearchDriver, SearchOutcome};
use crate::board::{Board, RepeatedPositions};
use crate::core::{EngineError, GameRng};
use crate::rules::RuleSet;

/// Cooperative stop request, checked between playouts.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A search running on its own thread.
#[derive(Debug)]
pub struct SearchWorker {
    handle: JoinHandle<Result<SearchOutcome, EngineError>>,
    cancel: CancelFlag,
}

impl SearchWorker {
    /// Start searching `board`'s position. The worker owns a snapshot; the
    /// caller's board is free to change afterwards.
    pub fn spawn<R: RuleSet>(
        board: &Board<R>,
        history: Option<RepeatedPositions>,
        config: SearchConfig,
    ) -> Self {
        let snapshot = board.snapshot();
        let cancel = CancelFlag::new();
        let flag = cancel.clone();

        let handle = thread::spawn(move || {
            if config.threads > 1 {
                search_pool(&snapshot, history.as_ref(), &config, &flag)
            } else {
                let budget = Budget::new(config.time_budget(), flag);
                let mut robot = Robot::new(snapshot, config.scoring);
                if let Some(history) = history {
                    robot = robot.with_history(history);
                }
                FlatMonteCarlo::new(config).search(&mut robot, &budget)
            }
        });
        Self { handle, cancel }
    }

    /// Ask the worker to stop after its current playout.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the outcome.
    pub fn join(self) -> Result<SearchOutcome, EngineError> {
        self.handle
            .join()
            .map_err(|_| EngineError::Worker("search thread panicked".into()))?
    }
}

/// Root-parallel flat Monte-Carlo: `config.threads` workers on rayon, each
/// with its own snapshot and forked random stream, tallies summed.
pub fn search_pool<R: RuleSet>(
    board: &Board<R>,
    history: Option<&RepeatedPositions>,
    config: &SearchConfig,
    cancel: &CancelFlag,
) -> Result<SearchOutcome, EngineError> {
    let threads = config.threads.max(1);
    let mut root = GameRng::new(config.seed);
    let streams: Vec<GameRng> = (0..threads).map(|_| root.fork()).collect();
    let budget = Budget::new(config.time_budget(), cancel.clone());

    let outcomes = streams
        .into_par_iter()
        .map(|rng| {
            let mut robot = Robot::new(board.snapshot(), config.scoring);
            if let Some(history) = history {
                robot = robot.with_history(history.clone());
            }
            FlatMonteCarlo::with_rng(config.clone(), rng).search(&mut robot, &budget)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let merged = SearchOutcome::merge(outcomes)?;
    debug!(
        "search pool of {threads}: {} playouts, best {:?}",
        merged.stats.playouts,
        merged.best.as_ref().map(ToString::to_string)
    );
    Ok(merged)
}
