//! Plain board data: cells, turn, ply, state, counters and in-flight data.
//!
//! `BoardState` is what rule sets read. It carries no undo history and no
//! references to the rules, so it clones cheaply into search workers.

use smallvec::SmallVec;

use super::cells::Cells;
use crate::core::{CellGraph, CellId, Piece, PlayerId, PlayerMap};
use crate::rules::{GameResult, StateId};

/// Cell touched by a staged pick or drop, with the state it replaced.
pub type InFlight = (CellId, StateId);

#[derive(Clone, Debug)]
pub struct BoardState {
    pub(crate) cells: Cells,
    pub(crate) whose_turn: PlayerId,
    pub(crate) state: StateId,
    pub(crate) ply: u32,
    pub(crate) counters: PlayerMap<SmallVec<[i64; 2]>>,
    /// The one piece in hand, if any.
    pub(crate) picked: Option<Piece>,
    /// Where picked pieces came from, oldest first.
    pub(crate) sources: SmallVec<[InFlight; 2]>,
    /// Where they were dropped, oldest first.
    pub(crate) dests: SmallVec<[InFlight; 2]>,
    pub(crate) result: Option<GameResult>,
}

impl BoardState {
    pub(crate) fn new(cells: Cells, player_count: usize, counters: usize, state: StateId) -> Self {
        Self {
            cells,
            whose_turn: PlayerId::new(0),
            state,
            ply: 0,
            counters: PlayerMap::new(player_count, |_| SmallVec::from_elem(0, counters)),
            picked: None,
            sources: SmallVec::new(),
            dests: SmallVec::new(),
            result: None,
        }
    }

    #[must_use]
    pub fn cells(&self) -> &Cells {
        &self.cells
    }

    #[must_use]
    pub fn graph(&self) -> &CellGraph {
        self.cells.graph()
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.counters.player_count()
    }

    #[must_use]
    pub fn whose_turn(&self) -> PlayerId {
        self.whose_turn
    }

    #[must_use]
    pub fn state(&self) -> StateId {
        self.state
    }

    /// Confirmed moves so far.
    #[must_use]
    pub fn ply(&self) -> u32 {
        self.ply
    }

    /// Counter `slot` of `player`; 0 for a slot the layout did not declare.
    #[must_use]
    pub fn counter(&self, player: PlayerId, slot: usize) -> i64 {
        self.counters[player].get(slot).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn picked(&self) -> Option<Piece> {
        self.picked
    }

    #[must_use]
    pub fn sources(&self) -> &[InFlight] {
        &self.sources
    }

    #[must_use]
    pub fn dests(&self) -> &[InFlight] {
        &self.dests
    }

    /// Nothing picked and no staged move awaiting confirmation.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.picked.is_none() && self.sources.is_empty() && self.dests.is_empty()
    }

    #[must_use]
    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    /// Field-by-field comparison. Names the first difference.
    pub(crate) fn check_same(&self, other: &Self) -> Result<(), String> {
        self.cells.check_same(&other.cells)?;
        if self.whose_turn != other.whose_turn {
            return Err(format!("turn {} vs {}", self.whose_turn, other.whose_turn));
        }
        if self.state != other.state {
            return Err(format!("state {:?} vs {:?}", self.state, other.state));
        }
        if self.ply != other.ply {
            return Err(format!("ply {} vs {}", self.ply, other.ply));
        }
        if self.counters != other.counters {
            return Err("counters".into());
        }
        if self.picked != other.picked {
            return Err("picked piece".into());
        }
        if self.sources != other.sources || self.dests != other.dests {
            return Err("in-flight cells".into());
        }
        if self.result != other.result {
            return Err("result".into());
        }
        Ok(())
    }

    /// Copy `other` into this state, reusing allocations.
    pub(crate) fn copy_from(&mut self, other: &Self) {
        self.cells.copy_from(&other.cells);
        self.whose_turn = other.whose_turn;
        self.state = other.state;
        self.ply = other.ply;
        self.counters.clone_values_from(&other.counters);
        self.picked = other.picked;
        self.sources.clone_from(&other.sources);
        self.dests.clone_from(&other.dests);
        self.result.clone_from(&other.result);
    }
}
