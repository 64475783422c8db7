//! Undo frames.
//!
//! One frame per executed move. A frame is a journal of primitive cell and
//! counter operations, in the order they happened, plus a snapshot of the
//! small scalar fields (state, turn, ply, in-flight data, result) taken
//! before the move. Rolling back replays the journal in reverse, then
//! restores the snapshot. Cascades of any length are inverted in one call
//! because every step of a cascade is just more journal entries.

use smallvec::SmallVec;

use super::state::{BoardState, InFlight};
use crate::core::{CellId, Piece, PlayerId};
use crate::moves::Move;
use crate::rules::{GameResult, StateId};

/// One journaled primitive, holding what is needed to invert it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum UndoOp {
    Pushed(CellId),
    Popped(CellId, Piece),
    Removed(CellId, usize, Piece),
    Inserted(CellId, usize),
    Counter(PlayerId, usize, i64),
}

#[derive(Clone, Debug)]
pub struct UndoFrame {
    mv: Move,
    ops: SmallVec<[UndoOp; 6]>,
    state: StateId,
    whose_turn: PlayerId,
    ply: u32,
    picked: Option<Piece>,
    sources: SmallVec<[InFlight; 2]>,
    dests: SmallVec<[InFlight; 2]>,
    result: Option<GameResult>,
}

impl UndoFrame {
    pub(crate) fn begin(mv: &Move, board: &BoardState) -> Self {
        Self {
            mv: mv.clone(),
            ops: SmallVec::new(),
            state: board.state,
            whose_turn: board.whose_turn,
            ply: board.ply,
            picked: board.picked,
            sources: board.sources.clone(),
            dests: board.dests.clone(),
            result: board.result.clone(),
        }
    }

    /// The move this frame inverts.
    #[must_use]
    pub fn mv(&self) -> &Move {
        &self.mv
    }

    /// Journal length; mainly for tests and diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub(crate) fn record(&mut self, op: UndoOp) {
        self.ops.push(op);
    }

    /// Invert every journaled op and restore the snapshot.
    pub(crate) fn rollback(self, board: &mut BoardState) {
        for op in self.ops.into_iter().rev() {
            // Each op inverts an operation that succeeded, so the inverse
            // cannot hit an empty stack.
            match op {
                UndoOp::Pushed(cell) => {
                    let _ = board.cells.pop(cell);
                }
                UndoOp::Popped(cell, piece) => board.cells.push(cell, piece),
                UndoOp::Removed(cell, index, piece) => board.cells.insert_at(cell, index, piece),
                UndoOp::Inserted(cell, index) => {
                    let _ = board.cells.remove_at(cell, index);
                }
                UndoOp::Counter(player, slot, delta) => {
                    board.counters[player][slot] -= delta;
                }
            }
        }
        board.state = self.state;
        board.whose_turn = self.whose_turn;
        board.ply = self.ply;
        board.picked = self.picked;
        board.sources = self.sources;
        board.dests = self.dests;
        board.result = self.result;
    }
}
