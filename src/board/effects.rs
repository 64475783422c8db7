//! Journaled mutation handle given to rule sets, and the execute report.

use smallvec::SmallVec;

use super::state::BoardState;
use super::undo::{UndoFrame, UndoOp};
use crate::core::{CellGraph, CellId, EngineError, Locator, Piece, PlayerId};

/// How a move is being executed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExecuteMode {
    /// Interactive play. Animation steps are reported.
    Live,
    /// Re-executing a recorded game. No animation; replay leniency applies.
    Replay,
    /// Stepping through a record one move at a time. Animation steps are
    /// reported.
    SingleStep,
}

impl ExecuteMode {
    #[must_use]
    pub fn animates(self) -> bool {
        !matches!(self, ExecuteMode::Replay)
    }
}

/// One piece moving between cells, for a UI to animate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationStep {
    pub piece: Piece,
    pub from: CellId,
    pub to: CellId,
}

/// What an `execute` did besides changing the board.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecuteReport {
    pub captured: SmallVec<[Piece; 2]>,
    pub animations: Vec<AnimationStep>,
}

/// Mutable view of a board inside one execute. Every change is journaled
/// into the current undo frame.
pub struct Effects<'a> {
    board: &'a mut BoardState,
    frame: &'a mut UndoFrame,
    report: &'a mut ExecuteReport,
    mode: ExecuteMode,
}

impl<'a> Effects<'a> {
    pub(crate) fn new(
        board: &'a mut BoardState,
        frame: &'a mut UndoFrame,
        report: &'a mut ExecuteReport,
        mode: ExecuteMode,
    ) -> Self {
        Self {
            board,
            frame,
            report,
            mode,
        }
    }

    #[must_use]
    pub fn board(&self) -> &BoardState {
        &*self.board
    }

    #[must_use]
    pub fn graph(&self) -> &CellGraph {
        self.board.graph()
    }

    #[must_use]
    pub fn mode(&self) -> ExecuteMode {
        self.mode
    }

    pub fn locate(&self, loc: Locator) -> Result<CellId, EngineError> {
        self.board.graph().require(loc)
    }

    pub fn push(&mut self, cell: CellId, piece: Piece) {
        self.board.cells.push(cell, piece);
        self.frame.record(UndoOp::Pushed(cell));
    }

    pub fn pop(&mut self, cell: CellId) -> Result<Piece, EngineError> {
        let piece = self.board.cells.pop(cell)?;
        self.frame.record(UndoOp::Popped(cell, piece));
        Ok(piece)
    }

    pub fn remove_at(&mut self, cell: CellId, index: usize) -> Result<Piece, EngineError> {
        let piece = self.board.cells.remove_at(cell, index)?;
        self.frame.record(UndoOp::Removed(cell, index, piece));
        Ok(piece)
    }

    pub fn insert_at(&mut self, cell: CellId, index: usize, piece: Piece) {
        self.board.cells.insert_at(cell, index, piece);
        self.frame.record(UndoOp::Inserted(cell, index));
    }

    /// Move the top piece of `from` onto `to`.
    pub fn transfer(&mut self, from: CellId, to: CellId) -> Result<Piece, EngineError> {
        let piece = self.pop(from)?;
        self.push(to, piece);
        self.animate(piece, from, to);
        Ok(piece)
    }

    /// Move the piece at `index` of `cell` onto `pile`, reporting it as
    /// captured.
    pub fn capture_at(
        &mut self,
        cell: CellId,
        index: usize,
        pile: CellId,
    ) -> Result<Piece, EngineError> {
        let piece = self.remove_at(cell, index)?;
        self.push(pile, piece);
        self.report.captured.push(piece);
        self.animate(piece, cell, pile);
        Ok(piece)
    }

    /// Capture the top piece of `cell`.
    pub fn capture(&mut self, cell: CellId, pile: CellId) -> Result<Piece, EngineError> {
        let top = self.board.cells.stack(cell).height().saturating_sub(1);
        self.capture_at(cell, top, pile)
    }

    pub fn add_counter(
        &mut self,
        player: PlayerId,
        slot: usize,
        delta: i64,
    ) -> Result<(), EngineError> {
        let counters = &mut self.board.counters[player];
        let value = counters.get_mut(slot).ok_or_else(|| {
            EngineError::BadInit(format!("counter slot {slot} not declared"))
        })?;
        *value += delta;
        self.frame.record(UndoOp::Counter(player, slot, delta));
        Ok(())
    }

    fn animate(&mut self, piece: Piece, from: CellId, to: CellId) {
        if self.mode.animates() {
            self.report.animations.push(AnimationStep { piece, from, to });
        }
    }
}
