//! Error types.
//!
//! There are exactly two severities:
//!
//! - [`EngineError`]: an engine or protocol bug. A transition, opcode or cell
//!   reference that is not modeled. The operation is aborted (and rolled
//!   back) and the caller is expected to stop, not to recover.
//! - [`ParseError`]: malformed move or init text from an untrusted or
//!   archived source. What to do about it is the history collaborator's call.

use thiserror::Error;

use crate::moves::Opcode;

/// Fatal, defensive failures of the core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("no transition for `{opcode}` in state {state}")]
    UnmodeledTransition { state: String, opcode: Opcode },

    #[error("`{mv}` cannot be executed in state {state}: {reason}")]
    IllegalInState {
        mv: String,
        state: String,
        reason: &'static str,
    },

    #[error("no cell at {0}")]
    MissingCell(String),

    #[error("stack at {cell} has nothing above its base")]
    EmptyStack { cell: String },

    #[error("`{mv}` played by {player} but it is {expected}'s turn")]
    OutOfTurn {
        mv: String,
        player: String,
        expected: String,
    },

    #[error("`{mv}` conflicts with the picked object: {reason}")]
    PickConflict { mv: String, reason: &'static str },

    #[error("undo out of order: top frame is `{expected}`, asked to undo `{got}`")]
    UndoOutOfOrder { expected: String, got: String },

    #[error("nothing to undo for `{0}`")]
    NothingToUndo(String),

    #[error("unknown piece id {0}")]
    UnknownPiece(u16),

    #[error("boards differ: {0}")]
    Mismatch(String),

    #[error("bad game init: {0}")]
    BadInit(String),

    #[error("state table: {0}")]
    BadStateTable(String),

    #[error("search worker failed: {0}")]
    Worker(String),
}

/// Recoverable failures reading move or init text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty move text")]
    Empty,

    #[error("unknown opcode `{0}`")]
    UnknownOpcode(String),

    #[error("`{opcode}` is missing its {operand}")]
    MissingOperand {
        opcode: &'static str,
        operand: &'static str,
    },

    #[error("bad column `{0}`")]
    BadColumn(String),

    #[error("bad row `{0}`")]
    BadRow(String),

    #[error("bad rack `{0}`")]
    BadRack(String),

    #[error("bad player `{0}`")]
    BadPlayer(String),

    #[error("bad piece `{0}`")]
    BadPiece(String),

    #[error("bad sequence number `{0}`")]
    BadSequence(String),

    #[error("unexpected trailing tokens `{0}`")]
    Trailing(String),

    #[error("malformed game init `{0}`")]
    BadInit(String),
}

/// An empty stack was popped. Carries no cell; callers attach it.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("nothing above the stack base")]
pub struct EmptyStack;
