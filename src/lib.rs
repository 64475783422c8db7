//! # boardcore
//!
//! A reversible, digest-instrumented game state core for stacking board
//! games, plus the search and replay collaborators built on it.
//!
//! ## Design Principles
//!
//! 1. **One Generic Core**: a single `Board<R>` parameterized by a per-game
//!    `RuleSet` (state table, move generation, capture side effects). Games
//!    compose, they do not subclass.
//!
//! 2. **Exact Undo**: every `execute` pushes one undo frame and
//!    `unexecute` restores the previous position exactly, digest included,
//!    however long the capture cascade was.
//!
//! 3. **Deterministic Everything**: the same game-init string and move
//!    sequence reproduce byte-identical positions and digests, and move
//!    generation returns moves in a fixed order.
//!
//! ## Architecture
//!
//! - **Staged moves**: pick/drop is modeled as explicit in-flight board
//!   state, undoable before `done` commits it.
//!
//! - **Persistent data structures**: the occupancy index uses `im` so a
//!   search worker's snapshot is cheap.
//!
//! - **Search isolation**: workers own private snapshots; the only thing
//!   shared with the live board's thread is a cancel flag.
//!
//! ## Modules
//!
//! - `core`: players, geometry, pieces, stacks, RNG, init strings, errors
//! - `moves`: opcodes, move records, the text codec
//! - `rules`: `RuleSet` trait, state tables, replay leniency
//! - `board`: the generic `Board`, undo frames, digests, repetition table
//! - `robot`: search adapter, flat Monte-Carlo driver, worker threads
//! - `replay`: sessions, game records, digest-checked replay
//! - `games`: the reference capture game

pub mod board;
pub mod core;
pub mod games;
pub mod moves;
pub mod replay;
pub mod robot;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    CellGraph, CellId, EngineError, GameInit, GameRng, Geometry, Locator, ParseError, Piece,
    PieceId, PieceRegistry, PieceStack, PlayerId, PlayerMap, Position, RackId,
};

pub use crate::moves::{encode, parse, Move, Opcode};

pub use crate::rules::{
    GameResult, LenientTransitions, ReplayLeniency, RuleSet, StateConfig, StateId, StateTable,
    Strict,
};

pub use crate::board::{Board, ExecuteMode, ExecuteReport, RepeatedPositions, UndoFrame};

pub use crate::robot::{
    search_pool, CancelFlag, FlatMonteCarlo, Robot, Scoring, SearchAdapter, SearchConfig,
    SearchDriver, SearchOutcome, SearchStats, SearchWorker,
};

pub use crate::replay::{
    replay_record, DamagedLinePolicy, GameRecord, RecordedMove, Session, SessionError,
};
