//! Per-game seams.
//!
//! Games implement `RuleSet` and describe their states with a `StateTable`.
//! The board calls into both but never interprets game-specific concepts
//! directly.

pub mod engine;
pub mod machine;

pub use engine::{BoardLayout, GameResult, RuleSet};
pub use machine::{
    LenientTransitions, ReplayLeniency, StateConfig, StateId, StateTable, StateTableBuilder,
    Strict,
};
