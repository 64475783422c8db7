//! "Capture": a small placement-and-capture game for exercising the core.
//!
//! - Square board, 5x5 or 7x7, optionally over a fixed tile layer
//! - Each player has a supply rack of stones and a rack of captured stones
//! - On your turn: place a stone from your supply on an empty cell, step a
//!   stone to a neighboring cell (capturing an enemy stone there), or shift
//!   a line of two or more own stones one step along its axis (capturing
//!   at the far end); pass only when nothing else is legal
//! - From rule revision 1, a landing stone also captures every enemy stone
//!   it sandwiches against another own stone
//! - Reach the capture target, or leave the next player with no stones at
//!   all, to win
//!
//! Supports 2-4 players.

mod config;
mod game;

pub use config::CaptureConfig;
pub use game::{CaptureRules, CaptureStates, CAPTURES};
