//! Core value types: players, geometry, pieces, stacks, RNG, init, errors.
//!
//! Everything here is game-agnostic and free of board state. Games describe
//! themselves by building a `CellGraph` and registering pieces in a
//! `PieceRegistry`; they never change these types.

pub mod error;
pub mod geometry;
pub mod init;
pub mod piece;
pub mod player;
pub mod rng;
pub mod stack;

pub use error::{EmptyStack, EngineError, ParseError};
pub use geometry::{CellGraph, CellId, Direction, Geometry, Locator, Position, RackId};
pub use init::GameInit;
pub use piece::{Piece, PieceId, PieceRegistry};
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
pub use stack::PieceStack;
