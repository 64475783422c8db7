//! Move records, opcodes and the text codec.
//!
//! - `Opcode`: the verb, also the key of every state transition
//! - `Move`: immutable record with typed constructors
//! - `parse` / `encode`: the whitespace-token text form

pub mod codec;
pub mod opcode;
pub mod record;

pub use codec::{encode, parse};
pub use opcode::Opcode;
pub use record::Move;
