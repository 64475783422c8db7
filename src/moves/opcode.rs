//! Move opcodes and their text keywords.

use serde::{Deserialize, Serialize};

/// The verb of a move. Every state table is keyed on these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Opcode {
    /// Leave the puzzle/edit state and begin play with a given seat to move.
    Start,
    /// Enter the puzzle/edit state.
    Edit,
    /// Confirm the pending move and pass the turn.
    Done,
    Resign,
    Pass,
    /// Lift the top piece of a rack.
    Pick,
    /// Lift the top piece of a board cell.
    PickB,
    /// Put the picked piece on a rack.
    Drop,
    /// Put the picked piece on a board cell.
    DropB,
    /// Rack to board in one step.
    Place,
    /// Board to board in one step.
    Move,
    /// Shift a contiguous line of pieces as one unit.
    Line,
}

impl Opcode {
    pub const ALL: [Opcode; 12] = [
        Opcode::Start,
        Opcode::Edit,
        Opcode::Done,
        Opcode::Resign,
        Opcode::Pass,
        Opcode::Pick,
        Opcode::PickB,
        Opcode::Drop,
        Opcode::DropB,
        Opcode::Place,
        Opcode::Move,
        Opcode::Line,
    ];

    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Opcode::Start => "start",
            Opcode::Edit => "edit",
            Opcode::Done => "done",
            Opcode::Resign => "resign",
            Opcode::Pass => "pass",
            Opcode::Pick => "pick",
            Opcode::PickB => "pickb",
            Opcode::Drop => "drop",
            Opcode::DropB => "dropb",
            Opcode::Place => "place",
            Opcode::Move => "move",
            Opcode::Line => "line",
        }
    }

    /// Case-insensitive keyword lookup.
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.keyword().eq_ignore_ascii_case(word))
    }

    /// Staged halves of a move. These never change whose turn it is.
    #[must_use]
    pub const fn is_staged(self) -> bool {
        matches!(self, Opcode::Pick | Opcode::PickB | Opcode::Drop | Opcode::DropB)
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}
