//! The move record.
//!
//! A `Move` is built once, either by [`parse`](super::parse) or by the typed
//! constructors below (the fast path used by move generation and search),
//! and is not changed by execution. Two kinds of fields:
//!
//! - **Specified**: opcode, player and operands. These define the move and
//!   are the only fields compared by `==` and hashed.
//! - **Unspecified**: the sequence number and captured pieces attached for
//!   display after the fact. They never affect equality.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::opcode::Opcode;
use crate::core::{Locator, PieceId, PlayerId, Position, RackId};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Move {
    pub opcode: Opcode,
    /// Acting player. For `start`, the seat that moves first.
    pub player: PlayerId,
    /// Source. For `line`, the first stone of the line.
    pub from: Option<Locator>,
    /// Destination. For `line`, the cell the leading stone lands on.
    pub to: Option<Locator>,
    /// For `line`, the last stone of the line (the end that leads).
    pub via: Option<Locator>,
    /// Optional payload, e.g. the piece kind chosen for a placement.
    pub piece: Option<PieceId>,

    pub sequence: Option<u32>,
    pub captured: SmallVec<[PieceId; 2]>,
}

impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.opcode == other.opcode
            && self.player == other.player
            && self.from == other.from
            && self.to == other.to
            && self.via == other.via
            && self.piece == other.piece
    }
}

impl Eq for Move {}

impl std::hash::Hash for Move {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.opcode.hash(state);
        self.player.hash(state);
        self.from.hash(state);
        self.to.hash(state);
        self.via.hash(state);
        self.piece.hash(state);
    }
}

impl Move {
    /// A move with no operands.
    #[must_use]
    pub fn new(opcode: Opcode, player: PlayerId) -> Self {
        Self {
            opcode,
            player,
            from: None,
            to: None,
            via: None,
            piece: None,
            sequence: None,
            captured: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn done(player: PlayerId) -> Self {
        Self::new(Opcode::Done, player)
    }

    #[must_use]
    pub fn pass(player: PlayerId) -> Self {
        Self::new(Opcode::Pass, player)
    }

    #[must_use]
    pub fn resign(player: PlayerId) -> Self {
        Self::new(Opcode::Resign, player)
    }

    #[must_use]
    pub fn edit(player: PlayerId) -> Self {
        Self::new(Opcode::Edit, player)
    }

    /// Begin play with `first` to move.
    #[must_use]
    pub fn start(first: PlayerId) -> Self {
        Self::new(Opcode::Start, first)
    }

    /// Lift the top piece of `from`; `pick` for racks, `pickb` for the board.
    #[must_use]
    pub fn pick(player: PlayerId, from: Locator) -> Self {
        let opcode = match from {
            Locator::Rack(_) => Opcode::Pick,
            Locator::Board(_) => Opcode::PickB,
        };
        Self {
            from: Some(from),
            ..Self::new(opcode, player)
        }
    }

    /// Put the picked piece on `to`; `drop` for racks, `dropb` for the board.
    #[must_use]
    pub fn drop(player: PlayerId, to: Locator) -> Self {
        let opcode = match to {
            Locator::Rack(_) => Opcode::Drop,
            Locator::Board(_) => Opcode::DropB,
        };
        Self {
            to: Some(to),
            ..Self::new(opcode, player)
        }
    }

    #[must_use]
    pub fn place(player: PlayerId, rack: RackId, to: Position) -> Self {
        Self {
            from: Some(Locator::Rack(rack)),
            to: Some(Locator::Board(to)),
            ..Self::new(Opcode::Place, player)
        }
    }

    #[must_use]
    pub fn step(player: PlayerId, from: Position, to: Position) -> Self {
        Self {
            from: Some(Locator::Board(from)),
            to: Some(Locator::Board(to)),
            ..Self::new(Opcode::Move, player)
        }
    }

    /// Shift the line `start..=end` so that `end` lands on `anchor`.
    #[must_use]
    pub fn line(player: PlayerId, start: Position, end: Position, anchor: Position) -> Self {
        Self {
            from: Some(Locator::Board(start)),
            via: Some(Locator::Board(end)),
            to: Some(Locator::Board(anchor)),
            ..Self::new(Opcode::Line, player)
        }
    }

    #[must_use]
    pub fn with_piece(mut self, piece: PieceId) -> Self {
        self.piece = Some(piece);
        self
    }

    #[must_use]
    pub fn with_sequence(mut self, sequence: u32) -> Self {
        self.sequence = Some(sequence);
        self
    }

    #[must_use]
    pub fn with_captured(mut self, captured: &[PieceId]) -> Self {
        self.captured = SmallVec::from_slice(captured);
        self
    }

    #[must_use]
    pub fn from_position(&self) -> Option<Position> {
        match self.from {
            Some(Locator::Board(p)) => Some(p),
            _ => None,
        }
    }

    #[must_use]
    pub fn to_position(&self) -> Option<Position> {
        match self.to {
            Some(Locator::Board(p)) => Some(p),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    fn p(col: char, row: u16) -> Position {
        Position::new(col, row)
    }

    #[test]
    fn test_pick_and_drop_choose_opcode() {
        let player = PlayerId::new(0);
        assert_eq!(Move::pick(player, Locator::Rack(RackId(0))).opcode, Opcode::Pick);
        assert_eq!(Move::pick(player, Locator::Board(p('A', 1))).opcode, Opcode::PickB);
        assert_eq!(Move::drop(player, Locator::Rack(RackId(1))).opcode, Opcode::Drop);
        assert_eq!(Move::drop(player, Locator::Board(p('B', 2))).opcode, Opcode::DropB);
    }

    #[test]
    fn test_equality_ignores_unspecified_fields() {
        let player = PlayerId::new(1);
        let plain = Move::step(player, p('C', 3), p('C', 4));
        let annotated = plain
            .clone()
            .with_sequence(17)
            .with_captured(&[PieceId(0)]);
        assert_eq!(plain, annotated);

        let mut set = FxHashSet::default();
        set.insert(plain);
        assert!(set.contains(&annotated));
    }

    #[test]
    fn test_equality_sees_specified_fields() {
        let a = Move::place(PlayerId::new(0), RackId(0), p('A', 1));
        assert_ne!(a, Move::place(PlayerId::new(1), RackId(0), p('A', 1)));
        assert_ne!(a, Move::place(PlayerId::new(0), RackId(0), p('A', 2)));
        assert_ne!(a, a.clone().with_piece(PieceId(3)));
    }

    #[test]
    fn test_line_operands() {
        let mv = Move::line(PlayerId::new(0), p('A', 1), p('B', 1), p('C', 1));
        assert_eq!(mv.from_position(), Some(p('A', 1)));
        assert_eq!(mv.via, Some(Locator::Board(p('B', 1))));
        assert_eq!(mv.to_position(), Some(p('C', 1)));
    }
}
