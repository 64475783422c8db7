//! Piece stacks: the ordered contents of one cell.
//!
//! Index 0 is the bottom. The lowest `base` levels are not removable; games
//! with a tile layer (the board square itself is a piece) use `base = 1`.
//! `pop`, `top` and `height_above_base` only ever see the part above it.
//!
//! A stack knows nothing about owners. The per-owner occupancy index lives
//! in [`Cells`](crate::board::Cells), which wraps every mutation.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::error::EmptyStack;
use super::piece::Piece;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceStack {
    pieces: SmallVec<[Piece; 4]>,
    base: usize,
}

impl PieceStack {
    #[must_use]
    pub fn new(base: usize) -> Self {
        Self {
            pieces: SmallVec::new(),
            base,
        }
    }

    #[must_use]
    pub fn base(&self) -> usize {
        self.base
    }

    pub fn push(&mut self, piece: Piece) {
        self.pieces.push(piece);
    }

    pub fn pop(&mut self) -> Result<Piece, EmptyStack> {
        if self.pieces.len() <= self.base {
            return Err(EmptyStack);
        }
        self.pieces.pop().ok_or(EmptyStack)
    }

    /// Top piece above the base, if any.
    #[must_use]
    pub fn top(&self) -> Option<Piece> {
        if self.pieces.len() > self.base {
            self.pieces.last().copied()
        } else {
            None
        }
    }

    /// Topmost piece of the base layer (the tile), if the stack has one.
    #[must_use]
    pub fn base_piece(&self) -> Option<Piece> {
        let n = self.base.min(self.pieces.len());
        n.checked_sub(1).map(|i| self.pieces[i])
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.pieces.len()
    }

    #[must_use]
    pub fn height_above_base(&self) -> usize {
        self.pieces.len().saturating_sub(self.base)
    }

    #[must_use]
    pub fn is_empty_above_base(&self) -> bool {
        self.height_above_base() == 0
    }

    #[must_use]
    pub fn piece_at(&self, index: usize) -> Option<Piece> {
        self.pieces.get(index).copied()
    }

    /// Take out a piece from anywhere above the base.
    pub fn remove_at(&mut self, index: usize) -> Result<Piece, EmptyStack> {
        if index < self.base || index >= self.pieces.len() {
            return Err(EmptyStack);
        }
        Ok(self.pieces.remove(index))
    }

    /// Put a piece back at `index`. Panics if `index` is below the base or
    /// past the top; only undo replays and rule code with a known index call
    /// this.
    pub fn insert_at(&mut self, index: usize, piece: Piece) {
        assert!(
            index >= self.base.min(self.pieces.len()) && index <= self.pieces.len(),
            "insert at {index} outside {}..={}",
            self.base,
            self.pieces.len()
        );
        self.pieces.insert(index, piece);
    }

    /// Compare contents and base, ignoring spare capacity.
    #[must_use]
    pub fn same_contents(&self, other: &Self) -> bool {
        self.base == other.base && self.pieces[..] == other.pieces[..]
    }

    /// Drop every piece, base layer included.
    pub fn clear(&mut self) {
        self.pieces.clear();
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Piece> {
        self.pieces.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Piece] {
        &self.pieces
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PieceId, PlayerId};

    fn piece(id: u16) -> Piece {
        Piece {
            id: PieceId(id),
            owner: Some(PlayerId::new(0)),
            tag: u64::from(id) * 31,
        }
    }

    fn tile() -> Piece {
        Piece {
            id: PieceId(99),
            owner: None,
            tag: 7,
        }
    }

    #[test]
    fn test_push_pop_top() {
        let mut stack = PieceStack::new(0);
        assert_eq!(stack.top(), None);
        stack.push(piece(1));
        stack.push(piece(2));
        assert_eq!(stack.top(), Some(piece(2)));
        assert_eq!(stack.pop(), Ok(piece(2)));
        assert_eq!(stack.pop(), Ok(piece(1)));
        assert_eq!(stack.pop(), Err(EmptyStack));
    }

    #[test]
    fn test_base_layer_is_not_removable() {
        let mut stack = PieceStack::new(1);
        stack.push(tile());
        assert_eq!(stack.top(), None);
        assert_eq!(stack.base_piece(), Some(tile()));
        assert_eq!(stack.height(), 1);
        assert_eq!(stack.height_above_base(), 0);
        assert_eq!(stack.pop(), Err(EmptyStack));

        stack.push(piece(3));
        assert_eq!(stack.height_above_base(), 1);
        assert_eq!(stack.pop(), Ok(piece(3)));
        assert_eq!(stack.remove_at(0), Err(EmptyStack));
    }

    #[test]
    fn test_remove_and_insert_buried() {
        let mut stack = PieceStack::new(1);
        stack.push(tile());
        stack.push(piece(1));
        stack.push(piece(2));

        assert_eq!(stack.remove_at(1), Ok(piece(1)));
        assert_eq!(stack.as_slice(), &[tile(), piece(2)]);

        stack.insert_at(1, piece(1));
        assert_eq!(stack.as_slice(), &[tile(), piece(1), piece(2)]);
    }

    #[test]
    fn test_same_contents_ignores_capacity() {
        let mut a = PieceStack::new(0);
        let mut b = PieceStack::new(0);
        for i in 0..6 {
            a.push(piece(i));
        }
        for _ in 0..6 {
            a.pop().unwrap();
        }
        a.push(piece(1));
        b.push(piece(1));
        assert!(a.same_contents(&b));

        b.push(piece(2));
        assert!(!a.same_contents(&b));
    }

    #[test]
    fn test_clear_empties_base_too() {
        let mut stack = PieceStack::new(1);
        stack.push(tile());
        stack.push(piece(1));
        stack.clear();
        assert_eq!(stack.height(), 0);
        assert_eq!(stack.base_piece(), None);
    }
}
