//! Interned piece values and the per-session registry that owns them.
//!
//! A `Piece` is a small `Copy` value. Cells hold copies, never references,
//! and nothing mutates a piece after registration. The 64-bit `tag` feeds the
//! board digest, so tags come from a fixed-seed stream: registering the same
//! pieces in the same order yields the same tags in every process.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::error::EngineError;
use super::player::PlayerId;
use super::rng::GameRng;

/// Seed of the piece tag stream. Changing it invalidates every stored digest.
const TAG_SEED: u64 = 0x7A65_5EED_0000_0001;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PieceId(pub u16);

impl PieceId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    /// `None` for neutral pieces such as board tiles.
    pub owner: Option<PlayerId>,
    pub tag: u64,
}

impl Piece {
    #[must_use]
    pub fn is_owned_by(&self, player: PlayerId) -> bool {
        self.owner == Some(player)
    }
}

/// Explicit piece table, created per session and handed to the rule set.
///
/// ```
/// use boardcore::core::{PieceRegistry, PlayerId};
///
/// let mut registry = PieceRegistry::new();
/// let black = registry.register("black", Some(PlayerId::new(0)));
/// let again = PieceRegistry::new().register("black", Some(PlayerId::new(0)));
/// assert_eq!(black.tag, again.tag);
/// ```
#[derive(Clone, Debug)]
pub struct PieceRegistry {
    pieces: Vec<Piece>,
    names: Vec<String>,
    by_name: FxHashMap<String, PieceId>,
    tags: GameRng,
}

impl Default for PieceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pieces: Vec::new(),
            names: Vec::new(),
            by_name: FxHashMap::default(),
            tags: GameRng::new(TAG_SEED),
        }
    }

    /// Intern a new piece kind. Panics on a duplicate name.
    pub fn register(&mut self, name: impl Into<String>, owner: Option<PlayerId>) -> Piece {
        let name = name.into();
        assert!(
            !self.by_name.contains_key(&name),
            "Piece {name:?} already registered"
        );
        assert!(self.pieces.len() < u16::MAX as usize, "Too many piece kinds");

        let piece = Piece {
            id: PieceId(self.pieces.len() as u16),
            owner,
            tag: self.tags.next_u64(),
        };
        self.by_name.insert(name.clone(), piece.id);
        self.pieces.push(piece);
        self.names.push(name);
        piece
    }

    pub fn get(&self, id: PieceId) -> Result<Piece, EngineError> {
        self.pieces
            .get(id.index())
            .copied()
            .ok_or(EngineError::UnknownPiece(id.0))
    }

    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<Piece> {
        self.by_name.get(name).map(|id| self.pieces[id.index()])
    }

    #[must_use]
    pub fn name(&self, id: PieceId) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter()
    }
}
