//! Cell contents plus the per-owner occupancy index.
//!
//! Every mutation of a stack goes through `Cells`, which updates the index in
//! the same call. Move generation enumerates "my occupied cells" every turn
//! from this index, so it has to be exact. The index is an `im::OrdMap`:
//! iteration is in `CellId` order and cloning it for a search worker is O(1).

use std::sync::Arc;

use im::OrdMap;

use crate::core::{
    CellGraph, CellId, EmptyStack, EngineError, Piece, PieceStack, PlayerId, PlayerMap,
};

#[derive(Clone, Debug)]
pub struct Cells {
    graph: Arc<CellGraph>,
    stacks: Vec<PieceStack>,
    /// Board cells holding at least one piece of the owner, with the count.
    occupancy: PlayerMap<OrdMap<CellId, u16>>,
}

impl Cells {
    /// Empty cells; board cells get `base_level` fixed levels, racks none.
    #[must_use]
    pub fn new(graph: Arc<CellGraph>, player_count: usize, base_level: usize) -> Self {
        let stacks = graph
            .cells()
            .map(|c| PieceStack::new(if graph.is_on_board(c) { base_level } else { 0 }))
            .collect();
        Self {
            graph,
            stacks,
            occupancy: PlayerMap::with_default(player_count),
        }
    }

    #[must_use]
    pub fn graph(&self) -> &CellGraph {
        &self.graph
    }

    #[must_use]
    pub fn stack(&self, cell: CellId) -> &PieceStack {
        &self.stacks[cell.index()]
    }

    #[must_use]
    pub fn top(&self, cell: CellId) -> Option<Piece> {
        self.stack(cell).top()
    }

    /// Owner of the top piece above the base.
    #[must_use]
    pub fn top_owner(&self, cell: CellId) -> Option<PlayerId> {
        self.top(cell).and_then(|p| p.owner)
    }

    #[must_use]
    pub fn is_empty(&self, cell: CellId) -> bool {
        self.stack(cell).is_empty_above_base()
    }

    /// Board cells holding a piece of `player`, in `CellId` order.
    pub fn occupied(&self, player: PlayerId) -> impl Iterator<Item = CellId> + '_ {
        self.occupancy[player].keys().copied()
    }

    #[must_use]
    pub fn occupied_count(&self, player: PlayerId) -> usize {
        self.occupancy[player].len()
    }

    pub fn push(&mut self, cell: CellId, piece: Piece) {
        self.stacks[cell.index()].push(piece);
        self.note_added(cell, piece);
    }

    pub fn pop(&mut self, cell: CellId) -> Result<Piece, EngineError> {
        let piece = self.stacks[cell.index()]
            .pop()
            .map_err(|EmptyStack| self.empty(cell))?;
        self.note_removed(cell, piece);
        Ok(piece)
    }

    pub fn remove_at(&mut self, cell: CellId, index: usize) -> Result<Piece, EngineError> {
        let piece = self.stacks[cell.index()]
            .remove_at(index)
            .map_err(|EmptyStack| self.empty(cell))?;
        self.note_removed(cell, piece);
        Ok(piece)
    }

    pub fn insert_at(&mut self, cell: CellId, index: usize, piece: Piece) {
        self.stacks[cell.index()].insert_at(index, piece);
        self.note_added(cell, piece);
    }

    /// Empty every stack, base layers included, and the index with them.
    pub fn clear(&mut self) {
        for stack in &mut self.stacks {
            stack.clear();
        }
        for player in PlayerId::all(self.occupancy.player_count()) {
            self.occupancy[player] = OrdMap::new();
        }
    }

    /// Copy `other` into these cells, reusing stack allocations.
    pub(crate) fn copy_from(&mut self, other: &Self) {
        self.graph = Arc::clone(&other.graph);
        self.stacks.clone_from(&other.stacks);
        self.occupancy.clone_values_from(&other.occupancy);
    }

    /// Stack contents and index equal. Names the first differing cell.
    pub fn check_same(&self, other: &Self) -> Result<(), String> {
        if self.stacks.len() != other.stacks.len() {
            return Err("cell count".into());
        }
        for cell in self.graph.cells() {
            if !self.stack(cell).same_contents(other.stack(cell)) {
                return Err(format!("stack at {}", self.graph.name(cell)));
            }
        }
        if self.occupancy != other.occupancy {
            return Err("occupancy index".into());
        }
        Ok(())
    }

    fn empty(&self, cell: CellId) -> EngineError {
        EngineError::EmptyStack {
            cell: self.graph.name(cell),
        }
    }

    fn note_added(&mut self, cell: CellId, piece: Piece) {
        if let (Some(owner), true) = (piece.owner, self.graph.is_on_board(cell)) {
            *self.occupancy[owner].entry(cell).or_insert(0) += 1;
        }
    }

    fn note_removed(&mut self, cell: CellId, piece: Piece) {
        if let (Some(owner), true) = (piece.owner, self.graph.is_on_board(cell)) {
            let index = &mut self.occupancy[owner];
            match index.get(&cell).copied() {
                Some(n) if n > 1 => {
                    index.insert(cell, n - 1);
                }
                _ => {
                    index.remove(&cell);
                }
            }
        }
    }
}
