//! Board digest keys.
//!
//! The digest XORs together one mixed value per fact about the board: each
//! piece at each level of each cell, the picked piece, each in-flight cell,
//! each counter, and the `(state, turn)` pair. Keys come from a fixed-seed
//! stream, so a digest computed today matches one computed by another
//! process next year for the same position.

use super::state::BoardState;
use crate::core::{CellGraph, GameRng, PlayerId};

/// Seed of the key stream. Changing it invalidates every stored digest.
const DIGEST_SEED: u64 = 0xD16E_57B0_A2D5_0001;

#[derive(Clone, Debug)]
pub(crate) struct DigestKeys {
    cells: Vec<u64>,
    counters: Vec<u64>,
    slots: usize,
    picked: u64,
    source: u64,
    dest: u64,
    state: u64,
}

impl DigestKeys {
    pub(crate) fn new(graph: &CellGraph, player_count: usize, slots: usize) -> Self {
        let mut rng = GameRng::new(DIGEST_SEED);
        let picked = rng.next_u64();
        let source = rng.next_u64();
        let dest = rng.next_u64();
        let state = rng.next_u64();
        let cells = graph.cells().map(|_| rng.next_u64()).collect();
        let counters = (0..player_count * slots).map(|_| rng.next_u64()).collect();
        Self {
            cells,
            counters,
            slots,
            picked,
            source,
            dest,
            state,
        }
    }

    pub(crate) fn digest(&self, board: &BoardState) -> u64 {
        let cells = board.cells();
        let mut h = 0u64;

        for cell in cells.graph().cells() {
            let key = self.cells[cell.index()];
            for (level, piece) in cells.stack(cell).iter().enumerate() {
                h ^= mix(piece.tag ^ key.rotate_left(level as u32 * 7 + 1));
            }
        }

        if let Some(piece) = board.picked() {
            h ^= mix(piece.tag ^ self.picked);
        }
        for (slot, (cell, _)) in board.sources().iter().enumerate() {
            h ^= mix(self.cells[cell.index()] ^ self.source.rotate_left(slot as u32 + 1));
        }
        for (slot, (cell, _)) in board.dests().iter().enumerate() {
            h ^= mix(self.cells[cell.index()] ^ self.dest.rotate_left(slot as u32 + 1));
        }

        for player in PlayerId::all(board.player_count()) {
            for slot in 0..self.slots {
                let key = self.counters[player.index() * self.slots + slot];
                h ^= mix(key ^ board.counter(player, slot) as u64);
            }
        }

        let state = (u64::from(board.state().0) << 8) | u64::from(board.whose_turn().0);
        h ^= mix(self.state ^ state);
        h
    }
}

/// splitmix64 finalizer.
#[inline]
fn mix(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
