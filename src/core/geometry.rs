//! Board geometry and the cell graph.
//!
//! A `CellGraph` is built once per session and never changes: board cells
//! in column-major order (`A1, A2, ..., B1, ...`) followed by off-board rack
//! cells. `CellId` order is the canonical iteration order; move generation
//! walks cells in this order, so it is part of the reproducibility contract.

use serde::{Deserialize, Serialize};

use super::error::EngineError;

/// Connectivity of the board cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Geometry {
    /// Orthogonal neighbors only.
    Square4,
    /// Orthogonal and diagonal neighbors.
    Square8,
    /// Hexagons in axial coordinates (column, row).
    Hex6,
    /// No adjacency at all.
    Standalone,
}

const SQUARE4: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
const SQUARE8: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];
const HEX6: [(i8, i8); 6] = [(0, 1), (1, 1), (1, 0), (0, -1), (-1, -1), (-1, 0)];

impl Geometry {
    #[must_use]
    pub const fn direction_count(self) -> usize {
        match self {
            Geometry::Square4 => 4,
            Geometry::Square8 => 8,
            Geometry::Hex6 => 6,
            Geometry::Standalone => 0,
        }
    }

    fn offsets(self) -> &'static [(i8, i8)] {
        match self {
            Geometry::Square4 => &SQUARE4,
            Geometry::Square8 => &SQUARE8,
            Geometry::Hex6 => &HEX6,
            Geometry::Standalone => &[],
        }
    }
}

/// Index into a geometry's direction list. Opposite directions are half the
/// list apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Direction(pub u8);

impl Direction {
    #[must_use]
    pub fn opposite(self, geometry: Geometry) -> Self {
        let n = geometry.direction_count() as u8;
        Self((self.0 + n / 2) % n.max(1))
    }
}

/// Board coordinate: column letter and 1-based row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub col: char,
    pub row: u16,
}

impl Position {
    #[must_use]
    pub const fn new(col: char, row: u16) -> Self {
        Self { col, row }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.col, self.row)
    }
}

/// Off-board pool of pieces (supply, captured pile, ...). Games assign
/// meaning to the numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RackId(pub u8);

impl std::fmt::Display for RackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "R{}", self.0)
    }
}

/// Where a move operand points: a board square or a rack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locator {
    Board(Position),
    Rack(RackId),
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locator::Board(p) => p.fmt(f),
            Locator::Rack(r) => r.fmt(f),
        }
    }
}

/// Dense cell index, stable for the lifetime of a `CellGraph`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellId(pub u16);

impl CellId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Immutable cell topology: positions, racks and per-direction links.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellGraph {
    geometry: Geometry,
    columns: u8,
    rows: u16,
    racks: u8,
    links: Vec<Option<CellId>>,
}

impl CellGraph {
    /// Build a `columns` x `rows` board plus `racks` off-board cells.
    pub fn new(geometry: Geometry, columns: u8, rows: u16, racks: u8) -> Result<Self, EngineError> {
        if columns == 0 || columns > 26 {
            return Err(EngineError::BadInit(format!(
                "board needs 1..=26 columns, got {columns}"
            )));
        }
        if rows == 0 {
            return Err(EngineError::BadInit("board needs at least one row".into()));
        }
        let board_cells = columns as usize * rows as usize;
        if board_cells + racks as usize > u16::MAX as usize {
            return Err(EngineError::BadInit("too many cells".into()));
        }

        let mut graph = Self {
            geometry,
            columns,
            rows,
            racks,
            links: Vec::with_capacity(board_cells * geometry.direction_count()),
        };

        for c in 0..columns as i32 {
            for r in 0..rows as i32 {
                for &(dc, dr) in geometry.offsets() {
                    let link = graph.index_of(c + dc as i32, r + dr as i32);
                    graph.links.push(link);
                }
            }
        }

        Ok(graph)
    }

    fn index_of(&self, col: i32, row: i32) -> Option<CellId> {
        if col < 0 || row < 0 || col >= self.columns as i32 || row >= self.rows as i32 {
            return None;
        }
        Some(CellId((col * self.rows as i32 + row) as u16))
    }

    #[must_use]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    #[must_use]
    pub fn columns(&self) -> u8 {
        self.columns
    }

    #[must_use]
    pub fn rows(&self) -> u16 {
        self.rows
    }

    #[must_use]
    pub fn board_cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.board_cell_count() + self.racks as usize
    }

    #[must_use]
    pub fn rack_count(&self) -> usize {
        self.racks as usize
    }

    /// All cells, board first, in canonical order.
    pub fn cells(&self) -> impl Iterator<Item = CellId> {
        (0..self.cell_count() as u16).map(CellId)
    }

    /// Board cells only, in canonical order.
    pub fn board_cells(&self) -> impl Iterator<Item = CellId> {
        (0..self.board_cell_count() as u16).map(CellId)
    }

    pub fn directions(&self) -> impl Iterator<Item = Direction> {
        (0..self.geometry.direction_count() as u8).map(Direction)
    }

    #[must_use]
    pub fn is_on_board(&self, cell: CellId) -> bool {
        cell.index() < self.board_cell_count()
    }

    #[must_use]
    pub fn cell_at(&self, pos: Position) -> Option<CellId> {
        if !pos.col.is_ascii_uppercase() || pos.row == 0 {
            return None;
        }
        let col = (pos.col as u8 - b'A') as i32;
        self.index_of(col, pos.row as i32 - 1)
    }

    #[must_use]
    pub fn rack(&self, rack: RackId) -> Option<CellId> {
        (rack.0 < self.racks).then(|| CellId((self.board_cell_count() + rack.0 as usize) as u16))
    }

    #[must_use]
    pub fn locate(&self, loc: Locator) -> Option<CellId> {
        match loc {
            Locator::Board(pos) => self.cell_at(pos),
            Locator::Rack(rack) => self.rack(rack),
        }
    }

    /// Like [`locate`](Self::locate), but a miss is a fatal error.
    pub fn require(&self, loc: Locator) -> Result<CellId, EngineError> {
        self.locate(loc)
            .ok_or_else(|| EngineError::MissingCell(loc.to_string()))
    }

    /// Inverse of [`locate`](Self::locate). Panics on a foreign `CellId`.
    #[must_use]
    pub fn locator(&self, cell: CellId) -> Locator {
        let board = self.board_cell_count();
        if cell.index() < board {
            let col = cell.index() / self.rows as usize;
            let row = cell.index() % self.rows as usize;
            Locator::Board(Position::new((b'A' + col as u8) as char, row as u16 + 1))
        } else {
            assert!(cell.index() < self.cell_count(), "cell {cell:?} not in graph");
            Locator::Rack(RackId((cell.index() - board) as u8))
        }
    }

    #[must_use]
    pub fn name(&self, cell: CellId) -> String {
        self.locator(cell).to_string()
    }

    /// Adjacent board cell in `dir`, or `None` off the edge, for racks, and
    /// for standalone geometry.
    #[inline]
    #[must_use]
    pub fn neighbor(&self, cell: CellId, dir: Direction) -> Option<CellId> {
        let n = self.geometry.direction_count();
        if !self.is_on_board(cell) || dir.0 as usize >= n {
            return None;
        }
        self.links[cell.index() * n + dir.0 as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(col: char, row: u16) -> Position {
        Position::new(col, row)
    }

    #[test]
    fn test_direction_counts() {
        assert_eq!(Geometry::Square4.direction_count(), 4);
        assert_eq!(Geometry::Square8.direction_count(), 8);
        assert_eq!(Geometry::Hex6.direction_count(), 6);
        assert_eq!(Geometry::Standalone.direction_count(), 0);
    }

    #[test]
    fn test_opposites_are_inverse_steps() {
        for geometry in [Geometry::Square4, Geometry::Square8, Geometry::Hex6] {
            let graph = CellGraph::new(geometry, 5, 5, 0).unwrap();
            let center = graph.cell_at(pos('C', 3)).unwrap();
            for dir in graph.directions() {
                let out = graph.neighbor(center, dir).unwrap();
                let back = graph.neighbor(out, dir.opposite(geometry)).unwrap();
                assert_eq!(back, center, "{geometry:?} {dir:?}");
            }
        }
    }

    #[test]
    fn test_corner_has_fewer_neighbors() {
        let graph = CellGraph::new(Geometry::Square8, 3, 3, 0).unwrap();
        let corner = graph.cell_at(pos('A', 1)).unwrap();
        let count = graph
            .directions()
            .filter(|d| graph.neighbor(corner, *d).is_some())
            .count();
        assert_eq!(count, 3);
    }

    #[test]
    fn test_column_major_order() {
        let graph = CellGraph::new(Geometry::Square4, 2, 3, 1).unwrap();
        let names: Vec<_> = graph.cells().map(|c| graph.name(c)).collect();
        assert_eq!(names, vec!["A1", "A2", "A3", "B1", "B2", "B3", "R0"]);
    }

    #[test]
    fn test_locate_round_trip() {
        let graph = CellGraph::new(Geometry::Hex6, 4, 4, 2).unwrap();
        for cell in graph.cells() {
            assert_eq!(graph.locate(graph.locator(cell)), Some(cell));
        }
        assert!(graph.cell_at(pos('E', 1)).is_none());
        assert!(graph.cell_at(pos('A', 5)).is_none());
        assert!(graph.rack(RackId(2)).is_none());
    }

    #[test]
    fn test_racks_have_no_neighbors() {
        let graph = CellGraph::new(Geometry::Square4, 3, 3, 1).unwrap();
        let rack = graph.rack(RackId(0)).unwrap();
        assert!(!graph.is_on_board(rack));
        assert!(graph.neighbor(rack, Direction(0)).is_none());
    }

    #[test]
    fn test_require_reports_missing_cell() {
        let graph = CellGraph::new(Geometry::Square4, 3, 3, 0).unwrap();
        let err = graph.require(Locator::Board(pos('Z', 9))).unwrap_err();
        assert_eq!(err, EngineError::MissingCell("Z9".into()));
    }

    #[test]
    fn test_rejects_oversized_board() {
        assert!(CellGraph::new(Geometry::Square4, 27, 3, 0).is_err());
        assert!(CellGraph::new(Geometry::Square4, 3, 0, 0).is_err());
    }
}
