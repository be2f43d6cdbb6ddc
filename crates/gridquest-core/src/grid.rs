//! The [`GridMap`] cell-state matrix.
//!
//! A `GridMap` is the single shared resource between user wall edits, the
//! maze generator and the search engine. Its dimensions are fixed for the
//! lifetime of the map; only cell states change.

use crate::geom::Cell;

/// State of a single map cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellState {
    /// Walkable.
    #[default]
    Open,
    /// Blocked.
    Wall,
}

/// Error raised when a cell outside the grid is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cell {cell} is outside the {rows}x{cols} grid")]
pub struct OutOfBounds {
    pub cell: Cell,
    pub rows: i32,
    pub cols: i32,
}

/// A `rows × cols` matrix of [`CellState`] values, stored row-major.
///
/// Reads fail fast on out-of-bounds cells; writes to out-of-bounds cells are
/// ignored (hot-loop callers are expected to bounds-check first).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridMap {
    states: Vec<CellState>,
    rows: i32,
    cols: i32,
}

impl GridMap {
    /// Create a new all-[`Open`](CellState::Open) map.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is not positive.
    pub fn new(rows: i32, cols: i32) -> Self {
        assert!(rows > 0 && cols > 0, "grid dimensions must be positive");
        Self {
            states: vec![CellState::Open; (rows * cols) as usize],
            rows,
            cols,
        }
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> i32 {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> i32 {
        self.cols
    }

    /// Whether the cell lies inside the grid.
    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row >= 0 && cell.row < self.rows && cell.col >= 0 && cell.col < self.cols
    }

    #[inline]
    fn idx(&self, cell: Cell) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        Some((cell.row * self.cols + cell.col) as usize)
    }

    /// State of a cell, or [`OutOfBounds`] for an invalid cell.
    pub fn state(&self, cell: Cell) -> Result<CellState, OutOfBounds> {
        match self.idx(cell) {
            Some(i) => Ok(self.states[i]),
            None => Err(OutOfBounds {
                cell,
                rows: self.rows,
                cols: self.cols,
            }),
        }
    }

    /// Whether the cell is inside the grid and open. The passability probe
    /// used by every search loop.
    #[inline]
    pub fn is_open(&self, cell: Cell) -> bool {
        matches!(self.idx(cell), Some(i) if self.states[i] == CellState::Open)
    }

    /// Set the state of a cell. Does nothing if the cell is out of bounds.
    #[inline]
    pub fn set_state(&mut self, cell: Cell, state: CellState) {
        if let Some(i) = self.idx(cell) {
            self.states[i] = state;
        }
    }

    /// Fill the whole map with the given state.
    pub fn fill(&mut self, state: CellState) {
        self.states.fill(state);
    }

    /// Count cells with the given state.
    pub fn count(&self, state: CellState) -> usize {
        self.states.iter().filter(|&&s| s == state).count()
    }

    /// Iterate over `(Cell, CellState)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, CellState)> + '_ {
        self.states.iter().enumerate().map(|(i, &s)| {
            let i = i as i32;
            (Cell::new(i / self.cols, i % self.cols), s)
        })
    }

    /// Collect all cells with the given state, in row-major order.
    pub fn cells_in(&self, state: CellState) -> Vec<Cell> {
        self.iter()
            .filter(|&(_, s)| s == state)
            .map(|(c, _)| c)
            .collect()
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn gridmap_round_trip() {
        let mut map = GridMap::new(2, 2);
        map.set_state(Cell::new(0, 1), CellState::Wall);
        let json = serde_json::to_string(&map).unwrap();
        let back: GridMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back.rows(), 2);
        assert_eq!(back.state(Cell::new(0, 1)), Ok(CellState::Wall));
    }
}
