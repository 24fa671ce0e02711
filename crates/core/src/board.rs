//! Board module - the 4x4 grid value type plus score counter
//!
//! The board is a 4x4 grid where each cell is either 0 (empty) or a power of two >= 2.
//! Uses a fixed-size array for zero-allocation copies; a board is `Copy`, so a
//! dry-run move is just a copy plus a transform.
//! Coordinates: (row, col) where row ranges 0..3 (top to bottom), col ranges 0..3 (left to right)

use arrayvec::ArrayVec;

use crate::error::BoardError;
use crate::rng::TileRng;
use crate::types::{Grid, CELL_COUNT, GRID_SIZE};

/// The game board - 4 rows x 4 columns plus the running score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    grid: Grid,
    score: u64,
}

impl Board {
    /// Create an empty board with score 0
    pub fn empty() -> Self {
        Self {
            grid: [[0; GRID_SIZE]; GRID_SIZE],
            score: 0,
        }
    }

    /// Start a new game: two spawned tiles, score 0.
    pub fn new_game<R: TileRng + ?Sized>(rng: &mut R) -> Self {
        let mut board = Self::empty();
        crate::engine::spawn_tile(&mut board, rng);
        crate::engine::spawn_tile(&mut board, rng);
        board
    }

    /// Build a board from a grid, validating every cell.
    ///
    /// Each cell must be 0 or a power of two >= 2.
    pub fn from_grid(grid: Grid, score: u64) -> Result<Self, BoardError> {
        for (row, cells) in grid.iter().enumerate() {
            for (col, &value) in cells.iter().enumerate() {
                if !is_valid_tile(value) {
                    return Err(BoardError::InvalidTile { row, col, value });
                }
            }
        }
        Ok(Self { grid, score })
    }

    /// Build a board from 16 row-major cells.
    pub fn from_cells(cells: &[u32], score: u64) -> Result<Self, BoardError> {
        if cells.len() != CELL_COUNT {
            return Err(BoardError::InvalidLength { len: cells.len() });
        }
        let mut grid = [[0u32; GRID_SIZE]; GRID_SIZE];
        for (i, &value) in cells.iter().enumerate() {
            grid[i / GRID_SIZE][i % GRID_SIZE] = value;
        }
        Self::from_grid(grid, score)
    }

    /// Construct without validation. Callers guarantee the data model.
    pub(crate) fn from_parts(grid: Grid, score: u64) -> Self {
        Self { grid, score }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Get cell at (row, col)
    /// Returns None if out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        self.grid.get(row).and_then(|r| r.get(col)).copied()
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: u32) {
        self.grid[row][col] = value;
    }

    /// Row-major iterator over all 16 cells
    pub fn cells(&self) -> impl Iterator<Item = u32> + '_ {
        self.grid.iter().flat_map(|row| row.iter().copied())
    }

    /// Positions of all empty cells in row-major order (no allocation)
    pub fn empty_cells(&self) -> ArrayVec<(usize, usize), CELL_COUNT> {
        let mut out = ArrayVec::new();
        for (row, cells) in self.grid.iter().enumerate() {
            for (col, &value) in cells.iter().enumerate() {
                if value == 0 {
                    out.push((row, col));
                }
            }
        }
        out
    }

    pub fn count_empty(&self) -> usize {
        self.cells().filter(|&v| v == 0).count()
    }

    /// Rows become columns. Score is carried over.
    pub fn transpose(&self) -> Self {
        let mut grid = [[0u32; GRID_SIZE]; GRID_SIZE];
        for (row, cells) in self.grid.iter().enumerate() {
            for (col, &value) in cells.iter().enumerate() {
                grid[col][row] = value;
            }
        }
        Self::from_parts(grid, self.score)
    }

    /// Reverse every row (horizontal mirror). Score is carried over.
    pub fn mirror(&self) -> Self {
        let mut grid = self.grid;
        for row in grid.iter_mut() {
            row.reverse();
        }
        Self::from_parts(grid, self.score)
    }

    /// log2 of each cell, row-major; 0 for empty cells
    pub fn exponents(&self) -> [u8; CELL_COUNT] {
        let mut out = [0u8; CELL_COUNT];
        for (slot, value) in out.iter_mut().zip(self.cells()) {
            if value != 0 {
                *slot = value.trailing_zeros() as u8;
            }
        }
        out
    }

    /// Sum of all tile values on the grid
    pub fn tile_sum(&self) -> u64 {
        self.cells().map(u64::from).sum()
    }
}

fn is_valid_tile(value: u32) -> bool {
    value == 0 || (value >= 2 && value.is_power_of_two())
}
