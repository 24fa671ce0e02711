//! Transition engine - the pure move/merge/spawn rules
//!
//! Every direction is a thin adapter over one primitive,
//! [`compact_and_merge_line`], which implements "move left" on a single row:
//!
//! - **Left**: each row as read
//! - **Right**: mirror, Left, mirror back
//! - **Up**: transpose, Left, transpose back
//! - **Down**: transpose, Right, transpose back
//!
//! Left/Right and Up/Down are therefore exact mirror images by construction.
//!
//! All functions are O(1) over the 16 cells and never allocate.

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::rng::TileRng;
use crate::types::{
    Direction, Grid, MoveOutcome, ACTION_COUNT, GRID_SIZE, MAX_TILE, SPAWN_FOUR_ONE_IN, WIN_TILE,
};

/// A tile placed by [`spawn_tile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Spawn {
    pub row: usize,
    pub col: usize,
    pub value: u32,
}

/// Compact a line toward index 0, then merge equal neighbours once.
///
/// Zeros are dropped, the remaining tiles are scanned front to back and each
/// tile is compared to its neighbour in the compacted sequence. Equal pairs
/// become one doubled tile and the scan skips past both, so a tile produced by
/// a merge is never merged again in the same pass:
///
/// ```
/// use twenty48_core::engine::compact_and_merge_line;
///
/// assert_eq!(compact_and_merge_line([2, 2, 2, 0]), ([4, 2, 0, 0], 4));
/// assert_eq!(compact_and_merge_line([2, 2, 2, 2]), ([4, 4, 0, 0], 8));
/// assert_eq!(compact_and_merge_line([0, 0, 2, 2]), ([4, 0, 0, 0], 4));
/// ```
///
/// Two [`MAX_TILE`] tiles stay side by side instead of overflowing.
///
/// Returns the new line and the score gained (sum of merged tiles).
pub fn compact_and_merge_line(line: [u32; GRID_SIZE]) -> ([u32; GRID_SIZE], u64) {
    let mut compacted: ArrayVec<u32, GRID_SIZE> = ArrayVec::new();
    compacted.extend(line.iter().copied().filter(|&v| v != 0));

    let mut out = [0u32; GRID_SIZE];
    let mut write = 0usize;
    let mut gained = 0u64;
    let mut i = 0usize;

    while i < compacted.len() {
        let value = compacted[i];
        let merged = if i + 1 < compacted.len() && compacted[i + 1] == value {
            value.checked_mul(2)
        } else {
            None
        };
        if let Some(merged) = merged {
            out[write] = merged;
            gained += u64::from(merged);
            i += 2;
        } else {
            out[write] = value;
            i += 1;
        }
        write += 1;
    }

    (out, gained)
}

/// Apply Left semantics to every row of a grid at once.
fn shift_rows_left(grid: &Grid) -> (Grid, u64) {
    let mut out = *grid;
    let mut gained = 0u64;
    for row in out.iter_mut() {
        let (line, g) = compact_and_merge_line(*row);
        *row = line;
        gained += g;
    }
    (out, gained)
}

fn mirror(grid: &Grid) -> Grid {
    let mut out = *grid;
    for row in out.iter_mut() {
        row.reverse();
    }
    out
}

fn transpose(grid: &Grid) -> Grid {
    let mut out = [[0u32; GRID_SIZE]; GRID_SIZE];
    for (r, row) in grid.iter().enumerate() {
        for (c, &value) in row.iter().enumerate() {
            out[c][r] = value;
        }
    }
    out
}

fn shift_rows_right(grid: &Grid) -> (Grid, u64) {
    let (shifted, gained) = shift_rows_left(&mirror(grid));
    (mirror(&shifted), gained)
}

/// Shift a raw grid. Returns the new grid and the score gained.
pub fn shift_grid(grid: &Grid, direction: Direction) -> (Grid, u64) {
    match direction {
        Direction::Left => shift_rows_left(grid),
        Direction::Right => shift_rows_right(grid),
        Direction::Up => {
            let (shifted, gained) = shift_rows_left(&transpose(grid));
            (transpose(&shifted), gained)
        }
        Direction::Down => {
            let (shifted, gained) = shift_rows_right(&transpose(grid));
            (transpose(&shifted), gained)
        }
    }
}

/// Compute the board after shifting in `direction`, without spawning.
///
/// The input is untouched. When the grid does not change the returned board
/// equals the input and the outcome is [`MoveOutcome::NONE`].
pub fn apply_move(board: &Board, direction: Direction) -> (Board, MoveOutcome) {
    let (grid, gained) = shift_grid(board.grid(), direction);
    if grid == *board.grid() {
        return (*board, MoveOutcome::NONE);
    }
    let next = Board::from_parts(grid, board.score() + gained);
    (
        next,
        MoveOutcome {
            changed: true,
            score_gained: gained,
        },
    )
}

impl Board {
    /// Shift in place. All rows/columns are updated before this returns.
    pub fn apply_move(&mut self, direction: Direction) -> MoveOutcome {
        let (next, outcome) = apply_move(self, direction);
        if outcome.changed {
            *self = next;
        }
        outcome
    }

    /// Shift, then spawn one tile iff the shift changed the grid.
    pub fn step<R: TileRng + ?Sized>(&mut self, direction: Direction, rng: &mut R) -> MoveOutcome {
        step(self, direction, rng).0
    }
}

/// Place a 2 (90%) or 4 (10%) on a uniformly chosen empty cell.
///
/// The empty cell is drawn first, then the value. A full grid is left
/// untouched and `None` is returned.
pub fn spawn_tile<R: TileRng + ?Sized>(board: &mut Board, rng: &mut R) -> Option<Spawn> {
    let empty = board.empty_cells();
    if empty.is_empty() {
        return None;
    }

    let pick = rng.next_range(empty.len() as u32) as usize;
    let (row, col) = empty[pick];
    let value = if rng.next_range(SPAWN_FOUR_ONE_IN) == 0 {
        4
    } else {
        2
    };

    board.set(row, col, value);
    Some(Spawn { row, col, value })
}

/// One full turn: move, then spawn exactly one tile iff the move changed the grid.
pub fn step<R: TileRng + ?Sized>(
    board: &mut Board,
    direction: Direction,
    rng: &mut R,
) -> (MoveOutcome, Option<Spawn>) {
    let outcome = board.apply_move(direction);
    if !outcome.changed {
        return (outcome, None);
    }
    let spawn = spawn_tile(board, rng);
    (outcome, spawn)
}

/// True if any cell is empty or any two orthogonal neighbours can merge.
///
/// Direct neighbour scan; no move is simulated.
pub fn has_legal_move(board: &Board) -> bool {
    let grid = board.grid();
    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            let value = grid[row][col];
            if value == 0 {
                return true;
            }
            if value == MAX_TILE {
                continue;
            }
            if col + 1 < GRID_SIZE && grid[row][col + 1] == value {
                return true;
            }
            if row + 1 < GRID_SIZE && grid[row + 1][col] == value {
                return true;
            }
        }
    }
    false
}

/// True iff some cell is exactly 2048. A 4096 tile alone does not count.
pub fn is_won(board: &Board) -> bool {
    board.cells().any(|v| v == WIN_TILE)
}

/// Largest tile on the grid, 0 when empty.
pub fn max_tile(board: &Board) -> u32 {
    board.cells().max().unwrap_or(0)
}

/// Directions whose move would change the grid, in action-index order.
pub fn valid_moves(board: &Board) -> ArrayVec<Direction, ACTION_COUNT> {
    Direction::ALL
        .iter()
        .copied()
        .filter(|&dir| shift_grid(board.grid(), dir).0 != *board.grid())
        .collect()
}

/// Per-direction legality, indexed by [`Direction::index`].
pub fn valid_move_mask(board: &Board) -> [bool; ACTION_COUNT] {
    let mut mask = [false; ACTION_COUNT];
    for dir in valid_moves(board) {
        mask[dir.index()] = true;
    }
    mask
}
