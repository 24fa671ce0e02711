//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (transition engine, RL environment, AI protocol).
//!
//! # Board Dimensions
//!
//! The playfield is a fixed 4x4 grid:
//!
//! - **Rows**: 4 (indexed 0-3, top to bottom)
//! - **Columns**: 4 (indexed 0-3, left to right)
//! - **Cells**: 0 means empty, otherwise a power of two >= 2
//!
//! # Game Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `GRID_SIZE` | 4 | Rows and columns |
//! | `CELL_COUNT` | 16 | Total cells |
//! | `WIN_TILE` | 2048 | Exact tile value that wins |
//! | `MAX_TILE_EXPONENT` | 31 | Largest representable exponent |
//! | `MAX_TILE` | 2^31 | Ceiling tile; does not merge with itself |
//! | `SPAWN_FOUR_ONE_IN` | 10 | A spawned tile is 4 one time in ten |
//! | `ACTION_COUNT` | 4 | Directions an agent can choose |
//! | `OBSERVATION_LEN` | 16 | Length of the log2 observation vector |
//!
//! # Action Encoding
//!
//! Agents address moves by index. The order is fixed:
//!
//! | Index | Direction |
//! |-------|-----------|
//! | 0 | Left |
//! | 1 | Up |
//! | 2 | Right |
//! | 3 | Down |
//!
//! # Examples
//!
//! ```
//! use twenty48_types::{Direction, GameAction, GRID_SIZE};
//!
//! let dir = Direction::from_str("Left").unwrap();
//! assert_eq!(dir, Direction::Left);
//! assert_eq!(dir.index(), 0);
//!
//! // WASD keys map to directions
//! assert_eq!(Direction::from_str("w"), Some(Direction::Up));
//!
//! // Unknown input is rejected, never defaulted
//! assert_eq!(Direction::from_str("x"), None);
//!
//! let action = GameAction::from_str("restart").unwrap();
//! assert_eq!(action, GameAction::Restart);
//!
//! assert_eq!(GRID_SIZE, 4);
//! ```

/// Rows and columns of the square grid.
pub const GRID_SIZE: usize = 4;

/// Total number of cells on the grid.
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// The winning tile. Only an exact match counts.
pub const WIN_TILE: u32 = 2048;

/// Largest tile exponent a cell can hold (2^31, the top power of two in `u32`).
pub const MAX_TILE_EXPONENT: u32 = 31;

/// Largest tile value. Two of these never merge.
pub const MAX_TILE: u32 = 1 << MAX_TILE_EXPONENT;

/// A freshly spawned tile is a 4 with probability `1 / SPAWN_FOUR_ONE_IN`, else a 2.
pub const SPAWN_FOUR_ONE_IN: u32 = 10;

/// Number of distinct move actions.
pub const ACTION_COUNT: usize = 4;

/// Length of the flat observation vector.
pub const OBSERVATION_LEN: usize = CELL_COUNT;

/// Row-major 4x4 grid of tile values. Row 0 is the top row.
pub type Grid = [[u32; GRID_SIZE]; GRID_SIZE];

/// One of the four shift directions.
///
/// Closed enumeration; the declaration order is the action-index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Up,
    Right,
    Down,
}

impl Direction {
    /// All directions in action-index order.
    pub const ALL: [Direction; ACTION_COUNT] = [
        Direction::Left,
        Direction::Up,
        Direction::Right,
        Direction::Down,
    ];

    /// Action index of this direction.
    ///
    /// # Examples
    ///
    /// ```
    /// use twenty48_types::Direction;
    ///
    /// assert_eq!(Direction::Left.index(), 0);
    /// assert_eq!(Direction::Down.index(), 3);
    /// ```
    pub fn index(&self) -> usize {
        match self {
            Direction::Left => 0,
            Direction::Up => 1,
            Direction::Right => 2,
            Direction::Down => 3,
        }
    }

    /// Inverse of [`Direction::index`]. Out-of-range indices yield `None`.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Parse a direction name or WASD key (case-insensitive).
    ///
    /// Accepts "left" | "a", "up" | "w", "right" | "d", "down" | "s".
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" | "a" => Some(Direction::Left),
            "up" | "w" => Some(Direction::Up),
            "right" | "d" => Some(Direction::Right),
            "down" | "s" => Some(Direction::Down),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
        }
    }

    /// True for Left and Right.
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

/// Actions an orchestrator accepts from a player or agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Shift every tile in a direction
    Move(Direction),
    /// Discard the current board and start a new game
    Restart,
}

impl GameAction {
    /// Parse action from string (for AI protocol)
    ///
    /// # Examples
    ///
    /// ```
    /// use twenty48_types::{Direction, GameAction};
    ///
    /// assert_eq!(GameAction::from_str("up"), Some(GameAction::Move(Direction::Up)));
    /// assert_eq!(GameAction::from_str("D"), Some(GameAction::Move(Direction::Right)));
    /// assert_eq!(GameAction::from_str("restart"), Some(GameAction::Restart));
    /// assert_eq!(GameAction::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        if let Some(dir) = Direction::from_str(s) {
            return Some(GameAction::Move(dir));
        }
        match s.to_lowercase().as_str() {
            "restart" | "r" => Some(GameAction::Restart),
            _ => None,
        }
    }

    /// Convert to the protocol string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::Move(dir) => dir.as_str(),
            GameAction::Restart => "restart",
        }
    }
}

/// Result of applying one direction to a board.
///
/// `changed == false` implies `score_gained == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MoveOutcome {
    /// At least one cell differs from the input grid
    pub changed: bool,
    /// Sum of all tiles produced by merges in this move
    pub score_gained: u64,
}

impl MoveOutcome {
    /// An ineffective move.
    pub const NONE: MoveOutcome = MoveOutcome {
        changed: false,
        score_gained: 0,
    };
}

/// Lifecycle status derived from a board.
///
/// ```text
/// Playing -> Won   (a 2048 tile appears)
/// Playing -> Lost  (no legal move remains)
/// ```
///
/// Both terminal states are left only by starting a new game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::Playing)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Playing => "playing",
            GameStatus::Won => "won",
            GameStatus::Lost => "lost",
        }
    }
}
