//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the 2048 board-transition engine and the lifecycle of a
//! single game. It has **zero dependencies** on UI, networking, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical games (for AI training)
//! - **Testable**: Randomness is injected, so spawns can be scripted
//! - **Portable**: Can run in any environment (terminal, server, headless rollouts)
//! - **Fast**: Boards are `Copy`, moves never allocate
//!
//! # Module Structure
//!
//! - [`board`]: 4x4 grid value type plus score counter
//! - [`engine`]: line compaction/merge, directional moves, spawn, legality queries
//! - [`game_state`]: one live game with its RNG, status and restart lifecycle
//! - [`rng`]: injected randomness ([`TileRng`]) and a seeded LCG
//! - [`snapshot`]: read-only copies for renderers and observers
//! - [`error`]: precondition failures for malformed boards
//!
//! # Game Rules
//!
//! - **Move**: every tile slides toward the chosen edge; equal neighbours merge once
//! - **Score**: each merge adds the value of the merged tile
//! - **Spawn**: after every move that changed the grid, one 2 (90%) or 4 (10%)
//!   appears on a uniformly chosen empty cell
//! - **Win**: a tile equal to exactly 2048
//! - **Loss**: no empty cell and no equal orthogonal neighbours
//!
//! # Example
//!
//! ```
//! use twenty48_core::{Board, SimpleRng};
//! use twenty48_core::engine::{has_legal_move, max_tile};
//! use twenty48_types::Direction;
//!
//! let mut rng = SimpleRng::new(12345);
//! let mut board = Board::new_game(&mut rng);
//! assert_eq!(board.count_empty(), 14);
//!
//! let outcome = board.step(Direction::Left, &mut rng);
//! if !outcome.changed {
//!     assert_eq!(outcome.score_gained, 0);
//! }
//!
//! assert!(has_legal_move(&board));
//! assert!(max_tile(&board) >= 2);
//! ```

pub mod board;
pub mod engine;
pub mod error;
pub mod game_state;
pub mod rng;
pub mod snapshot;

pub use twenty48_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use engine::{
    apply_move, compact_and_merge_line, has_legal_move, is_won, max_tile, spawn_tile, valid_moves,
    Spawn,
};
pub use error::BoardError;
pub use game_state::{ActionResult, GameState};
pub use rng::{SimpleRng, TileRng};
pub use snapshot::GameSnapshot;
