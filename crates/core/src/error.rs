//! Precondition failures for board construction.
//!
//! A well-formed board never produces these; they exist so malformed input is
//! rejected instead of being coerced into something that looks valid.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    /// Flat cell input did not hold exactly 16 values.
    #[error("expected 16 cells, got {len}")]
    InvalidLength { len: usize },

    /// A non-zero cell that is not a power of two >= 2.
    #[error("cell ({row}, {col}) holds {value}, which is not 0 or a power of two >= 2")]
    InvalidTile { row: usize, col: usize, value: u32 },
}
