//! Read-only copies of the game for renderers and observers.
//!
//! A snapshot is plain data: consumers can display or serialize it but never
//! reach back into the live board.

use std::hash::{Hash, Hasher};

use crate::types::{GameStatus, Grid, ACTION_COUNT, GRID_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub grid: Grid,
    pub score: u64,
    pub max_tile: u32,
    pub status: GameStatus,
    pub episode_id: u32,
    pub move_count: u32,
    pub seed: u32,
    /// Indexed by `Direction::index`.
    pub valid_moves: [bool; ACTION_COUNT],
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn playable(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Stable 64-bit hash over every field.
    ///
    /// Uses FNV-1a rather than `DefaultHasher`, whose output is not guaranteed
    /// stable across Rust versions/platforms.
    pub fn state_hash(&self) -> u64 {
        let mut hasher = Fnv1aHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            grid: [[0; GRID_SIZE]; GRID_SIZE],
            score: 0,
            max_tile: 0,
            status: GameStatus::Playing,
            episode_id: 0,
            move_count: 0,
            seed: 0,
            valid_moves: [false; ACTION_COUNT],
        }
    }
}

/// Stable 64-bit FNV-1a hasher.
#[derive(Debug, Clone)]
pub struct Fnv1aHasher {
    state: u64,
}

impl Fnv1aHasher {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    pub fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }
}

impl Default for Fnv1aHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state ^= b as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}
