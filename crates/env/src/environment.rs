//! Episode wrapper around a single board.
//!
//! Mirrors the usual reset/step contract: `reset` starts a fresh board,
//! `step` applies one action, spawns on effective moves, and reports the
//! observation, reward and termination flag.

use arrayvec::ArrayVec;
use thiserror::Error;

use twenty48_core::engine::{self, has_legal_move, max_tile};
use twenty48_core::{Board, SimpleRng};
use twenty48_types::{Direction, ACTION_COUNT, OBSERVATION_LEN};

use crate::reward::{RewardFn, ScoreDelta, Transition};

/// log2 of each cell, row-major, 0 for empty cells.
pub type Observation = [f32; OBSERVATION_LEN];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EnvError {
    #[error("action index {0} out of range (expected 0..4)")]
    InvalidAction(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    pub score: u64,
    pub max_tile: u32,
    pub moved: bool,
    pub score_gained: u64,
    /// Moves that would change the board after this step, in action-index order.
    pub valid_actions: ArrayVec<Direction, ACTION_COUNT>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub observation: Observation,
    pub reward: f32,
    /// No legal move remains. Reaching 2048 does not end an episode.
    pub done: bool,
    pub info: StepInfo,
}

pub struct Environment<R = ScoreDelta> {
    board: Board,
    rng: SimpleRng,
    reward: R,
    episode_count: u32,
}

impl Environment<ScoreDelta> {
    /// Environment rewarding raw score gains.
    pub fn with_seed(seed: u32) -> Self {
        Self::new(seed, ScoreDelta::default())
    }
}

impl<R: RewardFn> Environment<R> {
    pub fn new(seed: u32, reward: R) -> Self {
        let mut rng = SimpleRng::new(seed);
        let board = Board::new_game(&mut rng);
        Self {
            board,
            rng,
            reward,
            episode_count: 0,
        }
    }

    /// Start a new episode on a fresh board.
    pub fn reset(&mut self) -> Observation {
        self.board = Board::new_game(&mut self.rng);
        self.episode_count += 1;
        self.observation()
    }

    /// Step by action index (0=Left, 1=Up, 2=Right, 3=Down).
    pub fn step(&mut self, action: usize) -> Result<Step, EnvError> {
        let direction = Direction::from_index(action).ok_or(EnvError::InvalidAction(action))?;
        Ok(self.step_direction(direction))
    }

    pub fn step_direction(&mut self, direction: Direction) -> Step {
        let before = self.board;
        let outcome = self.board.apply_move(direction);

        let reward = self.reward.reward(&Transition {
            before: &before,
            after: &self.board,
            outcome,
            episode: self.episode_count,
        });

        if outcome.changed {
            engine::spawn_tile(&mut self.board, &mut self.rng);
        }

        Step {
            observation: self.observation(),
            reward,
            done: !has_legal_move(&self.board),
            info: StepInfo {
                score: self.board.score(),
                max_tile: max_tile(&self.board),
                moved: outcome.changed,
                score_gained: outcome.score_gained,
                valid_actions: self.valid_actions(),
            },
        }
    }

    pub fn observation(&self) -> Observation {
        let mut obs = [0.0f32; OBSERVATION_LEN];
        for (slot, exp) in obs.iter_mut().zip(self.board.exponents()) {
            *slot = f32::from(exp);
        }
        obs
    }

    /// Dry-runs all four moves; empty once the board is lost.
    pub fn valid_actions(&self) -> ArrayVec<Direction, ACTION_COUNT> {
        engine::valid_moves(&self.board)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn episode_count(&self) -> u32 {
        self.episode_count
    }

    pub fn reward_fn(&self) -> &R {
        &self.reward
    }
}
