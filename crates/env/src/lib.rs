//! Reinforcement-learning environment over the 2048 engine.
//!
//! Wraps one [`Board`](twenty48_core::Board) per environment and exposes the
//! reset/step contract trainers expect:
//!
//! - **Observation**: 16 floats, log2 of each cell (0 for empty)
//! - **Actions**: index 0..4 mapping to Left, Up, Right, Down
//! - **Valid actions**: dry run of all four moves
//! - **Reward**: pluggable via [`RewardFn`]; computed from the board before
//!   and after the move (before the spawn)
//! - **Termination**: no legal move left
//!
//! Environments own their board and RNG, so many can run in parallel without
//! sharing anything.
//!
//! # Example
//!
//! ```
//! use twenty48_env::{Environment, ShapedReward};
//!
//! let mut env = Environment::new(7, ShapedReward);
//! let obs = env.reset();
//! assert_eq!(obs.len(), 16);
//!
//! let action = env.valid_actions()[0];
//! let step = env.step(action.index()).unwrap();
//! assert!(step.info.moved);
//! ```

pub mod environment;
pub mod reward;

pub use twenty48_core as core;
pub use twenty48_types as types;

pub use environment::{EnvError, Environment, Observation, Step, StepInfo};
pub use reward::{RewardFn, ScoreDelta, ShapedReward, Transition};
