//! Reward functions computed from before/after board snapshots.
//!
//! Reward is policy, not engine: the environment hands every transition to a
//! [`RewardFn`] and reports whatever it returns. Two implementations ship here;
//! any `FnMut(&Transition) -> f32` closure works too.

use arrayvec::ArrayVec;
use twenty48_core::engine::max_tile;
use twenty48_core::Board;
use twenty48_types::{MoveOutcome, GRID_SIZE};

/// One move as seen by a reward function.
#[derive(Debug, Clone, Copy)]
pub struct Transition<'a> {
    /// Board before the move
    pub before: &'a Board,
    /// Board after the move, before the new tile spawns
    pub after: &'a Board,
    pub outcome: MoveOutcome,
    /// Episodes started so far (1 during the first episode after `reset`)
    pub episode: u32,
}

pub trait RewardFn {
    fn reward(&mut self, transition: &Transition<'_>) -> f32;
}

impl<F> RewardFn for F
where
    F: FnMut(&Transition<'_>) -> f32,
{
    fn reward(&mut self, transition: &Transition<'_>) -> f32 {
        self(transition)
    }
}

/// Score gained by the move, or a fixed penalty for a move that changed nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreDelta {
    pub invalid_penalty: f32,
}

impl Default for ScoreDelta {
    fn default() -> Self {
        Self {
            invalid_penalty: -1.0,
        }
    }
}

impl RewardFn for ScoreDelta {
    fn reward(&mut self, t: &Transition<'_>) -> f32 {
        if !t.outcome.changed {
            return self.invalid_penalty;
        }
        t.outcome.score_gained as f32
    }
}

const INVALID_MOVE_PENALTY: f32 = -1.0;
const SCORE_WEIGHT: f32 = 0.01;
const NEW_MAX_TILE_WEIGHT: f32 = 50.0;
const CORNER_BONUS: f32 = 5.0;
const EDGE_BONUS: f32 = 2.0;
const SMOOTHNESS_THRESHOLD: f32 = 2.0;
const SMOOTHNESS_WEIGHT: f32 = 0.1;
const MONOTONIC_LINE_BONUS: f32 = 2.0;
const EMPTY_CELL_BONUS: f32 = 0.5;
const SURVIVAL_BONUS: f32 = 0.1;

/// Heuristic shaping: score, new max tile, corner/edge placement, smoothness,
/// monotonicity, free space, an episode-scheduled score bonus and a survival bonus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShapedReward;

impl RewardFn for ShapedReward {
    fn reward(&mut self, t: &Transition<'_>) -> f32 {
        if !t.outcome.changed {
            return INVALID_MOVE_PENALTY;
        }

        let gained = t.outcome.score_gained as f32;
        let score_reward = gained * SCORE_WEIGHT;

        let before_max = max_tile(t.before);
        let after_max = max_tile(t.after);
        let tile_bonus = if after_max > before_max {
            log2(after_max) * NEW_MAX_TILE_WEIGHT
        } else {
            0.0
        };

        score_reward
            + tile_bonus
            + corner_bonus(t.after)
            + monotonicity_bonus(t.after)
            + empty_cells_bonus(t.after)
            + adaptive_bonus(gained, t.episode)
            + SURVIVAL_BONUS
            - smoothness_penalty(t.after)
    }
}

fn log2(value: u32) -> f32 {
    value.trailing_zeros() as f32
}

/// Max tile in a corner, else on an edge.
pub fn corner_bonus(board: &Board) -> f32 {
    let max = max_tile(board);
    let g = board.grid();
    let last = GRID_SIZE - 1;

    let corners = [g[0][0], g[0][last], g[last][0], g[last][last]];
    if corners.contains(&max) {
        return CORNER_BONUS;
    }

    let on_edge = (0..GRID_SIZE)
        .any(|i| g[0][i] == max || g[last][i] == max || g[i][0] == max || g[i][last] == max);
    if on_edge {
        EDGE_BONUS
    } else {
        0.0
    }
}

/// Penalises occupied neighbours whose exponents differ by more than 2.
///
/// Each unordered pair is visited from both sides.
pub fn smoothness_penalty(board: &Board) -> f32 {
    let g = board.grid();
    let mut penalty = 0.0;
    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            let value = g[row][col];
            if value == 0 {
                continue;
            }
            let neighbours = [
                (row, col + 1),
                (row, col.wrapping_sub(1)),
                (row + 1, col),
                (row.wrapping_sub(1), col),
            ];
            for (r, c) in neighbours {
                let Some(&other) = g.get(r).and_then(|cells| cells.get(c)) else {
                    continue;
                };
                if other == 0 {
                    continue;
                }
                let diff = (log2(value) - log2(other)).abs();
                if diff > SMOOTHNESS_THRESHOLD {
                    penalty += diff * SMOOTHNESS_WEIGHT;
                }
            }
        }
    }
    penalty
}

/// Bonus per row/column whose occupied cells are monotone (either direction).
pub fn monotonicity_bonus(board: &Board) -> f32 {
    let g = board.grid();
    let mut bonus = 0.0;
    for i in 0..GRID_SIZE {
        let row = g[i];
        let col = [g[0][i], g[1][i], g[2][i], g[3][i]];
        for line in [row, col] {
            if is_monotone(&line) {
                bonus += MONOTONIC_LINE_BONUS;
            }
        }
    }
    bonus
}

fn is_monotone(line: &[u32; GRID_SIZE]) -> bool {
    let values: ArrayVec<u32, GRID_SIZE> = line.iter().copied().filter(|&v| v != 0).collect();
    if values.len() < 2 {
        return false;
    }
    let non_increasing = values.windows(2).all(|w| w[0] >= w[1]);
    let non_decreasing = values.windows(2).all(|w| w[0] <= w[1]);
    non_increasing || non_decreasing
}

pub fn empty_cells_bonus(board: &Board) -> f32 {
    board.count_empty() as f32 * EMPTY_CELL_BONUS
}

/// Early episodes lean on merges, later ones less so.
pub fn adaptive_bonus(score_gained: f32, episode: u32) -> f32 {
    let weight = if episode < 1000 {
        0.1
    } else if episode < 5000 {
        0.05
    } else {
        0.02
    };
    score_gained * weight
}
