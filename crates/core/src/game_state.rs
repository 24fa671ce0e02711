//! Game state module - the single live game an orchestrator drives
//!
//! This module ties together the board, the seeded RNG and the transition engine.
//! It owns the turn sequence (apply move, conditionally spawn), the
//! Playing/Won/Lost lifecycle and the restart semantics.

use crate::board::Board;
use crate::engine::{self, Spawn};
use crate::rng::SimpleRng;
use crate::snapshot::GameSnapshot;
use crate::types::{Direction, GameAction, GameStatus, MoveOutcome};

/// What happened when an action was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionResult {
    /// A move was attempted. `outcome.changed == false` means nothing moved and nothing spawned.
    Moved {
        direction: Direction,
        outcome: MoveOutcome,
        spawn: Option<Spawn>,
    },
    /// A new game was started.
    Restarted,
    /// The game is in a terminal state; only Restart is accepted.
    Rejected,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    rng: SimpleRng,
    /// Seed the current episode started from.
    seed: u32,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    /// Effective moves in this episode.
    move_count: u32,
    last_result: Option<ActionResult>,
}

impl GameState {
    /// Create a new game with the given RNG seed
    pub fn new(seed: u32) -> Self {
        let mut rng = SimpleRng::new(seed);
        let board = Board::new_game(&mut rng);
        Self {
            board,
            rng,
            seed,
            episode_id: 0,
            move_count: 0,
            last_result: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u64 {
        self.board.score()
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn last_result(&self) -> Option<ActionResult> {
        self.last_result
    }

    pub fn max_tile(&self) -> u32 {
        engine::max_tile(&self.board)
    }

    /// Won takes precedence over Lost when a full, stuck board contains 2048.
    pub fn status(&self) -> GameStatus {
        if engine::is_won(&self.board) {
            GameStatus::Won
        } else if !engine::has_legal_move(&self.board) {
            GameStatus::Lost
        } else {
            GameStatus::Playing
        }
    }

    /// Discard the board and start a fresh one.
    ///
    /// The RNG stream continues, so consecutive episodes differ; the new
    /// episode's seed is the RNG state at the moment of restart.
    pub fn restart(&mut self) {
        self.seed = self.rng.state();
        self.board = Board::new_game(&mut self.rng);
        self.episode_id = self.episode_id.wrapping_add(1);
        self.move_count = 0;
        self.last_result = Some(ActionResult::Restarted);
    }

    /// Apply a game action
    pub fn apply_action(&mut self, action: GameAction) -> ActionResult {
        let result = match action {
            GameAction::Restart => {
                self.restart();
                ActionResult::Restarted
            }
            GameAction::Move(direction) => {
                if self.status().is_terminal() {
                    ActionResult::Rejected
                } else {
                    let (outcome, spawn) = engine::step(&mut self.board, direction, &mut self.rng);
                    if outcome.changed {
                        self.move_count += 1;
                    }
                    ActionResult::Moved {
                        direction,
                        outcome,
                        spawn,
                    }
                }
            }
        };
        self.last_result = Some(result);
        result
    }

    /// Fill a snapshot without allocating
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.grid = *self.board.grid();
        out.score = self.board.score();
        out.max_tile = self.max_tile();
        out.status = self.status();
        out.episode_id = self.episode_id;
        out.move_count = self.move_count;
        out.seed = self.seed;
        out.valid_moves = engine::valid_move_mask(&self.board);
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Replace the board (tests and scripted scenarios).
    pub fn set_board(&mut self, board: Board) {
        self.board = board;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}
