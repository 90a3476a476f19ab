//! Turn sequencing on top of [`Board`].
//!
//! A turn is `apply` (Idle -> Moved), `resolve` (Moved -> Lost or
//! SpawnPending) and `spawn` (SpawnPending -> Idle). `step` runs all three.
//! `Lost` is terminal.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::engine::{seeded_rng, Board, Cell, EngineError, Move, Result};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    Moved,
    SpawnPending,
    Lost,
}

/// What one full `step` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnOutcome {
    pub changed: bool,
    pub spawned: Option<(Cell, u32)>,
    pub lost: bool,
}

/// Summary for a finished (or abandoned) game.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunSummary {
    pub seed: Option<u64>,
    pub moves: u64,
    pub score: u64,
    pub highest_tile: u32,
}

/// A board plus the RNG that feeds it, driven one turn at a time.
pub struct Game<R = StdRng> {
    board: Board,
    rng: R,
    phase: Phase,
    seed: Option<u64>,
    moves: u64,
    last_changed: bool,
    spawn_on_unchanged: bool,
}

impl Game<StdRng> {
    /// Empty `size`x`size` game with a reproducible RNG.
    pub fn seeded(size: usize, seed: u64) -> Self {
        let mut game = Game::new(Board::new(size), seeded_rng(seed));
        game.seed = Some(seed);
        game
    }
}

impl<R: Rng> Game<R> {
    /// Wrap an existing board. A board that is already full starts out lost.
    pub fn new(board: Board, rng: R) -> Self {
        let phase = if board.is_lost() { Phase::Lost } else { Phase::Idle };
        Game {
            board,
            rng,
            phase,
            seed: None,
            moves: 0,
            last_changed: false,
            spawn_on_unchanged: true,
        }
    }

    /// When false, a move that changed nothing does not spawn a tile.
    pub fn with_spawn_on_unchanged(mut self, spawn: bool) -> Self {
        self.spawn_on_unchanged = spawn;
        self
    }

    /// Place the opening tiles. Fails with `BoardFull`, leaving the board
    /// untouched, when there are fewer open cells than `initial_tiles`.
    pub fn start(&mut self, initial_tiles: usize) -> Result<()> {
        self.expect_phase(Phase::Idle, "start")?;
        if initial_tiles > self.board.count_empty() {
            return Err(EngineError::BoardFull);
        }
        for _ in 0..initial_tiles {
            self.board.spawn_tile(&mut self.rng)?;
        }
        info!("game started with {initial_tiles} tile(s)");
        Ok(())
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn moves(&self) -> u64 {
        self.moves
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.phase == Phase::Lost
    }

    /// Slide the board. Idle -> Moved.
    pub fn apply(&mut self, direction: Move) -> Result<bool> {
        if self.phase == Phase::Lost {
            return Err(EngineError::GameOver);
        }
        self.expect_phase(Phase::Idle, "apply a move")?;
        self.last_changed = self.board.apply_move(direction);
        self.moves += 1;
        self.phase = Phase::Moved;
        Ok(self.last_changed)
    }

    /// Check the loss rule. Moved -> Lost | SpawnPending.
    pub fn resolve(&mut self) -> Result<Phase> {
        self.expect_phase(Phase::Moved, "resolve a turn")?;
        self.phase = if self.board.is_lost() {
            info!(
                "game lost after {} moves, score {}",
                self.moves,
                self.board.score()
            );
            Phase::Lost
        } else {
            Phase::SpawnPending
        };
        Ok(self.phase)
    }

    /// Spawn the turn's tile. SpawnPending -> Idle.
    ///
    /// Returns `None` when the move changed nothing and spawning on
    /// unchanged boards is switched off.
    pub fn spawn(&mut self) -> Result<Option<(Cell, u32)>> {
        self.expect_phase(Phase::SpawnPending, "spawn a tile")?;
        let spawned = if self.last_changed || self.spawn_on_unchanged {
            Some(self.board.spawn_tile(&mut self.rng)?)
        } else {
            debug!("move changed nothing; skipping spawn");
            None
        };
        self.phase = Phase::Idle;
        Ok(spawned)
    }

    /// Run a whole turn: move, loss check, spawn.
    pub fn step(&mut self, direction: Move) -> Result<TurnOutcome> {
        let changed = self.apply(direction)?;
        let spawned = match self.resolve()? {
            Phase::Lost => None,
            _ => self.spawn()?,
        };
        Ok(TurnOutcome {
            changed,
            spawned,
            lost: self.is_over(),
        })
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            seed: self.seed,
            moves: self.moves,
            score: self.board.score(),
            highest_tile: self.board.highest_tile(),
        }
    }

    fn expect_phase(&self, expected: Phase, operation: &'static str) -> Result<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(EngineError::OutOfTurn {
                operation,
                phase: self.phase,
            })
        }
    }
}
