//! Rules engine for the 2048 sliding-tile merge puzzle.
//!
//! The [`Board`] holds the grid and applies moves and spawns; the
//! [`Game`] wrapper sequences them into turns for a driver.
//!
//! ```
//! use twenty48_grid::{Game, Move};
//!
//! let mut game = Game::seeded(4, 42);
//! game.start(2).unwrap();
//! let outcome = game.step(Move::Left).unwrap();
//! println!("{}score {}", game.board(), game.board().score());
//! assert!(outcome.spawned.is_some() || outcome.lost);
//! ```

pub mod engine;
pub mod turn;

pub use engine::{seeded_rng, Board, Cell, EngineError, Move, Result, DEFAULT_SIZE, MAX_TILE};
pub use turn::{Game, Phase, RunSummary, TurnOutcome};
