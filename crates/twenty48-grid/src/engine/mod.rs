//! Engine module: the square 2048 board, its move/spawn operations and
//! the error type they share.
//!
//! - `Board` owns the grid and exposes every rule of the game.
//! - Row and rotation primitives live in `ops` and stay crate-private.
//! - Randomness is always injected; `seeded_rng` gives reproducible runs.

mod error;
mod ops;
pub mod state;

use rand::{rngs::StdRng, SeedableRng};

pub use error::{EngineError, Result};
pub use state::{Board, Cell, Move, DEFAULT_SIZE, MAX_TILE};

/// Deterministic RNG for reproducible games and tests.
///
/// ```
/// use twenty48_grid::{seeded_rng, Board};
/// let a = Board::default().with_random_tile(&mut seeded_rng(5));
/// let b = Board::default().with_random_tile(&mut seeded_rng(5));
/// assert_eq!(a, b);
/// ```
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
