use crate::turn::Phase;

/// Everything the engine can refuse to do.
///
/// None of these are transient: each one means the caller broke a
/// precondition, so nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// `spawn_tile` was called on a board without a zero cell.
    #[error("no open cell left to spawn a tile into")]
    BoardFull,

    #[error("grid snapshot has no rows")]
    EmptyGrid,

    #[error("grid snapshot is not square: row {row} has {len} cells, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("cell ({row}, {col}) holds {value}, which is neither empty nor a power of two >= 2")]
    InvalidTile { row: usize, col: usize, value: u32 },

    #[error("invalid move direction {0:?} (expected left/right/up/down, L/R/U/D or 0..=3)")]
    InvalidDirection(String),

    #[error("game is over; no further moves are accepted")]
    GameOver,

    #[error("cannot {operation} while the turn is in phase {phase:?}")]
    OutOfTurn {
        operation: &'static str,
        phase: Phase,
    },
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
