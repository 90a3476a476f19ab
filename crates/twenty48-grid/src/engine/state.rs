use std::fmt;
use std::str::FromStr;

use log::{debug, trace};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::error::{EngineError, Result};
use super::ops;

pub(crate) type Tile = u32;
pub(crate) type Score = u64;

/// Side length of the reference board.
pub const DEFAULT_SIZE: usize = 4;

/// Largest tile a `u32` cell can hold. Two of these never merge.
pub const MAX_TILE: u32 = 1 << 31;

/// Chance that a spawned tile is a 4 rather than a 2.
pub(crate) const FOUR_PROBABILITY: f64 = 0.1;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// All four directions, ordered by `rotations()`.
    pub const ALL: [Move; 4] = [Move::Left, Move::Down, Move::Right, Move::Up];

    /// Clockwise quarter turns that make this direction point left.
    #[inline]
    pub fn rotations(self) -> usize {
        match self {
            Move::Left => 0,
            Move::Down => 1,
            Move::Right => 2,
            Move::Up => 3,
        }
    }
}

impl TryFrom<u8> for Move {
    type Error = EngineError;

    /// Numeric encoding: 0 = Up, 1 = Down, 2 = Left, 3 = Right.
    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Move::Up),
            1 => Ok(Move::Down),
            2 => Ok(Move::Left),
            3 => Ok(Move::Right),
            other => Err(EngineError::InvalidDirection(other.to_string())),
        }
    }
}

impl FromStr for Move {
    type Err = EngineError;

    /// Accepts `L`/`R`/`U`/`D` or the full word, case-insensitive.
    ///
    /// ```
    /// use twenty48_grid::Move;
    /// assert_eq!("u".parse::<Move>().unwrap(), Move::Up);
    /// assert_eq!("Right".parse::<Move>().unwrap(), Move::Right);
    /// assert!("x".parse::<Move>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l" | "left" => Ok(Move::Left),
            "r" | "right" => Ok(Move::Right),
            "u" | "up" => Ok(Move::Up),
            "d" | "down" => Ok(Move::Down),
            _ => Err(EngineError::InvalidDirection(s.to_string())),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        };
        f.write_str(name)
    }
}

/// A (row, column) position on the board.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    #[inline]
    pub fn new(row: usize, col: usize) -> Self {
        Cell { row, col }
    }
}

/// Square 2048 board stored row-major, one `u32` per cell (0 = empty).
///
/// All mutation goes through `apply_move` and `spawn_tile`, so every
/// non-zero cell is always a power of two >= 2. The side length never
/// changes after construction.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u32>>", into = "Vec<Vec<u32>>")]
pub struct Board {
    size: usize,
    cells: Vec<Tile>,
}

impl Board {
    /// An empty `size`x`size` board.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "board size must be positive");
        Board {
            size,
            cells: vec![0; size * size],
        }
    }

    /// Deep-copy a square snapshot, one slice per row.
    ///
    /// ```
    /// use twenty48_grid::{Board, EngineError};
    /// let b = Board::from_rows(&[[2, 0], [0, 4]]).unwrap();
    /// assert_eq!(b.score(), 6);
    /// assert!(matches!(
    ///     Board::from_rows(&[vec![2, 0], vec![0]]),
    ///     Err(EngineError::NotSquare { row: 1, .. })
    /// ));
    /// ```
    pub fn from_rows<R: AsRef<[u32]>>(rows: &[R]) -> Result<Self> {
        let size = rows.len();
        if size == 0 {
            return Err(EngineError::EmptyGrid);
        }
        let mut cells = Vec::with_capacity(size * size);
        for (r, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != size {
                return Err(EngineError::NotSquare {
                    row: r,
                    len: row.len(),
                    expected: size,
                });
            }
            for (c, &value) in row.iter().enumerate() {
                if !ops::is_tile_value(value) {
                    return Err(EngineError::InvalidTile { row: r, col: c, value });
                }
            }
            cells.extend_from_slice(row);
        }
        Ok(Board { size, cells })
    }

    /// Side length of the board.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Value at `cell`, or `None` if it lies off the board.
    #[inline]
    pub fn get(&self, cell: Cell) -> Option<u32> {
        if cell.row < self.size && cell.col < self.size {
            Some(self.cells[cell.row * self.size + cell.col])
        } else {
            None
        }
    }

    /// Borrow the rows, top to bottom. The view is read-only.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[u32]> + '_ {
        self.cells.chunks(self.size)
    }

    /// Owned copy of the grid.
    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        self.rows().map(<[u32]>::to_vec).collect()
    }

    /// Every empty cell in row-major order, recomputed from the grid on each call.
    pub fn open_cells(&self) -> Vec<Cell> {
        ops::open_cells(&self.cells, self.size)
    }

    /// Count the number of empty cells on the board.
    #[inline]
    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|&&v| v == 0).count()
    }

    /// Put a 2 (90%) or 4 (10%) on a uniformly chosen empty cell.
    ///
    /// Returns where the tile went and its value, or `BoardFull` when there
    /// is nowhere to put it.
    ///
    /// ```
    /// use twenty48_grid::{seeded_rng, Board};
    /// let mut rng = seeded_rng(123);
    /// let mut b = Board::default();
    /// let (cell, value) = b.spawn_tile(&mut rng).unwrap();
    /// assert!(value == 2 || value == 4);
    /// assert_eq!(b.get(cell), Some(value));
    /// assert_eq!(b.count_empty(), 15);
    /// ```
    pub fn spawn_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(Cell, u32)> {
        let open = self.open_cells();
        if open.is_empty() {
            return Err(EngineError::BoardFull);
        }
        let cell = open[rng.gen_range(0..open.len())];
        let value = ops::generate_random_tile(rng);
        self.cells[cell.row * self.size + cell.col] = value;
        debug!("spawned {} at ({}, {})", value, cell.row, cell.col);
        Ok((cell, value))
    }

    /// Builder-style `spawn_tile`; a full board is returned unchanged.
    pub fn with_random_tile<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        if let Err(e) = self.spawn_tile(rng) {
            trace!("with_random_tile left board unchanged: {e}");
        }
        self
    }

    /// Slide and merge every tile towards `direction`. No tile is spawned.
    ///
    /// Returns whether any cell changed.
    ///
    /// ```
    /// use twenty48_grid::{Board, Move};
    /// let mut b = Board::from_rows(&[[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
    /// assert!(b.apply_move(Move::Left));
    /// assert_eq!(b.to_rows()[0], vec![4, 0, 0, 0]);
    /// assert!(!b.apply_move(Move::Left));
    /// ```
    pub fn apply_move(&mut self, direction: Move) -> bool {
        let before = self.cells.clone();
        ops::shift(&mut self.cells, self.size, direction);
        let changed = before != self.cells;
        trace!("move {direction}: changed={changed}");
        changed
    }

    /// The board that `apply_move(direction)` would produce.
    pub fn shifted(&self, direction: Move) -> Self {
        let mut next = self.clone();
        next.apply_move(direction);
        next
    }

    /// True when no cell is empty.
    ///
    /// This deliberately ignores merges that might still be available on a
    /// full board; see `has_legal_move` for that question.
    #[inline]
    pub fn is_lost(&self) -> bool {
        !self.cells.contains(&0)
    }

    /// True if some direction would change the board.
    pub fn has_legal_move(&self) -> bool {
        Move::ALL.iter().any(|&dir| self.shifted(dir) != *self)
    }

    /// Sum of every tile on the board.
    #[inline]
    pub fn score(&self) -> u64 {
        ops::get_score(&self.cells)
    }

    /// Largest tile on the board (0 when empty).
    #[inline]
    pub fn highest_tile(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    #[cfg(test)]
    pub(crate) fn cells(&self) -> &[Tile] {
        &self.cells
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new(DEFAULT_SIZE)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rows()).finish()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.highest_tile().max(2).to_string().len();
        for row in self.rows() {
            let line: Vec<String> = row
                .iter()
                .map(|&v| match v {
                    0 => format!("{:>width$}", "."),
                    v => format!("{v:>width$}"),
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

impl TryFrom<Vec<Vec<u32>>> for Board {
    type Error = EngineError;

    fn try_from(rows: Vec<Vec<u32>>) -> Result<Self> {
        Board::from_rows(&rows)
    }
}

impl From<Board> for Vec<Vec<u32>> {
    fn from(b: Board) -> Self {
        b.to_rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn board(rows: &[[u32; 4]; 4]) -> Board {
        Board::from_rows(rows).unwrap()
    }

    #[test]
    fn new_board_is_empty() {
        let b = Board::default();
        assert_eq!(b.size(), 4);
        assert_eq!(b.count_empty(), 16);
        assert_eq!(b.open_cells().len(), 16);
        assert_eq!(b.score(), 0);
        assert!(!b.is_lost());
    }

    #[test]
    fn from_rows_copies_snapshot() {
        let mut rows = vec![vec![2, 0], vec![0, 4]];
        let b = Board::from_rows(&rows).unwrap();
        rows[0][0] = 8;
        assert_eq!(b.get(Cell::new(0, 0)), Some(2));
        assert_eq!(b.to_rows(), vec![vec![2, 0], vec![0, 4]]);
    }

    #[test]
    fn from_rows_rejects_bad_snapshots() {
        let empty: [[u32; 0]; 0] = [];
        assert_eq!(Board::from_rows(&empty), Err(EngineError::EmptyGrid));
        assert_eq!(
            Board::from_rows(&[[2, 0, 0], [0, 0, 0]]),
            Err(EngineError::NotSquare {
                row: 0,
                len: 3,
                expected: 2
            })
        );
        assert_eq!(
            Board::from_rows(&[[2, 3], [0, 0]]),
            Err(EngineError::InvalidTile {
                row: 0,
                col: 1,
                value: 3
            })
        );
        assert!(matches!(
            Board::from_rows(&[[1, 0], [0, 0]]),
            Err(EngineError::InvalidTile { value: 1, .. })
        ));
    }

    #[test]
    fn test_move_left_scenario() {
        let mut b = board(&[[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        b.apply_move(Move::Left);
        assert_eq!(b.to_rows(), board(&[[4, 0, 0, 0], [0; 4], [0; 4], [0; 4]]).to_rows());
        assert_eq!(b.score(), 4);
    }

    #[test]
    fn test_move_right_scenario() {
        let mut b = board(&[[0, 0, 2, 2], [0; 4], [0; 4], [0; 4]]);
        b.apply_move(Move::Right);
        assert_eq!(b.to_rows()[0], vec![0, 0, 0, 4]);
    }

    #[test]
    fn test_move_up_down() {
        let start = board(&[[2, 0, 0, 0], [2, 0, 0, 0], [2, 0, 0, 0], [2, 0, 0, 0]]);
        assert_eq!(
            start.shifted(Move::Up),
            board(&[[4, 0, 0, 0], [4, 0, 0, 0], [0; 4], [0; 4]])
        );
        assert_eq!(
            start.shifted(Move::Down),
            board(&[[0; 4], [0; 4], [4, 0, 0, 0], [4, 0, 0, 0]])
        );
    }

    #[test]
    fn max_tiles_do_not_overflow() {
        let mut b = Board::from_rows(&[[MAX_TILE, MAX_TILE], [0, 0]]).unwrap();
        assert!(!b.apply_move(Move::Left));
        assert_eq!(b.to_rows(), vec![vec![MAX_TILE, MAX_TILE], vec![0, 0]]);
        assert!(b.apply_move(Move::Down));
        assert_eq!(b.to_rows(), vec![vec![0, 0], vec![MAX_TILE, MAX_TILE]]);
        assert_eq!(b.score(), 2 * u64::from(MAX_TILE));
    }

    #[test]
    fn noop_move_is_idempotent() {
        let mut b = board(&[[2, 4, 8, 16], [4, 2, 0, 0], [8, 0, 0, 0], [0; 4]]);
        let before = b.clone();
        assert!(!b.apply_move(Move::Left));
        assert_eq!(b, before);
        assert!(!b.apply_move(Move::Left));
        assert_eq!(b, before);
    }

    #[test]
    fn spawn_fills_exactly_one_open_cell() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut b = board(&[[2, 0, 0, 0], [0; 4], [0; 4], [0, 0, 0, 4]]);
        let before = b.clone();
        let (cell, value) = b.spawn_tile(&mut rng).unwrap();
        assert!(value == 2 || value == 4);
        assert_eq!(before.get(cell), Some(0));
        let diffs = before
            .cells()
            .iter()
            .zip(b.cells())
            .filter(|(x, y)| x != y)
            .count();
        assert_eq!(diffs, 1);
    }

    #[test]
    fn spawn_four_ratio_is_about_ten_percent() {
        let mut rng = StdRng::seed_from_u64(2048);
        let trials = 10_000;
        let mut fours = 0;
        for _ in 0..trials {
            let mut b = Board::default();
            let (_, value) = b.spawn_tile(&mut rng).unwrap();
            if value == 4 {
                fours += 1;
            }
        }
        let ratio = fours as f64 / trials as f64;
        assert!((ratio - 0.1).abs() < 0.02, "ratio {ratio}");
    }

    #[test]
    fn spawn_on_full_board_fails() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut b = board(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert_eq!(b.spawn_tile(&mut rng), Err(EngineError::BoardFull));
        let full = b.clone();
        assert_eq!(full.with_random_tile(&mut rng), b);
    }

    #[test]
    fn spawn_until_full() {
        let mut rng = StdRng::seed_from_u64(77);
        let mut b = Board::default();
        for _ in 0..16 {
            b.spawn_tile(&mut rng).unwrap();
        }
        assert_eq!(b.count_empty(), 0);
        assert!(b.is_lost());
    }

    #[test]
    fn loss_is_board_fullness_only() {
        // Full board with merges still available counts as lost.
        let full = board(&[[2, 2, 4, 8], [4, 8, 16, 32], [2, 4, 8, 16], [4, 8, 16, 32]]);
        assert!(full.is_lost());
        assert!(full.has_legal_move());

        let stuck = board(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert!(stuck.is_lost());
        assert!(!stuck.has_legal_move());

        let open = board(&[[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 0, 4], [4, 2, 4, 2]]);
        assert!(!open.is_lost());
    }

    #[test]
    fn it_highest_tile() {
        assert_eq!(Board::default().highest_tile(), 0);
        let b = board(&[[2, 0, 0, 0], [0, 128, 0, 0], [0; 4], [0, 0, 0, 64]]);
        assert_eq!(b.highest_tile(), 128);
    }

    #[test]
    fn it_get_out_of_bounds() {
        let b = Board::new(3);
        assert_eq!(b.get(Cell::new(2, 2)), Some(0));
        assert_eq!(b.get(Cell::new(3, 0)), None);
    }

    #[test]
    fn it_parse_move() {
        assert_eq!("L".parse::<Move>(), Ok(Move::Left));
        assert_eq!(" down ".parse::<Move>(), Ok(Move::Down));
        assert_eq!(Move::try_from(3u8), Ok(Move::Right));
        assert_eq!(
            Move::try_from(4u8),
            Err(EngineError::InvalidDirection("4".into()))
        );
        assert!(matches!(
            "sideways".parse::<Move>(),
            Err(EngineError::InvalidDirection(_))
        ));
    }

    #[test]
    fn it_display() {
        let b = Board::from_rows(&[[2, 0], [0, 16]]).unwrap();
        assert_eq!(b.to_string(), " 2  .\n . 16\n");
    }

    #[test]
    fn serde_uses_rows() {
        let b = Board::from_rows(&[[2, 0], [0, 4]]).unwrap();
        let json = serde_json::to_string(&b).unwrap();
        assert_eq!(json, "[[2,0],[0,4]]");
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(back, b);
        assert!(serde_json::from_str::<Board>("[[2,0],[0]]").is_err());
    }
}
