use rand::Rng;

use super::state::{Cell, Move, Score, Tile, FOUR_PROBABILITY, MAX_TILE};

/// Reflect a row-major `size`x`size` grid across its main diagonal, in place.
pub(crate) fn transpose(cells: &mut [Tile], size: usize) {
    for r in 0..size {
        for c in (r + 1)..size {
            cells.swap(r * size + c, c * size + r);
        }
    }
}

/// Reverse the order of the cells inside every row.
pub(crate) fn flip_rows(cells: &mut [Tile], size: usize) {
    for row in cells.chunks_mut(size) {
        row.reverse();
    }
}

/// Quarter turn clockwise: transpose, then mirror each row.
pub(crate) fn rotate_clockwise(cells: &mut [Tile], size: usize) {
    transpose(cells, size);
    flip_rows(cells, size);
}

pub(crate) fn rotate_clockwise_n(cells: &mut [Tile], size: usize, turns: usize) {
    for _ in 0..(turns % 4) {
        rotate_clockwise(cells, size);
    }
}

/// Push every tile to the left edge, keeping order; zeros fill the tail.
pub(crate) fn compact_left(row: &mut [Tile]) {
    let mut write = 0;
    for read in 0..row.len() {
        if row[read] != 0 {
            row[write] = row[read];
            write += 1;
        }
    }
    row[write..].fill(0);
}

/// One left-to-right merge pass. A merged cell is not compared again in
/// the same pass, so `[2, 2, 2, 2]` becomes `[4, 0, 4, 0]`, never `[8, ...]`.
/// Tiles already at `MAX_TILE` have no larger value to become and stay put.
pub(crate) fn merge_left(row: &mut [Tile]) {
    let mut i = 0;
    while i + 1 < row.len() {
        if row[i] != 0 && row[i] < MAX_TILE && row[i] == row[i + 1] {
            row[i] *= 2;
            row[i + 1] = 0;
            i += 2;
        } else {
            i += 1;
        }
    }
}

/// Full left move for a single row.
pub(crate) fn slide_left(row: &mut [Tile]) {
    compact_left(row);
    merge_left(row);
    compact_left(row);
}

/// Slide/merge the whole grid in `direction`. Every direction is the left
/// move seen through `direction.rotations()` clockwise quarter turns.
pub(crate) fn shift(cells: &mut [Tile], size: usize, direction: Move) {
    let turns = direction.rotations();
    rotate_clockwise_n(cells, size, turns);
    for row in cells.chunks_mut(size) {
        slide_left(row);
    }
    rotate_clockwise_n(cells, size, 4 - turns);
}

/// Zero cells in row-major order.
pub(crate) fn open_cells(cells: &[Tile], size: usize) -> Vec<Cell> {
    cells
        .iter()
        .enumerate()
        .filter(|(_, v)| **v == 0)
        .map(|(idx, _)| Cell::new(idx / size, idx % size))
        .collect()
}

pub(crate) fn get_score(cells: &[Tile]) -> Score {
    cells.iter().map(|&v| Score::from(v)).sum()
}

pub(crate) fn is_tile_value(value: Tile) -> bool {
    value == 0 || (value >= 2 && value.is_power_of_two())
}

/// Draw the value of a freshly spawned tile: 4 with probability 0.1, else 2.
pub(crate) fn generate_random_tile<R: Rng + ?Sized>(rng: &mut R) -> Tile {
    let fraction: f64 = rng.gen_range(0.0..1.0);
    if fraction < FOUR_PROBABILITY { 4 } else { 2 }
}
