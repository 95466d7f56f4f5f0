#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure cellular-automaton operations over the toroidal display grid.
//!
//! Every function here is total: bitmap placements that fall entirely
//! off-grid are silent no-ops, never errors. `step` and `seed_random`
//! return fresh grids; only `overlay` mutates in place, and it only ever
//! raises cells.

use life_matrix_core::{Bitmap, Grid, GridSize};
use rand::Rng;

/// Seeds a grid where each cell is independently live with probability
/// `density`.
#[must_use]
pub fn seed_random<R: Rng>(size: GridSize, density: f64, rng: &mut R) -> Grid {
    let mut grid = Grid::new(size);
    for row in 0..size.rows() {
        for col in 0..size.cols() {
            grid.set(row, col, rng.gen_bool(density.clamp(0.0, 1.0)));
        }
    }
    grid
}

/// Builds an all-dead grid with the bitmap's live pixels copied at the
/// given offset. Pixels outside the grid bounds are dropped, not wrapped.
#[must_use]
pub fn rasterize(bitmap: &Bitmap, size: GridSize, x_offset: i32, y_offset: i32) -> Grid {
    let mut grid = Grid::new(size);
    overlay(bitmap, &mut grid, x_offset, y_offset);
    grid
}

/// Merges the bitmap's live pixels into the grid with a boolean OR.
///
/// Never clears a cell; clipping at the grid bounds is silent.
pub fn overlay(bitmap: &Bitmap, grid: &mut Grid, x_offset: i32, y_offset: i32) {
    for y in 0..bitmap.height() {
        let Some(row) = checked_coordinate(y_offset, y, grid.size().rows()) else {
            continue;
        };
        for x in 0..bitmap.width() {
            let Some(col) = checked_coordinate(x_offset, x, grid.size().cols()) else {
                continue;
            };
            if bitmap.get(x, y) {
                grid.set(row, col, true);
            }
        }
    }
}

fn checked_coordinate(offset: i32, index: usize, bound: usize) -> Option<usize> {
    let position = offset as i64 + index as i64;
    if (0..bound as i64).contains(&position) {
        Some(position as usize)
    } else {
        None
    }
}

/// Advances the grid one generation under the standard B3/S23 rule on a
/// toroidal 8-neighborhood. The input grid is never mutated.
#[must_use]
pub fn step(grid: &Grid) -> Grid {
    let size = grid.size();
    let mut next = Grid::new(size);
    for row in 0..size.rows() {
        for col in 0..size.cols() {
            let neighbors = live_neighbors(grid, row, col);
            let alive = if grid.get(row, col) {
                neighbors == 2 || neighbors == 3
            } else {
                neighbors == 3
            };
            next.set(row, col, alive);
        }
    }
    next
}

/// Counts the live cells in the grid.
#[must_use]
pub fn population(grid: &Grid) -> usize {
    grid.cells().iter().filter(|cell| **cell).count()
}

fn live_neighbors(grid: &Grid, row: usize, col: usize) -> u8 {
    let rows = grid.size().rows() as i64;
    let cols = grid.size().cols() as i64;
    let mut count = 0;
    for dr in -1i64..=1 {
        for dc in -1i64..=1 {
            if dr == 0 && dc == 0 {
                continue;
            }
            let wrapped_row = (row as i64 + dr).rem_euclid(rows) as usize;
            let wrapped_col = (col as i64 + dc).rem_euclid(cols) as usize;
            if grid.get(wrapped_row, wrapped_col) {
                count += 1;
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const SIZE: GridSize = GridSize::new(8, 8);

    #[test]
    fn zero_density_seeds_an_empty_grid() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let grid = seed_random(SIZE, 0.0, &mut rng);
        assert_eq!(population(&grid), 0);
    }

    #[test]
    fn full_density_seeds_a_saturated_grid() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let grid = seed_random(SIZE, 1.0, &mut rng);
        assert_eq!(population(&grid), SIZE.cell_count());
    }

    #[test]
    fn overlay_fully_off_grid_is_a_no_op() {
        let bitmap = Bitmap::from_rows(&[vec![true, true], vec![true, true]]);
        let mut grid = Grid::new(SIZE);
        overlay(&bitmap, &mut grid, -10, -10);
        overlay(&bitmap, &mut grid, 100, 0);
        assert_eq!(population(&grid), 0);
    }

    #[test]
    fn overlay_clips_without_wrapping() {
        let bitmap = Bitmap::from_rows(&[vec![true, true], vec![true, true]]);
        let mut grid = Grid::new(SIZE);
        overlay(&bitmap, &mut grid, -1, -1);
        assert_eq!(population(&grid), 1);
        assert!(grid.get(0, 0));
        assert!(!grid.get(7, 7));
    }
}
