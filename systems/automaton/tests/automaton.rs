use life_matrix_core::{Bitmap, Grid, GridSize};
use life_matrix_system_automaton::{overlay, population, rasterize, seed_random, step};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const SIZE: GridSize = GridSize::new(64, 64);

fn grid_with_cells(cells: &[(usize, usize)]) -> Grid {
    let mut grid = Grid::new(SIZE);
    for &(row, col) in cells {
        grid.set(row, col, true);
    }
    grid
}

fn live_cells(grid: &Grid) -> Vec<(usize, usize)> {
    let mut cells = Vec::new();
    for row in 0..grid.size().rows() {
        for col in 0..grid.size().cols() {
            if grid.get(row, col) {
                cells.push((row, col));
            }
        }
    }
    cells
}

#[test]
fn blinker_oscillates_with_period_two() {
    let blinker = grid_with_cells(&[(10, 10), (10, 11), (10, 12)]);
    let once = step(&blinker);
    assert_ne!(once, blinker);
    let twice = step(&once);
    assert_eq!(twice, blinker);
}

#[test]
fn block_is_a_still_life() {
    let block = grid_with_cells(&[(5, 5), (5, 6), (6, 5), (6, 6)]);
    let mut grid = block.clone();
    for _ in 0..10 {
        grid = step(&grid);
    }
    assert_eq!(grid, block);
}

#[test]
fn glider_translates_one_cell_diagonally_every_four_generations() {
    let glider = [(0usize, 1usize), (1, 2), (2, 0), (2, 1), (2, 2)];
    let mut grid = grid_with_cells(&glider);
    for _ in 0..4 {
        grid = step(&grid);
    }

    let expected: Vec<(usize, usize)> = {
        let mut cells: Vec<(usize, usize)> = glider
            .iter()
            .map(|&(row, col)| ((row + 1) % SIZE.rows(), (col + 1) % SIZE.cols()))
            .collect();
        cells.sort_unstable();
        cells
    };
    assert_eq!(live_cells(&grid), expected);
}

#[test]
fn glider_wraps_across_the_torus_edge() {
    let glider = [(62usize, 63usize), (63, 0), (0, 62), (0, 63), (0, 0)];
    let mut grid = grid_with_cells(&glider);
    for _ in 0..4 {
        grid = step(&grid);
    }

    let expected: Vec<(usize, usize)> = {
        let mut cells: Vec<(usize, usize)> = glider
            .iter()
            .map(|&(row, col)| ((row + 1) % SIZE.rows(), (col + 1) % SIZE.cols()))
            .collect();
        cells.sort_unstable();
        cells
    };
    assert_eq!(live_cells(&grid), expected);
}

#[test]
fn overlay_never_reduces_population() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let mut grid = seed_random(SIZE, 0.3, &mut rng);
    let before = population(&grid);

    let bitmap = Bitmap::from_rows(&[vec![true; 10], vec![false; 10], vec![true; 10]]);
    overlay(&bitmap, &mut grid, 20, 20);
    assert!(population(&grid) >= before);
}

#[test]
fn rasterize_places_only_bitmap_pixels() {
    let bitmap = Bitmap::from_rows(&[vec![true, false], vec![false, true]]);
    let grid = rasterize(&bitmap, SIZE, 3, 5);
    assert_eq!(live_cells(&grid), vec![(5, 3), (6, 4)]);
}

#[test]
fn seeded_soup_is_reproducible() {
    let mut first_rng = ChaCha8Rng::seed_from_u64(1234);
    let mut second_rng = ChaCha8Rng::seed_from_u64(1234);
    let first = seed_random(SIZE, 0.2, &mut first_rng);
    let second = seed_random(SIZE, 0.2, &mut second_rng);
    assert_eq!(first, second);
}
