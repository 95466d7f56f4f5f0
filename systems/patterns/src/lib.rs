#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Catalog of classic Game of Life patterns for alternate show seeding.
//!
//! Each pattern is a set of `(row, col)` offsets. Placement wraps around
//! the toroidal grid; seeding centers the pattern's bounding box by
//! default. An unknown name is a caller error reported with the full list
//! of valid names, never a panic.

use life_matrix_core::{Grid, GridSize};
use thiserror::Error;

/// Error raised when a requested pattern name is not in the catalog.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown pattern '{name}'; available: {}", .available.join(", "))]
pub struct UnknownPattern {
    /// Name that failed to resolve.
    pub name: String,
    /// Sorted list of every valid pattern name.
    pub available: Vec<String>,
}

/// Category a pattern belongs to, used for catalog listings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PatternKind {
    /// Configurations that never change.
    StillLife,
    /// Configurations that repeat with a fixed period.
    Oscillator,
    /// Configurations that translate across the grid.
    Spaceship,
    /// Configurations that emit spaceships indefinitely.
    Gun,
    /// Small seeds with long, chaotic lifetimes.
    Methuselah,
}

/// A named catalog entry.
#[derive(Clone, Copy, Debug)]
pub struct Pattern {
    name: &'static str,
    kind: PatternKind,
    cells: &'static [(usize, usize)],
}

impl Pattern {
    /// Catalog name of the pattern.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Category the pattern belongs to.
    #[must_use]
    pub const fn kind(&self) -> PatternKind {
        self.kind
    }

    /// Cell offsets relative to the pattern's own origin.
    #[must_use]
    pub const fn cells(&self) -> &'static [(usize, usize)] {
        self.cells
    }
}

const BLOCK: &[(usize, usize)] = &[(0, 0), (0, 1), (1, 0), (1, 1)];
const BEEHIVE: &[(usize, usize)] = &[(0, 1), (0, 2), (1, 0), (1, 3), (2, 1), (2, 2)];
const LOAF: &[(usize, usize)] = &[(0, 1), (0, 2), (1, 0), (1, 3), (2, 1), (2, 3), (3, 2)];
const BOAT: &[(usize, usize)] = &[(0, 0), (0, 1), (1, 0), (1, 2), (2, 1)];
const TUB: &[(usize, usize)] = &[(0, 1), (1, 0), (1, 2), (2, 1)];

const BLINKER: &[(usize, usize)] = &[(0, 0), (0, 1), (0, 2)];
const TOAD: &[(usize, usize)] = &[(0, 1), (0, 2), (0, 3), (1, 0), (1, 1), (1, 2)];
const BEACON: &[(usize, usize)] = &[(0, 0), (0, 1), (1, 0), (2, 3), (3, 2), (3, 3)];
const PULSAR: &[(usize, usize)] = &[
    (0, 2),
    (0, 3),
    (0, 4),
    (0, 8),
    (0, 9),
    (0, 10),
    (2, 0),
    (2, 5),
    (2, 7),
    (2, 12),
    (3, 0),
    (3, 5),
    (3, 7),
    (3, 12),
    (4, 0),
    (4, 5),
    (4, 7),
    (4, 12),
    (5, 2),
    (5, 3),
    (5, 4),
    (5, 8),
    (5, 9),
    (5, 10),
    (7, 2),
    (7, 3),
    (7, 4),
    (7, 8),
    (7, 9),
    (7, 10),
    (8, 0),
    (8, 5),
    (8, 7),
    (8, 12),
    (9, 0),
    (9, 5),
    (9, 7),
    (9, 12),
    (10, 0),
    (10, 5),
    (10, 7),
    (10, 12),
    (12, 2),
    (12, 3),
    (12, 4),
    (12, 8),
    (12, 9),
    (12, 10),
];
const PENTADECATHLON: &[(usize, usize)] = &[
    (0, 1),
    (1, 1),
    (2, 0),
    (2, 2),
    (3, 1),
    (4, 1),
    (5, 1),
    (6, 1),
    (7, 0),
    (7, 2),
    (8, 1),
    (9, 1),
];

const GLIDER: &[(usize, usize)] = &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)];
const LWSS: &[(usize, usize)] = &[
    (0, 1),
    (0, 4),
    (1, 0),
    (2, 0),
    (2, 4),
    (3, 0),
    (3, 1),
    (3, 2),
    (3, 3),
];
const MWSS: &[(usize, usize)] = &[
    (0, 2),
    (1, 0),
    (1, 4),
    (2, 5),
    (3, 0),
    (3, 5),
    (4, 1),
    (4, 2),
    (4, 3),
    (4, 4),
    (4, 5),
];
const HWSS: &[(usize, usize)] = &[
    (0, 2),
    (0, 3),
    (1, 0),
    (1, 5),
    (2, 6),
    (3, 0),
    (3, 6),
    (4, 1),
    (4, 2),
    (4, 3),
    (4, 4),
    (4, 5),
    (4, 6),
];

const GOSPER_GLIDER_GUN: &[(usize, usize)] = &[
    (0, 24),
    (1, 22),
    (1, 24),
    (2, 12),
    (2, 13),
    (2, 20),
    (2, 21),
    (2, 34),
    (2, 35),
    (3, 11),
    (3, 15),
    (3, 20),
    (3, 21),
    (3, 34),
    (3, 35),
    (4, 0),
    (4, 1),
    (4, 10),
    (4, 16),
    (4, 20),
    (4, 21),
    (5, 0),
    (5, 1),
    (5, 10),
    (5, 14),
    (5, 16),
    (5, 17),
    (5, 22),
    (5, 24),
    (6, 10),
    (6, 16),
    (6, 24),
    (7, 11),
    (7, 15),
    (8, 12),
    (8, 13),
];

const R_PENTOMINO: &[(usize, usize)] = &[(0, 1), (0, 2), (1, 0), (1, 1), (2, 1)];
const DIEHARD: &[(usize, usize)] = &[(0, 6), (1, 0), (1, 1), (2, 1), (2, 5), (2, 6), (2, 7)];
const ACORN: &[(usize, usize)] = &[(0, 1), (1, 3), (2, 0), (2, 1), (2, 4), (2, 5), (2, 6)];

const CATALOG: &[Pattern] = &[
    Pattern {
        name: "block",
        kind: PatternKind::StillLife,
        cells: BLOCK,
    },
    Pattern {
        name: "beehive",
        kind: PatternKind::StillLife,
        cells: BEEHIVE,
    },
    Pattern {
        name: "loaf",
        kind: PatternKind::StillLife,
        cells: LOAF,
    },
    Pattern {
        name: "boat",
        kind: PatternKind::StillLife,
        cells: BOAT,
    },
    Pattern {
        name: "tub",
        kind: PatternKind::StillLife,
        cells: TUB,
    },
    Pattern {
        name: "blinker",
        kind: PatternKind::Oscillator,
        cells: BLINKER,
    },
    Pattern {
        name: "toad",
        kind: PatternKind::Oscillator,
        cells: TOAD,
    },
    Pattern {
        name: "beacon",
        kind: PatternKind::Oscillator,
        cells: BEACON,
    },
    Pattern {
        name: "pulsar",
        kind: PatternKind::Oscillator,
        cells: PULSAR,
    },
    Pattern {
        name: "pentadecathlon",
        kind: PatternKind::Oscillator,
        cells: PENTADECATHLON,
    },
    Pattern {
        name: "glider",
        kind: PatternKind::Spaceship,
        cells: GLIDER,
    },
    Pattern {
        name: "lwss",
        kind: PatternKind::Spaceship,
        cells: LWSS,
    },
    Pattern {
        name: "mwss",
        kind: PatternKind::Spaceship,
        cells: MWSS,
    },
    Pattern {
        name: "hwss",
        kind: PatternKind::Spaceship,
        cells: HWSS,
    },
    Pattern {
        name: "gosper_glider_gun",
        kind: PatternKind::Gun,
        cells: GOSPER_GLIDER_GUN,
    },
    Pattern {
        name: "r_pentomino",
        kind: PatternKind::Methuselah,
        cells: R_PENTOMINO,
    },
    Pattern {
        name: "diehard",
        kind: PatternKind::Methuselah,
        cells: DIEHARD,
    },
    Pattern {
        name: "acorn",
        kind: PatternKind::Methuselah,
        cells: ACORN,
    },
];

/// Every catalog entry, grouped in catalog order.
#[must_use]
pub fn catalog() -> &'static [Pattern] {
    CATALOG
}

/// Resolves a pattern name to its cell offsets.
pub fn lookup(name: &str) -> Result<&'static Pattern, UnknownPattern> {
    CATALOG
        .iter()
        .find(|pattern| pattern.name == name)
        .ok_or_else(|| UnknownPattern {
            name: name.to_string(),
            available: {
                let mut names: Vec<String> =
                    CATALOG.iter().map(|p| p.name.to_string()).collect();
                names.sort_unstable();
                names
            },
        })
}

/// Seeds a grid with the named pattern, its bounding box centered.
pub fn seed(name: &str, size: GridSize) -> Result<Grid, UnknownPattern> {
    let pattern = lookup(name)?;
    let max_row = pattern
        .cells
        .iter()
        .map(|&(row, _)| row)
        .max()
        .unwrap_or(0);
    let max_col = pattern
        .cells
        .iter()
        .map(|&(_, col)| col)
        .max()
        .unwrap_or(0);
    let row_offset = size.rows().saturating_sub(max_row) / 2;
    let col_offset = size.cols().saturating_sub(max_col) / 2;

    let mut grid = Grid::new(size);
    place(&mut grid, pattern, row_offset, col_offset);
    Ok(grid)
}

/// Places a pattern's offsets onto the grid with toroidal wrapping.
pub fn place(grid: &mut Grid, pattern: &Pattern, row_offset: usize, col_offset: usize) {
    let rows = grid.size().rows();
    let cols = grid.size().cols();
    if rows == 0 || cols == 0 {
        return;
    }
    for &(dr, dc) in pattern.cells {
        grid.set((row_offset + dr) % rows, (col_offset + dc) % cols, true);
    }
}
