#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! The circadian rhythm: a bounded reflecting random walk over a fixed
//! tempo table.
//!
//! Every `tempo_stride` generations the director asks the walk to move
//! one step up, down, or stay, with equal odds. Reflection at both ends
//! biases the walk back toward the interior, so the long-run occupancy
//! forms a bell curve around the table's center and the show's tempo
//! drifts without ever running away.

use std::time::Duration;

use life_matrix_core::TempoTable;
use rand::Rng;

/// Random-walk state over a [`TempoTable`].
///
/// Holds only an index; the table itself is fixed at construction.
#[derive(Clone, Debug)]
pub struct Circadian {
    table: TempoTable,
    index: usize,
}

impl Circadian {
    /// Creates a walk resting at the table's center index.
    #[must_use]
    pub fn new(table: TempoTable) -> Self {
        let index = table.center();
        Self { table, index }
    }

    /// Advances the walk one step: {-1, 0, +1} with equal probability,
    /// reflecting at the boundaries (below 0 lands on 1, past the end
    /// lands on the second-to-last index). Returns the new index.
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> usize {
        let movement = rng.gen_range(-1i32..=1);
        let proposed = self.index as i32 + movement;
        self.index = if proposed < 0 {
            1.min(self.table.len() - 1)
        } else if proposed as usize >= self.table.len() {
            self.table.len().saturating_sub(2)
        } else {
            proposed as usize
        };
        self.index
    }

    /// Delay value currently in effect.
    #[must_use]
    pub fn current_delay(&self) -> Duration {
        self.table.delay_at(self.index)
    }

    /// Current index into the tempo table.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// The underlying tempo table.
    #[must_use]
    pub const fn table(&self) -> &TempoTable {
        &self.table
    }
}
