#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Twinkling star overlay for the night phases of the show.
//!
//! Star positions are fixed at construction, sampled without replacement
//! from the cells outside the horizontal text band. Brightness is a pure
//! function of elapsed time and is recomputed every frame, never stored,
//! so the field stays immutable for the whole run.

use std::f64::consts::TAU;
use std::time::Duration;

use life_matrix_core::GridSize;
use rand::seq::SliceRandom;
use rand::Rng;

/// A single twinkling point: a fixed position plus an independent phase
/// offset drawn once from `[0, 2π)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    row: usize,
    col: usize,
    phase: f64,
}

impl Star {
    /// Row the star occupies.
    #[must_use]
    pub const fn row(&self) -> usize {
        self.row
    }

    /// Column the star occupies.
    #[must_use]
    pub const fn col(&self) -> usize {
        self.col
    }

    /// Phase offset of the star's twinkle cycle.
    #[must_use]
    pub const fn phase(&self) -> f64 {
        self.phase
    }
}

/// Fixed set of stars sampled outside the reserved text band.
#[derive(Clone, Debug)]
pub struct StarField {
    stars: Vec<Star>,
    twinkle_hz: f64,
}

impl StarField {
    /// Samples `count` distinct positions outside the text band
    /// `[band_top, band_top + band_height)`, each with an independent
    /// uniform phase.
    ///
    /// When the sky holds fewer free cells than requested the field
    /// degrades to all available cells rather than failing.
    #[must_use]
    pub fn new<R: Rng>(
        size: GridSize,
        band_top: usize,
        band_height: usize,
        count: usize,
        twinkle_period: Duration,
        rng: &mut R,
    ) -> Self {
        let band_bottom = band_top.saturating_add(band_height);
        let sky: Vec<(usize, usize)> = (0..size.rows())
            .filter(|row| *row < band_top || *row >= band_bottom)
            .flat_map(|row| (0..size.cols()).map(move |col| (row, col)))
            .collect();

        let stars = sky
            .choose_multiple(rng, count.min(sky.len()))
            .map(|&(row, col)| Star {
                row,
                col,
                phase: rng.gen_range(0.0..TAU),
            })
            .collect();

        let period = twinkle_period.as_secs_f64();
        let twinkle_hz = if period > 0.0 { 1.0 / period } else { 0.0 };
        Self { stars, twinkle_hz }
    }

    /// The sampled stars, in sampling order.
    #[must_use]
    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Brightness of a star after `elapsed` show time, in `[0, 1]`.
    ///
    /// `max(0, sin(2π · f · t + phase))`: dark for half of every cycle,
    /// rising and falling smoothly the rest, so the field never twinkles
    /// in unison.
    #[must_use]
    pub fn brightness(&self, star: &Star, elapsed: Duration) -> f32 {
        let t = elapsed.as_secs_f64();
        (TAU * self.twinkle_hz * t + star.phase).sin().max(0.0) as f32
    }
}
