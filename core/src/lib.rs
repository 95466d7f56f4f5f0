#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Life Matrix show engine.
//!
//! This crate defines the data types that connect the pure systems, the
//! show director, and the rendering adapters: the toroidal [`Grid`] the
//! automaton evolves, the [`Bitmap`] produced by text rasterization, the
//! [`Frame`] of pixels the director repaints every tick, and the
//! [`ShowEvent`] stream the director broadcasts so adapters and tests can
//! observe sequencing without reaching into director state.

mod config;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use config::{DissolveCue, ShowConfig, TempoTable};

/// Golden ratio used to decelerate successive ticker lines.
pub const PHI: f64 = 1.618_033_988_749_895;

/// Opaque 8-bit-per-channel RGB color used on the pixel display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Linearly interpolates toward `other` by `t`, clamped to `[0, 1]`.
    #[must_use]
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        Rgb::new(
            lerp_channel(self.red, other.red, t),
            lerp_channel(self.green, other.green, t),
            lerp_channel(self.blue, other.blue, t),
        )
    }
}

fn lerp_channel(a: u8, b: u8, t: f32) -> u8 {
    (a as f32 + (b as f32 - a as f32) * t) as u8
}

/// Fixed dimensions of the display grid measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    rows: usize,
    cols: usize,
}

impl GridSize {
    /// Creates a new grid size descriptor.
    #[must_use]
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells covered by the grid.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.rows * self.cols
    }
}

/// Fixed-size matrix of boolean cell states with toroidal topology.
///
/// Dimensions never change after creation. Neighbor wrapping is the
/// automaton system's concern; the grid itself only stores state and
/// performs bounds-checked access.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    size: GridSize,
    cells: Vec<bool>,
}

impl Grid {
    /// Creates an all-dead grid of the requested size.
    #[must_use]
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            cells: vec![false; size.cell_count()],
        }
    }

    /// Dimensions of the grid.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Returns the state of the cell at `(row, col)`.
    ///
    /// Out-of-range coordinates read as dead.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.index(row, col)
            .map_or(false, |index| self.cells[index])
    }

    /// Sets the state of the cell at `(row, col)`.
    ///
    /// Out-of-range coordinates are ignored.
    pub fn set(&mut self, row: usize, col: usize, alive: bool) {
        if let Some(index) = self.index(row, col) {
            self.cells[index] = alive;
        }
    }

    /// Dense row-major view of the cell states.
    #[must_use]
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.size.rows && col < self.size.cols {
            Some(row * self.size.cols + col)
        } else {
            None
        }
    }
}

/// Immutable rectangular matrix of boolean pixels.
///
/// Produced by a [`TextRasterizer`]; placed onto a [`Grid`] at a signed
/// pixel offset by the automaton system, with silent clipping at the
/// grid bounds (never wrapping).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Bitmap {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl Bitmap {
    /// Builds a bitmap from row-major boolean rows.
    ///
    /// All rows must share one width; an empty slice yields the empty
    /// bitmap.
    #[must_use]
    pub fn from_rows(rows: &[Vec<bool>]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        debug_assert!(
            rows.iter().all(|row| row.len() == width),
            "bitmap rows must be rectangular"
        );

        let mut bits = Vec::with_capacity(width * height);
        for row in rows {
            bits.extend_from_slice(row);
        }
        Self {
            width,
            height,
            bits,
        }
    }

    /// The zero-size bitmap.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Pixel width of the bitmap.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Pixel height of the bitmap.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns whether the bitmap contains no pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns the pixel at `(x, y)`; out-of-range reads are dead.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x < self.width && y < self.height {
            self.bits[y * self.width + x]
        } else {
            false
        }
    }
}

/// Dense pixel buffer the director overwrites in full on every frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    size: GridSize,
    pixels: Vec<Rgb>,
}

impl Frame {
    /// Creates a frame filled with the provided color.
    #[must_use]
    pub fn new(size: GridSize, fill: Rgb) -> Self {
        Self {
            size,
            pixels: vec![fill; size.cell_count()],
        }
    }

    /// Dimensions of the frame in pixels.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Fills every pixel with one color.
    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Sets a single pixel; out-of-range coordinates are ignored.
    pub fn set_pixel(&mut self, row: usize, col: usize, color: Rgb) {
        if row < self.size.rows && col < self.size.cols {
            self.pixels[row * self.size.cols + col] = color;
        }
    }

    /// Returns the pixel at `(row, col)`, if in range.
    #[must_use]
    pub fn pixel(&self, row: usize, col: usize) -> Option<Rgb> {
        if row < self.size.rows && col < self.size.cols {
            Some(self.pixels[row * self.size.cols + col])
        } else {
            None
        }
    }

    /// Row-major view of all pixels.
    #[must_use]
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }
}

/// Identifies which phase of the show is currently active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Ambient night sky with twinkling stars, before the first scroll.
    Stargazing,
    /// A scripted ticker line scrolling across the frame.
    TickerScroll,
    /// Star-lit pause between two ticker lines.
    LinePause,
    /// The final line scrolling until its last word reaches its rest
    /// position.
    FinalScroll,
    /// Fixed-step interpolation from night colors to the sea color.
    Dawn,
    /// Scripted overlays reintroducing the final word into the live grid.
    Dissolve,
    /// Indefinite free-running simulation with self-healing resets.
    Cruise,
}

/// Events broadcast by the director as the show advances.
///
/// Adapters log these; deterministic tests replay scripted time and
/// compare the resulting event streams.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShowEvent {
    /// The show transitioned into a new phase.
    PhaseEntered {
        /// Phase that became active.
        phase: PhaseKind,
        /// Generation counter at the moment of the transition.
        generation: u64,
    },
    /// A ticker line began scrolling.
    LineScrollStarted {
        /// Zero-based index of the line within the script.
        line: usize,
    },
    /// A dissolve cue fired and the word bitmap was merged into the grid.
    OverlayApplied {
        /// Zero-based index of the cue within the dissolve schedule.
        cue: usize,
        /// Vertical pixel offset the overlay was applied at.
        y_offset: i32,
        /// Generation counter when the cue fired.
        generation: u64,
    },
    /// The grid was reseeded after going stale or dying out.
    GridReseeded {
        /// Generation counter when the reseed occurred.
        generation: u64,
        /// Live-cell count immediately after reseeding.
        population: usize,
    },
    /// The circadian random walk moved to a new tempo index.
    TempoShifted {
        /// New index into the tempo table.
        index: usize,
        /// Delay value now in effect.
        delay: Duration,
    },
}

/// Converts a literal line of text into a boolean pixel bitmap.
///
/// Implementations must be deterministic and pure: the same text always
/// produces the same bitmap. The font is monospaced; `cell_width` is the
/// horizontal advance per character and `char_height` the band height the
/// director reserves for text.
pub trait TextRasterizer {
    /// Rasterizes one line of text into a bitmap.
    fn rasterize(&self, text: &str) -> Bitmap;

    /// Pixel height of every rasterized line.
    fn char_height(&self) -> usize;

    /// Horizontal pixel advance per character.
    fn cell_width(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::{Bitmap, DissolveCue, Frame, Grid, GridSize, Rgb, TempoTable};
    use serde::{de::DeserializeOwned, Serialize};
    use std::time::Duration;

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn rgb_round_trips_through_bincode() {
        assert_round_trip(&Rgb::new(200, 220, 255));
    }

    #[test]
    fn grid_size_round_trips_through_bincode() {
        assert_round_trip(&GridSize::new(64, 64));
    }

    #[test]
    fn dissolve_cue_round_trips_through_bincode() {
        assert_round_trip(&DissolveCue::new(4, 1));
    }

    #[test]
    fn tempo_table_round_trips_through_bincode() {
        let table = TempoTable::new(
            vec![
                Duration::from_millis(600),
                Duration::from_millis(750),
                Duration::from_millis(1034),
            ],
            1,
        );
        assert_round_trip(&table);
    }

    #[test]
    fn rgb_lerp_endpoints_match_inputs() {
        let night = Rgb::new(0, 0, 0);
        let sea = Rgb::new(0, 0, 255);
        assert_eq!(night.lerp(sea, 0.0), night);
        assert_eq!(night.lerp(sea, 1.0), sea);
        assert_eq!(night.lerp(sea, 0.5).blue(), 127);
    }

    #[test]
    fn grid_reads_out_of_range_as_dead() {
        let mut grid = Grid::new(GridSize::new(4, 4));
        grid.set(1, 2, true);
        assert!(grid.get(1, 2));
        assert!(!grid.get(4, 0));
        assert!(!grid.get(0, 4));

        grid.set(9, 9, true);
        assert_eq!(grid.cells().iter().filter(|cell| **cell).count(), 1);
    }

    #[test]
    fn bitmap_from_rows_preserves_geometry() {
        let bitmap = Bitmap::from_rows(&[vec![true, false, true], vec![false, true, false]]);
        assert_eq!(bitmap.width(), 3);
        assert_eq!(bitmap.height(), 2);
        assert!(bitmap.get(0, 0));
        assert!(bitmap.get(1, 1));
        assert!(!bitmap.get(2, 1));
        assert!(!bitmap.get(3, 0));
    }

    #[test]
    fn empty_bitmap_has_no_pixels() {
        let bitmap = Bitmap::empty();
        assert!(bitmap.is_empty());
        assert_eq!(bitmap.width(), 0);
        assert!(!bitmap.get(0, 0));
    }

    #[test]
    fn frame_ignores_out_of_range_writes() {
        let black = Rgb::new(0, 0, 0);
        let green = Rgb::new(0, 255, 0);
        let mut frame = Frame::new(GridSize::new(2, 2), black);
        frame.set_pixel(0, 1, green);
        frame.set_pixel(2, 0, green);
        assert_eq!(frame.pixel(0, 1), Some(green));
        assert_eq!(frame.pixel(2, 0), None);
        assert_eq!(frame.pixels().iter().filter(|p| **p == green).count(), 1);
    }
}
