//! Immutable show configuration and its named presets.
//!
//! The installation runs in three deployed variants with slightly
//! different schedules and tempos, each a named preset over one engine:
//! `preview` (the 80 BPM bench build), `matrix` (the panel build with
//! the long eight-phase dissolve), and `athletic` (the 50 BPM build with
//! a plain dissolve and an always-on tempo walk).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{GridSize, Rgb};

const DEFAULT_SIZE: GridSize = GridSize::new(64, 64);
const ALIVE: Rgb = Rgb::new(0, 255, 0);
const SEA: Rgb = Rgb::new(0, 0, 255);
const NIGHT: Rgb = Rgb::new(0, 0, 0);
const STAR: Rgb = Rgb::new(200, 220, 255);

const DISSOLVE_PHASE_GENS: u64 = 4;

/// One entry in the dissolve schedule: when the live generation counter
/// first reaches `generation`, the final word is overlaid at `y_offset`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DissolveCue {
    generation: u64,
    y_offset: i32,
}

impl DissolveCue {
    /// Creates a new cue firing at the provided generation threshold.
    #[must_use]
    pub const fn new(generation: u64, y_offset: i32) -> Self {
        Self {
            generation,
            y_offset,
        }
    }

    /// Generation threshold at which the cue fires.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Vertical pixel offset for the overlay.
    #[must_use]
    pub const fn y_offset(&self) -> i32 {
        self.y_offset
    }
}

/// Ordered table of generation delays the circadian walk drifts across.
///
/// The table is fixed at construction; only an index into it ever moves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TempoTable {
    delays: Vec<Duration>,
    center: usize,
}

impl TempoTable {
    /// Creates a tempo table with a designated resting index.
    ///
    /// An empty delay list falls back to a single 750 ms entry; a center
    /// index past the end is clamped to the last entry.
    #[must_use]
    pub fn new(delays: Vec<Duration>, center: usize) -> Self {
        let delays = if delays.is_empty() {
            vec![Duration::from_millis(750)]
        } else {
            delays
        };
        let center = center.min(delays.len() - 1);
        Self { delays, center }
    }

    /// Ordered delay values.
    #[must_use]
    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }

    /// Resting index the walk starts from.
    #[must_use]
    pub const fn center(&self) -> usize {
        self.center
    }

    /// Number of entries in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.delays.len()
    }

    /// Returns whether the table is empty. It never is after construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.delays.is_empty()
    }

    /// Delay stored at the provided index, clamped to the table bounds.
    #[must_use]
    pub fn delay_at(&self, index: usize) -> Duration {
        self.delays[index.min(self.delays.len() - 1)]
    }
}

/// Complete immutable configuration for one show run.
///
/// Passed to the director at construction; there is no ambient global
/// state. Field groups mirror the phases they drive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShowConfig {
    /// Dimensions of the display grid.
    pub size: GridSize,
    /// Color of live cells and scrolling text.
    pub alive_color: Rgb,
    /// Resting background once dawn completes ("the sea").
    pub sea_color: Rgb,
    /// Background during the night phases.
    pub night_color: Rgb,
    /// Star color at full brightness.
    pub star_color: Rgb,
    /// Probability a cell starts alive when the grid is reseeded.
    pub initial_density: f64,
    /// Generations of unchanged population before a cruise reseed.
    pub stale_reset_generations: u32,
    /// Number of stars sampled for the night sky.
    pub star_count: usize,
    /// Length of one full twinkle cycle.
    pub twinkle_period: Duration,
    /// Repaint cadence for star-only frames (stargazing and line pauses).
    pub star_refresh: Duration,
    /// Scripted ticker lines, scrolled in order.
    pub ticker_lines: Vec<String>,
    /// Per-pixel scroll delay for the fastest line.
    pub scroll_base_delay: Duration,
    /// Golden-ratio exponents applied per line index; later lines scroll
    /// slower.
    pub scroll_exponents: Vec<f64>,
    /// Star-lit pause between consecutive ticker lines.
    pub line_pause: Duration,
    /// Duration of the opening star-only phase.
    pub stargaze: Duration,
    /// Number of discrete interpolation steps in the dawn transition.
    pub dawn_steps: u32,
    /// Total wall time the dawn transition spans.
    pub dawn_hold: Duration,
    /// Ordered one-shot overlay cues applied during the dissolve.
    pub dissolve_cues: Vec<DissolveCue>,
    /// Generation threshold at which the dissolve hands over to cruise.
    pub dissolve_total_generations: u64,
    /// Whether the tempo walk stands still while the dissolve schedule
    /// is in control. Freezing keeps the schedule reproducible from the
    /// generation count alone; the `athletic` build leaves it running.
    pub freeze_tempo_during_dissolve: bool,
    /// Delay table the circadian walk drifts across.
    pub tempo: TempoTable,
    /// Generations between circadian walk steps.
    pub tempo_stride: u64,
}

impl ShowConfig {
    /// The bench preview variant: 750 ms heartbeat, five-phase dissolve.
    #[must_use]
    pub fn preview(char_height: usize) -> Self {
        let layout = DissolveLayout::for_band(DEFAULT_SIZE.rows(), char_height);
        Self {
            size: DEFAULT_SIZE,
            alive_color: ALIVE,
            sea_color: SEA,
            night_color: NIGHT,
            star_color: STAR,
            initial_density: 0.20,
            stale_reset_generations: 50,
            star_count: 12,
            twinkle_period: Duration::from_secs(5),
            star_refresh: Duration::from_millis(80),
            ticker_lines: vec![
                "Fate isnt what were up against".to_string(),
                "There is no design".to_string(),
                "No flaws to find".to_string(),
            ],
            scroll_base_delay: Duration::from_millis(47),
            scroll_exponents: vec![0.0, 1.0, 1.5],
            line_pause: Duration::from_millis(750),
            stargaze: Duration::from_secs(5),
            dawn_steps: 50,
            dawn_hold: Duration::from_millis(7_500),
            dissolve_cues: layout.cues(&[
                layout.top,
                layout.bottom,
                layout.upper_bridge,
                layout.lower_bridge,
            ]),
            dissolve_total_generations: DISSOLVE_PHASE_GENS * 5,
            freeze_tempo_during_dissolve: true,
            tempo: TempoTable::new(
                [600, 632, 674, 714, 750, 800, 857, 938, 1034]
                    .into_iter()
                    .map(Duration::from_millis)
                    .collect(),
                4,
            ),
            tempo_stride: 8,
        }
    }

    /// The panel build: same heartbeat as `preview` but an eight-phase
    /// dissolve that revisits the top, middle, and bottom positions.
    #[must_use]
    pub fn matrix(char_height: usize) -> Self {
        let layout = DissolveLayout::for_band(DEFAULT_SIZE.rows(), char_height);
        Self {
            dissolve_cues: layout.cues(&[
                layout.top,
                layout.bottom,
                layout.upper_bridge,
                layout.lower_bridge,
                layout.middle,
                layout.top,
                layout.bottom,
            ]),
            dissolve_total_generations: DISSOLVE_PHASE_GENS * 8,
            ..Self::preview(char_height)
        }
    }

    /// The 50 BPM build: slower heartbeat, denser soup, a plain dissolve
    /// with no overlay cues, and a tempo walk that never freezes.
    #[must_use]
    pub fn athletic(char_height: usize) -> Self {
        Self {
            initial_density: 0.30,
            ticker_lines: vec![
                "Fate isnt what were up against".to_string(),
                "Theres no design".to_string(),
                "No flaw to find".to_string(),
            ],
            line_pause: Duration::from_millis(1_200),
            dissolve_cues: Vec::new(),
            dissolve_total_generations: 12,
            freeze_tempo_during_dissolve: false,
            tempo: TempoTable::new(
                [968, 1034, 1091, 1154, 1200, 1250, 1333, 1395, 1500]
                    .into_iter()
                    .map(Duration::from_millis)
                    .collect(),
                4,
            ),
            ..Self::preview(char_height)
        }
    }

    /// Delay between two dawn interpolation steps.
    #[must_use]
    pub fn dawn_step_delay(&self) -> Duration {
        if self.dawn_steps == 0 {
            self.dawn_hold
        } else {
            self.dawn_hold / self.dawn_steps
        }
    }

    /// Per-pixel scroll delay for the given line index, decelerated by
    /// the golden ratio raised to the line's configured exponent and
    /// rounded to whole milliseconds.
    #[must_use]
    pub fn scroll_delay(&self, line: usize) -> Duration {
        let exponent = self
            .scroll_exponents
            .get(line)
            .or_else(|| self.scroll_exponents.last())
            .copied()
            .unwrap_or(0.0);
        let millis = self.scroll_base_delay.as_secs_f64() * 1_000.0 * crate::PHI.powf(exponent);
        Duration::from_millis(millis.round() as u64)
    }
}

/// Vertical word positions derived from the grid height and the font's
/// character height, matching the installation's hand-tuned offsets for
/// its 20 px font (top 1, middle 22, bottom 43, bridges 11 and 32).
#[derive(Clone, Copy, Debug)]
struct DissolveLayout {
    top: i32,
    middle: i32,
    bottom: i32,
    upper_bridge: i32,
    lower_bridge: i32,
}

impl DissolveLayout {
    fn for_band(rows: usize, char_height: usize) -> Self {
        let rows = rows as i32;
        let height = char_height as i32;
        let top = 1;
        let middle = (rows - height) / 2;
        let bottom = rows - height - 1;
        Self {
            top,
            middle,
            bottom,
            upper_bridge: (top + middle) / 2,
            lower_bridge: (middle + bottom) / 2,
        }
    }

    fn cues(&self, offsets: &[i32]) -> Vec<DissolveCue> {
        offsets
            .iter()
            .enumerate()
            .map(|(index, y_offset)| {
                DissolveCue::new(DISSOLVE_PHASE_GENS * (index as u64 + 1), *y_offset)
            })
            .collect()
    }
}
