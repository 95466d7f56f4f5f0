#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! The show director: the authoritative state machine that sequences the
//! whole installation.
//!
//! The director owns the single mutable [`Grid`], the circadian tempo
//! state, the star field, and a seedable random source. It advances in
//! discrete ticks, each timestamped at its scheduled moment rather than
//! the caller's clock reading, so a blocking sleep loop and a cooperative
//! event loop drive it to bit-identical sequences. Everything observable
//! is broadcast as [`ShowEvent`] values; adapters log them and
//! deterministic tests replay scripted time against them.
//!
//! Phase order is one-directional: stargazing, the scripted ticker, the
//! final scroll, dawn, the scripted dissolve, and then cruise, which
//! never ends but self-heals its grid content when the world goes stale
//! or dies out.

mod compose;

use std::time::Duration;

use life_matrix_core::{Bitmap, Frame, Grid, PhaseKind, ShowConfig, ShowEvent, TextRasterizer};
use life_matrix_system_automaton as automaton;
use life_matrix_system_circadian::Circadian;
use life_matrix_system_starfield::StarField;
use rand::Rng;

/// Internal phase representation carrying per-phase scalar state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Stargazing,
    TickerScroll { line: usize },
    LinePause { next_line: usize },
    FinalScroll { line: usize, stop_x: i32 },
    Dawn,
    Dissolve,
    Cruise,
}

impl Phase {
    fn kind(self) -> PhaseKind {
        match self {
            Phase::Stargazing => PhaseKind::Stargazing,
            Phase::TickerScroll { .. } => PhaseKind::TickerScroll,
            Phase::LinePause { .. } => PhaseKind::LinePause,
            Phase::FinalScroll { .. } => PhaseKind::FinalScroll,
            Phase::Dawn => PhaseKind::Dawn,
            Phase::Dissolve => PhaseKind::Dissolve,
            Phase::Cruise => PhaseKind::Cruise,
        }
    }
}

/// Mutable run state owned exclusively by the director.
#[derive(Clone, Debug)]
struct ShowState {
    phase: Phase,
    /// Bitmap of the text currently on screen (scrolling line or the
    /// held final word).
    bitmap: Bitmap,
    /// Bitmap of the final word, cached once the final scroll begins.
    word: Bitmap,
    scroll_x: i32,
    /// Expiry for the wall-time phases (stargazing and line pauses).
    deadline: Duration,
    dawn_step: u32,
    grid: Grid,
    generation: u64,
    stale: u32,
    last_population: usize,
    overlay_index: usize,
    next_tick_at: Duration,
}

/// Top-level state machine sequencing the show.
pub struct Director<R: Rng> {
    config: ShowConfig,
    rasterizer: Box<dyn TextRasterizer>,
    rng: R,
    starfield: StarField,
    circadian: Circadian,
    band_top: usize,
    state: ShowState,
}

impl<R: Rng> std::fmt::Debug for Director<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Director")
            .field("state", &self.state)
            .field("tempo_index", &self.circadian.index())
            .finish_non_exhaustive()
    }
}

impl<R: Rng> Director<R> {
    /// Creates a director at the start of the full show: the stargazing
    /// phase, an all-dead grid, and the tempo walk at its resting index.
    #[must_use]
    pub fn new(config: ShowConfig, rasterizer: Box<dyn TextRasterizer>, mut rng: R) -> Self {
        let band_top = config
            .size
            .rows()
            .saturating_sub(rasterizer.char_height())
            / 2;
        let starfield = StarField::new(
            config.size,
            band_top,
            rasterizer.char_height(),
            config.star_count,
            config.twinkle_period,
            &mut rng,
        );
        let circadian = Circadian::new(config.tempo.clone());
        let state = ShowState {
            phase: Phase::Stargazing,
            bitmap: Bitmap::empty(),
            word: Bitmap::empty(),
            scroll_x: 0,
            deadline: config.stargaze,
            dawn_step: 0,
            grid: Grid::new(config.size),
            generation: 0,
            stale: 0,
            last_population: 0,
            overlay_index: 0,
            next_tick_at: Duration::ZERO,
        };
        Self {
            config,
            rasterizer,
            rng,
            starfield,
            circadian,
            band_top,
            state,
        }
    }

    /// Creates a director that skips the scripted phases and starts
    /// directly in cruise with the provided grid, the alternate-seeding
    /// entry used by the pattern catalog.
    #[must_use]
    pub fn cruising(
        config: ShowConfig,
        rasterizer: Box<dyn TextRasterizer>,
        rng: R,
        grid: Grid,
    ) -> Self {
        let mut director = Self::new(config, rasterizer, rng);
        director.state.last_population = automaton::population(&grid);
        director.state.grid = grid;
        director.state.phase = Phase::Cruise;
        director
    }

    /// Runs every tick whose scheduled time has arrived, pushing the
    /// events each tick broadcasts into `out`.
    pub fn advance(&mut self, now: Duration, out: &mut Vec<ShowEvent>) {
        while self.state.next_tick_at <= now {
            let at = self.state.next_tick_at;
            self.tick(at, out);
            let delay = self.current_delay();
            self.state.next_tick_at = at + delay;
        }
    }

    /// Paints the current visual state into the frame. Pure with respect
    /// to director state; `now` only animates star brightness.
    pub fn compose(&self, now: Duration, frame: &mut Frame) {
        compose::compose(self, now, frame);
    }

    /// Phase currently active.
    #[must_use]
    pub fn phase(&self) -> PhaseKind {
        self.state.phase.kind()
    }

    /// Generations stepped since the dissolve seed (or cruise start).
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.state.generation
    }

    /// Live-cell count of the owned grid.
    #[must_use]
    pub fn population(&self) -> usize {
        automaton::population(&self.state.grid)
    }

    /// Scheduled time of the next pending tick.
    #[must_use]
    pub const fn next_tick_at(&self) -> Duration {
        self.state.next_tick_at
    }

    /// Current index into the tempo table.
    #[must_use]
    pub fn tempo_index(&self) -> usize {
        self.circadian.index()
    }

    /// The grid the show currently owns.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.state.grid
    }

    /// Top row of the reserved text band.
    #[must_use]
    pub const fn band_top(&self) -> usize {
        self.band_top
    }

    pub(crate) fn config(&self) -> &ShowConfig {
        &self.config
    }

    pub(crate) fn starfield(&self) -> &StarField {
        &self.starfield
    }

    pub(crate) fn scene(&self) -> (&Phase, &Bitmap, i32, u32) {
        (
            &self.state.phase,
            &self.state.bitmap,
            self.state.scroll_x,
            self.state.dawn_step,
        )
    }

    fn tick(&mut self, at: Duration, out: &mut Vec<ShowEvent>) {
        match self.state.phase {
            Phase::Stargazing => {
                if at >= self.state.deadline {
                    self.enter_scroll(0, out);
                }
            }
            Phase::TickerScroll { line } => {
                self.state.scroll_x -= 1;
                if self.state.scroll_x <= -(self.state.bitmap.width() as i32) {
                    self.state.deadline = at + self.config.line_pause;
                    self.transition(Phase::LinePause { next_line: line + 1 }, out);
                }
            }
            Phase::LinePause { next_line } => {
                if at >= self.state.deadline {
                    self.enter_scroll(next_line, out);
                }
            }
            Phase::FinalScroll { stop_x, .. } => {
                self.state.scroll_x -= 1;
                if self.state.scroll_x <= stop_x {
                    // From here on only the final word stays on screen,
                    // held at the left edge of the band.
                    let word = self.final_word();
                    self.state.word = self.rasterizer.rasterize(&word);
                    self.state.bitmap = self.state.word.clone();
                    self.state.scroll_x = 0;
                    self.state.dawn_step = 0;
                    self.transition(Phase::Dawn, out);
                }
            }
            Phase::Dawn => {
                self.state.dawn_step += 1;
                if self.state.dawn_step >= self.config.dawn_steps {
                    self.seed_dissolve(out);
                }
            }
            Phase::Dissolve => {
                self.step_generation();
                self.run_dissolve_schedule(out);
                if !self.config.freeze_tempo_during_dissolve {
                    self.step_tempo(out);
                }
            }
            Phase::Cruise => {
                self.step_generation();
                self.heal_if_needed(out);
                self.step_tempo(out);
            }
        }
    }

    /// Delay to schedule before the next tick of the current phase.
    fn current_delay(&self) -> Duration {
        match self.state.phase {
            Phase::Stargazing | Phase::LinePause { .. } => self.config.star_refresh,
            Phase::TickerScroll { line } | Phase::FinalScroll { line, .. } => {
                self.config.scroll_delay(line)
            }
            Phase::Dawn => self.config.dawn_step_delay(),
            Phase::Dissolve | Phase::Cruise => self.circadian.current_delay(),
        }
    }

    fn enter_scroll(&mut self, line: usize, out: &mut Vec<ShowEvent>) {
        let Some(text) = self.config.ticker_lines.get(line) else {
            // Empty script: go straight to a random-soup cruise.
            self.state.grid =
                automaton::seed_random(self.config.size, self.config.initial_density, &mut self.rng);
            self.state.last_population = automaton::population(&self.state.grid);
            self.transition(Phase::Cruise, out);
            return;
        };

        self.state.bitmap = self.rasterizer.rasterize(text);
        self.state.scroll_x = self.config.size.cols() as i32;
        out.push(ShowEvent::LineScrollStarted { line });

        if line + 1 == self.config.ticker_lines.len() {
            let stop_x = self.final_stop_offset(text);
            self.transition(Phase::FinalScroll { line, stop_x }, out);
        } else {
            self.transition(Phase::TickerScroll { line }, out);
        }
    }

    /// Pixel offset at which the final line stops so its last word rests
    /// at the left edge of the band: the x position where every character
    /// before the word has scrolled off-screen.
    fn final_stop_offset(&self, text: &str) -> i32 {
        let word = text.split_whitespace().last().unwrap_or(text);
        let prefix_chars = text.chars().count().saturating_sub(word.chars().count());
        -((prefix_chars * self.rasterizer.cell_width()) as i32)
    }

    /// Last whitespace-separated word of the final ticker line.
    fn final_word(&self) -> String {
        self.config
            .ticker_lines
            .last()
            .map(|line| line.split_whitespace().last().unwrap_or(line).to_string())
            .unwrap_or_default()
    }

    fn seed_dissolve(&mut self, out: &mut Vec<ShowEvent>) {
        self.state.grid = automaton::rasterize(
            &self.state.word,
            self.config.size,
            0,
            self.band_top as i32,
        );
        self.state.generation = 0;
        self.state.stale = 0;
        self.state.overlay_index = 0;
        self.state.last_population = automaton::population(&self.state.grid);
        self.transition(Phase::Dissolve, out);
    }

    fn step_generation(&mut self) {
        self.state.grid = automaton::step(&self.state.grid);
        self.state.generation += 1;

        let population = automaton::population(&self.state.grid);
        if population == self.state.last_population {
            self.state.stale += 1;
        } else {
            self.state.stale = 0;
        }
        self.state.last_population = population;
    }

    fn run_dissolve_schedule(&mut self, out: &mut Vec<ShowEvent>) {
        let cues = &self.config.dissolve_cues;
        if let Some(cue) = cues.get(self.state.overlay_index) {
            if self.state.generation >= cue.generation() {
                automaton::overlay(&self.state.word, &mut self.state.grid, 0, cue.y_offset());
                out.push(ShowEvent::OverlayApplied {
                    cue: self.state.overlay_index,
                    y_offset: cue.y_offset(),
                    generation: self.state.generation,
                });
                self.state.overlay_index += 1;
                self.state.stale = 0;
            }
        } else if self.state.generation >= self.config.dissolve_total_generations {
            self.state.stale = 0;
            self.transition(Phase::Cruise, out);
        }
    }

    fn heal_if_needed(&mut self, out: &mut Vec<ShowEvent>) {
        let population = self.state.last_population;
        if self.state.stale >= self.config.stale_reset_generations || population == 0 {
            self.state.grid =
                automaton::seed_random(self.config.size, self.config.initial_density, &mut self.rng);
            self.state.stale = 0;
            out.push(ShowEvent::GridReseeded {
                generation: self.state.generation,
                population: automaton::population(&self.state.grid),
            });
        }
    }

    fn step_tempo(&mut self, out: &mut Vec<ShowEvent>) {
        if self.config.tempo_stride == 0 || self.state.generation % self.config.tempo_stride != 0 {
            return;
        }
        let before = self.circadian.index();
        let index = self.circadian.step(&mut self.rng);
        if index != before {
            out.push(ShowEvent::TempoShifted {
                index,
                delay: self.circadian.current_delay(),
            });
        }
    }

    fn transition(&mut self, phase: Phase, out: &mut Vec<ShowEvent>) {
        self.state.phase = phase;
        out.push(ShowEvent::PhaseEntered {
            phase: phase.kind(),
            generation: self.state.generation,
        });
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use life_matrix_core::{DissolveCue, GridSize};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Deterministic fixed-width fake font: every character is a solid
    /// 4x5 block with a one-pixel gap column.
    struct BlockyRasterizer;

    impl TextRasterizer for BlockyRasterizer {
        fn rasterize(&self, text: &str) -> Bitmap {
            let chars = text.chars().count();
            if chars == 0 {
                return Bitmap::empty();
            }
            let width = chars * self.cell_width();
            let rows: Vec<Vec<bool>> = (0..self.char_height())
                .map(|_| {
                    (0..width)
                        .map(|x| {
                            let column = x % self.cell_width();
                            let index = x / self.cell_width();
                            let glyph = text.chars().nth(index).unwrap_or(' ');
                            glyph != ' ' && column < 4
                        })
                        .collect()
                })
                .collect();
            Bitmap::from_rows(&rows)
        }

        fn char_height(&self) -> usize {
            5
        }

        fn cell_width(&self) -> usize {
            5
        }
    }

    fn test_config() -> ShowConfig {
        let mut config = ShowConfig::preview(5);
        config.ticker_lines = vec!["ab cd".to_string(), "no flaw".to_string()];
        config
    }

    pub(crate) fn director() -> Director<ChaCha8Rng> {
        Director::new(
            test_config(),
            Box::new(BlockyRasterizer),
            ChaCha8Rng::seed_from_u64(1),
        )
    }

    /// Drives the director tick by tick up to `limit` ticks, stopping as
    /// soon as the predicate observes a matching event.
    pub(crate) fn run_until(
        director: &mut Director<ChaCha8Rng>,
        limit: usize,
        mut matches: impl FnMut(&ShowEvent) -> bool,
    ) -> Vec<ShowEvent> {
        let mut log = Vec::new();
        for _ in 0..limit {
            let mut events = Vec::new();
            let target = director.next_tick_at();
            director.advance(target, &mut events);
            let hit = events.iter().any(&mut matches);
            log.extend(events);
            if hit {
                return log;
            }
        }
        panic!("event not observed within {limit} ticks; log: {log:?}");
    }

    #[test]
    fn show_opens_with_stargazing() {
        let director = director();
        assert_eq!(director.phase(), PhaseKind::Stargazing);
        assert_eq!(director.generation(), 0);
        assert_eq!(director.population(), 0);
    }

    #[test]
    fn stargazing_hands_over_to_the_first_scroll() {
        let mut director = director();
        let log = run_until(&mut director, 100, |event| {
            matches!(event, ShowEvent::LineScrollStarted { line: 0 })
        });
        assert_eq!(director.phase(), PhaseKind::TickerScroll);
        assert!(log.contains(&ShowEvent::PhaseEntered {
            phase: PhaseKind::TickerScroll,
            generation: 0,
        }));
    }

    #[test]
    fn final_line_scrolls_to_its_stop_offset_then_dawns() {
        let mut director = director();
        let _ = run_until(&mut director, 5_000, |event| {
            matches!(
                event,
                ShowEvent::PhaseEntered {
                    phase: PhaseKind::Dawn,
                    ..
                }
            )
        });
        // "no flaw" holds the word "flaw": three leading characters of
        // five pixels each must scroll past the left edge first.
        let (_, _, scroll_x, _) = director.scene();
        assert_eq!(scroll_x, 0);
        assert_eq!(director.phase(), PhaseKind::Dawn);
    }

    #[test]
    fn final_scroll_covers_the_frame_width_plus_the_prefix() {
        let mut director = director();
        let _ = run_until(&mut director, 5_000, |event| {
            matches!(event, ShowEvent::LineScrollStarted { line: 1 })
        });
        assert_eq!(director.phase(), PhaseKind::FinalScroll);

        let mut ticks = 0;
        while director.phase() == PhaseKind::FinalScroll {
            let mut events = Vec::new();
            director.advance(director.next_tick_at(), &mut events);
            ticks += 1;
            assert!(ticks < 1_000, "final scroll never ended");
        }
        // 64 columns to cross, plus the 15 pixels of "no " that must
        // scroll off before "flaw" rests at the left edge.
        assert_eq!(ticks, 64 + 15);
        assert_eq!(director.phase(), PhaseKind::Dawn);
    }

    #[test]
    fn dawn_seeds_the_dissolve_grid_from_the_word() {
        let mut director = director();
        let _ = run_until(&mut director, 10_000, |event| {
            matches!(
                event,
                ShowEvent::PhaseEntered {
                    phase: PhaseKind::Dissolve,
                    ..
                }
            )
        });
        assert_eq!(director.generation(), 0);
        // "flaw" rasterizes to 4 solid 4x5 glyphs.
        assert_eq!(director.population(), 4 * 4 * 5);
        let band_top = director.band_top();
        assert!(director.grid().get(band_top, 0));
    }

    #[test]
    fn consecutive_dissolve_cues_fire_on_consecutive_generations() {
        let mut config = test_config();
        config.dissolve_cues = vec![
            DissolveCue::new(4, 1),
            DissolveCue::new(7, 40),
            DissolveCue::new(9, 20),
            DissolveCue::new(10, 30),
        ];
        config.dissolve_total_generations = 12;
        let mut director = Director::new(
            config,
            Box::new(BlockyRasterizer),
            ChaCha8Rng::seed_from_u64(1),
        );

        let log = run_until(&mut director, 20_000, |event| {
            matches!(
                event,
                ShowEvent::PhaseEntered {
                    phase: PhaseKind::Cruise,
                    ..
                }
            )
        });

        let overlays: Vec<(usize, u64)> = log
            .iter()
            .filter_map(|event| match event {
                ShowEvent::OverlayApplied {
                    cue, generation, ..
                } => Some((*cue, *generation)),
                _ => None,
            })
            .collect();
        assert_eq!(overlays, vec![(0, 4), (1, 7), (2, 9), (3, 10)]);
    }

    #[test]
    fn dissolve_cues_fire_in_order_and_exactly_once() {
        let mut config = test_config();
        config.dissolve_cues = vec![DissolveCue::new(4, 1), DissolveCue::new(7, 40)];
        config.dissolve_total_generations = 10;
        let mut director = Director::new(
            config,
            Box::new(BlockyRasterizer),
            ChaCha8Rng::seed_from_u64(1),
        );

        let log = run_until(&mut director, 20_000, |event| {
            matches!(
                event,
                ShowEvent::PhaseEntered {
                    phase: PhaseKind::Cruise,
                    ..
                }
            )
        });

        let overlays: Vec<(usize, u64)> = log
            .iter()
            .filter_map(|event| match event {
                ShowEvent::OverlayApplied {
                    cue, generation, ..
                } => Some((*cue, *generation)),
                _ => None,
            })
            .collect();
        assert_eq!(overlays, vec![(0, 4), (1, 7)]);

        let cruise_entry = log.iter().find_map(|event| match event {
            ShowEvent::PhaseEntered {
                phase: PhaseKind::Cruise,
                generation,
            } => Some(*generation),
            _ => None,
        });
        assert_eq!(cruise_entry, Some(10));
    }

    #[test]
    fn tempo_walk_is_frozen_during_dissolve_by_default() {
        let mut director = director();
        let log = run_until(&mut director, 20_000, |event| {
            matches!(
                event,
                ShowEvent::PhaseEntered {
                    phase: PhaseKind::Cruise,
                    ..
                }
            )
        });
        assert!(log
            .iter()
            .all(|event| !matches!(event, ShowEvent::TempoShifted { .. })));
    }

    #[test]
    fn empty_script_falls_back_to_a_random_cruise() {
        let mut config = test_config();
        config.ticker_lines = Vec::new();
        let mut director = Director::new(
            config,
            Box::new(BlockyRasterizer),
            ChaCha8Rng::seed_from_u64(1),
        );
        let _ = run_until(&mut director, 200, |event| {
            matches!(
                event,
                ShowEvent::PhaseEntered {
                    phase: PhaseKind::Cruise,
                    ..
                }
            )
        });
        assert!(director.population() > 0);
    }

    #[test]
    fn cruising_constructor_starts_in_cruise() {
        let mut grid = Grid::new(GridSize::new(64, 64));
        grid.set(10, 10, true);
        grid.set(10, 11, true);
        grid.set(10, 12, true);
        let director = Director::cruising(
            test_config(),
            Box::new(BlockyRasterizer),
            ChaCha8Rng::seed_from_u64(1),
            grid,
        );
        assert_eq!(director.phase(), PhaseKind::Cruise);
        assert_eq!(director.population(), 3);
    }

    #[test]
    fn dead_grid_reseeds_on_the_next_cruise_tick() {
        let config = test_config();
        let mut director = Director::cruising(
            config,
            Box::new(BlockyRasterizer),
            ChaCha8Rng::seed_from_u64(1),
            Grid::new(GridSize::new(64, 64)),
        );
        let log = run_until(&mut director, 5, |event| {
            matches!(event, ShowEvent::GridReseeded { .. })
        });
        assert!(matches!(
            log.first(),
            Some(ShowEvent::GridReseeded { generation: 1, .. })
        ));
        assert!(director.population() > 0);
    }

    #[test]
    fn staleness_triggers_a_reseed_at_the_threshold() {
        let mut config = test_config();
        config.stale_reset_generations = 5;
        // A block is a still life: population never changes, so the
        // staleness counter climbs by one per generation.
        let mut grid = Grid::new(GridSize::new(64, 64));
        for (row, col) in [(5, 5), (5, 6), (6, 5), (6, 6)] {
            grid.set(row, col, true);
        }
        let mut director = Director::cruising(
            config,
            Box::new(BlockyRasterizer),
            ChaCha8Rng::seed_from_u64(1),
            grid,
        );

        let log = run_until(&mut director, 20, |event| {
            matches!(event, ShowEvent::GridReseeded { .. })
        });
        let reseed_generation = log.iter().find_map(|event| match event {
            ShowEvent::GridReseeded { generation, .. } => Some(*generation),
            _ => None,
        });
        // Population stays constant from the first step, so the counter
        // reaches the threshold of 5 on generation 5.
        assert_eq!(reseed_generation, Some(5));
    }

    #[test]
    fn changing_population_holds_off_the_stale_reseed() {
        let mut config = test_config();
        config.stale_reset_generations = 3;
        // A beacon's population alternates between 8 and 6 on every
        // generation, so the staleness counter resets each step and the
        // threshold is never reached.
        let mut grid = Grid::new(GridSize::new(64, 64));
        for (row, col) in [
            (5, 5),
            (5, 6),
            (6, 5),
            (6, 6),
            (7, 7),
            (7, 8),
            (8, 7),
            (8, 8),
        ] {
            grid.set(row, col, true);
        }
        let mut director = Director::cruising(
            config,
            Box::new(BlockyRasterizer),
            ChaCha8Rng::seed_from_u64(1),
            grid,
        );

        for _ in 0..40 {
            let mut events = Vec::new();
            director.advance(director.next_tick_at(), &mut events);
            assert!(events
                .iter()
                .all(|event| !matches!(event, ShowEvent::GridReseeded { .. })));
        }
        assert!(matches!(director.population(), 6 | 8));
    }
}
