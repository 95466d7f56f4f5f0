#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the matrix show.
//!
//! Picks a preset, layers optional TOML overrides on top, seeds the
//! random source, and hands the director to the macroquad backend. The
//! `--pattern` flag skips the scripted show and drops straight into
//! cruise with a named pattern from the catalog.

mod font;
mod options;

use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use life_matrix_core::{ShowConfig, ShowEvent, TextRasterizer};
use life_matrix_director::Director;
use life_matrix_rendering::{FrameDirective, Presentation, RenderingBackend};
use life_matrix_rendering_macroquad::MacroquadBackend;
use life_matrix_system_patterns as patterns;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::font::BlockFont;
use crate::options::ShowOptions;

/// Named configuration presets matching the deployed variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Preset {
    /// Bench build: 80 BPM heartbeat, five-phase dissolve.
    Preview,
    /// Panel build: eight-phase dissolve.
    Matrix,
    /// 50 BPM build: plain dissolve, tempo walk never freezes.
    Athletic,
}

impl Preset {
    fn config(self, char_height: usize) -> ShowConfig {
        match self {
            Preset::Preview => ShowConfig::preview(char_height),
            Preset::Matrix => ShowConfig::matrix(char_height),
            Preset::Athletic => ShowConfig::athletic(char_height),
        }
    }
}

/// Game-of-life show for a 64x64 LED matrix.
#[derive(Debug, Parser)]
#[command(name = "life-matrix", version)]
struct Args {
    /// Configuration preset to run.
    #[arg(long, value_enum, default_value_t = Preset::Preview)]
    preset: Preset,

    /// Seed for the random source; a random seed is drawn when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Skip the scripted show and cruise from this catalog pattern.
    #[arg(long)]
    pattern: Option<String>,

    /// Print the pattern catalog and exit.
    #[arg(long)]
    list_patterns: bool,

    /// TOML file with preset overrides.
    #[arg(long)]
    options: Option<PathBuf>,

    /// Side length of one rendered pixel in screen units.
    #[arg(long, default_value_t = 10.0)]
    pixel_size: f32,

    /// Gap between rendered pixels in screen units.
    #[arg(long, default_value_t = 1.0)]
    pixel_gap: f32,

    /// Print frame timing metrics once per second.
    #[arg(long)]
    show_fps: bool,

    /// Render as fast as possible instead of syncing to the display.
    #[arg(long)]
    no_vsync: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.list_patterns {
        for pattern in patterns::catalog() {
            println!("{:<16} {:?}", pattern.name(), pattern.kind());
        }
        return Ok(());
    }

    let font = BlockFont;
    let mut config = args.preset.config(font.char_height());
    if let Some(path) = &args.options {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read options file {}", path.display()))?;
        let overrides: ShowOptions = toml::from_str(&text)
            .with_context(|| format!("failed to parse options file {}", path.display()))?;
        overrides.apply(&mut config);
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    println!("seed: {seed}");
    let rng = ChaCha8Rng::seed_from_u64(seed);

    let mut director = match &args.pattern {
        Some(name) => {
            let grid = patterns::seed(name, config.size)?;
            Director::cruising(config.clone(), Box::new(font), rng, grid)
        }
        None => Director::new(config.clone(), Box::new(font), rng),
    };

    let presentation = Presentation::new(
        "Life Matrix",
        config.size,
        args.pixel_size,
        args.pixel_gap,
        config.night_color,
    )?;

    let backend = MacroquadBackend::new()
        .with_vsync(!args.no_vsync)
        .with_show_fps(args.show_fps);

    let (summary_sender, summary_receiver) = mpsc::channel::<(u64, usize)>();
    let mut elapsed = Duration::ZERO;

    backend.run(presentation, move |dt, input, frame| {
        if input.quit_requested {
            let _ = summary_sender.send((director.generation(), director.population()));
            return FrameDirective::Exit;
        }

        elapsed += dt;
        let mut events = Vec::new();
        director.advance(elapsed, &mut events);
        for event in &events {
            report(event);
        }
        director.compose(elapsed, frame);
        FrameDirective::Continue
    })?;

    if let Ok((generation, population)) = summary_receiver.recv() {
        println!("stopped at generation {generation} with population {population}");
    }

    Ok(())
}

/// One log line per broadcast event.
fn report(event: &ShowEvent) {
    match event {
        ShowEvent::PhaseEntered { phase, generation } => {
            println!("phase {phase:?} (generation {generation})");
        }
        ShowEvent::LineScrollStarted { line } => {
            println!("scrolling line {line}");
        }
        ShowEvent::OverlayApplied {
            cue,
            y_offset,
            generation,
        } => {
            println!("overlay {cue} at y {y_offset} (generation {generation})");
        }
        ShowEvent::GridReseeded {
            generation,
            population,
        } => {
            println!("reseeded at generation {generation} with population {population}");
        }
        ShowEvent::TempoShifted { index, delay } => {
            println!("tempo index {index} ({} ms)", delay.as_millis());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arguments_parse_with_defaults() {
        let args = Args::parse_from(["life-matrix"]);
        assert_eq!(args.preset, Preset::Preview);
        assert!(args.seed.is_none());
        assert!(!args.list_patterns);
        assert_eq!(args.pixel_size, 10.0);
    }

    #[test]
    fn preset_and_pattern_flags_parse() {
        let args = Args::parse_from([
            "life-matrix",
            "--preset",
            "athletic",
            "--pattern",
            "glider",
            "--seed",
            "7",
        ]);
        assert_eq!(args.preset, Preset::Athletic);
        assert_eq!(args.pattern.as_deref(), Some("glider"));
        assert_eq!(args.seed, Some(7));
    }
}
