//! Frame composition: paints the director's current visual state.
//!
//! Composition is read-only over the director. The night phases share
//! one painter that layers background, stars, and the text band; stars
//! are clipped behind text so a scrolling glyph occludes rather than
//! blends. The daylight phases paint the grid directly.

use std::collections::HashSet;
use std::time::Duration;

use life_matrix_core::{Bitmap, Frame, Rgb};
use rand::Rng;

use crate::{Director, Phase};

/// Stars dimmer than this are not drawn at all; matches the cutoff the
/// LED hardware needed to avoid single-step flicker near zero.
const STAR_FLOOR: f32 = 0.05;

pub(crate) fn compose<R: Rng>(director: &Director<R>, now: Duration, frame: &mut Frame) {
    let config = director.config();
    let (phase, bitmap, scroll_x, dawn_step) = director.scene();
    match *phase {
        Phase::Stargazing | Phase::LinePause { .. } => {
            night_frame(director, now, frame, None, 0, config.night_color, 1.0);
        }
        Phase::TickerScroll { .. } | Phase::FinalScroll { .. } => {
            night_frame(
                director,
                now,
                frame,
                Some(bitmap),
                scroll_x,
                config.night_color,
                1.0,
            );
        }
        Phase::Dawn => {
            let t = if config.dawn_steps == 0 {
                1.0
            } else {
                dawn_step as f32 / config.dawn_steps as f32
            };
            let background = config.night_color.lerp(config.sea_color, t);
            night_frame(director, now, frame, Some(bitmap), 0, background, 1.0 - t);
        }
        Phase::Dissolve | Phase::Cruise => {
            frame.fill(config.sea_color);
            let size = config.size;
            for row in 0..size.rows() {
                for col in 0..size.cols() {
                    if director.grid().get(row, col) {
                        frame.set_pixel(row, col, config.alive_color);
                    }
                }
            }
        }
    }
}

/// Paints one night frame: background fill, twinkling stars scaled by
/// `star_level`, and the optional text bitmap at `scroll_x` within the
/// reserved band.
fn night_frame<R: Rng>(
    director: &Director<R>,
    now: Duration,
    frame: &mut Frame,
    text: Option<&Bitmap>,
    scroll_x: i32,
    background: Rgb,
    star_level: f32,
) {
    let config = director.config();
    frame.fill(background);

    let text_pixels = text.map_or_else(HashSet::new, |bitmap| {
        visible_text_pixels(bitmap, scroll_x, director.band_top(), config.size.cols())
    });

    if star_level > 0.01 {
        let starfield = director.starfield();
        for star in starfield.stars() {
            let brightness = starfield.brightness(star, now) * star_level;
            if brightness > STAR_FLOOR && !text_pixels.contains(&(star.row(), star.col())) {
                frame.set_pixel(
                    star.row(),
                    star.col(),
                    background.lerp(config.star_color, brightness),
                );
            }
        }
    }

    for &(row, col) in &text_pixels {
        frame.set_pixel(row, col, config.alive_color);
    }
}

/// On-screen `(row, col)` positions of the bitmap's set pixels once the
/// bitmap is placed at column `scroll_x` within the text band. Pixels
/// scrolled past either edge are dropped.
fn visible_text_pixels(
    bitmap: &Bitmap,
    scroll_x: i32,
    band_top: usize,
    cols: usize,
) -> HashSet<(usize, usize)> {
    let mut pixels = HashSet::new();
    for y in 0..bitmap.height() {
        for x in 0..bitmap.width() {
            if !bitmap.get(x, y) {
                continue;
            }
            let col = scroll_x + x as i32;
            if col < 0 || col >= cols as i32 {
                continue;
            }
            let _ = pixels.insert((band_top + y, col as usize));
        }
    }
    pixels
}
