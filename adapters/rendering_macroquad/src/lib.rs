#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for the matrix display.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without
//! its default `audio` feature.
//!
//! Each logical pixel is drawn as a filled square with a small gap, so
//! the window reads like the physical LED panel the show targets. The
//! backend blanks the display before returning, matching the panel's
//! shutdown behaviour.

use anyhow::Result;
use life_matrix_core::{Frame, Rgb};
use macroquad::input::{is_key_pressed, KeyCode};
use std::time::Duration;

use life_matrix_rendering::{
    FrameDirective, FrameInput, Presentation, RenderingBackend,
};

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the show loop.
    quit_requested: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let quit_requested = is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q);
        Self { quit_requested }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the
    /// display refresh rate or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records one frame and returns the rate once a full second has passed.
    fn record_frame(&mut self, dt: Duration) -> Option<f64> {
        self.elapsed += dt;
        self.frames += 1;
        if self.elapsed < Duration::from_secs(1) {
            return None;
        }
        let per_second = self.frames as f64 / self.elapsed.as_secs_f64();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut frame_fn: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Frame) -> FrameDirective + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let window_width = presentation.width().ceil() as i32;
        let window_height = presentation.height().ceil() as i32;
        let mut config = macroquad::window::Conf {
            window_title: presentation.window_title.clone(),
            window_width,
            window_height,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let background = to_macroquad_color(presentation.clear_color);
            let mut frame = Frame::new(presentation.grid, presentation.clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                let frame_input = FrameInput {
                    quit_requested: keyboard.quit_requested,
                };

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let directive = frame_fn(frame_dt, frame_input, &mut frame);
                if directive == FrameDirective::Exit {
                    // Leave the panel dark, like the installation does on
                    // shutdown.
                    macroquad::window::clear_background(macroquad::color::BLACK);
                    macroquad::window::next_frame().await;
                    break;
                }

                macroquad::window::clear_background(background);
                draw_pixels(&presentation, &frame);

                if show_fps {
                    if let Some(per_second) = fps_counter.record_frame(frame_dt) {
                        println!("FPS: {per_second:.2}");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Draws every frame pixel as a filled square, scaled so the whole grid
/// fits the current window and centered within it.
fn draw_pixels(presentation: &Presentation, frame: &Frame) {
    let screen_width = macroquad::window::screen_width();
    let screen_height = macroquad::window::screen_height();
    let world_width = presentation.width();
    let world_height = presentation.height();
    let scale = if world_width == 0.0 || world_height == 0.0 {
        1.0
    } else {
        (screen_width / world_width).min(screen_height / world_height)
    };
    let offset_x = (screen_width - world_width * scale) * 0.5;
    let offset_y = (screen_height - world_height * scale) * 0.5;
    let stride = presentation.pixel_stride() * scale;
    let side = presentation.pixel_size * scale;

    let size = presentation.grid;
    for row in 0..size.rows() {
        for col in 0..size.cols() {
            let Some(color) = frame.pixel(row, col) else {
                continue;
            };
            macroquad::shapes::draw_rectangle(
                offset_x + col as f32 * stride,
                offset_y + row as f32 * stride,
                side,
                side,
                to_macroquad_color(color),
            );
        }
    }
}

fn to_macroquad_color(color: Rgb) -> macroquad::color::Color {
    macroquad::color::Color::new(
        color.red() as f32 / 255.0,
        color.green() as f32 / 255.0,
        color.blue() as f32 / 255.0,
        1.0,
    )
}

#[cfg(test)]
mod tests {
    use super::to_macroquad_color;
    use life_matrix_core::Rgb;

    #[test]
    fn colors_convert_to_unit_range_channels() {
        let color = to_macroquad_color(Rgb::new(255, 0, 128));
        assert_eq!(color.r, 1.0);
        assert_eq!(color.g, 0.0);
        assert!((color.b - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(color.a, 1.0);
    }
}
