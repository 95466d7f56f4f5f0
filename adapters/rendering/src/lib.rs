#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for the matrix display adapters.
//!
//! Backends present a [`Frame`] of pixels as a grid of square LEDs. The
//! show itself never talks to a backend directly; an adapter owns the
//! director and hands the backend a per-frame closure that fills the
//! frame and decides whether to keep running.

use anyhow::Result as AnyResult;
use life_matrix_core::{Frame, GridSize, Rgb};
use std::{error::Error, fmt, time::Duration};

/// Input snapshot gathered by a backend before each frame closure call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Whether the backend observed a quit request (window close, Escape
    /// or Q) since the previous frame.
    pub quit_requested: bool,
}

/// Decision returned by the frame closure after filling the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameDirective {
    /// Present the frame and call again.
    Continue,
    /// Present nothing further; the backend blanks the display and
    /// returns from its run loop.
    Exit,
}

/// Describes how a pixel grid should be presented on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Dimensions of the pixel grid being presented.
    pub grid: GridSize,
    /// Side length of one rendered pixel in screen units.
    pub pixel_size: f32,
    /// Gap between adjacent rendered pixels in screen units, imitating
    /// the dead space between physical LEDs.
    pub pixel_gap: f32,
    /// Solid color used to clear each frame behind the pixels.
    pub clear_color: Rgb,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    ///
    /// Returns an error when `pixel_size` is not positive or the gap is
    /// negative.
    pub fn new<T>(
        window_title: T,
        grid: GridSize,
        pixel_size: f32,
        pixel_gap: f32,
        clear_color: Rgb,
    ) -> Result<Self, RenderingError>
    where
        T: Into<String>,
    {
        if !(pixel_size > 0.0) {
            return Err(RenderingError::InvalidPixelSize { pixel_size });
        }
        if pixel_gap < 0.0 {
            return Err(RenderingError::InvalidPixelGap { pixel_gap });
        }

        Ok(Self {
            window_title: window_title.into(),
            grid,
            pixel_size,
            pixel_gap,
            clear_color,
        })
    }

    /// Screen-space stride from one pixel's origin to the next.
    #[must_use]
    pub fn pixel_stride(&self) -> f32 {
        self.pixel_size + self.pixel_gap
    }

    /// Total width of the presented grid in screen units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.grid.cols() as f32 * self.pixel_stride()
    }

    /// Total height of the presented grid in screen units.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.grid.rows() as f32 * self.pixel_stride()
    }
}

/// Rendering backend capable of presenting pixel frames.
pub trait RenderingBackend {
    /// Runs the backend until the frame closure requests an exit or the
    /// user closes the window.
    ///
    /// The closure receives the wall-time delta since the previous frame
    /// and the input snapshot, fills the frame, and returns whether to
    /// continue. The backend owns the frame buffer and presents it after
    /// every call.
    fn run<F>(self, presentation: Presentation, frame_fn: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Frame) -> FrameDirective + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Pixel size must be positive to give every LED visible area.
    InvalidPixelSize {
        /// Provided size that failed validation.
        pixel_size: f32,
    },
    /// Pixel gap may not be negative.
    InvalidPixelGap {
        /// Provided gap that failed validation.
        pixel_gap: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPixelSize { pixel_size } => {
                write!(f, "pixel_size must be positive (received {pixel_size})")
            }
            Self::InvalidPixelGap { pixel_gap } => {
                write!(f, "pixel_gap may not be negative (received {pixel_gap})")
            }
        }
    }
}

impl Error for RenderingError {}
