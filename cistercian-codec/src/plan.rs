// SPDX-License-Identifier: MIT
//! # Working-Size Plan
//!
//! Caller images come in any size. Recognition only needs enough resolution to
//! resolve strokes, so large inputs are shrunk before analysis: the longest side
//! is clamped to a maximum and the other side follows proportionally.
//!
//! - No upscaling: images already within bounds are analysed as-is
//! - Clamp to minimum 1px to prevent division by zero

/// Represents a 2D size with width and height in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

/// Input and output dimensions of one resampling step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScalePlan {
    /// Original input dimensions
    pub input: Size,
    /// Final computed output dimensions
    pub out: Size,
}

impl ScalePlan {
    /// True when the plan actually changes the image.
    pub fn resizes(&self) -> bool {
        self.input != self.out
    }

    /// Output width over input width.
    pub fn factor(&self) -> f32 {
        self.out.w as f32 / self.input.w.max(1) as f32
    }
}

/// Plan a shrink of `input` so its longest side is at most `max_long`.
pub fn build_plan(input: Size, max_long: u32) -> ScalePlan {
    let (w, h) = fit_preserve(input, max_long);
    ScalePlan {
        input,
        out: Size { w, h },
    }
}

/// Fit image within max_side constraint while preserving aspect ratio.
/// Returns (width, height) that fit within max_side on longest dimension.
///
/// Never upscales - returns original dimensions if already smaller than max_side.
fn fit_preserve(input: Size, max_long: u32) -> (u32, u32) {
    let (w, h) = (input.w as f64, input.h as f64);
    let long = w.max(h).max(1.0);
    let s = (max_long as f64 / long).min(1.0); // don't upscale
    (
        ((w * s).round() as u32).max(1),
        ((h * s).round() as u32).max(1),
    )
}
