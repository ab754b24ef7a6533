// SPDX-License-Identifier: MIT
// Hard-edged line rasterizer for grayscale canvases.
// No anti-aliasing: every pixel is either paper or ink, so output is exactly reproducible.

use image::{GrayImage, Luma};

use crate::geometry::Point;

/// Background value of a fresh canvas.
pub const PAPER: u8 = 255;
/// Value of drawn lines.
pub const INK: u8 = 0;

/// A canvas filled with [`PAPER`].
pub fn blank_canvas(width: u32, height: u32) -> GrayImage {
    GrayImage::from_pixel(width, height, Luma([PAPER]))
}

/// Draw a straight line of `width` pixels with round caps.
///
/// Every pixel whose center lies within `width / 2` of the segment is set to `ink`.
/// Parts outside the canvas are clipped.
pub fn draw_line(img: &mut GrayImage, a: Point, b: Point, width: f32, ink: u8) {
    let half = width / 2.0;
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return;
    }

    let x_min = (a.x.min(b.x) - half).floor().max(0.0) as u32;
    let y_min = (a.y.min(b.y) - half).floor().max(0.0) as u32;
    let x_max = (a.x.max(b.x) + half).ceil().min((w - 1) as f32);
    let y_max = (a.y.max(b.y) + half).ceil().min((h - 1) as f32);
    if x_max < 0.0 || y_max < 0.0 {
        return;
    }
    let (x_max, y_max) = (x_max as u32, y_max as u32);

    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;

    for py in y_min..=y_max {
        for px in x_min..=x_max {
            let fx = px as f32;
            let fy = py as f32;
            // Project onto the segment; a degenerate segment is a dot.
            let t = if len_sq > 0.0 {
                (((fx - a.x) * dx + (fy - a.y) * dy) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let cx = a.x + t * dx;
            let cy = a.y + t * dy;
            let dist_sq = (fx - cx) * (fx - cx) + (fy - cy) * (fy - cy);
            if dist_sq <= half * half {
                img.put_pixel(px, py, Luma([ink]));
            }
        }
    }
}
