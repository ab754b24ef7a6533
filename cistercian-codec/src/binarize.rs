// SPDX-License-Identifier: MIT
//! # Binarization
//!
//! Grayscale → ink mask. Three steps:
//!
//! 1. **Otsu threshold** over the luma histogram splits pixels into two classes.
//! 2. **Polarity**: the smaller class is ink, so light-on-dark photos work too.
//! 3. **Speckle removal**: ink pixels with fewer than two ink neighbours are
//!    dropped. Strokes are several pixels wide and survive; sensor noise and
//!    JPEG crumbs do not.

use image::GrayImage;
use log::debug;

use crate::error::RecognitionError;

/// Minimum spread between darkest and lightest pixel for an image to carry ink.
pub const MIN_CONTRAST: u8 = 48;

const MIN_INK_NEIGHBOURS: u8 = 2;

/// Boolean ink map of an image.
#[derive(Clone, Debug)]
pub struct InkMask {
    width: u32,
    height: u32,
    ink: Vec<bool>,
}

impl InkMask {
    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> bool) -> Self {
        let mut ink = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                ink.push(f(x, y));
            }
        }
        Self { width, height, ink }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Ink at `(x, y)`; anything off the image is paper.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.ink[(y as usize) * (self.width as usize) + x as usize]
    }

    pub fn ink_count(&self) -> usize {
        self.ink.iter().filter(|i| **i).count()
    }

    /// First and last rows containing ink.
    pub fn ink_rows(&self) -> Option<(u32, u32)> {
        let w = self.width as usize;
        if w == 0 {
            return None;
        }
        let mut rows = self
            .ink
            .chunks_exact(w)
            .enumerate()
            .filter(|(_, row)| row.iter().any(|i| *i))
            .map(|(y, _)| y as u32);
        let first = rows.next()?;
        let last = rows.last().unwrap_or(first);
        Some((first, last))
    }

    /// Coordinates of every ink pixel, row by row.
    pub fn ink_pixels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let w = self.width.max(1) as usize;
        self.ink
            .iter()
            .enumerate()
            .filter(|(_, ink)| **ink)
            .map(move |(i, _)| ((i % w) as u32, (i / w) as u32))
    }

    /// Whether any ink lies within `radius` of `(cx, cy)`.
    pub fn any_within(&self, cx: i32, cy: i32, radius: f32) -> bool {
        let r = radius.ceil() as i32;
        let r_sq = radius * radius;
        for dy in -r..=r {
            for dx in -r..=r {
                if (dx * dx + dy * dy) as f32 <= r_sq && self.get(cx + dx, cy + dy) {
                    return true;
                }
            }
        }
        false
    }

    fn neighbours(&self, x: i32, y: i32) -> u8 {
        let mut n = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if (dx != 0 || dy != 0) && self.get(x + dx, y + dy) {
                    n += 1;
                }
            }
        }
        n
    }
}

/// Otsu's threshold: the level maximizing between-class variance.
///
/// Pixels `<= threshold` form the dark class.
pub fn otsu_threshold(hist: &[u32; 256]) -> u8 {
    let total: f64 = hist.iter().map(|&c| c as f64).sum();
    let sum_all: f64 = hist.iter().enumerate().map(|(i, &c)| i as f64 * c as f64).sum();

    let mut best_threshold = 0u8;
    let mut best_variance = 0.0f64;
    let mut weight_bg = 0.0f64;
    let mut sum_bg = 0.0f64;

    for (t, &count) in hist.iter().enumerate() {
        weight_bg += count as f64;
        if weight_bg == 0.0 {
            continue;
        }
        let weight_fg = total - weight_bg;
        if weight_fg == 0.0 {
            break;
        }

        sum_bg += t as f64 * count as f64;
        let mean_bg = sum_bg / weight_bg;
        let mean_fg = (sum_all - sum_bg) / weight_fg;

        let between = weight_bg * weight_fg * (mean_bg - mean_fg) * (mean_bg - mean_fg);
        if between > best_variance {
            best_variance = between;
            best_threshold = t as u8;
        }
    }

    best_threshold
}

fn histogram(img: &GrayImage) -> [u32; 256] {
    let mut hist = [0u32; 256];
    for p in img.as_raw() {
        hist[*p as usize] += 1;
    }
    hist
}

/// Build the ink mask of `img`.
///
/// # Errors
/// [`RecognitionError::NoContrast`] for flat images: blank canvases, solid fills,
/// or anything whose tones span less than [`MIN_CONTRAST`].
pub fn binarize(img: &GrayImage) -> Result<InkMask, RecognitionError> {
    let hist = histogram(img);
    let darkest = hist.iter().position(|&c| c > 0);
    let lightest = hist.iter().rposition(|&c| c > 0);
    let (Some(darkest), Some(lightest)) = (darkest, lightest) else {
        return Err(RecognitionError::NoContrast);
    };
    if lightest - darkest < MIN_CONTRAST as usize {
        return Err(RecognitionError::NoContrast);
    }

    let threshold = otsu_threshold(&hist);
    let dark: u64 = hist[..=threshold as usize].iter().map(|&c| u64::from(c)).sum();
    let total = u64::from(img.width()) * u64::from(img.height());
    let dark_is_ink = dark * 2 <= total;
    debug!(
        "binarize: {}x{} threshold={} dark={} ink={}",
        img.width(),
        img.height(),
        threshold,
        dark,
        if dark_is_ink { "dark" } else { "light" }
    );

    let raw = InkMask::from_fn(img.width(), img.height(), |x, y| {
        let v = img.get_pixel(x, y).0[0];
        (v <= threshold) == dark_is_ink
    });
    let cleaned = InkMask::from_fn(raw.width, raw.height, |x, y| {
        raw.get(x as i32, y as i32) && raw.neighbours(x as i32, y as i32) >= MIN_INK_NEIGHBOURS
    });
    if cleaned.ink_count() == 0 {
        return Err(RecognitionError::NoContrast);
    }
    Ok(cleaned)
}
