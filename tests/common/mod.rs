//! Shared helpers for the integration tests: rendering numerals and
//! degrading them the way scans and photos do.

#![allow(dead_code)]

use cistercian::codec::encode;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma};

/// Canonical rendering of `n`.
pub fn rendered(n: i64) -> GrayImage {
    encode(n, false).expect("in range").image
}

/// Small deterministic generator so failures reproduce.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed.wrapping_mul(6364136223846793005).wrapping_add(1))
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    /// Uniform in `-amplitude..=amplitude`.
    pub fn jitter(&mut self, amplitude: i32) -> i32 {
        (self.next_u32() % (2 * amplitude as u32 + 1)) as i32 - amplitude
    }
}

/// Add uniform luminance noise of at most `amplitude` to every pixel.
pub fn with_noise(img: &GrayImage, amplitude: i32, seed: u64) -> GrayImage {
    let mut rng = Lcg::new(seed);
    let mut out = img.clone();
    for p in out.pixels_mut() {
        let v = i32::from(p.0[0]) + rng.jitter(amplitude);
        p.0[0] = v.clamp(0, 255) as u8;
    }
    out
}

/// Flip `count` isolated pixels to the opposite tone.
pub fn with_speckles(img: &GrayImage, count: usize, seed: u64) -> GrayImage {
    let mut rng = Lcg::new(seed);
    let mut out = img.clone();
    let (w, h) = out.dimensions();
    for _ in 0..count {
        let x = rng.next_u32() % w;
        let y = rng.next_u32() % h;
        let v = out.get_pixel(x, y).0[0];
        out.put_pixel(x, y, Luma([255 - v]));
    }
    out
}

/// Light ink on dark paper.
pub fn inverted(img: &GrayImage) -> GrayImage {
    let mut out = img.clone();
    imageops::invert(&mut out);
    out
}

/// Resize by `factor` with bilinear filtering.
pub fn scaled(img: &GrayImage, factor: f32) -> GrayImage {
    let w = (img.width() as f32 * factor).round() as u32;
    let h = (img.height() as f32 * factor).round() as u32;
    imageops::resize(img, w, h, FilterType::Triangle)
}

/// Resize to exactly `width` x `height` with bilinear filtering.
pub fn stretched(img: &GrayImage, width: u32, height: u32) -> GrayImage {
    imageops::resize(img, width, height, FilterType::Triangle)
}

/// Rotate clockwise by `degrees` about the centre, nearest neighbour, filling
/// with paper.
pub fn rotated(img: &GrayImage, degrees: f32) -> GrayImage {
    let (w, h) = img.dimensions();
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (cx, cy) = ((w as f32 - 1.0) / 2.0, (h as f32 - 1.0) / 2.0);
    GrayImage::from_fn(w, h, |x, y| {
        let (dx, dy) = (x as f32 - cx, y as f32 - cy);
        let sx = (cx + cos * dx + sin * dy).round();
        let sy = (cy - sin * dx + cos * dy).round();
        if sx >= 0.0 && sy >= 0.0 && sx < w as f32 && sy < h as f32 {
            *img.get_pixel(sx as u32, sy as u32)
        } else {
            Luma([255])
        }
    })
}

/// Place `img` on a larger paper-coloured canvas at `(x, y)`.
pub fn padded(img: &GrayImage, width: u32, height: u32, x: i64, y: i64) -> GrayImage {
    let mut out = GrayImage::from_pixel(width, height, Luma([255]));
    imageops::overlay(&mut out, img, x, y);
    out
}

pub fn dynamic(img: GrayImage) -> DynamicImage {
    DynamicImage::ImageLuma8(img)
}
