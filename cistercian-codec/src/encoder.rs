// SPDX-License-Identifier: MIT
//! # Encoder
//!
//! Number → digits → strokes → pixels.
//!
//! Every numeral is drawn on the same fixed canvas through the canonical
//! [`Frame`], so a given value always produces byte-identical pixels.

use std::str::FromStr;

use image::GrayImage;
use log::debug;

use crate::error::{CodecError, RangeError};
use crate::geometry::{Frame, Segment, CANVAS_HEIGHT, CANVAS_WIDTH, STROKE_WIDTH};
use crate::raster::{blank_canvas, draw_line, INK};
use crate::table::{self, Role};

/// Largest value a single numeral can carry.
pub const MAX_VALUE: u16 = 9999;

/// A value in `0..=9999`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Numeral(u16);

impl Numeral {
    pub fn new(value: i64) -> Result<Self, RangeError> {
        if (0..=i64::from(MAX_VALUE)).contains(&value) {
            Ok(Numeral(value as u16))
        } else {
            Err(RangeError::OutOfRange(value))
        }
    }

    /// Rebuild a numeral from at most one digit per role; missing roles are 0.
    ///
    /// Returns `None` if any digit exceeds 9 or a role appears twice.
    pub fn from_digits(digits: impl IntoIterator<Item = (Role, u8)>) -> Option<Self> {
        let mut seen = [false; 4];
        let mut value = 0u16;
        for (role, digit) in digits {
            if digit > 9 || std::mem::replace(&mut seen[role as usize], true) {
                return None;
            }
            value = value.checked_add(u16::from(digit) * role.place_value())?;
        }
        (value <= MAX_VALUE).then_some(Numeral(value))
    }

    pub fn value(self) -> u16 {
        self.0
    }

    pub fn digit(self, role: Role) -> u8 {
        role.digit_of(self.0)
    }

    /// Digits most significant first.
    pub fn digits(self) -> [(Role, u8); 4] {
        Role::ALL.map(|role| (role, self.digit(role)))
    }

    /// Strokes of every nonzero digit, placed on `frame`.
    ///
    /// Ordered thousands → units, and by primitive within a role.
    pub fn segments(self, frame: &Frame) -> Vec<Segment> {
        let mut out = Vec::new();
        for (role, digit) in self.digits() {
            let Some(glyph) = table::glyph(digit) else { continue };
            out.extend(glyph.iter().map(|stroke| frame.segment(role, stroke)));
        }
        out
    }
}

impl FromStr for Numeral {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| RangeError::NotNumeric(s.to_string()))?;
        Numeral::new(value)
    }
}

impl TryFrom<i64> for Numeral {
    type Error = RangeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Numeral::new(value)
    }
}

/// Output of [`encode`].
#[derive(Clone, Debug)]
pub struct Rendering {
    pub numeral: Numeral,
    pub image: GrayImage,
    /// Drawn strokes, when requested. The stave is not listed; see [`Frame::stave`].
    pub segments: Option<Vec<Segment>>,
}

/// Draw `numeral` onto a fresh canonical canvas.
pub fn render(numeral: Numeral) -> GrayImage {
    let frame = Frame::canonical();
    let mut img = blank_canvas(CANVAS_WIDTH, CANVAS_HEIGHT);

    let (top, bottom) = frame.stave();
    draw_line(&mut img, top, bottom, STROKE_WIDTH, INK);
    for seg in numeral.segments(&frame) {
        draw_line(&mut img, seg.start, seg.end, STROKE_WIDTH, INK);
    }
    img
}

/// Encode `number` as a Cistercian numeral image.
///
/// With `include_segments`, the drawn strokes are returned as geometry as well.
///
/// # Errors
/// [`RangeError`] when `number` is outside `0..=9999`.
pub fn encode(number: i64, include_segments: bool) -> Result<Rendering, CodecError> {
    let numeral = Numeral::new(number)?;
    let image = render(numeral);
    let segments = numeral.segments(&Frame::canonical());
    debug!("encoded {} with {} strokes", numeral.value(), segments.len());
    Ok(Rendering {
        numeral,
        image,
        segments: include_segments.then_some(segments),
    })
}
