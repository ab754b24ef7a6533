// SPDX-License-Identifier: MIT
//! # Decoder
//!
//! Quadrant strokes → digits → number. Recognition is a pure function of the
//! image: when it fails, a better image is needed, not another attempt.

use image::{DynamicImage, GrayImage};
use log::{debug, warn};

use crate::encoder::Numeral;
use crate::error::{CodecError, RecognitionError};
use crate::extract::{extract_gray, ExtractOptions, Extraction, QuadrantStrokes};
use crate::table::{self, Role};

/// A successfully read numeral together with what was seen.
#[derive(Clone, Debug, PartialEq)]
pub struct Recognition {
    pub numeral: Numeral,
    pub extraction: Extraction,
}

impl Recognition {
    pub fn number(&self) -> u16 {
        self.numeral.value()
    }

    pub fn digits(&self) -> [(Role, u8); 4] {
        self.numeral.digits()
    }
}

/// Reverse-look-up each quadrant and combine the digits by place value.
///
/// # Errors
/// [`RecognitionError::UnknownGlyph`] naming the first quadrant, most
/// significant first, whose strokes are not a digit.
pub fn decode_strokes(strokes: &QuadrantStrokes) -> Result<Numeral, RecognitionError> {
    let mut digits = Vec::with_capacity(4);
    for (role, set) in strokes.iter() {
        let digit = table::digit_for(set)
            .ok_or(RecognitionError::UnknownGlyph { role, strokes: set })?;
        digits.push((role, digit));
    }
    Numeral::from_digits(digits).ok_or_else(|| RecognitionError::Unreadable {
        reason: "glyph table produced a digit above 9".to_string(),
    })
}

/// Read the numeral in a grayscale image.
pub fn recognize_gray(img: &GrayImage, opts: &ExtractOptions) -> Result<Recognition, RecognitionError> {
    let outcome = extract_gray(img, opts).and_then(|extraction| {
        let numeral = decode_strokes(&extraction.strokes)?;
        Ok(Recognition { numeral, extraction })
    });
    match &outcome {
        Ok(r) => debug!("recognized {}", r.number()),
        Err(e) => warn!("recognition failed: {}", e),
    }
    outcome
}

/// Read the numeral in any image, with default options.
pub fn recognize(image: &DynamicImage) -> Result<Recognition, CodecError> {
    Ok(recognize_gray(&image.to_luma8(), &ExtractOptions::default())?)
}

/// Read just the number in `image`.
pub fn decode(image: &DynamicImage) -> Result<u16, CodecError> {
    recognize(image).map(|r| r.number())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::render;
    use crate::table::{glyph, Stroke, StrokeSet};

    #[test]
    fn empty_quadrants_are_zero() {
        assert_eq!(decode_strokes(&QuadrantStrokes::default()).unwrap().value(), 0);
    }

    #[test]
    fn combines_by_place_value() {
        let strokes = QuadrantStrokes {
            units: glyph(4).unwrap(),
            tens: glyph(3).unwrap(),
            hundreds: glyph(2).unwrap(),
            thousands: glyph(1).unwrap(),
        };
        assert_eq!(decode_strokes(&strokes).unwrap().value(), 1234);
    }

    #[test]
    fn names_the_offending_quadrant() {
        let bad = StrokeSet::of(&[Stroke::FallingDiagonal, Stroke::RisingDiagonal]);
        let strokes = QuadrantStrokes {
            hundreds: bad,
            ..QuadrantStrokes::default()
        };
        let err = decode_strokes(&strokes).unwrap_err();
        assert_eq!(err, RecognitionError::UnknownGlyph { role: Role::Hundreds, strokes: bad });
        assert_eq!(err.role(), Some(Role::Hundreds));
        assert!(err.to_string().contains("bottom-right"));
    }

    #[test]
    fn decodes_rendered_image() {
        let img = DynamicImage::ImageLuma8(render(Numeral::new(4096).unwrap()));
        assert_eq!(decode(&img).unwrap(), 4096);
    }

    #[test]
    fn blank_image_is_a_recognition_error() {
        let img = DynamicImage::ImageLuma8(crate::raster::blank_canvas(300, 400));
        assert!(decode(&img).unwrap_err().is_recognition());
    }
}
