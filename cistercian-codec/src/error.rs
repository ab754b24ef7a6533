// SPDX-License-Identifier: MIT
//! Codec errors.
//!
//! There are exactly two kinds: the number handed to the encoder is not a
//! value in `0..=9999` ([`RangeError`]), or an image could not be read as a
//! numeral ([`RecognitionError`]). Neither is worth retrying with the same
//! input; both operations are deterministic.

use std::fmt;

use crate::table::{Role, StrokeSet};

/// The encoder was asked for something that is not a numeral value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// Integer outside `0..=9999`.
    OutOfRange(i64),
    /// Text that does not parse as an integer.
    NotNumeric(String),
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeError::OutOfRange(v) => write!(f, "Number must be between 0 and 9999, got {}", v),
            RangeError::NotNumeric(s) => write!(f, "Invalid number format: {:?}", s),
        }
    }
}

impl std::error::Error for RangeError {}

/// An image could not be read as a Cistercian numeral.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionError {
    /// The image is (nearly) a single flat tone.
    NoContrast,
    /// The pixels could not be brought into a usable working form.
    Unreadable { reason: String },
    /// No vertical line qualifies as the stave.
    StaveNotFound { reason: String },
    /// Strokes in one quadrant do not form any digit.
    UnknownGlyph { role: Role, strokes: StrokeSet },
    /// Ink in one quadrant lies away from every stroke that was found there.
    UnexplainedInk { role: Role, pixels: usize },
}

impl RecognitionError {
    /// Quadrant the failure is attributed to, when there is one.
    pub fn role(&self) -> Option<Role> {
        match self {
            RecognitionError::UnknownGlyph { role, .. }
            | RecognitionError::UnexplainedInk { role, .. } => Some(*role),
            _ => None,
        }
    }
}

impl fmt::Display for RecognitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecognitionError::NoContrast => write!(f, "Image has no ink: nothing to recognize"),
            RecognitionError::Unreadable { reason } => write!(f, "Image could not be prepared: {}", reason),
            RecognitionError::StaveNotFound { reason } => write!(f, "No stave found: {}", reason),
            RecognitionError::UnknownGlyph { role, strokes } => write!(
                f,
                "Strokes {} in the {} quadrant ({}) do not form a digit",
                strokes,
                role.quadrant_name(),
                role
            ),
            RecognitionError::UnexplainedInk { role, pixels } => write!(
                f,
                "{} ink pixels in the {} quadrant ({}) match no known stroke",
                pixels,
                role.quadrant_name(),
                role
            ),
        }
    }
}

impl std::error::Error for RecognitionError {}

/// Either codec failure.
#[derive(Debug, Clone, PartialEq)]
pub enum CodecError {
    Range(RangeError),
    Recognition(RecognitionError),
}

impl CodecError {
    pub fn is_range(&self) -> bool {
        matches!(self, CodecError::Range(_))
    }

    pub fn is_recognition(&self) -> bool {
        matches!(self, CodecError::Recognition(_))
    }
}

impl From<RangeError> for CodecError {
    fn from(e: RangeError) -> Self {
        Self::Range(e)
    }
}

impl From<RecognitionError> for CodecError {
    fn from(e: RecognitionError) -> Self {
        Self::Recognition(e)
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Range(e) => write!(f, "Range error: {}", e),
            CodecError::Recognition(e) => write!(f, "Recognition error: {}", e),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodecError::Range(e) => Some(e),
            CodecError::Recognition(e) => Some(e),
        }
    }
}
