//! JSON reports returned by [`crate::render`] and the `recognize_*` functions.
//!
//! Segment maps group strokes by role, with the stave listed as `stem`:
//!
//! ```json
//! { "stem": { "type": "vertical", "start": [150, 50], "end": [150, 350] },
//!   "units": [ { "type": "horizontal", "start": [150, 50], "end": [250, 50] } ],
//!   "tens": [], "hundreds": [], "thousands": [] }
//! ```

use cistercian_codec::{Frame, Orientation, Role, Segment};
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// One line of a drawn numeral, in integer pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SegmentInfo {
    #[serde(rename = "type")]
    pub kind: Orientation,
    pub start: [i32; 2],
    pub end: [i32; 2],
}

impl From<&Segment> for SegmentInfo {
    fn from(seg: &Segment) -> Self {
        let (sx, sy) = seg.start.rounded();
        let (ex, ey) = seg.end.rounded();
        Self {
            kind: seg.orientation,
            start: [sx, sy],
            end: [ex, ey],
        }
    }
}

/// Strokes of a numeral keyed by role, plus the stave.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SegmentMap {
    pub stem: SegmentInfo,
    pub units: Vec<SegmentInfo>,
    pub tens: Vec<SegmentInfo>,
    pub hundreds: Vec<SegmentInfo>,
    pub thousands: Vec<SegmentInfo>,
}

impl SegmentMap {
    pub fn new(frame: &Frame, segments: &[Segment]) -> Self {
        let (top, bottom) = frame.stave();
        let (tx, ty) = top.rounded();
        let (bx, by) = bottom.rounded();
        let of = |role: Role| -> Vec<SegmentInfo> {
            segments
                .iter()
                .filter(|s| s.role == role)
                .map(SegmentInfo::from)
                .collect()
        };
        Self {
            stem: SegmentInfo {
                kind: Orientation::Vertical,
                start: [tx, ty],
                end: [bx, by],
            },
            units: of(Role::Units),
            tens: of(Role::Tens),
            hundreds: of(Role::Hundreds),
            thousands: of(Role::Thousands),
        }
    }

    /// Number of digit strokes, stave excluded.
    pub fn stroke_count(&self) -> usize {
        self.units.len() + self.tens.len() + self.hundreds.len() + self.thousands.len()
    }
}

/// Digits of a numeral keyed by role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Digits {
    pub thousands: u8,
    pub hundreds: u8,
    pub tens: u8,
    pub units: u8,
}

impl From<[(Role, u8); 4]> for Digits {
    fn from(digits: [(Role, u8); 4]) -> Self {
        let mut out = Digits {
            thousands: 0,
            hundreds: 0,
            tens: 0,
            units: 0,
        };
        for (role, digit) in digits {
            match role {
                Role::Thousands => out.thousands = digit,
                Role::Hundreds => out.hundreds = digit,
                Role::Tens => out.tens = digit,
                Role::Units => out.units = digit,
            }
        }
        out
    }
}

/// Result of encoding a number.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EncodeReport {
    pub number: u16,
    /// `data:image/png;base64,...`
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segments: Option<SegmentMap>,
    #[serde(skip)]
    pub png: Vec<u8>,
}

/// Result of recognizing an image.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DecodeReport {
    pub number: u16,
    pub digits: Digits,
    /// Detected strokes in the input image's coordinates.
    pub segments: SegmentMap,
}

/// Serialize a report as pretty JSON.
pub fn to_json<T: Serialize>(report: &T) -> AppResult<String> {
    serde_json::to_string_pretty(report).map_err(AppError::serialization)
}
