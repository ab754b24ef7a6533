// SPDX-License-Identifier: MIT
//! # Segment Table
//!
//! The one base table of the codec: which stroke primitives make up each
//! decimal digit inside a single quadrant. All four positional roles share
//! this table; the quadrant a role occupies is obtained by reflecting the
//! primitives (see [`crate::geometry`]), never by keeping a second table.
//!
//! ## Primitives
//!
//! Primitives are described in quadrant-local coordinates `(u, v)`:
//! `u` grows away from the stave, `v` grows from the anchor end of the
//! stave towards its middle. Both run over `[0, 1]`.
//!
//! | primitive                   | from   | to     |
//! |-----------------------------|--------|--------|
//! | [`Stroke::AnchorBar`]       | (0, 0) | (1, 0) |
//! | [`Stroke::InnerBar`]        | (0, 1) | (1, 1) |
//! | [`Stroke::FallingDiagonal`] | (0, 0) | (1, 1) |
//! | [`Stroke::RisingDiagonal`]  | (0, 1) | (1, 0) |
//! | [`Stroke::OuterPost`]       | (1, 0) | (1, 1) |
//!
//! ## Reverse lookup
//!
//! Stroke sets are bitmasks, so lookup is exact set equality and insensitive
//! to the order strokes were detected in. A subset or superset of a valid
//! glyph is not a glyph.

use std::fmt;

use serde::Serialize;

/// Positional role of a digit, i.e. which quadrant of the stave it occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Units,
    Tens,
    Hundreds,
    Thousands,
}

impl Role {
    /// All roles, most significant first. Segment lists follow this order.
    pub const ALL: [Role; 4] = [Role::Thousands, Role::Hundreds, Role::Tens, Role::Units];

    /// Place value multiplier of this role.
    pub fn place_value(self) -> u16 {
        match self {
            Role::Units => 1,
            Role::Tens => 10,
            Role::Hundreds => 100,
            Role::Thousands => 1000,
        }
    }

    /// Lower-case name, as used in reports and diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Role::Units => "units",
            Role::Tens => "tens",
            Role::Hundreds => "hundreds",
            Role::Thousands => "thousands",
        }
    }

    /// Human name of the quadrant this role occupies.
    pub fn quadrant_name(self) -> &'static str {
        match self {
            Role::Units => "top-right",
            Role::Tens => "top-left",
            Role::Hundreds => "bottom-right",
            Role::Thousands => "bottom-left",
        }
    }

    /// Extract this role's digit from a value in `0..=9999`.
    pub fn digit_of(self, value: u16) -> u8 {
        ((value / self.place_value()) % 10) as u8
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One atomic line segment of a quadrant glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stroke {
    AnchorBar,
    InnerBar,
    FallingDiagonal,
    RisingDiagonal,
    OuterPost,
}

/// Orientation of a stroke once drawn. Reflection never changes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
    Diagonal,
}

impl Stroke {
    /// All primitives in canonical order.
    pub const ALL: [Stroke; 5] = [
        Stroke::AnchorBar,
        Stroke::InnerBar,
        Stroke::FallingDiagonal,
        Stroke::RisingDiagonal,
        Stroke::OuterPost,
    ];

    const fn bit(self) -> u8 {
        match self {
            Stroke::AnchorBar => 1 << 0,
            Stroke::InnerBar => 1 << 1,
            Stroke::FallingDiagonal => 1 << 2,
            Stroke::RisingDiagonal => 1 << 3,
            Stroke::OuterPost => 1 << 4,
        }
    }

    /// Endpoints in quadrant-local `(u, v)` coordinates.
    pub fn local_endpoints(self) -> ((f32, f32), (f32, f32)) {
        match self {
            Stroke::AnchorBar => ((0.0, 0.0), (1.0, 0.0)),
            Stroke::InnerBar => ((0.0, 1.0), (1.0, 1.0)),
            Stroke::FallingDiagonal => ((0.0, 0.0), (1.0, 1.0)),
            Stroke::RisingDiagonal => ((0.0, 1.0), (1.0, 0.0)),
            Stroke::OuterPost => ((1.0, 0.0), (1.0, 1.0)),
        }
    }

    pub fn orientation(self) -> Orientation {
        match self {
            Stroke::AnchorBar | Stroke::InnerBar => Orientation::Horizontal,
            Stroke::FallingDiagonal | Stroke::RisingDiagonal => Orientation::Diagonal,
            Stroke::OuterPost => Orientation::Vertical,
        }
    }
}

/// An unordered set of [`Stroke`]s.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StrokeSet(u8);

impl StrokeSet {
    pub const EMPTY: StrokeSet = StrokeSet(0);

    pub const fn of(strokes: &[Stroke]) -> Self {
        let mut bits = 0u8;
        let mut i = 0;
        while i < strokes.len() {
            bits |= strokes[i].bit();
            i += 1;
        }
        StrokeSet(bits)
    }

    pub fn insert(&mut self, stroke: Stroke) {
        self.0 |= stroke.bit();
    }

    pub fn contains(self, stroke: Stroke) -> bool {
        self.0 & stroke.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in canonical primitive order.
    pub fn iter(self) -> impl Iterator<Item = Stroke> {
        Stroke::ALL.into_iter().filter(move |s| self.contains(*s))
    }
}

impl FromIterator<Stroke> for StrokeSet {
    fn from_iter<I: IntoIterator<Item = Stroke>>(iter: I) -> Self {
        let mut set = StrokeSet::EMPTY;
        for stroke in iter {
            set.insert(stroke);
        }
        set
    }
}

impl fmt::Display for StrokeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("{}");
        }
        f.write_str("{")?;
        for (i, stroke) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:?}", stroke)?;
        }
        f.write_str("}")
    }
}

impl fmt::Debug for StrokeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Serialize for StrokeSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

use Stroke::*;

/// Base glyph table, indexed by digit.
const GLYPHS: [StrokeSet; 10] = [
    StrokeSet::EMPTY,
    StrokeSet::of(&[AnchorBar]),
    StrokeSet::of(&[InnerBar]),
    StrokeSet::of(&[FallingDiagonal]),
    StrokeSet::of(&[RisingDiagonal]),
    StrokeSet::of(&[AnchorBar, RisingDiagonal]),
    StrokeSet::of(&[OuterPost]),
    StrokeSet::of(&[AnchorBar, OuterPost]),
    StrokeSet::of(&[InnerBar, OuterPost]),
    StrokeSet::of(&[AnchorBar, InnerBar, OuterPost]),
];

/// Stroke set of `digit`. Digits above 9 have no glyph.
pub fn glyph(digit: u8) -> Option<StrokeSet> {
    GLYPHS.get(digit as usize).copied()
}

/// Digit encoded by exactly `strokes`, if any.
pub fn digit_for(strokes: StrokeSet) -> Option<u8> {
    GLYPHS
        .iter()
        .position(|g| *g == strokes)
        .map(|d| d as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyphs_are_distinct() {
        for a in 0..10u8 {
            for b in (a + 1)..10u8 {
                assert_ne!(glyph(a), glyph(b), "digits {} and {} collide", a, b);
            }
        }
    }

    #[test]
    fn reverse_lookup_inverts_table() {
        for d in 0..10u8 {
            assert_eq!(digit_for(glyph(d).unwrap()), Some(d));
        }
        assert_eq!(glyph(10), None);
    }

    #[test]
    fn subsets_and_supersets_do_not_match() {
        // 9 minus the outer post is not a glyph
        assert_eq!(digit_for(StrokeSet::of(&[AnchorBar, InnerBar])), None);
        // 3 plus 4 is not a glyph
        assert_eq!(digit_for(StrokeSet::of(&[FallingDiagonal, RisingDiagonal])), None);
        let everything: StrokeSet = Stroke::ALL.into_iter().collect();
        assert_eq!(digit_for(everything), None);
    }

    #[test]
    fn lookup_ignores_insertion_order() {
        let a: StrokeSet = [OuterPost, InnerBar, AnchorBar].into_iter().collect();
        let b: StrokeSet = [AnchorBar, InnerBar, OuterPost].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(digit_for(a), Some(9));
    }

    #[test]
    fn role_digit_extraction() {
        assert_eq!(Role::Thousands.digit_of(1234), 1);
        assert_eq!(Role::Hundreds.digit_of(1234), 2);
        assert_eq!(Role::Tens.digit_of(1234), 3);
        assert_eq!(Role::Units.digit_of(1234), 4);
        assert_eq!(Role::Units.digit_of(0), 0);
    }

    #[test]
    fn stroke_set_display() {
        assert_eq!(StrokeSet::EMPTY.to_string(), "{}");
        assert_eq!(glyph(5).unwrap().to_string(), "{AnchorBar, RisingDiagonal}");
    }

    #[test]
    fn stroke_set_debug_names_members() {
        assert_eq!(format!("{:?}", glyph(8).unwrap()), "{InnerBar, OuterPost}");
        let err = crate::error::RecognitionError::UnknownGlyph {
            role: Role::Tens,
            strokes: StrokeSet::of(&[FallingDiagonal, RisingDiagonal]),
        };
        assert!(format!("{:?}", err).contains("{FallingDiagonal, RisingDiagonal}"));
    }
}
