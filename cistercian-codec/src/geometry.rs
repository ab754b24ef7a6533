// SPDX-License-Identifier: MIT
//! # Stave Geometry
//!
//! Turns quadrant-local stroke primitives into absolute pixel coordinates.
//! The encoder projects through the canonical frame of the fixed canvas;
//! the extractor projects through a frame measured from the stave it found.
//! Both go through [`Frame::project`], so rendering and recognition can not
//! disagree about where a stroke lives.
//!
//! Pixel `(x, y)` has its center at coordinate `(x, y)`.
//!
//! ## Role reflections
//!
//! | role      | mirror x | mirror y | anchor end |
//! |-----------|----------|----------|------------|
//! | units     | no       | no       | top        |
//! | tens      | yes      | no       | top        |
//! | hundreds  | no       | yes      | bottom     |
//! | thousands | yes      | yes      | bottom     |

use serde::Serialize;

use crate::table::{Orientation, Role, Stroke};

/// Canvas width of a rendered numeral.
pub const CANVAS_WIDTH: u32 = 300;
/// Canvas height of a rendered numeral.
pub const CANVAS_HEIGHT: u32 = 400;
/// Stave column on the canonical canvas.
pub const STAVE_X: f32 = 150.0;
/// Upper stave end on the canonical canvas.
pub const STAVE_TOP: f32 = 50.0;
/// Lower stave end on the canonical canvas.
pub const STAVE_BOTTOM: f32 = 350.0;
/// Drawn line width, stave and strokes alike.
pub const STROKE_WIDTH: f32 = 5.0;

/// A point in pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Point at fraction `t` of the way from `self` to `other`.
    pub fn lerp(self, other: Point, t: f32) -> Point {
        Point {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    /// Integer pixel position, rounded half away from zero.
    pub fn rounded(self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }

    pub fn distance(self, other: Point) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn scaled(self, factor: f32) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }

    /// Distance from `self` to the closest point of segment `a`–`b`.
    pub fn distance_to_segment(self, a: Point, b: Point) -> f32 {
        let (vx, vy) = (b.x - a.x, b.y - a.y);
        let len_sq = vx * vx + vy * vy;
        let t = if len_sq == 0.0 {
            0.0
        } else {
            (((self.x - a.x) * vx + (self.y - a.y) * vy) / len_sq).clamp(0.0, 1.0)
        };
        self.distance(a.lerp(b, t))
    }
}

/// A drawn (or expected) stroke, in absolute coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Segment {
    pub role: Role,
    pub stroke: Stroke,
    #[serde(rename = "type")]
    pub orientation: Orientation,
    pub start: Point,
    pub end: Point,
}

#[derive(Clone, Copy, Debug)]
struct Reflection {
    mirror_x: bool,
    mirror_y: bool,
}

fn reflection(role: Role) -> Reflection {
    match role {
        Role::Units => Reflection { mirror_x: false, mirror_y: false },
        Role::Tens => Reflection { mirror_x: true, mirror_y: false },
        Role::Hundreds => Reflection { mirror_x: false, mirror_y: true },
        Role::Thousands => Reflection { mirror_x: true, mirror_y: true },
    }
}

/// Position, direction and size of one stave.
///
/// The stave runs from `top` to `bottom` and may lean a little. Quadrants hang
/// off either end: along the stave they span `length / 3`; across it each
/// quadrant spans its own reach, which is `length / 3` on the canonical canvas
/// but is measured separately when reading images whose aspect has changed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub top: Point,
    pub bottom: Point,
    reach: [f32; 4],
}

impl Frame {
    /// Frame with square quadrants.
    pub fn new(top: Point, bottom: Point) -> Self {
        let side = top.distance(bottom) / 3.0;
        Self {
            top,
            bottom,
            reach: [side; 4],
        }
    }

    /// The frame every rendered numeral uses.
    pub fn canonical() -> Self {
        Self::new(Point::new(STAVE_X, STAVE_TOP), Point::new(STAVE_X, STAVE_BOTTOM))
    }

    pub fn length(&self) -> f32 {
        self.top.distance(self.bottom)
    }

    /// Extent of a quadrant along the stave.
    pub fn side(&self) -> f32 {
        self.length() / 3.0
    }

    /// Extent of `role`'s quadrant across the stave.
    pub fn reach(&self, role: Role) -> f32 {
        self.reach[role as usize]
    }

    pub fn with_reach(mut self, role: Role, reach: f32) -> Self {
        self.reach[role as usize] = reach;
        self
    }

    /// Size of this frame relative to the canonical one.
    pub fn scale(&self) -> f32 {
        self.length() / (STAVE_BOTTOM - STAVE_TOP)
    }

    /// Both stave endpoints, top first.
    pub fn stave(&self) -> (Point, Point) {
        (self.top, self.bottom)
    }

    /// Unit vector from top to bottom.
    pub fn axis(&self) -> Point {
        let len = self.length();
        if len == 0.0 {
            return Point::new(0.0, 1.0);
        }
        Point::new((self.bottom.x - self.top.x) / len, (self.bottom.y - self.top.y) / len)
    }

    /// Unit vector across the stave, pointing at the units side.
    pub fn normal(&self) -> Point {
        let a = self.axis();
        Point::new(a.y, -a.x)
    }

    /// Lean of the stave from vertical, in degrees; positive when the bottom
    /// sits right of the top.
    pub fn tilt_degrees(&self) -> f32 {
        let a = self.axis();
        a.x.atan2(a.y).to_degrees()
    }

    /// `p` as (distance along the stave from `top`, distance across it
    /// towards the units side).
    pub fn axis_coords(&self, p: Point) -> (f32, f32) {
        let (a, n) = (self.axis(), self.normal());
        let (dx, dy) = (p.x - self.top.x, p.y - self.top.y);
        (dx * a.x + dy * a.y, dx * n.x + dy * n.y)
    }

    /// Map quadrant-local `(u, v)` of `role` into pixel space.
    pub fn project(&self, role: Role, (u, v): (f32, f32)) -> Point {
        let r = reflection(role);
        let (a, n) = (self.axis(), self.normal());
        let (anchor, along) = if r.mirror_y {
            (self.bottom, -v * self.side())
        } else {
            (self.top, v * self.side())
        };
        let across = if r.mirror_x { -u } else { u } * self.reach(role);
        Point {
            x: anchor.x + a.x * along + n.x * across,
            y: anchor.y + a.y * along + n.y * across,
        }
    }

    /// Where `stroke` sits when drawn for `role`.
    pub fn segment(&self, role: Role, stroke: Stroke) -> Segment {
        let (from, to) = stroke.local_endpoints();
        Segment {
            role,
            stroke,
            orientation: stroke.orientation(),
            start: self.project(role, from),
            end: self.project(role, to),
        }
    }

    /// Same frame in a coordinate space scaled by `factor`.
    pub fn scaled(&self, factor: f32) -> Frame {
        Frame {
            top: self.top.scaled(factor),
            bottom: self.bottom.scaled(factor),
            reach: self.reach.map(|r| r * factor),
        }
    }
}
