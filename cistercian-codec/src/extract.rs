// SPDX-License-Identifier: MIT
//! # Segment Extractor
//!
//! Finds the stave in a caller-supplied image and reports, per quadrant, which
//! stroke primitives are drawn.
//!
//! ## Pipeline
//!
//! 1. **Working copy**: luma, shrunk to at most
//!    [`ExtractOptions::working_long_side`] on the longest side.
//! 2. **Ink mask**: see [`crate::binarize`].
//! 3. **Stave**: the columns with the tallest vertical ink runs seed a trace
//!    that walks the line row by row and follows it when it leans. A
//!    least-squares fit through the centres of the traced rows gives the
//!    stave's axis, and its first and last ink rows give the ends. The stave
//!    must cover at least [`STAVE_COVERAGE`] of the drawing's height;
//!    otherwise recognition stops here rather than guessing.
//! 4. **Reach**: how far each quadrant extends across the stave is measured
//!    from the ink on its side, so a numeral stretched or squeezed sideways is
//!    still probed where its strokes are.
//! 5. **Probing**: the fitted axis and the reaches define a [`Frame`]. Every
//!    (role, primitive) pair is projected through it exactly as the encoder
//!    does, and the interior of the expected path is sampled. A sample counts
//!    when ink lies within a tolerance radius proportional to the frame's
//!    scale; a primitive is present when enough samples count.
//! 6. **Accounting**: ink in a quadrant that lies away from the stave and from
//!    every detected primitive means the reading is incomplete. Past a small
//!    allowance that is [`RecognitionError::UnexplainedInk`], never a number.
//!
//! Samples stay on the middle 60% of each path. There, any two primitives of
//! a quadrant are at least 0.14 quadrant sides apart, except where the two
//! diagonals cross, which touches at most three of the thirteen samples.

use std::borrow::Cow;

use fast_image_resize::Resizer;
use image::{DynamicImage, GrayImage};
use log::debug;

use crate::binarize::{binarize, InkMask};
use crate::error::RecognitionError;
use crate::geometry::{Frame, Point, Segment};
use crate::plan::{build_plan, Size};
use crate::resample::resample_gray;
use crate::table::{Role, Stroke, StrokeSet};

/// Default bound on the longest side of the analysed image.
pub const DEFAULT_WORKING_LONG_SIDE: u32 = 1024;
/// A stave shorter than this is not trusted.
pub const MIN_STAVE_PX: u32 = 24;
/// Share of the drawing's height the stave has to span.
pub const STAVE_COVERAGE: f32 = 0.9;

const MAX_RUN_GAP: u32 = 2;
const COLUMN_SLACK: i32 = 1;
/// Seed columns traced before settling on the longest line.
const MAX_SEEDS: usize = 8;
/// Rows wider than this many stroke widths touch a glyph and do not steer the trace.
const NARROW_RATIO: f32 = 1.25;
/// Rows further than this from the first fit are left out of the second.
const FIT_OUTLIER_PX: f32 = 1.5;
/// Share of traced rows the fitted axis has to pass through.
const MIN_STRAIGHTNESS: f32 = 0.8;
/// A stave is at least this many times longer than it is wide.
const MIN_SLENDERNESS: f32 = 8.0;
/// Steepest lean from vertical still read as a stave.
const MAX_TILT_DEGREES: f32 = 10.0;

const PROBE_SAMPLES: usize = 13;
const PROBE_FROM: f32 = 0.2;
const PROBE_TO: f32 = 0.8;
/// Tolerance radius on the canonical canvas, scaled with the detected frame.
const PROBE_RADIUS: f32 = 4.0;
const MIN_PROBE_RADIUS: f32 = 1.5;
const PRESENCE_RATIO: f32 = 0.7;

/// Accepted reach, as a multiple of the quadrant's extent along the stave.
const MIN_REACH: f32 = 0.5;
const MAX_REACH: f32 = 2.0;
/// Unexplained ink a quadrant may hold, as a share of one side-long stroke.
const UNEXPLAINED_RATIO: f32 = 0.15;

/// Tunables of [`extract_gray`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Longest side of the working copy. Larger images are shrunk first.
    pub working_long_side: u32,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            working_long_side: DEFAULT_WORKING_LONG_SIDE,
        }
    }
}

/// A located stave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stave {
    pub frame: Frame,
    /// Measured line width in pixels.
    pub stroke_width: f32,
}

impl Stave {
    fn scaled(&self, factor: f32) -> Stave {
        Stave {
            frame: self.frame.scaled(factor),
            stroke_width: self.stroke_width * factor,
        }
    }
}

/// Detected strokes of all four quadrants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuadrantStrokes {
    pub units: StrokeSet,
    pub tens: StrokeSet,
    pub hundreds: StrokeSet,
    pub thousands: StrokeSet,
}

impl QuadrantStrokes {
    pub fn get(&self, role: Role) -> StrokeSet {
        match role {
            Role::Units => self.units,
            Role::Tens => self.tens,
            Role::Hundreds => self.hundreds,
            Role::Thousands => self.thousands,
        }
    }

    pub fn set(&mut self, role: Role, strokes: StrokeSet) {
        match role {
            Role::Units => self.units = strokes,
            Role::Tens => self.tens = strokes,
            Role::Hundreds => self.hundreds = strokes,
            Role::Thousands => self.thousands = strokes,
        }
    }

    /// Quadrants most significant first.
    pub fn iter(&self) -> impl Iterator<Item = (Role, StrokeSet)> + '_ {
        Role::ALL.into_iter().map(move |role| (role, self.get(role)))
    }
}

/// Result of [`extract`].
#[derive(Clone, Debug, PartialEq)]
pub struct Extraction {
    /// Stave in the caller's pixel coordinates.
    pub stave: Stave,
    pub strokes: QuadrantStrokes,
}

impl Extraction {
    /// Detected strokes as geometry in the caller's pixel coordinates.
    pub fn segments(&self) -> Vec<Segment> {
        self.strokes
            .iter()
            .flat_map(|(role, set)| set.iter().map(move |stroke| (role, stroke)))
            .map(|(role, stroke)| self.stave.frame.segment(role, stroke))
            .collect()
    }
}

/// Extract quadrant strokes from any image, with default options.
pub fn extract(image: &DynamicImage) -> Result<Extraction, RecognitionError> {
    extract_gray(&image.to_luma8(), &ExtractOptions::default())
}

/// Extract quadrant strokes from a grayscale image.
///
/// # Errors
/// - [`RecognitionError::Unreadable`] for empty images or a failed resample
/// - [`RecognitionError::NoContrast`] when there is no ink
/// - [`RecognitionError::StaveNotFound`] when no vertical line qualifies
/// - [`RecognitionError::UnexplainedInk`] when a quadrant holds ink that no
///   detected primitive accounts for
pub fn extract_gray(img: &GrayImage, opts: &ExtractOptions) -> Result<Extraction, RecognitionError> {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Err(RecognitionError::Unreadable {
            reason: format!("image is empty ({}x{})", w, h),
        });
    }

    let plan = build_plan(Size { w, h }, opts.working_long_side.max(1));
    let working: Cow<'_, GrayImage> = if plan.resizes() {
        let mut resizer = Resizer::new();
        let shrunk = resample_gray(&mut resizer, img, &plan)
            .map_err(|e| RecognitionError::Unreadable { reason: e.to_string() })?;
        debug!("extract: working copy {}x{} -> {}x{}", w, h, plan.out.w, plan.out.h);
        Cow::Owned(shrunk)
    } else {
        Cow::Borrowed(img)
    };

    let mask = binarize(&working)?;
    let mut stave = locate_stave(&mask)?;
    stave.frame = measure_reach(&mask, &stave);

    let mut strokes = QuadrantStrokes::default();
    for role in Role::ALL {
        strokes.set(role, detect_strokes(&mask, &stave.frame, role));
    }
    debug!(
        "extract: stave {:?}..{:?} tilt={:.2}deg width={:.1}; strokes {:?}",
        stave.frame.top.rounded(),
        stave.frame.bottom.rounded(),
        stave.frame.tilt_degrees(),
        stave.stroke_width,
        strokes
    );
    account_for_ink(&mask, &stave, &strokes)?;

    Ok(Extraction {
        stave: stave.scaled(1.0 / plan.factor()),
        strokes,
    })
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Run {
    start: u32,
    end: u32,
}

impl Run {
    fn len(&self) -> u32 {
        self.end - self.start + 1
    }
}

/// Tallest vertical ink run around column `x`, bridging gaps up to `max_gap`.
fn tallest_run(mask: &InkMask, x: i32, max_gap: u32) -> Option<Run> {
    let mut best: Option<Run> = None;
    let mut current: Option<Run> = None;

    for y in 0..mask.height() {
        let yi = y as i32;
        let ink = (-COLUMN_SLACK..=COLUMN_SLACK).any(|dx| mask.get(x + dx, yi));
        if !ink {
            continue;
        }
        current = match current {
            Some(run) if y - run.end - 1 <= max_gap => Some(Run { start: run.start, end: y }),
            _ => Some(Run { start: y, end: y }),
        };
        if let Some(run) = current {
            if best.map_or(true, |b| run.len() > b.len()) {
                best = Some(run);
            }
        }
    }
    best
}

/// Horizontal ink run in row `y` containing the ink closest to `centre`,
/// looking at most `reach` pixels to either side.
fn row_run(mask: &InkMask, y: i32, centre: f32, reach: i32) -> Option<(i32, i32)> {
    let c = centre.round() as i32;
    let x = (0..=reach)
        .flat_map(|d| [c - d, c + d])
        .find(|x| mask.get(*x, y))?;
    let mut left = x;
    while mask.get(left - 1, y) {
        left -= 1;
    }
    let mut right = x;
    while mask.get(right + 1, y) {
        right += 1;
    }
    Some((left, right))
}

/// A vertical line followed row by row.
#[derive(Clone, Debug)]
struct Trace {
    /// First and last rows with ink on the line.
    first: i32,
    last: i32,
    /// Median horizontal width of the line.
    width: f32,
    /// Fitted axis, `x = a + b * y`.
    a: f32,
    b: f32,
    /// Rows that steered the trace, and how many of them the axis passes through.
    rows: usize,
    inliers: usize,
}

impl Trace {
    fn span(&self) -> u32 {
        (self.last - self.first + 1) as u32
    }

    /// Thin, straight and close to vertical.
    fn is_stave_like(&self) -> bool {
        self.b.abs() <= MAX_TILT_DEGREES.to_radians().tan()
            && self.width * MIN_SLENDERNESS <= self.span() as f32
            && self.inliers as f32 >= MIN_STRAIGHTNESS * self.rows as f32
    }

    fn x_at(&self, y: f32) -> f32 {
        self.a + self.b * y
    }

    fn stave(&self) -> Stave {
        let half = (self.width - 1.0) / 2.0;
        let top = self.first as f32 + half;
        let bottom = (self.last as f32 - half).max(top + 1.0);
        Stave {
            frame: Frame::new(Point::new(self.x_at(top), top), Point::new(self.x_at(bottom), bottom)),
            stroke_width: self.width / (1.0 + self.b * self.b).sqrt(),
        }
    }
}

/// Follow the line through `seed` from its middle outwards.
fn trace_line(mask: &InkMask, seed_x: i32, seed: Run, max_gap: u32) -> Option<Trace> {
    let (from, to) = (seed.start as i32, seed.end as i32);
    let mut widths: Vec<i32> = (from..=to)
        .filter_map(|y| row_run(mask, y, seed_x as f32, COLUMN_SLACK))
        .map(|(l, r)| r - l + 1)
        .collect();
    if widths.is_empty() {
        return None;
    }
    widths.sort_unstable();
    let width = widths[widths.len() / 2] as f32;
    let max_width = (width + 1.0).max(NARROW_RATIO * width);
    let narrow = |(l, r): (i32, i32)| (r - l + 1) as f32 <= max_width;
    let reach = (width / 2.0).ceil() as i32 + 2;

    let mid = (from + to) / 2;
    let (start, run) = (0..=(to - from) / 2 + 1)
        .flat_map(|d| [mid - d, mid + d])
        .filter(|y| (from..=to).contains(y))
        .find_map(|y| {
            row_run(mask, y, seed_x as f32, COLUMN_SLACK)
                .filter(|run| narrow(*run))
                .map(|run| (y, run))
        })?;

    let centre = (run.0 + run.1) as f32 / 2.0;
    let mut centres = vec![(start as f32, centre)];
    let mut last_ink = [start; 2];
    for (i, step) in [-1, 1].into_iter().enumerate() {
        let mut y = start;
        let mut centre = centre;
        let mut gap = 0;
        loop {
            y += step;
            if y < 0 || y >= mask.height() as i32 {
                break;
            }
            match row_run(mask, y, centre, reach) {
                Some(run) => {
                    gap = 0;
                    last_ink[i] = y;
                    if narrow(run) {
                        centre = (run.0 + run.1) as f32 / 2.0;
                        centres.push((y as f32, centre));
                    }
                }
                None => {
                    gap += 1;
                    if gap > max_gap {
                        break;
                    }
                }
            }
        }
    }

    let first_fit = fit_line(&centres);
    let inliers: Vec<(f32, f32)> = centres
        .iter()
        .copied()
        .filter(|p| on_line(first_fit, *p))
        .collect();
    let (a, b) = if inliers.len() >= 2 && inliers.len() < centres.len() {
        fit_line(&inliers)
    } else {
        first_fit
    };
    let inliers = centres.iter().filter(|p| on_line((a, b), **p)).count();

    Some(Trace {
        first: last_ink[0],
        last: last_ink[1],
        width,
        a,
        b,
        rows: centres.len(),
        inliers,
    })
}

fn on_line((a, b): (f32, f32), (y, x): (f32, f32)) -> bool {
    (x - (a + b * y)).abs() <= FIT_OUTLIER_PX
}

/// Least-squares `x = a + b * y` through `(y, x)` points.
fn fit_line(points: &[(f32, f32)]) -> (f32, f32) {
    let n = points.len().max(1) as f64;
    let mean_y = points.iter().map(|p| f64::from(p.0)).sum::<f64>() / n;
    let mean_x = points.iter().map(|p| f64::from(p.1)).sum::<f64>() / n;
    let (mut syy, mut sxy) = (0.0f64, 0.0f64);
    for &(y, x) in points {
        let dy = f64::from(y) - mean_y;
        syy += dy * dy;
        sxy += dy * (f64::from(x) - mean_x);
    }
    let b = if syy > 0.0 { sxy / syy } else { 0.0 };
    ((mean_x - b * mean_y) as f32, b as f32)
}

fn locate_stave(mask: &InkMask) -> Result<Stave, RecognitionError> {
    let (ink_top, ink_bottom) = mask.ink_rows().ok_or(RecognitionError::NoContrast)?;
    let ink_extent = ink_bottom - ink_top + 1;
    let max_gap = MAX_RUN_GAP.max(mask.height() / 150);

    let mut seeds: Vec<(i32, Run)> = (0..mask.width() as i32)
        .filter_map(|x| tallest_run(mask, x, max_gap).map(|run| (x, run)))
        .collect();
    if seeds.is_empty() {
        return Err(RecognitionError::NoContrast);
    }
    // Longest first; ties go to the leftmost column.
    seeds.sort_by(|p, q| q.1.len().cmp(&p.1.len()).then(p.0.cmp(&q.0)));

    let mut traces: Vec<Trace> = Vec::new();
    for (x, run) in seeds {
        if traces.len() == MAX_SEEDS {
            break;
        }
        let mid = (run.start + run.end) as f32 / 2.0;
        let seen = traces
            .iter()
            .any(|t| (x as f32 - t.x_at(mid)).abs() <= t.width + COLUMN_SLACK as f32);
        if seen {
            continue;
        }
        if let Some(trace) = trace_line(mask, x, run, max_gap) {
            traces.push(trace);
        }
    }
    // Most rows on the axis wins; a bar or a bent path traced through the
    // stave can match its length but not its straightness.
    let stave_like = traces
        .iter()
        .filter(|t| t.is_stave_like())
        .reduce(|best, t| if t.inliers > best.inliers { t } else { best });
    let longest = traces.iter().max_by_key(|t| t.span());
    let best = match (stave_like, longest) {
        (Some(best), _) => best,
        (None, Some(longest)) if longest.span() >= MIN_STAVE_PX => {
            return Err(RecognitionError::StaveNotFound {
                reason: format!(
                    "longest line leans {:.0} degrees or is not thin and straight",
                    longest.b.atan().to_degrees().abs()
                ),
            });
        }
        (None, Some(longest)) => longest,
        (None, None) => {
            return Err(RecognitionError::StaveNotFound {
                reason: "no vertical line of even width".to_string(),
            });
        }
    };

    if best.span() < MIN_STAVE_PX {
        return Err(RecognitionError::StaveNotFound {
            reason: format!(
                "tallest vertical line is {} px, need at least {} px",
                best.span(),
                MIN_STAVE_PX
            ),
        });
    }
    let coverage = best.span() as f32 / ink_extent as f32;
    if coverage < STAVE_COVERAGE {
        return Err(RecognitionError::StaveNotFound {
            reason: format!(
                "tallest vertical line spans {:.0}% of the drawing's height, need {:.0}%",
                coverage * 100.0,
                STAVE_COVERAGE * 100.0
            ),
        });
    }

    Ok(best.stave())
}

/// Quadrant whose region contains a point at `(along, across)`, widened by
/// `margin` along the stave. The middle third belongs to no quadrant.
fn quadrant_at(frame: &Frame, (along, across): (f32, f32), margin: f32) -> Option<Role> {
    let (length, side) = (frame.length(), frame.side());
    let top = if (-margin..=side + margin).contains(&along) {
        true
    } else if (length - side - margin..=length + margin).contains(&along) {
        false
    } else {
        return None;
    };
    Some(match (top, across > 0.0) {
        (true, true) => Role::Units,
        (true, false) => Role::Tens,
        (false, true) => Role::Hundreds,
        (false, false) => Role::Thousands,
    })
}

/// Frame of `stave` with each quadrant's reach taken from the furthest ink on
/// its side. Quadrants without a plausible measurement keep square proportions.
fn measure_reach(mask: &InkMask, stave: &Stave) -> Frame {
    let frame = stave.frame;
    let side = frame.side();
    let half = (stave.stroke_width - 1.0).max(0.0) / 2.0;
    let margin = stave.stroke_width + 2.0;
    let limit = (MAX_REACH * side + half).ceil() as usize;

    // ink per rounded distance from the axis, per role
    let mut columns = vec![[0u32; 4]; limit + 1];
    for (x, y) in mask.ink_pixels() {
        let coords = frame.axis_coords(Point::new(x as f32, y as f32));
        if coords.1.abs() <= half + 1.0 {
            continue;
        }
        let Some(role) = quadrant_at(&frame, coords, margin) else {
            continue;
        };
        let distance = coords.1.abs().round() as usize;
        if distance <= limit {
            columns[distance][role as usize] += 1;
        }
    }

    Role::ALL.into_iter().fold(frame, |frame, role| {
        let furthest = (0..=limit).rev().find(|d| columns[*d][role as usize] >= 2);
        match furthest.map(|d| d as f32 - half) {
            Some(reach) if (MIN_REACH * side..=MAX_REACH * side).contains(&reach) => {
                debug!("reach {}: {:.1} px (side {:.1})", role, reach, side);
                frame.with_reach(role, reach)
            }
            _ => frame,
        }
    })
}

fn probe_radius(frame: &Frame) -> f32 {
    (PROBE_RADIUS * frame.scale()).max(MIN_PROBE_RADIUS)
}

fn detect_strokes(mask: &InkMask, frame: &Frame, role: Role) -> StrokeSet {
    let radius = probe_radius(frame);
    Stroke::ALL
        .into_iter()
        .filter(|stroke| {
            let seg = frame.segment(role, *stroke);
            let hits = (0..PROBE_SAMPLES)
                .filter(|i| {
                    let t = PROBE_FROM + (PROBE_TO - PROBE_FROM) * *i as f32 / (PROBE_SAMPLES - 1) as f32;
                    let (x, y) = seg.start.lerp(seg.end, t).rounded();
                    mask.any_within(x, y, radius)
                })
                .count();
            debug!("probe {} {:?}: {}/{} samples inked", role, stroke, hits, PROBE_SAMPLES);
            hits as f32 >= PRESENCE_RATIO * PROBE_SAMPLES as f32
        })
        .collect()
}

/// Fail when a quadrant holds more ink than the stave and its detected
/// primitives explain.
fn account_for_ink(mask: &InkMask, stave: &Stave, strokes: &QuadrantStrokes) -> Result<(), RecognitionError> {
    let frame = &stave.frame;
    let tolerance = stave.stroke_width / 2.0 + probe_radius(frame);
    let length = frame.length();
    let across_limit = 2.0 * Role::ALL.into_iter().map(|r| frame.reach(r)).fold(0.0, f32::max);
    let drawn: [Vec<Segment>; 4] = [Role::Units, Role::Tens, Role::Hundreds, Role::Thousands]
        .map(|role| strokes.get(role).iter().map(|s| frame.segment(role, s)).collect());

    let mut unexplained = [0usize; 4];
    for (x, y) in mask.ink_pixels() {
        let p = Point::new(x as f32, y as f32);
        let (along, across) = frame.axis_coords(p);
        if along < -tolerance || along > length + tolerance || across.abs() > across_limit {
            continue;
        }
        if p.distance_to_segment(frame.top, frame.bottom) <= tolerance {
            continue;
        }
        let role = match (along < length / 2.0, across > 0.0) {
            (true, true) => Role::Units,
            (true, false) => Role::Tens,
            (false, true) => Role::Hundreds,
            (false, false) => Role::Thousands,
        };
        let explained = drawn[role as usize]
            .iter()
            .any(|s| p.distance_to_segment(s.start, s.end) <= tolerance);
        if !explained {
            unexplained[role as usize] += 1;
        }
    }

    let allowance = UNEXPLAINED_RATIO * frame.side() * stave.stroke_width;
    for role in Role::ALL {
        let pixels = unexplained[role as usize];
        if pixels as f32 > allowance {
            debug!("unexplained ink in {}: {} px, allowance {:.0}", role, pixels, allowance);
            return Err(RecognitionError::UnexplainedInk { role, pixels });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{render, Numeral};
    use crate::geometry::{Point, CANVAS_HEIGHT, CANVAS_WIDTH, STAVE_BOTTOM, STAVE_TOP, STAVE_X, STROKE_WIDTH};
    use crate::raster::{blank_canvas, draw_line, INK};
    use crate::table::glyph;

    fn numeral(n: i64) -> Numeral {
        Numeral::new(n).unwrap()
    }

    /// Draw `n` on an arbitrary frame the way the encoder draws on the canonical one.
    fn draw_on(frame: &Frame, n: i64) -> GrayImage {
        let mut img = blank_canvas(CANVAS_WIDTH, CANVAS_HEIGHT);
        draw_line(&mut img, frame.top, frame.bottom, STROKE_WIDTH, INK);
        for seg in numeral(n).segments(frame) {
            draw_line(&mut img, seg.start, seg.end, STROKE_WIDTH, INK);
        }
        img
    }

    fn leaning(degrees: f32) -> Frame {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let top = Point::new(STAVE_X - 150.0 * sin, STAVE_TOP + 150.0 * (1.0 - cos));
        Frame::new(top, Point::new(top.x + 300.0 * sin, top.y + 300.0 * cos))
    }

    fn assert_strokes(ex: &Extraction, n: i64) {
        for (role, digit) in numeral(n).digits() {
            assert_eq!(ex.strokes.get(role), glyph(digit).unwrap(), "{} of {}", role, n);
        }
    }

    #[test]
    fn locates_canonical_stave() {
        let img = render(numeral(0));
        let ex = extract_gray(&img, &ExtractOptions::default()).unwrap();
        assert_eq!(ex.stave.frame.top, Point::new(STAVE_X, STAVE_TOP));
        assert_eq!(ex.stave.frame.bottom, Point::new(STAVE_X, STAVE_BOTTOM));
        assert_eq!(ex.stave.frame.tilt_degrees(), 0.0);
        assert_eq!(ex.stave.stroke_width, STROKE_WIDTH);
        assert_eq!(ex.strokes, QuadrantStrokes::default());
    }

    #[test]
    fn detects_every_glyph_in_every_quadrant() {
        for role in Role::ALL {
            for d in 0..10u8 {
                let value = i64::from(d) * i64::from(role.place_value());
                let ex = extract_gray(&render(numeral(value)), &ExtractOptions::default()).unwrap();
                assert_eq!(ex.strokes.get(role), glyph(d).unwrap(), "digit {} as {}", d, role);
                for other in Role::ALL.into_iter().filter(|r| *r != role) {
                    assert!(ex.strokes.get(other).is_empty());
                }
            }
        }
    }

    #[test]
    fn canonical_quadrants_measure_square() {
        let ex = extract_gray(&render(numeral(9999)), &ExtractOptions::default()).unwrap();
        for role in Role::ALL {
            assert_eq!(ex.stave.frame.reach(role), 100.0, "{}", role);
        }
    }

    #[test]
    fn follows_a_leaning_stave() {
        for degrees in [-2.0f32, -1.0, 1.0, 2.0, 5.0] {
            let frame = leaning(degrees);
            for n in [1234, 9999, 6666, 5555, 8080] {
                let ex = extract_gray(&draw_on(&frame, n), &ExtractOptions::default())
                    .unwrap_or_else(|e| panic!("{} at {} degrees: {}", n, degrees, e));
                assert_strokes(&ex, n);
                let tilt = ex.stave.frame.tilt_degrees();
                assert!((tilt - degrees).abs() < 0.25, "{} at {} degrees read as {}", n, degrees, tilt);
                assert!(ex.stave.frame.top.distance(frame.top) < 1.5, "{:?}", ex.stave);
                assert!(ex.stave.frame.bottom.distance(frame.bottom) < 1.5, "{:?}", ex.stave);
            }
        }
    }

    #[test]
    fn measures_quadrant_reach() {
        let frame = Frame::canonical()
            .with_reach(Role::Units, 120.0)
            .with_reach(Role::Tens, 85.0)
            .with_reach(Role::Hundreds, 110.0);
        for n in [9876, 6666, 4321] {
            let ex = extract_gray(&draw_on(&frame, n), &ExtractOptions::default()).unwrap();
            assert_strokes(&ex, n);
            for role in Role::ALL {
                let (got, want) = (ex.stave.frame.reach(role), frame.reach(role));
                assert!((got - want).abs() <= 1.0, "{} reach {} for {}, drawn {}", n, got, role, want);
            }
        }
    }

    #[test]
    fn stray_ink_in_a_quadrant_is_reported() {
        let mut img = render(numeral(1234));
        draw_line(&mut img, Point::new(200.0, 70.0), Point::new(200.0, 130.0), STROKE_WIDTH, INK);
        let err = extract_gray(&img, &ExtractOptions::default()).unwrap_err();
        assert!(
            matches!(err, RecognitionError::UnexplainedInk { role: Role::Units, pixels } if pixels > 100),
            "{:?}",
            err
        );
        assert_eq!(err.role(), Some(Role::Units));
        assert!(err.to_string().contains("top-right"), "{}", err);
    }

    #[test]
    fn short_lines_are_not_a_stave() {
        let mut img = blank_canvas(200, 200);
        draw_line(&mut img, Point::new(20.0, 100.0), Point::new(180.0, 100.0), 5.0, INK);
        draw_line(&mut img, Point::new(100.0, 90.0), Point::new(100.0, 105.0), 5.0, INK);
        let err = extract_gray(&img, &ExtractOptions::default()).unwrap_err();
        assert!(matches!(err, RecognitionError::StaveNotFound { .. }), "{:?}", err);
    }

    #[test]
    fn stave_must_dominate_the_drawing() {
        let mut img = blank_canvas(200, 400);
        draw_line(&mut img, Point::new(100.0, 150.0), Point::new(100.0, 250.0), 5.0, INK);
        draw_line(&mut img, Point::new(10.0, 20.0), Point::new(130.0, 380.0), 5.0, INK);
        let err = extract_gray(&img, &ExtractOptions::default()).unwrap_err();
        assert!(matches!(err, RecognitionError::StaveNotFound { .. }), "{:?}", err);
    }

    /// A 5 px wide stave on rows 10..=109 plus a short bar `gap` rows below it.
    fn stave_with_bar_below(gap: u32) -> InkMask {
        let bar = 109 + gap;
        InkMask::from_fn(80, 140, |x, y| {
            ((20..25).contains(&x) && (10..110).contains(&y))
                || ((40..60).contains(&x) && (bar..bar + 3).contains(&y))
        })
    }

    #[test]
    fn stave_coverage_threshold() {
        // 100 of 108 rows
        let stave = locate_stave(&stave_with_bar_below(6)).unwrap();
        assert_eq!(stave.frame.top, Point::new(22.0, 12.0));
        assert_eq!(stave.frame.bottom, Point::new(22.0, 107.0));

        // 100 of 112 rows
        let err = locate_stave(&stave_with_bar_below(10)).unwrap_err();
        assert!(
            matches!(&err, RecognitionError::StaveNotFound { reason } if reason.contains("need 90%")),
            "{:?}",
            err
        );
        assert_eq!(STAVE_COVERAGE, 0.9);
    }

    #[test]
    fn large_images_are_analysed_at_working_size() {
        let img = render(numeral(6789));
        let big = image::imageops::resize(&img, 900, 1200, image::imageops::FilterType::Nearest);
        let opts = ExtractOptions { working_long_side: 400 };
        let ex = extract_gray(&big, &opts).unwrap();
        // stave reported in the caller's coordinates
        assert!((ex.stave.frame.top.x - 451.0).abs() < 6.0, "{:?}", ex.stave);
        assert_eq!(ex.strokes.thousands, glyph(6).unwrap());
        assert_eq!(ex.strokes.hundreds, glyph(7).unwrap());
        assert_eq!(ex.strokes.tens, glyph(8).unwrap());
        assert_eq!(ex.strokes.units, glyph(9).unwrap());
    }

    #[test]
    fn segments_follow_detected_strokes() {
        let ex = extract_gray(&render(numeral(5)), &ExtractOptions::default()).unwrap();
        let segs = ex.segments();
        assert_eq!(segs.len(), 2);
        assert!(segs.iter().all(|s| s.role == Role::Units));
        assert_eq!(segs[0].stroke, Stroke::AnchorBar);
        assert_eq!(segs[1].stroke, Stroke::RisingDiagonal);
    }
}
