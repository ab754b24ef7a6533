// SPDX-License-Identifier: MIT
//! # cistercian-codec: Cistercian Numeral Rendering and Recognition
//!
//! Converts integers in `0..=9999` to Cistercian numerals and back. A numeral is
//! one vertical stave with a glyph hanging off each of its four quadrants, one
//! quadrant per decimal place.
//!
//! ## Architecture Overview
//!
//! Everything is built on a single base table of digit glyphs. The four
//! positional roles reuse it through reflections, and the encoder and the
//! extractor project strokes through the same geometry, so what is drawn and
//! what is looked for can not drift apart.
//!
//! ## Key Components
//!
//! - [`table`]: stroke primitives, roles, the glyph table and its reverse
//! - [`geometry`]: stave frames and the per-role reflections
//! - [`raster`]: fixed-width line drawing
//! - [`encoder`]: number → image (and optionally stroke geometry)
//! - [`plan`] / [`resample`]: bounding the working size of caller images
//! - [`binarize`]: Otsu thresholding, polarity, speckle removal
//! - [`extract`]: stave location and per-quadrant stroke detection
//! - [`decoder`]: strokes → number
//!
//! ## Quadrant convention
//!
//! | role      | quadrant     |
//! |-----------|--------------|
//! | units     | top-right    |
//! | tens      | top-left     |
//! | hundreds  | bottom-right |
//! | thousands | bottom-left  |
//!
//! ## Usage Example
//!
//! ```rust
//! use cistercian_codec::{decode, encode};
//!
//! let rendering = encode(1234, true)?;
//! assert_eq!(rendering.segments.as_ref().map(Vec::len), Some(4));
//!
//! let image = image::DynamicImage::ImageLuma8(rendering.image);
//! assert_eq!(decode(&image)?, 1234);
//! # Ok::<(), cistercian_codec::CodecError>(())
//! ```
//!
//! All operations are pure and synchronous; calls share nothing and may run
//! on any number of threads at once.

pub mod binarize;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod plan;
pub mod raster;
pub mod resample;
pub mod table;

pub use decoder::{decode, decode_strokes, recognize, recognize_gray, Recognition};
pub use encoder::{encode, render, Numeral, Rendering, MAX_VALUE};
pub use error::{CodecError, RangeError, RecognitionError};
pub use extract::{extract, extract_gray, ExtractOptions, Extraction, QuadrantStrokes, Stave};
pub use geometry::{Frame, Point, Segment};
pub use table::{Orientation, Role, Stroke, StrokeSet};
