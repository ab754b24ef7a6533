//! # Cistercian Numerals
//!
//! Encode numbers in `0..=9999` as Cistercian numeral images and read them back.
//!
//! This crate is the boundary around [`cistercian_codec`]: it turns renderings
//! into PNG data URLs with a JSON-friendly segment map, and turns uploads
//! (files, raw bytes or data URLs) into recognized numbers after checking their
//! size and type.
//!
//! ## Modules
//!
//! - [`config`]: limits and options shared by the CLI and the library
//! - [`error`]: [`AppError`] with context, severity and recovery suggestions
//! - [`image_io`]: PNG encoding, data URLs, upload guards
//! - [`report`]: serializable encode/decode reports
//! - [`logging`]: stderr logger bootstrap
//!
//! ## Example
//!
//! ```rust
//! use cistercian::{config::Config, recognize_data_url, render};
//!
//! let config = Config::default();
//! let encoded = render(1234, &config)?;
//! assert!(encoded.image.starts_with("data:image/png;base64,"));
//!
//! let decoded = recognize_data_url(&encoded.image, &config)?;
//! assert_eq!(decoded.number, 1234);
//! # Ok::<(), cistercian::error::AppError>(())
//! ```

pub mod config;
pub mod error;
pub mod image_io;
pub mod logging;
pub mod report;

use std::path::Path;

use cistercian_codec::{Frame, recognize_gray};
use image::DynamicImage;
use log::info;

pub use cistercian_codec as codec;

use crate::config::Config;
pub use crate::error::{AppError, AppResult};
use crate::report::{DecodeReport, Digits, EncodeReport, SegmentMap};

/// Encode `number` as a PNG data URL, with its segment map when
/// `config.include_segments` is set.
pub fn render(number: i64, config: &Config) -> AppResult<EncodeReport> {
    let rendering = cistercian_codec::encode(number, config.include_segments)
        .map_err(|e| AppError::codec(e).with_operation("render"))?;
    let png = image_io::encode_png(&rendering.image)?;
    let segments = rendering
        .segments
        .as_deref()
        .map(|segs| SegmentMap::new(&Frame::canonical(), segs));
    info!(
        "rendered {} ({} bytes of PNG)",
        rendering.numeral.value(),
        png.len()
    );
    Ok(EncodeReport {
        number: rendering.numeral.value(),
        image: image_io::to_data_url(&png),
        segments,
        png,
    })
}

/// Recognize an already decoded image.
pub fn recognize_image(img: &DynamicImage, config: &Config) -> AppResult<DecodeReport> {
    let recognition = recognize_gray(&img.to_luma8(), &config.extract_options())
        .map_err(|e| AppError::codec(e.into()).with_operation("recognize"))?;
    let segments = SegmentMap::new(
        &recognition.extraction.stave.frame,
        &recognition.extraction.segments(),
    );
    info!("recognized {}", recognition.number());
    Ok(DecodeReport {
        number: recognition.number(),
        digits: Digits::from(recognition.digits()),
        segments,
    })
}

/// Recognize an image held in memory (PNG, JPEG or GIF).
pub fn recognize_bytes(bytes: &[u8], config: &Config) -> AppResult<DecodeReport> {
    let img = image_io::load_image(bytes, config)?;
    recognize_image(&img, config)
}

/// Recognize an image file, checking extension and size before reading it.
pub fn recognize_file(path: impl AsRef<Path>, config: &Config) -> AppResult<DecodeReport> {
    let path = path.as_ref();
    let bytes = image_io::read_upload(path, config)?;
    recognize_bytes(&bytes, config)
        .map_err(|e| e.with_metadata("path", path.display().to_string()))
}

/// Recognize an image carried in a data URL.
pub fn recognize_data_url(url: &str, config: &Config) -> AppResult<DecodeReport> {
    let bytes = image_io::decode_data_url(url)?;
    recognize_bytes(&bytes, config)
}
