//! # Image I/O
//!
//! PNG encoding, data URLs and the upload guards applied before any pixel
//! is decoded.
//!
//! Guards run in this order and the first violation wins:
//!
//! 1. file extension (files only), case-insensitive
//! 2. byte size against [`Config::max_input_bytes`]
//! 3. container format, sniffed from the leading bytes

use std::io::Cursor;
use std::path::Path;

use base64::{Engine as _, engine::general_purpose};
use image::{DynamicImage, GrayImage, ImageFormat};
use log::debug;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Prefix of every data URL produced by [`to_data_url`].
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Encode a grayscale image as PNG.
pub fn encode_png(img: &GrayImage) -> AppResult<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| AppError::image("encode_png", e))?;
    Ok(buf.into_inner())
}

/// Wrap PNG bytes in a `data:image/png;base64,` URL.
pub fn to_data_url(png: &[u8]) -> String {
    format!("{}{}", PNG_DATA_URL_PREFIX, general_purpose::STANDARD.encode(png))
}

/// Bytes carried by a data URL.
///
/// Everything up to and including the first `,` is dropped; a string without
/// a comma is taken to be bare base64.
pub fn decode_data_url(url: &str) -> AppResult<Vec<u8>> {
    let payload = match url.split_once(',') {
        Some((_, payload)) => payload,
        None => url,
    };
    let payload = payload.trim();
    if payload.is_empty() {
        return Err(AppError::validation("data_url", "non-empty base64 payload", "")
            .with_operation("decode_data_url"));
    }
    general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| AppError::base64(e).with_operation("decode_data_url"))
}

/// Reject files whose extension is not allowed.
pub fn check_extension(path: &Path, config: &Config) -> AppResult<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    if config.is_allowed_extension(ext) {
        return Ok(());
    }
    Err(AppError::validation(
        "extension",
        format!("one of {}", config.allowed_extensions.join(", ")),
        ext,
    )
    .with_recovery_suggestion("convert the image to PNG, JPEG or GIF")
    .with_metadata("path", path.display().to_string()))
}

/// Reject inputs larger than the configured maximum.
pub fn check_size(len: u64, config: &Config) -> AppResult<()> {
    if len <= config.max_input_bytes {
        return Ok(());
    }
    Err(AppError::validation(
        "size",
        format!("at most {} bytes", config.max_input_bytes),
        len.to_string(),
    )
    .with_recovery_suggestion("reduce the image's resolution or file size"))
}

/// Decode image bytes after the size and format guards.
pub fn load_image(bytes: &[u8], config: &Config) -> AppResult<DynamicImage> {
    check_size(bytes.len() as u64, config)?;
    let format = image::guess_format(bytes).map_err(|e| AppError::image("guess_format", e))?;
    if !format
        .extensions_str()
        .iter()
        .any(|ext| config.is_allowed_extension(ext))
    {
        return Err(AppError::validation(
            "format",
            format!("one of {}", config.allowed_extensions.join(", ")),
            format!("{:?}", format),
        ));
    }
    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| AppError::image("decode", e))?;
    debug!(
        "loaded {:?} image {}x{} ({} bytes)",
        format,
        img.width(),
        img.height(),
        bytes.len()
    );
    Ok(img)
}

/// Read an upload from disk, checking extension and size before reading.
pub fn read_upload(path: &Path, config: &Config) -> AppResult<Vec<u8>> {
    check_extension(path, config)?;
    let display = path.display().to_string();
    let meta = std::fs::metadata(path).map_err(|e| AppError::io_with_path("stat", &display, e))?;
    check_size(meta.len(), config)?;
    std::fs::read(path).map_err(|e| AppError::io_with_path("read", display, e))
}
