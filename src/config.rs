//! # Configuration Module
//!
//! Settings shared by the CLI and the library boundary: how large an upload
//! may be, which file types are accepted, how large an image the extractor
//! works on, and whether encode reports carry stroke geometry.
//!
//! ## Configuration Parameters
//!
//! | Parameter | Type | Default | Description |
//! |-----------|------|---------|-------------|
//! | `max_input_bytes` | `u64` | 5 MiB | Largest accepted upload |
//! | `allowed_extensions` | `Vec<String>` | png, jpg, jpeg, gif | Accepted file extensions |
//! | `include_segments` | `bool` | `true` | Attach the segment map to encode reports |
//! | `working_long_side` | `u32` | 1024 | Longest side images are reduced to before recognition |
//! | `log_level` | `String` | `warn` | Level handed to the logger |
//!
//! ## Examples
//!
//! ```rust
//! use cistercian::config::Config;
//!
//! let config = Config::default()
//!     .with_working_long_side(512)
//!     .with_include_segments(false);
//! assert!(config.validate().is_ok());
//! assert!(config.is_allowed_extension("PNG"));
//! ```

use cistercian_codec::extract::{DEFAULT_WORKING_LONG_SIDE, ExtractOptions};

use crate::error::{AppError, AppResult};
use crate::logging::normalize_level;

/// Largest accepted upload, in bytes.
pub const DEFAULT_MAX_INPUT_BYTES: u64 = 5 * 1024 * 1024;

/// File types the image decoder is built for.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// Smallest working size that still leaves a readable stave.
pub const MIN_WORKING_LONG_SIDE: u32 = 128;

/// Runtime configuration for encoding and recognition.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Largest accepted input, in bytes
    pub max_input_bytes: u64,
    /// Accepted file extensions, lowercase
    pub allowed_extensions: Vec<String>,
    /// Attach the segment map to encode reports
    pub include_segments: bool,
    /// Longest side of the image the extractor works on
    pub working_long_side: u32,
    /// Log level specification
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            allowed_extensions: SUPPORTED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            include_segments: true,
            working_long_side: DEFAULT_WORKING_LONG_SIDE,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Creates a configuration with explicit values.
    pub fn new(
        max_input_bytes: u64,
        allowed_extensions: Vec<String>,
        include_segments: bool,
        working_long_side: u32,
        log_level: String,
    ) -> Self {
        Self {
            max_input_bytes,
            allowed_extensions,
            include_segments,
            working_long_side,
            log_level,
        }
    }

    pub fn with_max_input_bytes(mut self, bytes: u64) -> Self {
        self.max_input_bytes = bytes;
        self
    }

    pub fn with_include_segments(mut self, include: bool) -> Self {
        self.include_segments = include;
        self
    }

    pub fn with_working_long_side(mut self, long_side: u32) -> Self {
        self.working_long_side = long_side;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> AppResult<()> {
        if self.max_input_bytes == 0 {
            return Err(AppError::config(
                "max_input_bytes",
                "0",
                "must be greater than 0",
            ));
        }
        if self.allowed_extensions.is_empty() {
            return Err(AppError::config(
                "allowed_extensions",
                "[]",
                "at least one extension must be allowed",
            ));
        }
        if let Some(ext) = self
            .allowed_extensions
            .iter()
            .find(|e| !SUPPORTED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        {
            return Err(AppError::config(
                "allowed_extensions",
                ext.clone(),
                format!("must be one of {}", SUPPORTED_EXTENSIONS.join(", ")),
            ));
        }
        if self.working_long_side < MIN_WORKING_LONG_SIDE {
            return Err(AppError::config(
                "working_long_side",
                self.working_long_side.to_string(),
                format!("must be at least {}", MIN_WORKING_LONG_SIDE),
            ));
        }
        normalize_level(&self.log_level)?;
        Ok(())
    }

    /// Case-insensitive extension check, without the leading dot.
    pub fn is_allowed_extension(&self, ext: &str) -> bool {
        let ext = ext.trim_start_matches('.');
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext))
    }

    /// Options handed to the stroke extractor.
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            working_long_side: self.working_long_side,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.max_input_bytes, 5 * 1024 * 1024);
        assert_eq!(config.allowed_extensions, vec!["png", "jpg", "jpeg", "gif"]);
        assert!(config.include_segments);
        assert_eq!(config.working_long_side, 1024);
        assert_eq!(config.log_level, "warn");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.max_input_bytes = 0;
        assert!(config.validate().is_err());
        config.max_input_bytes = 1024;

        config.working_long_side = 64;
        assert!(config.validate().is_err());
        config.working_long_side = 128;

        config.allowed_extensions = vec![];
        assert!(config.validate().is_err());
        config.allowed_extensions = vec!["bmp".to_string()];
        let err = config.validate().unwrap_err();
        assert_eq!(err.category(), "config");
        assert!(err.to_string().contains("bmp"));
        config.allowed_extensions = vec!["PNG".to_string()];

        config.log_level = "loud".to_string();
        assert!(config.validate().is_err());
        config.log_level = "Debug".to_string();

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_extension_check_ignores_case_and_dot() {
        let config = Config::default();
        assert!(config.is_allowed_extension("png"));
        assert!(config.is_allowed_extension("JPEG"));
        assert!(config.is_allowed_extension(".gif"));
        assert!(!config.is_allowed_extension("bmp"));
        assert!(!config.is_allowed_extension(""));
    }

    #[test]
    fn test_extract_options_follow_working_size() {
        let config = Config::default().with_working_long_side(512);
        assert_eq!(config.extract_options().working_long_side, 512);
    }
}
