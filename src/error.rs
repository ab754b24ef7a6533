//! # Application Error Handling
//!
//! Errors raised at the boundary of the numeral codec: reading uploads,
//! decoding data URLs, encoding PNGs and emitting reports.
//!
//! ## Architecture
//!
//! - **Error Types**: one enum, [`AppError`], with a variant per failure category
//! - **Error Context**: timestamps, operation, recovery suggestion, severity and metadata
//! - **Error Traits**: [`HasSeverity`] and [`HasRecoverySuggestion`] for callers that
//!   report errors to people
//! - **Error Chaining**: the underlying library error is kept as `source()`
//!
//! ## Usage
//!
//! ```rust
//! use cistercian::error::{AppError, HasRecoverySuggestion};
//!
//! let error = AppError::validation("extension", "one of png, jpg, jpeg, gif", "bmp")
//!     .with_operation("recognize_file")
//!     .with_recovery_suggestion("convert the image to PNG");
//!
//! assert_eq!(error.category(), "validation");
//! assert_eq!(error.recovery_suggestion(), Some("convert the image to PNG"));
//! ```

use std::{collections::HashMap, error::Error as StdError, fmt, time::SystemTime};

use cistercian_codec::CodecError;

/// Severity levels for errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational errors
    Info,
    /// Warnings; the input was understood but is not usable
    Warning,
    /// Errors that stop the current operation
    Error,
    /// Fatal errors; the process cannot continue
    Fatal,
}

/// Metadata about when and where an error occurred
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// When the error occurred
    pub timestamp: SystemTime,
    /// The operation being performed when the error occurred
    pub operation: Option<String>,
    /// Additional context about the error
    pub context: Option<String>,
    /// Suggested recovery action
    pub recovery_suggestion: Option<String>,
    /// Error severity level
    pub severity: ErrorSeverity,
    /// Additional metadata as key-value pairs
    pub metadata: HashMap<String, String>,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            timestamp: SystemTime::now(),
            operation: None,
            context: None,
            recovery_suggestion: None,
            severity: ErrorSeverity::Error,
            metadata: HashMap::new(),
        }
    }
}

impl ErrorContext {
    /// Create a new error context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set recovery suggestion
    pub fn with_recovery_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.recovery_suggestion = Some(suggestion.into());
        self
    }

    /// Set severity level
    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }
}

/// Error type of the boundary layer
#[derive(Debug)]
pub enum AppError {
    /// Range or recognition failures reported by the codec
    Codec {
        source: CodecError,
        context: ErrorContext,
    },
    /// I/O errors
    Io {
        operation: String,
        path: Option<String>,
        source: std::io::Error,
        context: ErrorContext,
    },
    /// Image container errors (unsupported or corrupt PNG/JPEG/GIF)
    Image {
        operation: String,
        source: image::ImageError,
        context: ErrorContext,
    },
    /// Malformed base64 payload in a data URL
    Base64 {
        source: base64::DecodeError,
        context: ErrorContext,
    },
    /// Input rejected before decoding
    Validation {
        field: String,
        constraint: String,
        value: String,
        context: ErrorContext,
    },
    /// Report serialization failures
    Serialization {
        source: serde_json::Error,
        context: ErrorContext,
    },
    /// Configuration validation errors
    Config {
        field: String,
        value: String,
        reason: String,
        context: ErrorContext,
    },
}

impl AppError {
    /// Wrap a codec error; range errors are the caller's to fix, unreadable
    /// images call for a better image.
    pub fn codec(source: CodecError) -> Self {
        let context = if source.is_range() {
            ErrorContext::new()
                .with_recovery_suggestion("use a whole number between 0 and 9999")
                .with_severity(ErrorSeverity::Warning)
        } else {
            ErrorContext::new().with_recovery_suggestion(
                "use a sharper, higher-contrast image containing a single numeral",
            )
        };
        Self::Codec { source, context }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: None,
            source,
            context: ErrorContext::new(),
        }
    }

    /// Create an I/O error with path information
    pub fn io_with_path(
        operation: impl Into<String>,
        path: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            operation: operation.into(),
            path: Some(path.into()),
            source,
            context: ErrorContext::new(),
        }
    }

    /// Create an image container error
    pub fn image(operation: impl Into<String>, source: image::ImageError) -> Self {
        Self::Image {
            operation: operation.into(),
            source,
            context: ErrorContext::new()
                .with_recovery_suggestion("supply a valid PNG, JPEG or GIF image"),
        }
    }

    /// Create a base64 error
    pub fn base64(source: base64::DecodeError) -> Self {
        Self::Base64 {
            source,
            context: ErrorContext::new()
                .with_recovery_suggestion("supply a data URL of the form data:image/png;base64,..."),
        }
    }

    /// Create a validation error
    pub fn validation(
        field: impl Into<String>,
        constraint: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::Validation {
            field: field.into(),
            constraint: constraint.into(),
            value: value.into(),
            context: ErrorContext::new().with_severity(ErrorSeverity::Warning),
        }
    }

    /// Create a serialization error
    pub fn serialization(source: serde_json::Error) -> Self {
        Self::Serialization {
            source,
            context: ErrorContext::new(),
        }
    }

    /// Create a configuration error
    pub fn config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Config {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
            context: ErrorContext::new().with_severity(ErrorSeverity::Fatal),
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context_mut().context = Some(context.into());
        self
    }

    /// Add operation context
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }

    /// Add recovery suggestion
    pub fn with_recovery_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context_mut().recovery_suggestion = Some(suggestion.into());
        self
    }

    /// Set severity
    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.context_mut().severity = severity;
        self
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context_mut().metadata.insert(key.into(), value.into());
        self
    }

    /// Get the error context
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::Codec { context, .. } => context,
            Self::Io { context, .. } => context,
            Self::Image { context, .. } => context,
            Self::Base64 { context, .. } => context,
            Self::Validation { context, .. } => context,
            Self::Serialization { context, .. } => context,
            Self::Config { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::Codec { context, .. } => context,
            Self::Io { context, .. } => context,
            Self::Image { context, .. } => context,
            Self::Base64 { context, .. } => context,
            Self::Validation { context, .. } => context,
            Self::Serialization { context, .. } => context,
            Self::Config { context, .. } => context,
        }
    }

    /// Get the error category as a string
    pub fn category(&self) -> &'static str {
        match self {
            Self::Codec { source, .. } if source.is_range() => "range",
            Self::Codec { .. } => "recognition",
            Self::Io { .. } => "io",
            Self::Image { .. } => "image",
            Self::Base64 { .. } => "base64",
            Self::Validation { .. } => "validation",
            Self::Serialization { .. } => "serialization",
            Self::Config { .. } => "config",
        }
    }

    /// The codec error, if this is one
    pub fn as_codec(&self) -> Option<&CodecError> {
        match self {
            Self::Codec { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Whether the caller supplied something unusable, as opposed to the
    /// environment failing.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Codec { .. } | Self::Image { .. } | Self::Base64 { .. } | Self::Validation { .. }
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Codec { source, .. } => write!(f, "{}", source),
            AppError::Io {
                operation,
                path,
                source,
                ..
            } => {
                if let Some(path) = path {
                    write!(f, "I/O error during {} on '{}': {}", operation, path, source)
                } else {
                    write!(f, "I/O error during {}: {}", operation, source)
                }
            }
            AppError::Image {
                operation, source, ..
            } => {
                write!(f, "Image error during {}: {}", operation, source)
            }
            AppError::Base64 { source, .. } => {
                write!(f, "Invalid base64 payload: {}", source)
            }
            AppError::Validation {
                field,
                constraint,
                value,
                ..
            } => {
                write!(
                    f,
                    "Validation failed for '{}': {} (value: {})",
                    field, constraint, value
                )
            }
            AppError::Serialization { source, .. } => {
                write!(f, "Failed to serialize report: {}", source)
            }
            AppError::Config {
                field,
                value,
                reason,
                ..
            } => {
                write!(
                    f,
                    "Configuration error in '{}': {} (value: {})",
                    field, reason, value
                )
            }
        }
    }
}

impl StdError for AppError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Codec { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::Image { source, .. } => Some(source),
            Self::Base64 { source, .. } => Some(source),
            Self::Serialization { source, .. } => Some(source),
            Self::Validation { .. } | Self::Config { .. } => None,
        }
    }
}

/// Result type alias using the application error type
pub type AppResult<T> = Result<T, AppError>;

/// Trait for errors with severity levels
pub trait HasSeverity {
    /// Get the severity level of this error
    fn severity(&self) -> ErrorSeverity;
}

impl HasSeverity for AppError {
    fn severity(&self) -> ErrorSeverity {
        self.context().severity
    }
}

/// Trait for errors that provide recovery suggestions
pub trait HasRecoverySuggestion {
    /// Get recovery suggestion for this error
    fn recovery_suggestion(&self) -> Option<&str>;
}

impl HasRecoverySuggestion for AppError {
    fn recovery_suggestion(&self) -> Option<&str> {
        self.context().recovery_suggestion.as_deref()
    }
}

impl From<CodecError> for AppError {
    fn from(error: CodecError) -> Self {
        Self::codec(error)
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io("unknown", error)
    }
}

impl From<image::ImageError> for AppError {
    fn from(error: image::ImageError) -> Self {
        Self::image("unknown", error)
    }
}

impl From<base64::DecodeError> for AppError {
    fn from(error: base64::DecodeError) -> Self {
        Self::base64(error)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::serialization(error)
    }
}
