//! Logger bootstrap for the command-line tool.
//!
//! Logs go to stderr so JSON reports on stdout stay machine-readable.
//! `RUST_LOG`, when set, takes precedence over the configured level.

use flexi_logger::{Logger, LoggerHandle};
use log::info;

use crate::error::{AppError, AppResult};

/// Normalize a level name; `warning` is accepted for `warn`.
pub fn normalize_level(level: &str) -> AppResult<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "off" => Ok("off"),
        "error" => Ok("error"),
        "warn" | "warning" => Ok("warn"),
        "info" => Ok("info"),
        "debug" => Ok("debug"),
        "trace" => Ok("trace"),
        other => Err(AppError::config(
            "log_level",
            other,
            "expected off|error|warn|info|debug|trace",
        )),
    }
}

/// Start logging to stderr.
///
/// The returned handle must be kept alive for as long as logging is needed.
pub fn init_logging(level: &str) -> AppResult<LoggerHandle> {
    let level = normalize_level(level)?;
    let handle = Logger::try_with_env_or_str(level)
        .map_err(|err| AppError::config("log_level", level, err.to_string()))?
        .log_to_stderr()
        .format(flexi_logger::default_format)
        .start()
        .map_err(|err| AppError::config("logger", level, err.to_string()))?;
    info!(
        "event=app_start level={} version={}",
        level,
        env!("CARGO_PKG_VERSION")
    );
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::normalize_level;

    #[test]
    fn normalize_level_accepts_known_values() {
        assert_eq!(normalize_level("WARNING").unwrap(), "warn");
        assert_eq!(normalize_level(" debug ").unwrap(), "debug");
        assert_eq!(normalize_level("off").unwrap(), "off");
    }

    #[test]
    fn normalize_level_rejects_unknown_values() {
        let err = normalize_level("verbose").unwrap_err();
        assert_eq!(err.category(), "config");
    }
}
