//! # modlog
//!
//! modlog is a small logging library that binds one [`Logger`] to each module
//! of an application. Every line is written to standard output and,
//! **when a log directory is configured, appended to a per-module log file**
//! named `<module>.log`, or `<module>.<yyyy-MM-dd>.log` when daily rotation is
//! enabled. Lines share one fixed, sortable layout:
//!
//! ```text
//! 2025-04-01 19:55:03.127 [WARN ] [Worker] run - disk low
//! ```
//!
//! Configuration is an explicit [`LoggerConfig`] value. It can be resolved
//! from three environment variables:
//!
//! * `MODLOG_LOG_LEVEL` - minimum severity, one of `DEBUG`, `INFO`, `WARN`,
//!   `ERROR`, `FATAL` (default `DEBUG`).
//! * `MODLOG_LOG_ROTATE_DAILY` - `true` to add the current date to the file
//!   name (default `false`).
//! * `MODLOG_LOG_DIR` - directory for the log files. File output is disabled
//!   when unset.
//!
//! ## Example
//!
//! ```rust
//! use modlog::{Level, LoggerBuilder};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dir = std::env::temp_dir().join("modlog-doc");
//!     let logger = LoggerBuilder::new("Worker")
//!         .min_level(Level::Info)
//!         .rotate_daily(true) // Worker.2025-04-01.log
//!         .directory(&dir)
//!         .build();
//!
//!     logger.debug("run", "tick"); // below the minimum, dropped
//!     logger.info("run", "worker started");
//!     logger.warn("run", format_args!("disk low: {}%", 93));
//!
//!     Ok(())
//! }
//! ```
//!
//! A failing file write never surfaces to the caller: it is reported on the
//! error channel (stderr by default) and as a `tracing` event, and the line is
//! still considered delivered through the console.
use {
    chrono::{DateTime, FixedOffset, Local, Utc},
    std::path::PathBuf,
};

mod config;
mod level;
mod logger;

pub use {
    config::{LoggerConfig, LOG_DIR_ENV, LOG_LEVEL_ENV, LOG_ROTATE_DAILY_ENV},
    level::Level,
    logger::{log_file_path, ExitHook, LogRecord, Logger, LoggerBuilder},
};

/// Label used by the logger when it reports on its own failures.
pub(crate) const SELF_MODULE: &str = "modlog";

/// Specifies the time zone used for line timestamps and for the date suffix of
/// daily-rotated log file names.
///
/// # Examples
/// ```
/// use modlog::TimeZone;
/// use chrono::FixedOffset;
///
/// // Use UTC time for global deployments
/// let utc = TimeZone::UTC;
///
/// // Use local system time zone (changes with system settings)
/// let local = TimeZone::Local;
///
/// // Use a fixed offset for a specific region (e.g., UTC-6 for Mexico City)
/// let mexico_city = TimeZone::Fix(FixedOffset::west_opt(6 * 3600).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeZone {
    /// Use UTC time zone. Best for consistent timing in distributed systems
    /// or when deploying across multiple regions.
    UTC,
    /// Use the system's local time zone.
    #[default]
    Local,
    /// Use a fixed time zone offset regardless of where the application runs.
    Fix(FixedOffset),
}

impl TimeZone {
    /// Get the current time in this time zone.
    pub(crate) fn now(&self) -> DateTime<FixedOffset> {
        match self {
            TimeZone::UTC => Utc::now().fixed_offset(),
            TimeZone::Local => Local::now().fixed_offset(),
            TimeZone::Fix(offset) => Utc::now().with_timezone(offset),
        }
    }
}

/// Errors that can occur when configuring or running a logger.
///
/// Only [`LoggerError::InvalidLevel`] is ever returned to callers; the file
/// related variants describe failures that are reported on the logger's error
/// channel and otherwise swallowed.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("Invalid log level '{0}': expected one of DEBUG, INFO, WARN, ERROR, FATAL")]
    InvalidLevel(String),
    #[error("Failed to create directory '{0}': {1}")]
    CreateDirectoryFailed(PathBuf, String),
    #[error("Failed to create file '{0}': {1}")]
    CreateFileFailed(PathBuf, String),
    #[error("Failed to set file permissions for '{path}': {error}")]
    SetFilePermissionsError { path: PathBuf, error: String },
    #[error("File IO error: {0}")]
    FileIOError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_time_zone_applies_offset() {
        let offset = FixedOffset::east_opt(8 * 3600).unwrap();
        let now = TimeZone::Fix(offset).now();
        assert_eq!(*now.offset(), offset);
    }

    #[test]
    fn utc_time_zone_has_zero_offset() {
        assert_eq!(TimeZone::UTC.now().offset().local_minus_utc(), 0);
    }

    #[test]
    fn invalid_level_message_names_the_value() {
        let err = LoggerError::InvalidLevel("verbose".to_string());
        assert!(err.to_string().contains("'verbose'"));
    }
}
