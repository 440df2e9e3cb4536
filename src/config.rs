use {
    crate::{Level, LoggerError},
    std::path::PathBuf,
};

/// Environment variable holding the minimum level.
pub const LOG_LEVEL_ENV: &str = "MODLOG_LOG_LEVEL";
/// Environment variable enabling the daily date suffix on log file names.
pub const LOG_ROTATE_DAILY_ENV: &str = "MODLOG_LOG_ROTATE_DAILY";
/// Environment variable holding the log file directory.
pub const LOG_DIR_ENV: &str = "MODLOG_LOG_DIR";

/// Configuration snapshot for a [`Logger`](crate::Logger).
///
/// The default is the most verbose setup with console output only:
/// DEBUG minimum, no daily rotation, no directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Lines below this level are dropped.
    pub min_level: Level,
    /// Add the current date to the log file name.
    pub rotate_daily: bool,
    /// Directory for the log file. `None` disables file output.
    pub directory: Option<PathBuf>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        LoggerConfig {
            min_level: Level::Debug,
            rotate_daily: false,
            directory: None,
        }
    }
}

impl LoggerConfig {
    /// Resolve the configuration from the process environment.
    ///
    /// See [`LoggerConfig::from_lookup`] for the rules applied to each
    /// variable.
    pub fn from_env() -> Result<Self, LoggerError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve the configuration from an arbitrary variable lookup.
    ///
    /// * [`LOG_LEVEL_ENV`] - absent means DEBUG. A value that is not exactly one
    ///   of the five level names (case-sensitive, empty included) is an error.
    /// * [`LOG_ROTATE_DAILY_ENV`] - `true`/`false` in any case; anything else
    ///   falls back to `false`.
    /// * [`LOG_DIR_ENV`] - absent or blank means no file output.
    ///
    /// # Arguments
    /// * `lookup` - Returns the raw value of a variable, if set.
    /// # Returns
    /// The resolved configuration, or [`LoggerError::InvalidLevel`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LoggerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let min_level = match lookup(LOG_LEVEL_ENV) {
            Some(raw) => raw.parse()?,
            None => Level::Debug,
        };
        let rotate_daily = parse_bool(lookup(LOG_ROTATE_DAILY_ENV), false);
        let directory = lookup(LOG_DIR_ENV)
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from);

        Ok(LoggerConfig {
            min_level,
            rotate_daily,
            directory,
        })
    }
}

/// Lenient boolean parsing: unknown or blank values yield `default`.
fn parse_bool(raw: Option<String>, default: bool) -> bool {
    match raw.as_deref().map(str::trim) {
        Some(v) if v.eq_ignore_ascii_case("true") => true,
        Some(v) if v.eq_ignore_ascii_case("false") => false,
        _ => default,
    }
}
