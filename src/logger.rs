use {
    crate::{Level, LoggerConfig, LoggerError, TimeZone, SELF_MODULE},
    chrono::{DateTime, FixedOffset, NaiveDate},
    std::{
        any,
        backtrace::{Backtrace, BacktraceStatus},
        error::Error,
        fmt,
        fs::{self, Permissions},
        io::{self, Write as _},
        path::{self, Path, PathBuf},
        sync::{Mutex, MutexGuard, PoisonError},
    },
};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Function called by [`Logger::fatal`] once the FATAL line is written.
/// Defaults to [`std::process::exit`].
pub type ExitHook = fn(i32) -> !;

type Sink = Mutex<Box<dyn io::Write + Send>>;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";
const DATE_FORMAT: &str = "%Y-%m-%d";
const FATAL_EXIT_STATUS: i32 = 1;

/// Derive the log file path for a module.
///
/// Returns `<directory>/<module>.log`, or `<directory>/<module>.<yyyy-MM-dd>.log`
/// when `rotate_daily` is set.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use modlog::log_file_path;
/// use std::path::Path;
///
/// let date = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
/// assert_eq!(log_file_path("/var/log", "Worker", true, date), Path::new("/var/log/Worker.2025-04-01.log"));
/// assert_eq!(log_file_path("/var/log", "Worker", false, date), Path::new("/var/log/Worker.log"));
/// ```
pub fn log_file_path<P: AsRef<Path>>(directory: P, module: &str, rotate_daily: bool, date: NaiveDate) -> PathBuf {
    let filename = if rotate_daily {
        format!("{module}.{}.log", date.format(DATE_FORMAT))
    } else {
        format!("{module}.log")
    };
    directory.as_ref().join(filename)
}

/// A single log line before formatting. Built per call and discarded.
#[derive(Debug, Clone)]
pub struct LogRecord<'a> {
    pub timestamp: DateTime<FixedOffset>,
    pub level: Level,
    pub module: &'a str,
    pub submodule: &'a str,
    pub message: &'a str,
}

impl<'a> LogRecord<'a> {
    /// Create a record. An absent message is logged as an empty string.
    pub fn new(
        timestamp: DateTime<FixedOffset>,
        level: Level,
        module: &'a str,
        submodule: &'a str,
        message: Option<&'a str>,
    ) -> Self {
        LogRecord {
            timestamp,
            level,
            module,
            submodule,
            message: message.unwrap_or_default(),
        }
    }

    /// Format as `<yyyy-MM-dd HH:mm:ss.SSS> [<LEVEL>] [<module>] <submodule> - <message>`.
    pub fn format_line(&self) -> String {
        format!(
            "{} [{}] [{}] {} - {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.level.label(),
            self.module,
            self.submodule,
            self.message
        )
    }
}

/// A logger bound to one module.
///
/// Every emitted line goes to the console sink (stdout by default) and, when
/// a log file was prepared at construction, is appended to that file. The
/// file is opened, appended to and closed on each call, so there is nothing
/// to tear down.
///
/// The file path is fixed when the logger is built. A long-running process
/// with daily rotation keeps writing to the file of the day it started on.
pub struct Logger {
    module: String,
    min_level: Level,
    rotate_daily: bool,
    log_file: Option<PathBuf>,
    file_mode: Option<u32>,
    time_zone: TimeZone,
    console: Sink,
    errors: Sink,
    exit_hook: ExitHook,
}

impl Logger {
    /// Create a logger for `module`, configured from the environment.
    ///
    /// # Errors
    /// [`LoggerError::InvalidLevel`] when `MODLOG_LOG_LEVEL` is set to
    /// something other than a level name.
    pub fn new(module: impl Into<String>) -> Result<Self, LoggerError> {
        Ok(LoggerBuilder::new(module).config(LoggerConfig::from_env()?).build())
    }

    /// Create a logger named after the type `T`, configured from the
    /// environment. `my_app::jobs::Worker<u8>` yields the module `Worker`.
    pub fn for_type<T: ?Sized>() -> Result<Self, LoggerError> {
        Self::new(short_type_name::<T>())
    }

    /// The module label written in every line.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// The minimum level a line needs to be emitted.
    pub fn level(&self) -> Level {
        self.min_level
    }

    /// Change the minimum level. Takes effect on the next call.
    pub fn set_level(&mut self, level: Level) {
        self.min_level = level;
    }

    /// Whether the log file name carries the date.
    pub fn rotate_daily(&self) -> bool {
        self.rotate_daily
    }

    /// Record the rotation flag. The log file path was derived at
    /// construction and is not recomputed.
    pub fn set_rotate_daily(&mut self, rotate_daily: bool) {
        self.rotate_daily = rotate_daily;
    }

    /// The file lines are appended to, if file output is enabled.
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    /// Time zone of line timestamps and of the file name date.
    pub fn time_zone(&self) -> TimeZone {
        self.time_zone
    }

    /// Emit `message` at `level` if the level passes the minimum.
    ///
    /// Never fails: console and file write errors are swallowed, file errors
    /// are reported on the error channel.
    pub fn emit<M: fmt::Display>(&self, level: Level, submodule: &str, message: M) {
        self.emit_optional(level, submodule, Some(message));
    }

    /// Same as [`Logger::emit`], logging `None` as an empty message.
    pub fn emit_optional<M: fmt::Display>(&self, level: Level, submodule: &str, message: Option<M>) {
        if level < self.min_level {
            return;
        }
        let message = message.map(|m| m.to_string());
        let record = LogRecord::new(self.time_zone.now(), level, &self.module, submodule, message.as_deref());
        self.dispatch(&record, true);
    }

    /// Emit `message` at DEBUG.
    pub fn debug<M: fmt::Display>(&self, submodule: &str, message: M) {
        self.emit(Level::Debug, submodule, message);
    }

    /// Emit `message` at INFO.
    pub fn info<M: fmt::Display>(&self, submodule: &str, message: M) {
        self.emit(Level::Info, submodule, message);
    }

    /// Emit `message` at WARN.
    pub fn warn<M: fmt::Display>(&self, submodule: &str, message: M) {
        self.emit(Level::Warn, submodule, message);
    }

    /// Emit `message` at ERROR.
    pub fn error<M: fmt::Display>(&self, submodule: &str, message: M) {
        self.emit(Level::Error, submodule, message);
    }

    /// Emit `message` at FATAL, then **terminate the process** with exit
    /// status 1 through the exit hook.
    ///
    /// FATAL outranks every other level, so the line is written whatever the
    /// configured minimum is. The whole process ends, not only the caller.
    pub fn fatal<M: fmt::Display>(&self, submodule: &str, message: M) -> ! {
        self.emit(Level::Fatal, submodule, message);
        (self.exit_hook)(FATAL_EXIT_STATUS)
    }

    /// Log an error value at ERROR as `<type name>: <message>`.
    ///
    /// For trait objects such as `dyn Error + Send + Sync` the type name is
    /// taken from the value's `Debug` output.
    ///
    /// When the minimum level is DEBUG, the chain of `source()` errors and a
    /// call-site backtrace are also written to the console. They never reach
    /// the log file.
    pub fn exception_in<E: Error + ?Sized>(&self, submodule: &str, error: &E) {
        self.emit(Level::Error, submodule, format_args!("{}: {error}", error_type_name(error)));
        if self.min_level == Level::Debug {
            self.write_trace(error);
        }
    }

    /// [`Logger::exception_in`] with the submodule label `exception`.
    pub fn exception<E: Error + ?Sized>(&self, error: &E) {
        self.exception_in("exception", error);
    }

    /// Write a record to the console and, if `to_file`, to the log file.
    fn dispatch(&self, record: &LogRecord<'_>, to_file: bool) {
        let line = record.format_line();
        {
            let mut console = lock(&self.console);
            if let Err(err) = writeln!(console, "{line}").and_then(|_| console.flush()) {
                tracing::warn!(module = %self.module, error = %err, "failed to write log line to console");
            }
        }
        if !to_file {
            return;
        }
        if let Some(path) = &self.log_file {
            if let Err(err) = append_line(path, &line, self.file_mode) {
                self.report("append", &format!("{}: {err}", path.display()));
            }
        }
    }

    /// Report a failure of the logger itself on the error channel.
    fn report(&self, submodule: &str, message: &str) {
        tracing::warn!(module = %self.module, submodule, "{message}");
        let record = LogRecord::new(self.time_zone.now(), Level::Error, SELF_MODULE, submodule, Some(message));
        let mut errors = lock(&self.errors);
        let _ = writeln!(errors, "{}", record.format_line()).and_then(|_| errors.flush());
    }

    fn write_trace<E: Error + ?Sized>(&self, error: &E) {
        let mut console = lock(&self.console);
        let res = (|| -> io::Result<()> {
            let mut source = error.source();
            while let Some(cause) = source {
                writeln!(console, "    caused by: {cause}")?;
                source = cause.source();
            }
            let backtrace = Backtrace::force_capture();
            if backtrace.status() == BacktraceStatus::Captured {
                writeln!(console, "{backtrace}")?;
            }
            console.flush()
        })();
        if let Err(err) = res {
            tracing::warn!(module = %self.module, error = %err, "failed to write error trace to console");
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("module", &self.module)
            .field("min_level", &self.min_level)
            .field("rotate_daily", &self.rotate_daily)
            .field("log_file", &self.log_file)
            .field("time_zone", &self.time_zone)
            .finish_non_exhaustive()
    }
}

fn lock(sink: &Sink) -> MutexGuard<'_, Box<dyn io::Write + Send>> {
    sink.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Name of the error's type.
///
/// `type_name` only knows the trait for unsized errors, so the leading
/// identifier of the `Debug` output is used instead, falling back to the
/// trait name when there is none.
fn error_type_name<E: Error + ?Sized>(error: &E) -> String {
    let name = any::type_name::<E>();
    if !name.starts_with("dyn ") {
        return name.to_string();
    }
    let head: String = format!("{error:?}")
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    if head.is_empty() {
        name.to_string()
    } else {
        head
    }
}

/// Short name of a type: no module path, no generic arguments.
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Open the log file for appending.
/// If the file does not exist it is created, along with its directory.
/// # Arguments
/// * `log_path` - The path to the log file.
/// # Returns
/// The log file, opened in append mode, and whether it was just created.
fn open_log_file(log_path: &Path) -> Result<(fs::File, bool), LoggerError> {
    let existed = log_path.exists();
    let mut open_options = fs::OpenOptions::new();
    open_options.append(true).create(true);

    let mut open_res = open_options.open(log_path);
    if open_res.is_err() {
        // Create the directory if it doesn't exist
        if let Some(parent) = log_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| LoggerError::CreateDirectoryFailed(parent.to_path_buf(), err.to_string()))?;
            open_res = open_options.open(log_path);
        }
    }

    let log_file = open_res.map_err(|err| LoggerError::CreateFileFailed(log_path.to_path_buf(), err.to_string()))?;

    Ok((log_file, !existed))
}

/// Append one newline-terminated line, closing the file afterwards.
/// The mode is applied after writing, so a failing chmod never drops the line.
fn append_line(log_path: &Path, line: &str, file_mode: Option<u32>) -> Result<(), LoggerError> {
    let (mut file, created) = open_log_file(log_path)?;
    writeln!(file, "{line}")?;
    file.flush()?;
    if created {
        set_permissions(log_path, file_mode)?;
    }
    Ok(())
}

/// Set the permissions of a file (Unix-like systems only).
///
/// Does nothing when no mode is configured. On other platforms a warning is
/// printed and the mode is ignored.
fn set_permissions(path: &Path, file_mode: Option<u32>) -> Result<(), LoggerError> {
    if let Some(mode) = file_mode {
        #[cfg(unix)]
        {
            let perms = Permissions::from_mode(mode);
            fs::set_permissions(path, perms).map_err(|err| LoggerError::SetFilePermissionsError {
                path: path.to_path_buf(),
                error: err.to_string(),
            })?
        }
        #[cfg(not(unix))]
        {
            let _ = path;
            eprintln!("Warning: Setting file permissions is not supported on non-Unix platforms");
        }
    }
    Ok(())
}

/// Settings collected by [`LoggerBuilder`].
#[derive(Clone)]
struct LoggerMeta {
    /// The module label, also the stem of the log file name.
    module: String,
    config: LoggerConfig,
    /// Time zone for timestamps and the daily file suffix.
    time_zone: TimeZone,
    /// The file permissions to set on newly created log files (Unix-like
    /// systems only), in octal notation (e.g., 0o644 for rw-r--r--).
    file_mode: Option<u32>,
}

/// Provides a fluent interface for configuring [`Logger`] instances.
///
/// # Default Configuration
///
/// If not explicitly configured, a logger uses:
/// * DEBUG minimum level
/// * No daily rotation, no directory (console only)
/// * Local system time zone
/// * stdout as console, stderr as error channel
/// * [`std::process::exit`] as exit hook
///
/// # Examples
///
/// ```rust
/// use modlog::{Level, LoggerBuilder, TimeZone};
///
/// let logger = LoggerBuilder::new("Scheduler")
///     .min_level(Level::Warn)
///     .time_zone(TimeZone::UTC)
///     .build();
/// assert_eq!(logger.log_file(), None);
/// ```
pub struct LoggerBuilder {
    meta: LoggerMeta,
    console: Box<dyn io::Write + Send>,
    errors: Box<dyn io::Write + Send>,
    exit_hook: ExitHook,
}

impl LoggerBuilder {
    /// Create a new logger builder for `module`.
    pub fn new(module: impl Into<String>) -> Self {
        LoggerBuilder {
            meta: LoggerMeta {
                module: module.into(),
                config: LoggerConfig::default(),
                time_zone: TimeZone::Local,
                file_mode: None,
            },
            console: Box::new(io::stdout()),
            errors: Box::new(io::stderr()),
            exit_hook: std::process::exit,
        }
    }

    /// Replace the whole configuration, e.g. with [`LoggerConfig::from_env`].
    pub fn config(self, config: LoggerConfig) -> Self {
        Self {
            meta: LoggerMeta { config, ..self.meta },
            ..self
        }
    }

    /// Lines below this level are dropped.
    pub fn min_level(mut self, min_level: Level) -> Self {
        self.meta.config.min_level = min_level;
        self
    }

    /// Add the build date to the log file name.
    pub fn rotate_daily(mut self, rotate_daily: bool) -> Self {
        self.meta.config.rotate_daily = rotate_daily;
        self
    }

    /// Enable file output into `directory`. A relative directory is resolved
    /// against the working directory once, in [`LoggerBuilder::build`].
    pub fn directory<P: AsRef<Path>>(mut self, directory: P) -> Self {
        self.meta.config.directory = Some(directory.as_ref().to_path_buf());
        self
    }

    /// Time zone for timestamps and the daily file suffix.
    pub fn time_zone(self, time_zone: TimeZone) -> Self {
        Self {
            meta: LoggerMeta { time_zone, ..self.meta },
            ..self
        }
    }

    /// Set the file permissions for newly created log files (Unix-like
    /// systems only), e.g. 0o640 for rw-r-----.
    pub fn file_mode(self, mode: u32) -> Self {
        Self {
            meta: LoggerMeta {
                file_mode: Some(mode),
                ..self.meta
            },
            ..self
        }
    }

    /// Writer receiving every emitted line. Defaults to stdout.
    pub fn console<W: io::Write + Send + 'static>(self, writer: W) -> Self {
        Self {
            console: Box::new(writer),
            ..self
        }
    }

    /// Writer receiving the logger's own failures. Defaults to stderr.
    pub fn error_channel<W: io::Write + Send + 'static>(self, writer: W) -> Self {
        Self {
            errors: Box::new(writer),
            ..self
        }
    }

    /// Function [`Logger::fatal`] calls after writing its line.
    pub fn exit_hook(self, exit_hook: ExitHook) -> Self {
        Self { exit_hook, ..self }
    }

    /// Build the logger.
    ///
    /// With a directory configured, the directory is made absolute, the log
    /// file path is derived from today's date in the configured time zone and
    /// the directory and file are created if missing. If that fails, an ERROR
    /// line is written to the console only and the logger runs without file
    /// output for its whole lifetime. A failure to apply the file mode is
    /// reported on the error channel and file output stays on.
    pub fn build(self) -> Logger {
        let LoggerBuilder {
            meta,
            console,
            errors,
            exit_hook,
        } = self;

        let mut logger = Logger {
            module: meta.module.clone(),
            min_level: meta.config.min_level,
            rotate_daily: meta.config.rotate_daily,
            log_file: None,
            file_mode: meta.file_mode,
            time_zone: meta.time_zone,
            console: Mutex::new(console),
            errors: Mutex::new(errors),
            exit_hook,
        };

        if let Some(directory) = &meta.config.directory {
            let prepared = path::absolute(directory)
                .map_err(LoggerError::from)
                .and_then(|directory| {
                    let path = log_file_path(
                        directory,
                        &meta.module,
                        meta.config.rotate_daily,
                        meta.time_zone.now().date_naive(),
                    );
                    let (_, created) = open_log_file(&path)?;
                    Ok((path, created))
                });
            match prepared {
                Ok((path, created)) => {
                    tracing::debug!(module = %meta.module, path = %path.display(), "log file ready");
                    if created {
                        if let Err(err) = set_permissions(&path, meta.file_mode) {
                            logger.report("prepare_log_file", &err.to_string());
                        }
                    }
                    logger.log_file = Some(path);
                }
                Err(err) => {
                    tracing::warn!(module = %meta.module, error = %err, "file output disabled");
                    if Level::Error >= logger.min_level {
                        let message = err.to_string();
                        let record = LogRecord::new(
                            logger.time_zone.now(),
                            Level::Error,
                            SELF_MODULE,
                            "prepare_log_file",
                            Some(&message),
                        );
                        logger.dispatch(&record, false);
                    }
                }
            }
        }

        logger
    }
}
