//! Logging for the hwcctl command line tool.
//!
//! Coloured stderr plus a plain log file, initialised once per process.
//! Stdout is left to command output.

use crate::DEBUG_ENV;
use crate::error::HwcctlError;

use common::ErrorLocation;

use std::env;
use std::io::stderr;
use std::path::Path;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::Color::{Blue, Green, Magenta, Red, Yellow};
use fern::colors::ColoredLevelConfig;
use humantime::format_rfc3339;
use log::{LevelFilter, debug, warn};

/// Runs the dispatch setup at most once per process.
static INIT_LOGGER_ONCE: Once = Once::new();

/// Tracks if logger initialization was already attempted.
static LOGGER_ALREADY_CALLED: AtomicBool = AtomicBool::new(false);

/// Log file created inside the directory passed to [`initialize`].
pub const LOG_FILE_NAME: &str = "hwcctl.log";

/// Debug line emitted once the dispatch is applied.
const LOGGER_INITIALIZED_MESSAGE_PREFIX: &str = "Logger initialized with level: ";

/// Warning for repeated [`initialize`] calls.
const LOGGER_ALREADY_INITIALIZED_MESSAGE: &str = "Logger already initialized";

/// Debug builds show progress messages.
#[cfg(debug_assertions)]
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

/// Release builds stay quiet unless something goes wrong.
#[cfg(not(debug_assertions))]
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Warn;

/// Level for this run: Debug when `HWCCTL_DEBUG=1`, otherwise the build default.
pub fn log_level() -> LevelFilter {
    level_for(env::var(DEBUG_ENV).ok().as_deref())
}

/// Map the value of `HWCCTL_DEBUG` to a level. Only `1` and `true` enable debug.
pub fn level_for(debug_flag: Option<&str>) -> LevelFilter {
    match debug_flag.map(str::trim) {
        Some("1") | Some("true") => LevelFilter::Debug,
        _ => DEFAULT_LOG_LEVEL,
    }
}

/// Initialize the logger with dual output (stderr + file).
///
/// Safe to call multiple times: later calls log a warning and return Ok.
///
/// # Arguments
///
/// * `log_dir` - Directory for the log file, created if missing
///
/// # Errors
///
/// Returns an error if:
/// - Log directory or file cannot be created
/// - Logger dispatch configuration fails
pub fn initialize(log_dir: &Path) -> Result<(), HwcctlError> {
    if LOGGER_ALREADY_CALLED.swap(true, Ordering::SeqCst) {
        warn!("{LOGGER_ALREADY_INITIALIZED_MESSAGE}");
        return Ok(());
    }

    let mut result = Ok(());

    INIT_LOGGER_ONCE.call_once(|| {
        let level = log_level();
        result = initialize_internal(log_dir, level);
        if result.is_ok() {
            debug!("{LOGGER_INITIALIZED_MESSAGE_PREFIX}{level:?}");
        }
    });

    result
}

/// Build and apply the stderr and file dispatches at `level`.
#[track_caller]
pub(crate) fn initialize_internal(log_dir: &Path, level: LevelFilter) -> Result<(), HwcctlError> {
    std::fs::create_dir_all(log_dir).map_err(|e| HwcctlError::Hwcctl {
        message: format!("Failed to create log directory {}: {e}", log_dir.display()),
        location: ErrorLocation::from(std::panic::Location::caller()),
    })?;
    let log_file_path = log_dir.join(LOG_FILE_NAME);

    let color_configuration = ColoredLevelConfig::new()
        .debug(Blue)
        .info(Green)
        .warn(Yellow)
        .error(Red)
        .trace(Magenta);

    let base_dispatch = Dispatch::new()
        .level(level)
        .level_for("hyper_util", LevelFilter::Warn)
        .level_for("reqwest", LevelFilter::Warn);

    let stderr_dispatch = Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{date} - {level}] {message}",
                date = format_rfc3339(SystemTime::now()),
                level = color_configuration.color(record.level()),
            ))
        })
        .chain(stderr());

    // Plain text with source position
    let file_dispatch = Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{date} - {level}] {message} [{file}:{line}]",
                date = format_rfc3339(SystemTime::now()),
                level = record.level(),
                file = record.file().unwrap_or("unknown"),
                line = record.line().unwrap_or(0)
            ))
        })
        .chain(
            fern::log_file(&log_file_path).map_err(|e| HwcctlError::Hwcctl {
                message: format!("Failed to create log file: {e}"),
                location: ErrorLocation::from(std::panic::Location::caller()),
            })?,
        );

    base_dispatch
        .chain(stderr_dispatch)
        .chain(file_dispatch)
        .apply()
        .map_err(|e| HwcctlError::Hwcctl {
            message: format!("Failed to initialize logger: {e}"),
            location: ErrorLocation::from(std::panic::Location::caller()),
        })?;

    Ok(())
}
