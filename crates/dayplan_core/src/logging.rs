//! Process-wide file logging.
//!
//! # Responsibility
//! - Start rolling file logs at most once per process.
//! - Keep log lines metadata-only: counts, ids, durations, never user text.
//!
//! # Invariants
//! - Repeating `init_logging` with the same level and directory succeeds
//!   without restarting the backend.
//! - A different level or directory after startup is an error.
//! - Nothing in this module panics.

use crate::config::CoreConfig;
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Once;

const LOG_BASENAME: &str = "dayplan";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_LOG_FILES: usize = 5;
const PANIC_PAYLOAD_LIMIT: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: Once = Once::new();

struct ActiveLogger {
    level: LogLevel,
    dir: PathBuf,
    _handle: LoggerHandle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn parse(raw: &str) -> Result<Self, LoggingError> {
        let level = match raw.trim().to_ascii_lowercase().as_str() {
            "trace" => Self::Trace,
            "debug" => Self::Debug,
            "info" => Self::Info,
            "warn" | "warning" => Self::Warn,
            "error" => Self::Error,
            other => return Err(LoggingError::UnsupportedLevel(other.to_string())),
        };
        Ok(level)
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    UnsupportedLevel(String),
    InvalidDirectory(String),
    /// Logging already runs with a different level or directory.
    Conflict {
        active: String,
        requested: String,
    },
    Backend(String),
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLevel(level) => write!(
                f,
                "unknown log level `{level}` (use trace, debug, info, warn or error)"
            ),
            Self::InvalidDirectory(message) => write!(f, "invalid log directory: {message}"),
            Self::Conflict { active, requested } => write!(
                f,
                "logging is already running with `{active}`, cannot switch to `{requested}`"
            ),
            Self::Backend(message) => write!(f, "log backend failed to start: {message}"),
        }
    }
}

impl Error for LoggingError {}

/// Starts file logging at `level` under the absolute directory `log_dir`.
///
/// # Errors
/// - Unknown level, blank or relative directory, a conflicting earlier
///   initialization, or a backend start failure.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), LoggingError> {
    let level = LogLevel::parse(level)?;
    let dir = absolute_dir(log_dir)?;
    let active = ACTIVE.get_or_try_init(|| start(level, &dir))?;
    ensure_same(active, level, &dir)
}

/// Starts logging with the level and directory from `config`.
pub fn init_logging_from_config(config: &CoreConfig) -> Result<(), LoggingError> {
    let dir = config.log_dir();
    let dir = dir
        .to_str()
        .ok_or_else(|| LoggingError::InvalidDirectory("path is not valid UTF-8".to_string()))?;
    init_logging(&config.log_level, dir)
}

/// Level and directory in use, or `None` while logging is off.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    ACTIVE
        .get()
        .map(|active| (active.level.as_str(), active.dir.clone()))
}

/// `debug` in debug builds, `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        LogLevel::Debug.as_str()
    } else {
        LogLevel::Info.as_str()
    }
}

fn start(level: LogLevel, dir: &Path) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(dir).map_err(|err| {
        LoggingError::InvalidDirectory(format!("cannot create `{}`: {err}", dir.display()))
    })?;

    let handle = Logger::try_with_str(level.as_str())
        .map_err(|err| LoggingError::Backend(err.to_string()))?
        .log_to_file(FileSpec::default().directory(dir).basename(LOG_BASENAME))
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| LoggingError::Backend(err.to_string()))?;

    PANIC_HOOK.call_once(install_panic_hook);
    info!(
        "event=core_init module=core status=ok platform={} version={} level={}",
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION"),
        level.as_str()
    );

    Ok(ActiveLogger {
        level,
        dir: dir.to_path_buf(),
        _handle: handle,
    })
}

fn ensure_same(active: &ActiveLogger, level: LogLevel, dir: &Path) -> Result<(), LoggingError> {
    if active.dir != dir {
        return Err(LoggingError::Conflict {
            active: active.dir.display().to_string(),
            requested: dir.display().to_string(),
        });
    }
    if active.level != level {
        return Err(LoggingError::Conflict {
            active: active.level.as_str().to_string(),
            requested: level.as_str().to_string(),
        });
    }
    Ok(())
}

fn absolute_dir(raw: &str) -> Result<PathBuf, LoggingError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(LoggingError::InvalidDirectory("path is empty".to_string()));
    }
    let dir = PathBuf::from(raw);
    if dir.is_relative() {
        return Err(LoggingError::InvalidDirectory(format!(
            "`{raw}` is not an absolute path"
        )));
    }
    Ok(dir)
}

fn install_panic_hook() {
    let chained = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map_or_else(|| "unknown".to_string(), |loc| format!("{}:{}", loc.file(), loc.line()));
        // Payloads can quote user text; keep one capped line only.
        error!(
            "event=panic_captured module=core status=error location={location} payload={}",
            one_line(&panic_payload(info.payload()), PANIC_PAYLOAD_LIMIT)
        );
        chained(info);
    }));
}

fn panic_payload(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn one_line(value: &str, limit: usize) -> String {
    let flat: String = value
        .chars()
        .map(|c| if matches!(c, '\n' | '\r') { ' ' } else { c })
        .collect();
    match flat.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &flat[..cut]),
        None => flat,
    }
}

#[cfg(test)]
mod tests {
    use super::{absolute_dir, init_logging, logging_status, one_line, LogLevel, LoggingError};
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn level_parsing_accepts_warning_alias() {
        assert_eq!(LogLevel::parse(" WARNING ").unwrap(), LogLevel::Warn);
        assert_eq!(
            LogLevel::parse("verbose"),
            Err(LoggingError::UnsupportedLevel("verbose".to_string()))
        );
    }

    #[test]
    fn relative_log_dir_is_rejected() {
        let err = absolute_dir("logs/dev").unwrap_err();
        assert!(err.to_string().contains("absolute"));
        assert!(absolute_dir("  ").is_err());
    }

    #[test]
    fn one_line_flattens_and_caps() {
        assert_eq!(one_line("a\nb\rc", 10), "a b c");
        assert_eq!(one_line("line1\nline2", 4), "line...");
    }

    #[test]
    fn second_init_must_match_first() {
        let first = scratch_dir("first");
        let second = scratch_dir("second");
        let first_str = first.to_str().unwrap();

        init_logging("info", first_str).unwrap();
        init_logging("INFO", first_str).unwrap();
        assert!(matches!(
            init_logging("debug", first_str),
            Err(LoggingError::Conflict { .. })
        ));
        assert!(matches!(
            init_logging("info", second.to_str().unwrap()),
            Err(LoggingError::Conflict { .. })
        ));

        assert_eq!(logging_status(), Some(("info", first)));
    }

    fn scratch_dir(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("dayplan-log-{tag}-{}-{nanos}", std::process::id()))
    }
}
