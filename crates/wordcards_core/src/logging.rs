//! Process logging for every wordcards binary.
//!
//! # Responsibility
//! - Start one rolling file logger per process, mirrored to stderr.
//! - Keep events metadata-only: ids, outcomes and timings. Passwords, tokens
//!   and email addresses never reach a log line.
//!
//! # Invariants
//! - A second `init` with equal settings is a no-op; different settings are
//!   refused and the running logger is left untouched.
//! - Initialization reports failures as `Err`, never by panicking.

use flexi_logger::{
    Age, Cleanup, Criterion, DeferredNow, Duplicate, FileSpec, LogSpecification, Logger,
    LoggerHandle, Naming, WriteMode, TS_DASHES_BLANK_COLONS_DOT_BLANK,
};
use log::{error, info, LevelFilter, Record};
use once_cell::sync::OnceCell;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const FILE_BASENAME: &str = "wordcards";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_FILES: usize = 5;
const PANIC_SUMMARY_CHARS: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

struct ActiveLogger {
    settings: LogSettings,
    _handle: LoggerHandle,
}

/// Where and how verbosely to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    level: LevelFilter,
    dir: PathBuf,
    mirror_to_stderr: bool,
}

impl LogSettings {
    /// Parses `level` (`trace`..`error`, `warning` accepted) and requires an
    /// absolute, non-empty `dir`.
    pub fn new(level: &str, dir: &str) -> Result<Self, String> {
        Ok(Self {
            level: parse_level(level)?,
            dir: parse_dir(dir)?,
            mirror_to_stderr: true,
        })
    }

    /// Files only; nothing is echoed to stderr.
    pub fn files_only(mut self) -> Self {
        self.mirror_to_stderr = false;
        self
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Starts the process logger with these settings.
    ///
    /// # Errors
    /// - The directory cannot be created or the backend fails to start.
    /// - A logger with different settings is already running.
    pub fn init(self) -> Result<(), String> {
        if let Some(active) = ACTIVE.get() {
            return active.settings.accepts(&self);
        }
        let active = ACTIVE.get_or_try_init(|| start(&self))?;
        active.settings.accepts(&self)
    }

    fn accepts(&self, requested: &LogSettings) -> Result<(), String> {
        if self == requested {
            return Ok(());
        }
        Err(format!(
            "logging already running (level={}, dir={}, stderr={}); refusing to switch to \
             (level={}, dir={}, stderr={})",
            self.level,
            self.dir.display(),
            self.mirror_to_stderr,
            requested.level,
            requested.dir.display(),
            requested.mirror_to_stderr
        ))
    }
}

/// Shorthand for `LogSettings::new(level, dir)?.init()`.
pub fn init_logging(level: &str, dir: &str) -> Result<(), String> {
    LogSettings::new(level, dir)?.init()
}

/// Settings of the running logger, if any.
pub fn logging_status() -> Option<LogSettings> {
    ACTIVE.get().map(|active| active.settings.clone())
}

/// `debug` for debug builds, `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start(settings: &LogSettings) -> Result<ActiveLogger, String> {
    std::fs::create_dir_all(&settings.dir)
        .map_err(|err| format!("cannot create log dir {}: {err}", settings.dir.display()))?;

    let duplicate = if settings.mirror_to_stderr {
        Duplicate::Info
    } else {
        Duplicate::None
    };
    let spec = LogSpecification::builder()
        .default(settings.level)
        .build();

    let handle = Logger::with(spec)
        .log_to_file(
            FileSpec::default()
                .directory(settings.dir.as_path())
                .basename(FILE_BASENAME),
        )
        .format_for_files(line_format)
        .duplicate_to_stderr(duplicate)
        .rotate(
            Criterion::AgeOrSize(Age::Day, ROTATE_AT_BYTES),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(KEEP_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .start()
        .map_err(|err| format!("logger backend failed to start: {err}"))?;

    PANIC_HOOK.get_or_init(install_panic_hook);

    info!(
        "event=logging_init module=core status=ok level={} dir={} os={} debug_build={} version={}",
        settings.level,
        settings.dir.display(),
        std::env::consts::OS,
        cfg!(debug_assertions),
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogger {
        settings: settings.clone(),
        _handle: handle,
    })
}

/// `<timestamp> <LEVEL> <target> <message>`, one event per line.
fn line_format(
    w: &mut dyn Write,
    now: &mut DeferredNow,
    record: &Record<'_>,
) -> std::io::Result<()> {
    write!(
        w,
        "{} {:<5} {} {}",
        now.format(TS_DASHES_BLANK_COLONS_DOT_BLANK),
        record.level(),
        record.target(),
        one_line(&record.args().to_string(), usize::MAX)
    )
}

fn parse_level(level: &str) -> Result<LevelFilter, String> {
    let level = level.trim();
    if level.eq_ignore_ascii_case("warning") {
        return Ok(LevelFilter::Warn);
    }
    match LevelFilter::from_str(level) {
        Ok(LevelFilter::Off) | Err(_) => Err(format!(
            "unsupported log level `{level}`; expected trace|debug|info|warn|error"
        )),
        Ok(filter) => Ok(filter),
    }
}

fn parse_dir(dir: &str) -> Result<PathBuf, String> {
    let dir = dir.trim();
    if dir.is_empty() {
        return Err("log dir must not be empty".to_string());
    }
    let path = PathBuf::from(dir);
    if path.is_relative() {
        return Err(format!("log dir must be absolute, got `{dir}`"));
    }
    Ok(path)
}

fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map_or_else(|| "unknown".to_string(), |loc| format!("{}:{}", loc.file(), loc.line()));
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        error!(
            "event=panic module=core status=error location={location} payload={}",
            one_line(&payload, PANIC_SUMMARY_CHARS)
        );
        previous(info);
    }));
}

/// Collapses control characters to spaces and caps the length.
fn one_line(value: &str, max_chars: usize) -> String {
    let mut out: String = value
        .chars()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .take(max_chars)
        .collect();
    if value.chars().count() > max_chars {
        out.push_str("...");
    }
    out
}
