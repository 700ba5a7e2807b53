//! Leveled console and file logger.
//!
//! Cargo features `log-info`, `log-debug`, `verbose` and `file-logging`
//! decide what can be emitted at all; the runtime level and switches below
//! narrow it further. Warnings and errors go to stderr, info and debug to
//! stdout. While a log file is open every line goes there instead, stamped
//! with the local time.

use std::fmt::{self, Arguments};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

#[cfg(feature = "file-logging")]
use std::{
    fs::{File, OpenOptions},
    io::Write,
    path::Path,
    sync::{LazyLock, Mutex},
};

/// Severity of a log line, most severe first
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Failures the user must see
    Error = 1,
    /// Skipped rows, unreadable files and other recoverable problems
    Warn = 2,
    /// Actions that changed stored data (needs `log-info`)
    Info = 3,
    /// Internal detail (needs `log-debug` and [`enable_debug`])
    Debug = 4,
}

impl Level {
    const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Error,
            2 => Self::Warn,
            3 => Self::Info,
            _ => Self::Debug,
        }
    }

    const fn tag(self) -> &'static str {
        match self {
            Self::Error => "[ERROR]",
            Self::Warn => "[WARN]",
            Self::Info => "[INFO]",
            Self::Debug => "[DEBUG]",
        }
    }

    /// Case-insensitive level name; `err` and `warning` are accepted too
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "error" | "err" => Some(Self::Error),
            "warn" | "warning" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            _ => None,
        }
    }

    /// Whether the compiled feature set can emit this level
    const fn compiled_in(self) -> bool {
        match self {
            Self::Error | Self::Warn => true,
            Self::Info => cfg!(feature = "log-info"),
            Self::Debug => cfg!(feature = "log-debug"),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        f.write_str(name)
    }
}

/// Most verbose level the build supports
const COMPILED_MAX: Level = if cfg!(feature = "log-debug") {
    Level::Debug
} else if cfg!(feature = "log-info") {
    Level::Info
} else {
    Level::Warn
};

static MAX_LEVEL: AtomicU8 = AtomicU8::new(COMPILED_MAX as u8);
static DEBUG_ON: AtomicBool = AtomicBool::new(false);
static VERBOSE_ON: AtomicBool = AtomicBool::new(false);

#[cfg(feature = "file-logging")]
static SINK: LazyLock<Mutex<Option<File>>> = LazyLock::new(|| Mutex::new(None));

/// Emit lines up to and including `level`
pub fn set_level(level: Level) {
    MAX_LEVEL.store(level as u8, Ordering::SeqCst);
}

/// Current maximum level
#[must_use]
pub fn level() -> Level {
    Level::from_u8(MAX_LEVEL.load(Ordering::SeqCst))
}

/// Set the level from its name. Returns `false` and leaves the level alone
/// when the name is unknown.
#[must_use]
pub fn set_level_from_str(name: &str) -> bool {
    Level::parse(name).map(set_level).is_some()
}

/// Allow debug lines (no effect without the `log-debug` feature)
pub fn enable_debug() {
    if cfg!(feature = "log-debug") {
        DEBUG_ON.store(true, Ordering::SeqCst);
    }
}

/// Whether debug lines are allowed
#[must_use]
pub fn is_debug_enabled() -> bool {
    cfg!(feature = "log-debug") && DEBUG_ON.load(Ordering::SeqCst)
}

/// Allow [`verbose!`](crate::verbose) output (no effect without the `verbose` feature)
pub fn enable_verbose() {
    if cfg!(feature = "verbose") {
        VERBOSE_ON.store(true, Ordering::SeqCst);
    }
}

/// Whether verbose output is allowed
#[must_use]
pub fn is_verbose_enabled() -> bool {
    cfg!(feature = "verbose") && VERBOSE_ON.load(Ordering::SeqCst)
}

/// Append log lines to `path`, creating missing folders.
///
/// Returns `false` if the file cannot be opened; console logging continues then.
#[cfg(feature = "file-logging")]
#[must_use]
pub fn init_file_logging(path: &Path) -> bool {
    let folder_ready = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map_or(true, |dir| std::fs::create_dir_all(dir).is_ok());
    if !folder_ready {
        return false;
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return false;
    };
    SINK.lock().map(|mut sink| *sink = Some(file)).is_ok()
}

/// File logging is compiled out; always `false`
#[cfg(not(feature = "file-logging"))]
#[must_use]
pub fn init_file_logging(_path: &std::path::Path) -> bool {
    false
}

/// Flush and close the log file, returning to console output
pub fn close_file_logging() {
    #[cfg(feature = "file-logging")]
    if let Ok(mut sink) = SINK.lock() {
        if let Some(file) = sink.as_mut() {
            let _ = file.flush();
        }
        *sink = None;
    }
}

/// `true` when the line went to the log file
#[cfg(feature = "file-logging")]
fn write_to_file(tag: &str, msg: &str) -> bool {
    let Ok(mut sink) = SINK.lock() else {
        return false;
    };
    let Some(file) = sink.as_mut() else {
        return false;
    };
    let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    let _ = writeln!(file, "{stamp} {tag} {msg}");
    let _ = file.flush();
    true
}

#[cfg(not(feature = "file-logging"))]
const fn write_to_file(_tag: &str, _msg: &str) -> bool {
    false
}

fn enabled(level: Level) -> bool {
    level.compiled_in()
        && level <= self::level()
        && (level != Level::Debug || is_debug_enabled())
}

/// Dispatcher behind the logging macros
pub fn log_impl(level: Level, args: Arguments) {
    if !enabled(level) {
        return;
    }
    let msg = args.to_string();
    if write_to_file(level.tag(), &msg) {
        return;
    }
    match level {
        Level::Error | Level::Warn => eprintln!("{} {msg}", level.tag()),
        Level::Info | Level::Debug => println!("{} {msg}", level.tag()),
    }
}

/// Log at error level
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::logger::log_impl($crate::logger::Level::Error, format_args!($($arg)*))
    };
}

/// Log at warn level
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::logger::log_impl($crate::logger::Level::Warn, format_args!($($arg)*))
    };
}

/// Log at info level
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::logger::log_impl($crate::logger::Level::Info, format_args!($($arg)*))
    };
}

/// Log at debug level
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::logger::log_impl($crate::logger::Level::Debug, format_args!($($arg)*))
    };
}

/// Print progress detail to stdout when verbose output is on. Never logged to file.
#[macro_export]
macro_rules! verbose {
    ($($arg:tt)*) => {
        if $crate::logger::is_verbose_enabled() {
            println!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parse() {
        assert_eq!(Level::parse("ERROR"), Some(Level::Error));
        assert_eq!(Level::parse("warning"), Some(Level::Warn));
        assert_eq!(Level::parse(" info "), Some(Level::Info));
        assert_eq!(Level::parse("debug"), Some(Level::Debug));
        assert_eq!(Level::parse("trace"), None);
    }

    #[test]
    fn test_level_display_round_trips() {
        for level in [Level::Error, Level::Warn, Level::Info, Level::Debug] {
            assert_eq!(Level::parse(&level.to_string()), Some(level));
        }
    }

    #[test]
    fn test_level_gate() {
        set_level(Level::Warn);
        assert!(enabled(Level::Error));
        assert!(enabled(Level::Warn));
        assert!(!enabled(Level::Info));
        assert!(!enabled(Level::Debug));
    }
}
