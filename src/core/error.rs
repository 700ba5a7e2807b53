//! Error kinds shared by the attendance core

use std::io;
use std::path::PathBuf;

/// Result alias used throughout the core
pub type Result<T> = std::result::Result<T, AttendanceError>;

/// Failures reported by registry, store, aggregation and report operations.
///
/// None of these are fatal to the process. Validation failures are raised
/// before any mutation, so a returned error never leaves a half-applied change.
#[derive(Debug, thiserror::Error)]
pub enum AttendanceError {
    /// A class, section, date, contact, email or gender value was malformed
    #[error("Invalid {field}: {reason}")]
    InvalidInput {
        /// Name of the offending field
        field: &'static str,
        /// Human-readable explanation
        reason: String,
    },

    /// A student with the same class, section and roll number already exists
    #[error("Roll number already exists in this class and section: {0}")]
    DuplicateIdentity(String),

    /// Lookup, search or update target is absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// A file could not be opened, read or written
    #[error("File unavailable: {}: {source}", path.display())]
    FileUnavailable {
        /// Path that failed
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// A single persisted row failed validation or parsing
    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord {
        /// 1-based line number in the source file (0 when not file-backed)
        line: usize,
        /// Why the row was rejected
        reason: String,
    },

    /// The session has not been authorized
    #[error("Not logged in: a valid password is required")]
    Unauthorized,

    /// A report could not be rendered or written
    #[error("Report generation failed: {0}")]
    Report(String),
}

impl AttendanceError {
    /// Shorthand for [`AttendanceError::InvalidInput`]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Wrap an I/O error with the path it occurred on
    pub fn file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Shorthand for [`AttendanceError::MalformedRecord`]
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }
}

impl From<askama::Error> for AttendanceError {
    fn from(err: askama::Error) -> Self {
        Self::Report(err.to_string())
    }
}

impl From<csv::Error> for AttendanceError {
    fn from(err: csv::Error) -> Self {
        Self::Report(err.to_string())
    }
}
