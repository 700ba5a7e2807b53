//! School attendance records
//!
//! Registers students per class and section, records daily attendance,
//! persists each class to a CSV file and derives statistics and reports.

pub mod config;
pub mod core;
pub mod logger;

/// Returns the current version of the crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
