//! Integration tests for logger behavior.

use school_attendance::logger::{
    close_file_logging, init_file_logging, level, set_level, set_level_from_str, Level,
};
use school_attendance::{debug, error, get_version, info, warn};
use std::fs;
use tempfile::TempDir;

#[test]
fn level_parse_accepts_valid() {
    assert!(set_level_from_str("error"));
    assert!(set_level_from_str("WARN"));
    assert!(set_level_from_str("info"));
    assert!(set_level_from_str("debug"));
}

#[test]
fn level_parse_rejects_invalid() {
    assert!(!set_level_from_str("invalid"));
    assert!(!set_level_from_str(""));
}

#[test]
fn logs_do_not_panic() {
    set_level(Level::Debug);
    info!("info integration");
    warn!("warn integration");
    error!("error integration");
    debug!("debug integration");
    assert_eq!(level(), Level::Debug);
}

#[cfg(feature = "file-logging")]
#[test]
fn file_logging_writes_prefixed_lines() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("logs").join("attendance.log");

    assert!(init_file_logging(&path));
    error!("class file unreadable");
    close_file_logging();

    let content = fs::read_to_string(&path).expect("log file written");
    assert!(content.contains("[ERROR] class file unreadable"));
}

#[test]
fn version_is_not_empty() {
    assert!(!get_version().trim().is_empty());
}
