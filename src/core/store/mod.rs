//! Persistence of class rosters and attendance.
//!
//! Storage sits behind [`ClassRepository`] so aggregation and the CLI never see
//! file paths. [`ClassFileStore`] is the CSV-per-class implementation.

pub mod file_store;
pub mod row;
pub mod stats;

pub use file_store::ClassFileStore;
pub use row::StudentRow;

use crate::core::date::DateValue;
use crate::core::error::Result;
use crate::core::models::{ClassId, Section, Student};
use crate::core::registry::StudentRegistry;
use std::path::PathBuf;

/// Outcome of a save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    /// File written
    pub path: PathBuf,
    /// Rows written
    pub written: usize,
    /// Rows skipped because they failed validation
    pub skipped: usize,
    /// Snapshot of the previous file, when one existed
    pub backup: Option<PathBuf>,
}

/// Load and save one class and section at a time
pub trait ClassRepository {
    /// Students stored for `class`-`section`; empty when nothing is stored yet.
    ///
    /// # Errors
    /// Returns [`crate::core::AttendanceError::FileUnavailable`] if stored data exists but cannot be read
    fn load(&self, class: ClassId, section: Section) -> Result<Vec<Student>>;

    /// Replace the stored data for `class`-`section` with `students`.
    ///
    /// Students outside the pair are ignored. Invalid rows are skipped and counted.
    ///
    /// # Errors
    /// Returns [`crate::core::AttendanceError::FileUnavailable`] if the data cannot be written
    fn save(&self, class: ClassId, section: Section, students: &[&Student]) -> Result<SaveReport>;

    /// Snapshot current data for `class`-`section` on `date`; `None` when nothing is stored.
    ///
    /// # Errors
    /// Returns [`crate::core::AttendanceError::FileUnavailable`] if the snapshot cannot be written
    fn backup(&self, class: ClassId, section: Section, date: DateValue) -> Result<Option<PathBuf>>;
}

/// Reload one class and section into `registry`, replacing what it held.
///
/// Returns the number of students now registered for the pair.
///
/// # Errors
/// Propagates load failures; the registry is untouched in that case
pub fn load_into<R: ClassRepository + ?Sized>(
    repo: &R,
    registry: &mut StudentRegistry,
    class: ClassId,
    section: Section,
) -> Result<usize> {
    let students = repo.load(class, section)?;
    registry.replace_class_section(class, section, students);
    Ok(registry.filter_by_class_section(class, section).len())
}

/// Save one class and section from `registry`
///
/// # Errors
/// Propagates save failures
pub fn save_from<R: ClassRepository + ?Sized>(
    repo: &R,
    registry: &StudentRegistry,
    class: ClassId,
    section: Section,
) -> Result<SaveReport> {
    repo.save(class, section, &registry.filter_by_class_section(class, section))
}
