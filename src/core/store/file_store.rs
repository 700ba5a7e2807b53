//! CSV files per class and section under school-band folders

use super::row::{validate_row, StudentRow, FORMAT_VERSION, HEADER};
use super::stats::render_stats;
use super::{ClassRepository, SaveReport};
use crate::core::aggregate::ClassStatistics;
use crate::core::date::DateValue;
use crate::core::error::{AttendanceError, Result};
use crate::core::models::{ClassId, SchoolBand, Section, Student};
use crate::core::registry::StudentRegistry;
use crate::{debug, info, warn};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// Class files laid out as `<root>/<band>/class_<class>_<section>.csv`
#[derive(Debug, Clone)]
pub struct ClassFileStore {
    root: PathBuf,
    today: DateValue,
    backup_on_save: bool,
    write_stats: bool,
}

/// A file found while scanning the band folders
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum ClassFile {
    Current(ClassId, Section),
    Legacy(ClassId),
}

impl ClassFile {
    /// Recognise `class_<c>_<s>.csv` and `class_<c>.csv`; anything else is ignored
    fn from_file_name(name: &str) -> Option<Self> {
        let stem = name.strip_prefix("class_")?.strip_suffix(".csv")?;
        let mut parts = stem.split('_');
        let class = ClassId::parse(parts.next()?).ok()?;
        match (parts.next(), parts.next()) {
            (None, _) => Some(Self::Legacy(class)),
            (Some(section), None) => Section::parse(section).ok().map(|s| Self::Current(class, s)),
            _ => None,
        }
    }
}

impl ClassFileStore {
    /// Store rooted at `root`, dated today, with backups and stats files on
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            today: DateValue::today(),
            backup_on_save: true,
            write_stats: true,
        }
    }

    /// Use `today` for metadata lines and backup names
    #[must_use]
    pub const fn with_date(mut self, today: DateValue) -> Self {
        self.today = today;
        self
    }

    /// Toggle backup-before-overwrite
    #[must_use]
    pub const fn with_backups(mut self, enabled: bool) -> Self {
        self.backup_on_save = enabled;
        self
    }

    /// Toggle the statistics file written after each save
    #[must_use]
    pub const fn with_stats(mut self, enabled: bool) -> Self {
        self.write_stats = enabled;
        self
    }

    /// Data root
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Band folder holding `class`
    #[must_use]
    pub fn section_dir(&self, class: ClassId) -> PathBuf {
        self.root.join(class.band().folder_name())
    }

    /// Canonical file for `class`-`section`
    #[must_use]
    pub fn path_for(&self, class: ClassId, section: Section) -> PathBuf {
        self.section_dir(class)
            .join(format!("class_{class}_{section}.csv"))
    }

    /// Legacy whole-class roster without attendance
    #[must_use]
    pub fn legacy_path_for(&self, class: ClassId) -> PathBuf {
        self.section_dir(class).join(format!("class_{class}.csv"))
    }

    /// Snapshot name for `date`
    #[must_use]
    pub fn backup_path_for(&self, class: ClassId, section: Section, date: DateValue) -> PathBuf {
        self.section_dir(class)
            .join(format!("class_{class}_{section}_backup_{date}.csv"))
    }

    /// Statistics file beside the class file
    #[must_use]
    pub fn stats_path_for(&self, class: ClassId, section: Section) -> PathBuf {
        self.section_dir(class)
            .join(format!("class_{class}_{section}_stats.txt"))
    }

    /// Create every band folder
    ///
    /// # Errors
    /// Returns [`AttendanceError::FileUnavailable`] if a folder cannot be created
    pub fn ensure_layout(&self) -> Result<()> {
        for band in SchoolBand::ALL {
            let dir = self.root.join(band.folder_name());
            fs::create_dir_all(&dir).map_err(|e| AttendanceError::file(&dir, e))?;
        }
        debug!("Data layout ready under {}", self.root.display());
        Ok(())
    }

    /// Parse every row of a class file.
    ///
    /// When `section` is given, rows for other sections are skipped.
    fn read_students(&self, path: &Path, class: ClassId, section: Option<Section>) -> Result<Vec<Student>> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AttendanceError::file(path, e)),
        };
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut students = Vec::new();
        let mut versioned = false;
        for (index, result) in reader.records().enumerate() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!("{}: skipping unreadable row: {e}", path.display());
                    continue;
                }
            };
            let line = record
                .position()
                .map_or(0, |p| usize::try_from(p.line()).unwrap_or(usize::MAX));
            // Metadata and header only ever occupy the first two records
            let first = record.get(0).unwrap_or_default().trim();
            let preamble = match index {
                0 if first.starts_with("version:") => {
                    versioned = true;
                    true
                }
                0 => first == HEADER[0],
                1 => versioned && first == HEADER[0],
                _ => false,
            };
            if preamble {
                continue;
            }
            let parsed = StudentRow::from_fields(record.iter(), line)
                .and_then(|row| row.into_student(class, line));
            match parsed {
                Ok(student) if section.map_or(true, |s| s == student.section()) => {
                    students.push(student);
                }
                Ok(student) => warn!(
                    "{}: line {line}: section {} does not belong in this file",
                    path.display(),
                    student.section()
                ),
                Err(e) => warn!("{}: {e}", path.display()),
            }
        }
        Ok(students)
    }

    /// Write rows for `class`-`section`, skipping any that fail validation.
    ///
    /// An existing file is snapshotted first when backups are enabled.
    ///
    /// # Errors
    /// Returns [`AttendanceError::FileUnavailable`] if the folder, backup or file cannot be written
    pub fn save_rows(&self, class: ClassId, section: Section, rows: &[StudentRow]) -> Result<SaveReport> {
        let path = self.path_for(class, section);
        let dir = self.section_dir(class);
        fs::create_dir_all(&dir).map_err(|e| AttendanceError::file(&dir, e))?;

        let backup = if self.backup_on_save {
            self.backup(class, section, self.today)?
        } else {
            None
        };

        let file = File::create(&path).map_err(|e| AttendanceError::file(&path, e))?;
        let mut writer = WriterBuilder::new().flexible(true).from_writer(file);
        let io_err = |e: csv::Error| AttendanceError::file(&path, e.into());

        writer
            .write_record([format!("version:{FORMAT_VERSION}"), format!("date:{}", self.today)])
            .map_err(io_err)?;
        writer.write_record(HEADER).map_err(io_err)?;

        let section_text = section.to_string();
        let mut written = 0;
        let mut skipped = 0;
        for (i, row) in rows.iter().enumerate() {
            let line = i + 3;
            let checked = if row.section == section_text {
                validate_row(row, class, line)
            } else {
                Err(AttendanceError::malformed(
                    line,
                    format!("section {} does not match {section}", row.section),
                ))
            };
            match checked {
                Ok(()) => {
                    writer.write_record(row.fields()).map_err(io_err)?;
                    written += 1;
                }
                Err(e) => {
                    warn!("Not saving roll {} of class {class}-{section}: {e}", row.roll);
                    skipped += 1;
                }
            }
        }
        writer
            .flush()
            .map_err(|e| AttendanceError::file(&path, e))?;

        info!(
            "Saved {written} students of class {class}-{section} to {}",
            path.display()
        );
        Ok(SaveReport {
            path,
            written,
            skipped,
            backup,
        })
    }

    /// Write the statistics file for `students`
    ///
    /// # Errors
    /// Returns [`AttendanceError::FileUnavailable`] if the file cannot be written
    pub fn write_stats(&self, class: ClassId, section: Section, students: &[&Student]) -> Result<PathBuf> {
        let stats = ClassStatistics::from_students(students.iter().copied());
        let path = self.stats_path_for(class, section);
        fs::write(&path, render_stats(class, section, &stats, self.today))
            .map_err(|e| AttendanceError::file(&path, e))?;
        debug!("Wrote statistics to {}", path.display());
        Ok(path)
    }

    /// Load every class file under the band folders into `registry`.
    ///
    /// Current-format files replace what the registry holds for their pair.
    /// Legacy whole-class rosters only add students not already present.
    /// A file that cannot be read is reported and skipped. Returns the number
    /// of files read.
    ///
    /// # Errors
    /// Returns [`AttendanceError::FileUnavailable`] if a band folder exists but cannot be listed
    pub fn load_all(&self, registry: &mut StudentRegistry) -> Result<usize> {
        let mut found = Vec::new();
        for band in SchoolBand::ALL {
            let dir = self.root.join(band.folder_name());
            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(AttendanceError::file(&dir, e)),
            };
            for entry in entries.flatten() {
                let name = entry.file_name();
                if let Some(class_file) = name.to_str().and_then(ClassFile::from_file_name) {
                    found.push((class_file, entry.path()));
                }
            }
        }
        found.sort();

        let mut loaded = 0;
        for (class_file, path) in found {
            let result = match class_file {
                ClassFile::Current(class, section) => self
                    .read_students(&path, class, Some(section))
                    .map(|students| registry.replace_class_section(class, section, students)),
                ClassFile::Legacy(class) => self.read_students(&path, class, None).map(|students| {
                    for student in students {
                        if let Err(e) = registry.add(student) {
                            debug!("{}: {e}", path.display());
                        }
                    }
                }),
            };
            match result {
                Ok(()) => loaded += 1,
                Err(e) => warn!("{e}"),
            }
        }
        info!("Loaded {loaded} class files, {} students", registry.len());
        Ok(loaded)
    }

    /// Copy the class file to `exports_dir/class_<c>_<s>_<date>.csv`
    ///
    /// # Errors
    /// Returns [`AttendanceError::NotFound`] when nothing is stored for the pair, or
    /// [`AttendanceError::FileUnavailable`] if the copy fails
    pub fn export(&self, class: ClassId, section: Section, exports_dir: &Path) -> Result<PathBuf> {
        let source = self.path_for(class, section);
        if !source.exists() {
            return Err(AttendanceError::NotFound(format!(
                "no data file for class {class}-{section}"
            )));
        }
        fs::create_dir_all(exports_dir).map_err(|e| AttendanceError::file(exports_dir, e))?;
        let target = exports_dir.join(format!("class_{class}_{section}_{}.csv", self.today));
        fs::copy(&source, &target).map_err(|e| AttendanceError::file(&target, e))?;
        info!("Exported class {class}-{section} to {}", target.display());
        Ok(target)
    }
}

impl ClassRepository for ClassFileStore {
    fn load(&self, class: ClassId, section: Section) -> Result<Vec<Student>> {
        let path = self.path_for(class, section);
        let students = self.read_students(&path, class, Some(section))?;
        debug!(
            "Loaded {} students from {}",
            students.len(),
            path.display()
        );
        Ok(students)
    }

    fn save(&self, class: ClassId, section: Section, students: &[&Student]) -> Result<SaveReport> {
        let members: Vec<&Student> = students
            .iter()
            .copied()
            .filter(|s| s.is_in(class, section))
            .collect();
        let rows: Vec<StudentRow> = members.iter().map(|s| StudentRow::from_student(s)).collect();
        let report = self.save_rows(class, section, &rows)?;
        if self.write_stats {
            if let Err(e) = self.write_stats(class, section, &members) {
                warn!("{e}");
            }
        }
        Ok(report)
    }

    fn backup(&self, class: ClassId, section: Section, date: DateValue) -> Result<Option<PathBuf>> {
        let path = self.path_for(class, section);
        if !path.exists() {
            return Ok(None);
        }
        let target = self.backup_path_for(class, section, date);
        fs::copy(&path, &target).map_err(|e| AttendanceError::file(&target, e))?;
        info!("Backed up {} to {}", path.display(), target.display());
        Ok(Some(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_recognition() {
        let seven = ClassId::new(7).unwrap();
        let b = Section::new('B').unwrap();
        assert_eq!(
            ClassFile::from_file_name("class_7_B.csv"),
            Some(ClassFile::Current(seven, b))
        );
        assert_eq!(
            ClassFile::from_file_name("class_7.csv"),
            Some(ClassFile::Legacy(seven))
        );
        for ignored in [
            "class_7_B_backup_2024-01-01.csv",
            "class_7_B_stats.txt",
            "class_13_B.csv",
            "class_7_b.csv",
            "notes.csv",
        ] {
            assert_eq!(ClassFile::from_file_name(ignored), None, "{ignored}");
        }
    }

    #[test]
    fn test_paths_follow_bands() {
        let store = ClassFileStore::new("data");
        let path = |c, s| store.path_for(ClassId::new(c).unwrap(), Section::new(s).unwrap());
        assert_eq!(path(1, 'A'), Path::new("data/primary/class_1_A.csv"));
        assert_eq!(path(5, 'C'), Path::new("data/upper_primary/class_5_C.csv"));
        assert_eq!(path(7, 'B'), Path::new("data/midschool/class_7_B.csv"));
        assert_eq!(path(10, 'D'), Path::new("data/high_school/class_10_D.csv"));
        assert_eq!(path(12, 'Z'), Path::new("data/higher_secondary/class_12_Z.csv"));
        assert_eq!(path(7, 'B'), path(7, 'B'));
    }

    #[test]
    fn test_derived_paths() {
        let store = ClassFileStore::new("data");
        let class = ClassId::new(7).unwrap();
        let section = Section::new('B').unwrap();
        let date = DateValue::parse("2024-01-20").unwrap();
        assert_eq!(
            store.backup_path_for(class, section, date),
            Path::new("data/midschool/class_7_B_backup_2024-01-20.csv")
        );
        assert_eq!(
            store.stats_path_for(class, section),
            Path::new("data/midschool/class_7_B_stats.txt")
        );
        assert_eq!(store.legacy_path_for(class), Path::new("data/midschool/class_7.csv"));
    }
}
