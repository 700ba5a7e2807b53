//! Integration tests for the class file store

use school_attendance::core::models::{ClassId, Registration, Section, Student};
use school_attendance::core::store::{load_into, save_from, ClassFileStore, ClassRepository, StudentRow};
use school_attendance::core::{AttendanceError, DateValue, StudentRegistry};
use std::fs;
use tempfile::TempDir;

fn date(text: &str) -> DateValue {
    DateValue::parse(text).expect("valid date")
}

fn class(n: u8) -> ClassId {
    ClassId::new(n).expect("valid class")
}

fn section(letter: char) -> Section {
    Section::new(letter).expect("valid section")
}

fn student(class_no: u8, section_letter: char, roll: &str, name: &str) -> Student {
    Registration {
        roll: roll.to_string(),
        name: name.to_string(),
        class: class_no.to_string(),
        section: section_letter.to_string(),
        contact: "9876543210".to_string(),
        email: format!(
            "pupil{}@school.test",
            roll.chars()
                .filter(char::is_ascii_alphanumeric)
                .collect::<String>()
                .to_lowercase()
        ),
        gender: "F".to_string(),
        dob: "2012-05-17".to_string(),
    }
    .validate()
    .expect("valid registration")
}

fn store_in(dir: &TempDir) -> ClassFileStore {
    ClassFileStore::new(dir.path().join("student_data")).with_date(date("2024-03-01"))
}

#[test]
fn test_save_and_reload_keeps_attendance_and_remarks() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = store_in(&dir);

    let mut asha = student(7, 'B', "1", "Rao, Asha");
    asha.mark_attendance(date("2024-02-26"), true, "");
    asha.mark_attendance(date("2024-02-27"), false, "fever; sent home at 10:30");
    asha.mark_attendance(date("2024-02-28"), true, "late");
    let ben = student(7, 'B', "2", "Ben Das");

    let report = store
        .save(class(7), section('B'), &[&asha, &ben])
        .expect("save succeeds");
    assert_eq!(report.written, 2);
    assert_eq!(report.skipped, 0);
    assert!(report.path.ends_with("midschool/class_7_B.csv"));

    let loaded = store.load(class(7), section('B')).expect("load succeeds");
    assert_eq!(loaded.len(), 2);
    let reloaded = loaded.iter().find(|s| s.roll() == "1").expect("roll 1 present");
    assert_eq!(reloaded.name(), "Rao, Asha");
    assert_eq!(reloaded.ledger, asha.ledger);
    assert_eq!(
        reloaded.ledger.remark_on(date("2024-02-27")),
        Some("fever; sent home at 10:30")
    );
    assert_eq!(reloaded.ledger.status_on(date("2024-02-28")), Some(true));
}

#[test]
fn test_rolls_resembling_file_preamble_survive_reload() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = store_in(&dir);

    let students: Vec<Student> = ["1", "Roll No", "version:2", "4"]
        .iter()
        .enumerate()
        .map(|(i, roll)| {
            let mut s = student(7, 'B', roll, &format!("Pupil {i}"));
            s.mark_attendance(date("2024-02-26"), i % 2 == 0, "on time: yes; \\ ok");
            s
        })
        .collect();
    let refs: Vec<&Student> = students.iter().collect();

    let report = store.save(class(7), section('B'), &refs).expect("save succeeds");
    assert_eq!(report.written, 4);
    assert_eq!(report.skipped, 0);

    let loaded = store.load(class(7), section('B')).expect("load succeeds");
    let rolls: Vec<&str> = loaded.iter().map(Student::roll).collect();
    assert_eq!(rolls, vec!["1", "Roll No", "version:2", "4"]);
    for (saved, reloaded) in students.iter().zip(&loaded) {
        assert_eq!(reloaded.name(), saved.name());
        assert_eq!(reloaded.ledger, saved.ledger);
    }

    // A later save keeps all of them
    let again: Vec<&Student> = loaded.iter().collect();
    let second = store.save(class(7), section('B'), &again).expect("second save");
    assert_eq!(second.written, 4);
}

#[test]
fn test_file_starts_with_version_and_header() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = store_in(&dir);
    let report = store
        .save(class(2), section('A'), &[&student(2, 'A', "5", "Mia Roy")])
        .expect("save succeeds");

    let content = fs::read_to_string(&report.path).expect("file written");
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("version:1.0,date:2024-03-01"));
    assert!(lines.next().expect("header line").starts_with("Roll No,Name,Section"));
    assert!(lines.next().expect("data line").starts_with("5,Mia Roy,A,9876543210"));
}

#[test]
fn test_missing_class_loads_empty() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = store_in(&dir);

    let loaded = store.load(class(11), section('C')).expect("load succeeds");
    assert!(loaded.is_empty());
}

#[test]
fn test_second_save_creates_backup() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = store_in(&dir);
    let mut registry = StudentRegistry::new();
    registry.add(student(9, 'A', "1", "Kiran Shah")).expect("added");

    let first = save_from(&store, &registry, class(9), section('A')).expect("first save");
    assert_eq!(first.backup, None);

    registry.add(student(9, 'A', "2", "Lena Paul")).expect("added");
    let second = save_from(&store, &registry, class(9), section('A')).expect("second save");
    let backup = second.backup.expect("backup written");
    assert!(backup
        .to_string_lossy()
        .ends_with("class_9_A_backup_2024-03-01.csv"));

    let old = fs::read_to_string(&backup).expect("backup readable");
    assert!(old.contains("Kiran Shah"));
    assert!(!old.contains("Lena Paul"));
}

#[test]
fn test_backups_can_be_disabled() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = store_in(&dir).with_backups(false);
    let kiran = student(9, 'A', "1", "Kiran Shah");

    store.save(class(9), section('A'), &[&kiran]).expect("first save");
    let second = store.save(class(9), section('A'), &[&kiran]).expect("second save");
    assert_eq!(second.backup, None);
}

#[test]
fn test_invalid_rows_are_skipped_on_save() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = store_in(&dir);

    let mut rows: Vec<StudentRow> = (1..=4)
        .map(|i| StudentRow::from_student(&student(5, 'C', &i.to_string(), &format!("Pupil {i}"))))
        .collect();
    let mut bad = StudentRow::from_student(&student(5, 'C', "5", "Pupil 5"));
    bad.contact = "987654321".to_string();
    rows.push(bad);

    let report = store
        .save_rows(class(5), section('C'), &rows)
        .expect("save succeeds");
    assert_eq!(report.written, 4);
    assert_eq!(report.skipped, 1);

    let loaded = store.load(class(5), section('C')).expect("load succeeds");
    assert_eq!(loaded.len(), 4);
    assert!(loaded.iter().all(|s| s.roll() != "5"));
}

#[test]
fn test_malformed_rows_are_skipped_on_load() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = store_in(&dir);
    let path = store.path_for(class(4), section('A'));
    fs::create_dir_all(path.parent().expect("band folder")).expect("folder created");
    fs::write(
        &path,
        "version:1.0,date:2024-03-01\n\
         Roll No,Name,Section,Contact,Email,Gender,DOB,AttendanceData,Remarks\n\
         1,Anu Pillai,A,9876543210,anu@school.test,F,2013-01-09,2024-02-01:1;2024-02-31:1;2024-02-02:x;\n\
         2,Short Row,A\n\
         3,Bad Mail,A,9876543210,not-an-email,M,2013-01-09,\n\
         4,Dev Nair,A,9876543210,dev@school.test,M,2013-04-22,2024-02-01:0:dentist;\n",
    )
    .expect("file written");

    let loaded = store.load(class(4), section('A')).expect("load succeeds");
    let rolls: Vec<&str> = loaded.iter().map(Student::roll).collect();
    assert_eq!(rolls, vec!["1", "4"]);

    // Only the readable entry survives
    assert_eq!(loaded[0].ledger.total(), 1);
    assert_eq!(loaded[1].ledger.remark_on(date("2024-02-01")), Some("dentist"));
}

#[test]
fn test_save_writes_statistics_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = store_in(&dir);
    let mut a = student(7, 'B', "1", "Asha");
    let mut b = student(7, 'B', "2", "Ben");
    a.mark_attendance(date("2024-01-15"), true, "");
    b.mark_attendance(date("2024-01-15"), false, "");

    store.save(class(7), section('B'), &[&a, &b]).expect("save succeeds");

    let stats = fs::read_to_string(store.stats_path_for(class(7), section('B'))).expect("stats written");
    assert!(stats.contains("Attendance Statistics for Class 7-B"));
    assert!(stats.contains("2024-01: 50.00% (1/2)"));
    assert!(stats.contains("Week 2024-W03: 50.00%"));
}

#[test]
fn test_load_into_replaces_only_that_pair() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = store_in(&dir);
    store
        .save(class(7), section('B'), &[&student(7, 'B', "1", "Asha")])
        .expect("save succeeds");

    let mut registry = StudentRegistry::new();
    registry.add(student(7, 'B', "9", "Stale Entry")).expect("added");
    registry.add(student(7, 'C', "1", "Other Section")).expect("added");

    let count = load_into(&store, &mut registry, class(7), section('B')).expect("load succeeds");
    assert_eq!(count, 1);
    assert!(registry.find_by_identity(class(7), section('B'), "9").is_none());
    assert!(registry.find_by_identity(class(7), section('C'), "1").is_some());
}

#[test]
fn test_load_all_reads_current_and_legacy_files() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = store_in(&dir);

    let mut asha = student(3, 'A', "1", "Asha");
    asha.mark_attendance(date("2024-02-01"), true, "");
    store.save(class(3), section('A'), &[&asha]).expect("first save");
    // Second save leaves a backup file beside the class file
    store.save(class(3), section('A'), &[&asha]).expect("second save");
    store
        .save(class(10), section('D'), &[&student(10, 'D', "7", "Ravi")])
        .expect("save succeeds");

    // Legacy roster repeats roll 1 of section A and adds roll 2 of section B
    fs::write(
        store.legacy_path_for(class(3)),
        "Roll No,Name,Section,Contact,Email,Gender,DOB\n\
         1,Old Asha,A,9876543210,asha@school.test,F,2015-03-03\n\
         2,Farah,B,9876543210,farah@school.test,F,2015-07-11\n",
    )
    .expect("legacy file written");

    let mut registry = StudentRegistry::new();
    let files = store.load_all(&mut registry).expect("load succeeds");
    assert_eq!(files, 3);
    assert_eq!(registry.len(), 3);

    let kept = registry
        .find_by_identity(class(3), section('A'), "1")
        .expect("current student kept");
    assert_eq!(kept.name(), "Asha");
    assert_eq!(kept.ledger.total(), 1);
    assert!(registry.find_by_identity(class(3), section('B'), "2").is_some());
    assert!(registry.find_by_identity(class(10), section('D'), "7").is_some());
}

#[test]
fn test_load_all_on_empty_root() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = store_in(&dir);
    store.ensure_layout().expect("layout created");

    let mut registry = StudentRegistry::new();
    assert_eq!(store.load_all(&mut registry).expect("load succeeds"), 0);
    assert!(registry.is_empty());
    assert!(dir.path().join("student_data/higher_secondary").is_dir());
}

#[test]
fn test_export_copies_class_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = store_in(&dir);
    let exports = dir.path().join("exports");

    let missing = store.export(class(6), section('A'), &exports);
    assert!(matches!(missing, Err(AttendanceError::NotFound(_))));

    let report = store
        .save(class(6), section('A'), &[&student(6, 'A', "3", "Noor")])
        .expect("save succeeds");
    let exported = store
        .export(class(6), section('A'), &exports)
        .expect("export succeeds");

    assert_eq!(exported, exports.join("class_6_A_2024-03-01.csv"));
    assert_eq!(
        fs::read_to_string(exported).expect("export readable"),
        fs::read_to_string(report.path).expect("source readable")
    );
}
