//! Student registration and search

use super::{load_class, open_store};
use crate::args::{ClassSection, StudentSubcommand};
use school_attendance::config::Config;
use school_attendance::core::models::{Registration, Student};
use school_attendance::core::store::save_from;
use school_attendance::core::{AttendanceError, Result};

/// Dispatch student subcommands
///
/// # Errors
/// Returns validation, duplicate, lookup or storage failures
pub fn run(subcommand: StudentSubcommand, config: &Config) -> Result<()> {
    match subcommand {
        StudentSubcommand::Add {
            target,
            roll,
            name,
            contact,
            email,
            gender,
            dob,
        } => {
            let registration = Registration {
                roll,
                name,
                class: target.class.to_string(),
                section: target.section.to_string(),
                contact,
                email,
                gender,
                dob,
            };
            handle_add(target, registration, config)
        }
        StudentSubcommand::Search { target, text } => handle_search(target, &text, config),
    }
}

/// Validate, register and persist a new student
fn handle_add(target: ClassSection, registration: Registration, config: &Config) -> Result<()> {
    // Validate before touching any file
    let student = registration.validate()?;
    let store = open_store(config);
    let mut registry = load_class(&store, target)?;
    let name = student.name().to_string();
    registry.add(student)?;

    let report = save_from(&store, &registry, target.class, target.section)?;
    if report.skipped > 0 {
        eprintln!("⚠ {} invalid rows were not saved", report.skipped);
    }
    println!(
        "✓ Student {name} added to class {}-{}",
        target.class, target.section
    );
    Ok(())
}

fn handle_search(target: ClassSection, text: &str, config: &Config) -> Result<()> {
    let store = open_store(config);
    let registry = load_class(&store, target)?;
    let student = registry
        .find_by_roll_or_name(target.class, target.section, text)
        .ok_or_else(|| {
            AttendanceError::NotFound(format!(
                "no student matching '{text}' in class {}-{}",
                target.class, target.section
            ))
        })?;
    print_student(student);
    Ok(())
}

fn print_student(student: &Student) {
    println!("\n=== Student {} ===\n", student.identity());
    println!("Name: {}", student.name());
    println!("Roll No: {}", student.roll());
    println!("Class: {}-{}", student.class(), student.section());
    println!("Contact: {}", student.contact());
    println!("Email: {}", student.email());
    println!("Gender: {}", student.gender());
    println!("Date of Birth: {}", student.dob());
    println!(
        "Attendance: {:.2}% ({} present, {} absent)",
        student.attendance_percentage(),
        student.ledger.total_present(),
        student.ledger.total_absent()
    );
    println!("Longest Streak: {} days", student.ledger.longest_streak());
    if !student.ledger.is_empty() {
        println!("\nAttendance Details:");
        print!("{}", student.ledger.details_text());
    }
}
