//! Marking and viewing attendance

use super::{load_class, open_store};
use crate::args::{AttendanceSubcommand, ClassSection};
use school_attendance::config::Config;
use school_attendance::core::store::save_from;
use school_attendance::core::{AttendanceError, DateValue, Result};
use school_attendance::{info, verbose};
use std::collections::HashMap;

/// Dispatch attendance subcommands
///
/// # Errors
/// Returns validation, lookup or storage failures
pub fn run(subcommand: AttendanceSubcommand, config: &Config) -> Result<()> {
    match subcommand {
        AttendanceSubcommand::Mark {
            target,
            date,
            absent,
            remark,
        } => handle_mark(target, date.as_deref(), &absent, remark, config),
        AttendanceSubcommand::View {
            target,
            from,
            to,
            roll,
        } => handle_view(target, from.as_deref(), to.as_deref(), roll.as_deref(), config),
    }
}

fn parse_date_or_today(date: Option<&str>) -> Result<DateValue> {
    date.map_or_else(|| Ok(DateValue::today()), DateValue::parse)
}

/// Mark every student of the class; listed rolls are absent, the rest present
fn handle_mark(
    target: ClassSection,
    date: Option<&str>,
    absent: &[String],
    remarks: Vec<(String, String)>,
    config: &Config,
) -> Result<()> {
    let date = parse_date_or_today(date)?;
    let store = open_store(config);
    let mut registry = load_class(&store, target)?;
    let (class, section) = (target.class, target.section);

    let members = registry.filter_by_class_section(class, section);
    if members.is_empty() {
        return Err(AttendanceError::NotFound(format!(
            "no students in class {class}-{section}"
        )));
    }
    // Unknown roll numbers abort before anything is marked
    for roll in absent.iter().chain(remarks.iter().map(|(roll, _)| roll)) {
        if registry.find_by_identity(class, section, roll).is_none() {
            return Err(AttendanceError::NotFound(format!(
                "roll {roll} in class {class}-{section}"
            )));
        }
    }

    let remarks: HashMap<String, String> = remarks.into_iter().collect();
    let mut present_count = 0;
    let mut absent_count = 0;
    for student in registry.class_section_mut(class, section) {
        let present = !absent.iter().any(|roll| roll == student.roll());
        let remark = remarks.get(student.roll()).map_or("", String::as_str);
        student.mark_attendance(date, present, remark);
        if present {
            present_count += 1;
        } else {
            absent_count += 1;
        }
        verbose!(
            "{} ({}): {}",
            student.name(),
            student.roll(),
            if present { "Present" } else { "Absent" }
        );
    }
    info!("Marked attendance for class {class}-{section} on {date}: {present_count} present, {absent_count} absent");

    save_from(&store, &registry, class, section)?;
    println!(
        "✓ Attendance marked for class {class}-{section} on {date}: {present_count} present, {absent_count} absent"
    );
    Ok(())
}

fn handle_view(
    target: ClassSection,
    from: Option<&str>,
    to: Option<&str>,
    roll: Option<&str>,
    config: &Config,
) -> Result<()> {
    let range = match (from, to) {
        (Some(from), Some(to)) => Some((DateValue::parse(from)?, DateValue::parse(to)?)),
        _ => None,
    };
    let store = open_store(config);
    let registry = load_class(&store, target)?;
    let (class, section) = (target.class, target.section);

    if let Some(roll) = roll {
        let student = registry
            .find_by_identity(class, section, roll)
            .ok_or_else(|| AttendanceError::NotFound(format!("roll {roll} in class {class}-{section}")))?;
        println!("\n=== {} ({}) ===\n", student.name(), student.roll());
        print!("{}", student.ledger.details_text());
        return Ok(());
    }

    let students = registry.filter_by_class_section(class, section);
    if students.is_empty() {
        return Err(AttendanceError::NotFound(format!(
            "no students in class {class}-{section}"
        )));
    }

    match range {
        Some((from, to)) => println!("\n=== Attendance {class}-{section}: {from} to {to} ===\n"),
        None => println!("\n=== Attendance {class}-{section} ===\n"),
    }
    println!("{:<8} {:<24} {:>8} {:>8} {:>10}", "Roll No", "Name", "Present", "Absent", "Attendance");
    for student in students {
        let percentage = range.map_or_else(
            || student.attendance_percentage(),
            |(from, to)| student.ledger.percentage_between(from, to),
        );
        println!(
            "{:<8} {:<24} {:>8} {:>8} {:>9.2}%",
            student.roll(),
            student.name(),
            student.ledger.total_present(),
            student.ledger.total_absent(),
            percentage
        );
    }
    Ok(())
}
