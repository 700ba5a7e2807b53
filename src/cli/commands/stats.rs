//! Class statistics and the school-wide overview

use super::{load_class, open_store};
use crate::args::ClassSection;
use school_attendance::config::Config;
use school_attendance::core::{AggregationEngine, AttendanceError, DateValue, Result, StudentRegistry};

/// `#` per this many percent in overview bars
const PERCENT_PER_BAR: f64 = 5.0;

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn bar(percentage: f64) -> String {
    "#".repeat((percentage / PERCENT_PER_BAR).floor().max(0.0) as usize)
}

/// Print the rollups for one class and section
///
/// # Errors
/// Returns `NotFound` for an empty class, or a storage failure
pub fn run(target: ClassSection, config: &Config) -> Result<()> {
    let store = open_store(config);
    let registry = load_class(&store, target)?;
    let (class, section) = (target.class, target.section);
    let total = registry.filter_by_class_section(class, section).len();
    if total == 0 {
        return Err(AttendanceError::NotFound(format!(
            "no students in class {class}-{section}"
        )));
    }

    let engine = AggregationEngine::new(&registry);
    let best = engine.best_attendance(class, section);
    let distribution = engine.attendance_distribution(class, section);

    println!("\nClass Statistics - {class}-{section}");
    println!("{}", "=".repeat(50));
    println!("\nGeneral Statistics:");
    println!("Total Students: {total}");
    println!("Average Attendance: {:.2}%", engine.class_average(class, section));
    match best {
        Some((student, percentage)) => {
            println!("Best Student: {} ({percentage:.2}%)", student.name());
        }
        None => println!("Best Student: {}", engine.best_student(class, section)),
    }
    println!(
        "Highest Attendance Streak: {} days",
        engine.longest_streak(class, section)
    );

    println!("\nAttendance Distribution:");
    println!("Excellent (>=90%): {} students", distribution.excellent);
    println!("Good (75-89%): {} students", distribution.good);
    println!("Average (60-74%): {} students", distribution.average);
    println!("Poor (<60%): {} students", distribution.poor);
    Ok(())
}

/// Load every class file and print school-wide figures
///
/// # Errors
/// Returns a storage failure if the data folders cannot be listed
pub fn overview(config: &Config) -> Result<()> {
    let store = open_store(config);
    let mut registry = StudentRegistry::new();
    store.load_all(&mut registry)?;
    if registry.is_empty() {
        return Err(AttendanceError::NotFound(
            "no students registered yet".to_string(),
        ));
    }

    let today = DateValue::today();
    let engine = AggregationEngine::new(&registry);

    println!("\n=== School Overview ({today}) ===\n");
    println!("Total Students: {}", registry.len());
    println!("Present Today: {}", engine.today_present(today));
    println!("Overall Attendance: {:.2}%", engine.overall_attendance());
    if let Some((class, percentage)) = engine.best_class() {
        println!("Best Class: {class} ({percentage:.2}%)");
    }

    println!("\nWeekly Attendance Trend:");
    for (date, percentage) in engine.weekly_trend(today) {
        println!("{date} {:<20} {percentage:.1}%", bar(percentage));
    }

    println!("\nClass Performance:");
    for (class, percentage) in engine.department_performance() {
        println!("Class {class:>2}: {:<20} {percentage:.1}%", bar(percentage));
    }

    println!("\nMonthly Summary:");
    for (month, tally) in engine.monthly_summary() {
        println!(
            "{month}: {:.2}% ({}/{})",
            tally.percentage(),
            tally.present,
            tally.total
        );
    }
    Ok(())
}
