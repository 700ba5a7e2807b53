//! Plain-text reports: detailed class report, monthly summary, daily trend

use crate::core::error::Result;
use crate::core::report::{ReportContext, ReportGenerator};
use std::fmt::Write;

/// Each `#` in a trend bar stands for this many percent
const PERCENT_PER_BAR: f64 = 2.0;

/// Class summary, per-student totals and history, and the attendance bands
pub struct DetailedReporter;

impl ReportGenerator for DetailedReporter {
    fn render(&self, ctx: &ReportContext) -> Result<String> {
        let mut out = String::new();
        let _ = writeln!(out, "=== Detailed Report - Class {} ===\n", ctx.class_label());
        let _ = writeln!(out, "Generated on: {}", ctx.generated_on);
        let _ = writeln!(out, "Total Students: {}\n", ctx.students.len());
        let _ = writeln!(out, "Class Average Attendance: {:.2}%", ctx.average);
        let _ = writeln!(
            out,
            "Best Student: {} ({:.2}%)",
            ctx.best_name(),
            ctx.best_percentage()
        );
        let _ = writeln!(out, "Highest Attendance Streak: {} days", ctx.longest_streak);

        out.push_str("\nStudent Details:\n");
        for student in &ctx.students {
            let _ = writeln!(out, "Student: {} ({})", student.name(), student.roll());
            let _ = writeln!(out, "Attendance: {:.2}%", student.attendance_percentage());
            let _ = writeln!(out, "Present Days: {}", student.ledger.total_present());
            let _ = writeln!(out, "Absent Days: {}", student.ledger.total_absent());
            let _ = writeln!(out, "Longest Streak: {} days", student.ledger.longest_streak());
            if !student.ledger.is_empty() {
                out.push_str("History:\n");
                out.push_str(&student.ledger.details_text());
            }
            out.push('\n');
        }

        let d = ctx.distribution;
        out.push_str("Attendance Distribution:\n");
        let _ = writeln!(out, "Excellent (>=90%): {} students", d.excellent);
        let _ = writeln!(out, "Good (75-89%): {} students", d.good);
        let _ = writeln!(out, "Average (60-74%): {} students", d.average);
        let _ = writeln!(out, "Poor (<60%): {} students", d.poor);
        Ok(out)
    }
}

/// Present share and class count per month
pub struct MonthlyReporter;

impl ReportGenerator for MonthlyReporter {
    fn render(&self, ctx: &ReportContext) -> Result<String> {
        let mut out = String::new();
        let _ = writeln!(out, "Monthly Attendance Report - Class {}", ctx.class_label());
        out.push_str("=====================\n\n");
        if ctx.stats.monthly.is_empty() {
            out.push_str("No attendance recorded.\n");
        }
        for (month, tally) in &ctx.stats.monthly {
            let _ = writeln!(out, "Month: {month}");
            let _ = writeln!(out, "Total Classes: {}", tally.total);
            let _ = writeln!(out, "Average Attendance: {:.2}%\n", tally.percentage());
        }
        Ok(out)
    }
}

/// One `#` bar per recorded day, two percent per mark
pub struct TrendReporter;

impl TrendReporter {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn bar(percentage: f64) -> String {
        "#".repeat((percentage / PERCENT_PER_BAR).floor().max(0.0) as usize)
    }
}

impl ReportGenerator for TrendReporter {
    fn render(&self, ctx: &ReportContext) -> Result<String> {
        let mut out = String::new();
        let _ = writeln!(out, "Attendance Trend Analysis - Class {}", ctx.class_label());
        out.push_str("=======================\n\n");
        for (date, tally) in &ctx.stats.daily {
            let percentage = tally.percentage();
            let _ = writeln!(out, "{date} {} {percentage:.2}%", Self::bar(percentage));
        }
        Ok(out)
    }
}
