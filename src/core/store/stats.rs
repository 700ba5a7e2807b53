//! Plain-text statistics file written next to each class file

use crate::core::aggregate::ClassStatistics;
use crate::core::date::DateValue;
use crate::core::models::{ClassId, Section};
use std::fmt::Write;

/// Render monthly, weekly and daily statistics for one class and section
#[must_use]
pub fn render_stats(
    class: ClassId,
    section: Section,
    stats: &ClassStatistics,
    generated_on: DateValue,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Attendance Statistics for Class {class}-{section}");
    let _ = writeln!(out, "Generated on: {generated_on}\n");

    out.push_str("Monthly Statistics:\n==================\n");
    for (month, tally) in &stats.monthly {
        let _ = writeln!(
            out,
            "{month}: {:.2}% ({}/{})",
            tally.percentage(),
            tally.present,
            tally.total
        );
    }

    out.push_str("\nWeekly Statistics:\n=================\n");
    for (week, tally) in &stats.weekly {
        let _ = writeln!(out, "Week {week}: {:.2}%", tally.percentage());
    }

    out.push_str("\nDaily Trends:\n============\n");
    for (date, percentage) in stats.daily_trend() {
        let _ = writeln!(out, "{date}: {percentage:.2}%");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Registration;

    #[test]
    fn test_render_sections() {
        let mut student = Registration {
            roll: "1".into(),
            name: "Asha".into(),
            class: "7".into(),
            section: "B".into(),
            contact: "9876543210".into(),
            email: "a@b.co".into(),
            gender: "F".into(),
            dob: "2012-01-01".into(),
        }
        .validate()
        .unwrap();
        student.mark_attendance(DateValue::parse("2024-01-15").unwrap(), true, "");
        student.mark_attendance(DateValue::parse("2024-01-16").unwrap(), false, "");

        let stats = ClassStatistics::from_students([&student]);
        let text = render_stats(
            student.class(),
            student.section(),
            &stats,
            DateValue::parse("2024-01-20").unwrap(),
        );

        assert!(text.starts_with("Attendance Statistics for Class 7-B\nGenerated on: 2024-01-20\n"));
        assert!(text.contains("2024-01: 50.00% (1/2)"));
        assert!(text.contains("Week 2024-W03: 50.00%"));
        assert!(text.contains("2024-01-15: 100.00%"));
        assert!(text.contains("2024-01-16: 0.00%"));
    }
}
