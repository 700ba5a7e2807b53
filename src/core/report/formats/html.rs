//! HTML attendance report
//!
//! Rendered from `templates/attendance_report.html`. Every value passes
//! through askama's HTML escaping, so names and remarks cannot inject markup.

use crate::core::error::Result;
use crate::core::report::{ReportContext, ReportGenerator};
use askama::Template;

/// Percentage at or above which a bar is drawn green
const HIGH_BAND: f64 = 75.0;
/// Percentage at or above which a bar is drawn amber
const MEDIUM_BAND: f64 = 60.0;

/// One table row
struct StudentLine {
    roll: String,
    name: String,
    present: usize,
    absent: usize,
    percentage: String,
    band: &'static str,
}

/// One weekly bar
struct WeekLine {
    week: String,
    percentage: String,
}

#[derive(Template)]
#[template(path = "attendance_report.html")]
struct AttendancePage<'a> {
    school_name: &'a str,
    class_label: String,
    generated_on: String,
    total_students: usize,
    average: String,
    total_days: usize,
    present: usize,
    absent: usize,
    best_name: &'a str,
    best_percentage: String,
    longest_streak: usize,
    students: Vec<StudentLine>,
    weeks: Vec<WeekLine>,
}

/// HTML report generator
pub struct HtmlReporter;

impl HtmlReporter {
    /// Create a new HTML reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn band(percentage: f64) -> &'static str {
        if percentage >= HIGH_BAND {
            "high"
        } else if percentage >= MEDIUM_BAND {
            "medium"
        } else {
            "low"
        }
    }

    fn page<'a>(ctx: &'a ReportContext) -> AttendancePage<'a> {
        let overall = ctx.stats.overall();
        let students = ctx
            .students
            .iter()
            .map(|s| {
                let percentage = s.attendance_percentage();
                StudentLine {
                    roll: s.roll().to_string(),
                    name: s.name().to_string(),
                    present: s.ledger.total_present(),
                    absent: s.ledger.total_absent(),
                    percentage: format!("{percentage:.1}"),
                    band: Self::band(percentage),
                }
            })
            .collect();
        let weeks = ctx
            .stats
            .weekly
            .iter()
            .map(|(week, tally)| WeekLine {
                week: week.clone(),
                percentage: format!("{:.1}", tally.percentage()),
            })
            .collect();

        AttendancePage {
            school_name: ctx.school_name,
            class_label: ctx.class_label(),
            generated_on: ctx.generated_on.to_string(),
            total_students: ctx.students.len(),
            average: format!("{:.1}", ctx.average),
            total_days: ctx.stats.daily.len(),
            present: overall.present,
            absent: overall.total - overall.present,
            best_name: ctx.best_name(),
            best_percentage: format!("{:.1}", ctx.best_percentage()),
            longest_streak: ctx.longest_streak,
            students,
            weeks,
        }
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for HtmlReporter {
    fn render(&self, ctx: &ReportContext) -> Result<String> {
        Ok(Self::page(ctx).render()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::date::DateValue;
    use crate::core::models::{ClassId, Registration, Section};
    use crate::core::registry::StudentRegistry;

    #[test]
    fn test_names_are_escaped() {
        let mut registry = StudentRegistry::new();
        let mut student = Registration {
            roll: "1".into(),
            name: "<b>Asha</b> & co".into(),
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
        registry.add(student).unwrap();

        let ctx = ReportContext::new(
            &registry,
            "Hill School",
            ClassId::new(7).unwrap(),
            Section::new('B').unwrap(),
            DateValue::parse("2024-01-20").unwrap(),
        )
        .unwrap();
        let html = HtmlReporter::new().render(&ctx).unwrap();

        assert!(html.contains("Hill School"));
        assert!(html.contains("Class 7-B"));
        assert!(html.contains("&lt;b&gt;Asha"));
        assert!(html.contains("&amp; co"));
        assert!(!html.contains("<b>Asha</b>"));
        assert!(html.contains("2024-W03"));
    }

    #[test]
    fn test_band_thresholds() {
        assert_eq!(HtmlReporter::band(75.0), "high");
        assert_eq!(HtmlReporter::band(74.9), "medium");
        assert_eq!(HtmlReporter::band(60.0), "medium");
        assert_eq!(HtmlReporter::band(59.9), "low");
    }
}
