//! Per-student CSV summary

use crate::core::error::{AttendanceError, Result};
use crate::core::report::{ReportContext, ReportGenerator};
use csv::Writer;

/// Column names of the CSV report
pub const CSV_HEADER: [&str; 5] = [
    "Roll No",
    "Name",
    "Total Present",
    "Total Absent",
    "Attendance %",
];

/// One row per student: present, absent and percentage
pub struct CsvReporter;

impl ReportGenerator for CsvReporter {
    fn render(&self, ctx: &ReportContext) -> Result<String> {
        let mut writer = Writer::from_writer(Vec::new());
        writer.write_record(CSV_HEADER)?;
        for student in &ctx.students {
            writer.write_record([
                student.roll().to_string(),
                student.name().to_string(),
                student.ledger.total_present().to_string(),
                student.ledger.total_absent().to_string(),
                format!("{:.2}", student.attendance_percentage()),
            ])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| AttendanceError::Report(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| AttendanceError::Report(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::date::DateValue;
    use crate::core::models::{ClassId, Registration, Section};
    use crate::core::registry::StudentRegistry;

    #[test]
    fn test_rows_and_quoting() {
        let mut registry = StudentRegistry::new();
        let mut student = Registration {
            roll: "4".into(),
            name: "Rao, Asha".into(),
            class: "7".into(),
            section: "B".into(),
            contact: "9876543210".into(),
            email: "a@b.co".into(),
            gender: "F".into(),
            dob: "2012-01-01".into(),
        }
        .validate()
        .unwrap();
        student.mark_attendance(DateValue::parse("2024-01-01").unwrap(), true, "");
        student.mark_attendance(DateValue::parse("2024-01-02").unwrap(), true, "");
        student.mark_attendance(DateValue::parse("2024-01-03").unwrap(), false, "");
        registry.add(student).unwrap();

        let ctx = ReportContext::new(
            &registry,
            "School",
            ClassId::new(7).unwrap(),
            Section::new('B').unwrap(),
            DateValue::parse("2024-01-20").unwrap(),
        )
        .unwrap();
        let text = CsvReporter.render(&ctx).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Roll No,Name,Total Present,Total Absent,Attendance %");
        assert_eq!(lines[1], "4,\"Rao, Asha\",2,1,66.67");
    }
}
