//! Report generation for one class and section
//!
//! Reports are rendered from a [`ReportContext`] that gathers the class
//! roster and its rollups once, so every format reads the same numbers.

pub mod formats;

use crate::core::aggregate::{AggregationEngine, ClassStatistics, Distribution};
use crate::core::date::DateValue;
use crate::core::error::{AttendanceError, Result};
use crate::core::models::{ClassId, Section, Student};
use crate::core::registry::StudentRegistry;
use std::fs;
use std::path::Path;

pub use formats::{CsvReporter, DetailedReporter, HtmlReporter, MonthlyReporter, ReportKind, TrendReporter};

/// Everything a report needs about one class and section
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    /// Heading shown on HTML reports
    pub school_name: &'a str,
    /// Class number
    pub class: ClassId,
    /// Section letter
    pub section: Section,
    /// Date printed on the report
    pub generated_on: DateValue,
    /// Students in registry order
    pub students: Vec<&'a Student>,
    /// Mean of per-student percentages
    pub average: f64,
    /// Best student and their percentage
    pub best: Option<(&'a Student, f64)>,
    /// Longest present streak in the class
    pub longest_streak: usize,
    /// Students per attendance band
    pub distribution: Distribution,
    /// Monthly, weekly and daily buckets
    pub stats: ClassStatistics,
}

impl<'a> ReportContext<'a> {
    /// Collect the roster and rollups for `class`-`section`
    ///
    /// # Errors
    /// Returns [`AttendanceError::NotFound`] when the class has no students
    pub fn new(
        registry: &'a StudentRegistry,
        school_name: &'a str,
        class: ClassId,
        section: Section,
        generated_on: DateValue,
    ) -> Result<Self> {
        let students = registry.filter_by_class_section(class, section);
        if students.is_empty() {
            return Err(AttendanceError::NotFound(format!(
                "no students in class {class}-{section}"
            )));
        }
        let engine = AggregationEngine::new(registry);
        Ok(Self {
            school_name,
            class,
            section,
            generated_on,
            students,
            average: engine.class_average(class, section),
            best: engine.best_attendance(class, section),
            longest_streak: engine.longest_streak(class, section),
            distribution: engine.attendance_distribution(class, section),
            stats: engine.class_statistics(class, section),
        })
    }

    /// `7-B`
    #[must_use]
    pub fn class_label(&self) -> String {
        format!("{}-{}", self.class, self.section)
    }

    /// Name of the best student, or `N/A`
    #[must_use]
    pub fn best_name(&self) -> &str {
        self.best
            .map_or(crate::core::aggregate::NO_STUDENT, |(s, _)| s.name())
    }

    /// Percentage of the best student, `0.0` when there is none
    #[must_use]
    pub fn best_percentage(&self) -> f64 {
        self.best.map_or(0.0, |(_, p)| p)
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Render the report body
    ///
    /// # Errors
    /// Returns [`AttendanceError::Report`] if rendering fails
    fn render(&self, ctx: &ReportContext) -> Result<String>;

    /// Render and write the report to `output_path`, creating parent folders
    ///
    /// # Errors
    /// Returns an error if rendering or writing fails
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<()> {
        let body = self.render(ctx)?;
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AttendanceError::file(parent, e))?;
        }
        fs::write(output_path, body).map_err(|e| AttendanceError::file(output_path, e))?;
        crate::info!(
            "Wrote report for class {} to {}",
            ctx.class_label(),
            output_path.display()
        );
        Ok(())
    }
}
