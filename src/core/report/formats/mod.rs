//! Report format implementations
//!
//! HTML through an askama template, CSV through the csv writer, and three
//! plain-text reports.

pub mod csv_report;
pub mod html;
pub mod text;

pub use csv_report::CsvReporter;
pub use html::HtmlReporter;
pub use text::{DetailedReporter, MonthlyReporter, TrendReporter};

use super::ReportGenerator;
use crate::core::models::{ClassId, Section};
use std::fmt;
use std::str::FromStr;

/// Supported reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Styled HTML page with per-student bars
    Html,
    /// One CSV row per student
    Csv,
    /// Class summary plus every student's history
    Detailed,
    /// Month-by-month totals
    Monthly,
    /// Day-by-day `#` bars
    Trend,
}

impl ReportKind {
    /// Get the file extension for this report
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Csv => "csv",
            Self::Detailed | Self::Monthly | Self::Trend => "txt",
        }
    }

    const fn file_prefix(self) -> &'static str {
        match self {
            Self::Html | Self::Csv => "attendance_report",
            Self::Detailed => "detailed_report",
            Self::Monthly => "monthly_report",
            Self::Trend => "trend_analysis",
        }
    }

    /// Default output name, e.g. `monthly_report_7_B.txt`
    #[must_use]
    pub fn file_name(self, class: ClassId, section: Section) -> String {
        format!("{}_{class}_{section}.{}", self.file_prefix(), self.extension())
    }

    /// Generator for this report
    #[must_use]
    pub fn generator(self) -> Box<dyn ReportGenerator> {
        match self {
            Self::Html => Box::new(HtmlReporter::new()),
            Self::Csv => Box::new(CsvReporter),
            Self::Detailed => Box::new(DetailedReporter),
            Self::Monthly => Box::new(MonthlyReporter),
            Self::Trend => Box::new(TrendReporter),
        }
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" | "htm" => Ok(Self::Html),
            "csv" => Ok(Self::Csv),
            "detailed" | "txt" => Ok(Self::Detailed),
            "monthly" => Ok(Self::Monthly),
            "trend" | "trends" => Ok(Self::Trend),
            _ => Err(format!("Unknown report kind: {s}")),
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Html => write!(f, "html"),
            Self::Csv => write!(f, "csv"),
            Self::Detailed => write!(f, "detailed"),
            Self::Monthly => write!(f, "monthly"),
            Self::Trend => write!(f, "trend"),
        }
    }
}
