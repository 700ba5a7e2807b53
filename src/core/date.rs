//! Calendar dates in `YYYY-MM-DD` form

use super::error::{AttendanceError, Result};
use chrono::{Datelike, Duration, Local, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// Storage and display format for every date in the system
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A validated calendar date.
///
/// Ordering is calendar ordering, which for zero-padded `YYYY-MM-DD` strings is
/// the same as lexicographic ordering of their text form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateValue(NaiveDate);

impl DateValue {
    /// Parse a `YYYY-MM-DD` date.
    ///
    /// The text must be exactly ten characters with dashes at positions 4 and 7
    /// and digits elsewhere, and must name a real calendar day.
    ///
    /// # Errors
    /// Returns [`AttendanceError::InvalidInput`] for anything else
    pub fn parse(text: &str) -> Result<Self> {
        if !has_date_shape(text) {
            return Err(AttendanceError::invalid(
                "date",
                format!("'{text}' is not in YYYY-MM-DD format"),
            ));
        }
        NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map(Self)
            .map_err(|_| AttendanceError::invalid("date", format!("'{text}' is not a calendar day")))
    }

    /// Today's date in the local time zone
    #[must_use]
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// Build from year, month and day
    #[must_use]
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// The date `days` days earlier
    #[must_use]
    pub fn days_before(self, days: u32) -> Self {
        Self(self.0 - Duration::days(i64::from(days)))
    }

    /// Month bucket key, `YYYY-MM`
    #[must_use]
    pub fn month_key(self) -> String {
        format!("{:04}-{:02}", self.0.year(), self.0.month())
    }

    /// ISO-8601 week bucket key, `YYYY-Www`.
    ///
    /// The year is the ISO week-numbering year, so 2021-01-01 falls in `2020-W53`.
    #[must_use]
    pub fn iso_week_key(self) -> String {
        let week = self.0.iso_week();
        format!("{:04}-W{:02}", week.year(), week.week())
    }

    /// Underlying chrono date
    #[must_use]
    pub const fn naive(self) -> NaiveDate {
        self.0
    }
}

/// Shape check only: `DDDD-DD-DD` with ASCII digits
fn has_date_shape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| if i == 4 || i == 7 { *b == b'-' } else { b.is_ascii_digit() })
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for DateValue {
    type Err = AttendanceError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for DateValue {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let date = DateValue::parse("2024-03-09").unwrap();
        assert_eq!(date.to_string(), "2024-03-09");
        assert_eq!(date, DateValue::from_ymd(2024, 3, 9).unwrap());
    }

    #[test]
    fn test_parse_rejects_bad_shape() {
        for bad in ["2024-3-9", "2024/03/09", "20240309", "", "2024-03-09 ", "abcd-ef-gh"] {
            assert!(DateValue::parse(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_parse_rejects_impossible_day() {
        assert!(DateValue::parse("2023-02-29").is_err());
        assert!(DateValue::parse("2024-13-01").is_err());
        assert!(DateValue::parse("2024-02-29").is_ok());
    }

    #[test]
    fn test_ordering_matches_text_ordering() {
        let a = DateValue::parse("2023-12-31").unwrap();
        let b = DateValue::parse("2024-01-01").unwrap();
        assert!(a < b);
        assert!(a.to_string() < b.to_string());
    }

    #[test]
    fn test_bucket_keys() {
        let date = DateValue::parse("2024-01-15").unwrap();
        assert_eq!(date.month_key(), "2024-01");
        assert_eq!(date.iso_week_key(), "2024-W03");

        let new_year = DateValue::parse("2021-01-01").unwrap();
        assert_eq!(new_year.iso_week_key(), "2020-W53");
    }

    #[test]
    fn test_days_before() {
        let date = DateValue::parse("2024-03-01").unwrap();
        assert_eq!(date.days_before(1).to_string(), "2024-02-29");
        assert_eq!(date.days_before(0), date);
    }
}
