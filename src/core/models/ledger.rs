//! Per-student attendance ledger and the statistics derived from it

use crate::core::date::DateValue;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Presence by date, plus optional remarks.
///
/// Holds at most one entry per date; marking a date again overwrites it. Every
/// remark belongs to a date that also has a presence entry. Both maps are kept
/// in ascending date order, which the streak and detail computations rely on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceLedger {
    records: BTreeMap<DateValue, bool>,
    remarks: BTreeMap<DateValue, String>,
}

/// One ledger entry as seen by readers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerEntry<'a> {
    /// Day of the entry
    pub date: DateValue,
    /// Whether the student was present
    pub present: bool,
    /// Remark recorded for the day, if any
    pub remark: Option<&'a str>,
}

impl AttendanceLedger {
    /// Create an empty ledger
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record presence for `date`, replacing any earlier entry for that day.
    ///
    /// A non-empty remark is stored for the day; an empty one clears any
    /// remark left by an earlier mark.
    pub fn mark(&mut self, date: DateValue, present: bool, remark: &str) {
        self.records.insert(date, present);
        let remark = remark.trim();
        if remark.is_empty() {
            self.remarks.remove(&date);
        } else {
            self.remarks.insert(date, remark.to_string());
        }
    }

    /// Number of marked days
    #[must_use]
    pub fn total(&self) -> usize {
        self.records.len()
    }

    /// `true` when no day has been marked
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Days marked present
    #[must_use]
    pub fn total_present(&self) -> usize {
        self.records.values().filter(|present| **present).count()
    }

    /// Days marked absent
    #[must_use]
    pub fn total_absent(&self) -> usize {
        self.total() - self.total_present()
    }

    /// Present days as a percentage of marked days; `0.0` for an empty ledger
    #[must_use]
    pub fn percentage(&self) -> f64 {
        percentage_of(self.total_present(), self.total())
    }

    /// Percentage restricted to `start..=end`; `0.0` when no day falls in range
    #[must_use]
    pub fn percentage_between(&self, start: DateValue, end: DateValue) -> f64 {
        if start > end {
            return 0.0;
        }
        let (present, total) = self
            .records
            .range(start..=end)
            .fold((0, 0), |(present, total), (_, is_present)| {
                (present + usize::from(*is_present), total + 1)
            });
        percentage_of(present, total)
    }

    /// Longest run of consecutive marked-present entries, in ascending date order.
    ///
    /// Unmarked calendar days between entries do not break a run; only an
    /// absent entry does.
    #[must_use]
    pub fn longest_streak(&self) -> usize {
        let mut current = 0;
        let mut longest = 0;
        for present in self.records.values() {
            if *present {
                current += 1;
                longest = longest.max(current);
            } else {
                current = 0;
            }
        }
        longest
    }

    /// Presence recorded for `date`, if marked
    #[must_use]
    pub fn status_on(&self, date: DateValue) -> Option<bool> {
        self.records.get(&date).copied()
    }

    /// `true` only when `date` is marked present
    #[must_use]
    pub fn is_present_on(&self, date: DateValue) -> bool {
        self.status_on(date).unwrap_or(false)
    }

    /// Remark recorded for `date`
    #[must_use]
    pub fn remark_on(&self, date: DateValue) -> Option<&str> {
        self.remarks.get(&date).map(String::as_str)
    }

    /// Entries in ascending date order
    pub fn entries(&self) -> impl Iterator<Item = LedgerEntry<'_>> + '_ {
        self.records.iter().map(|(date, present)| LedgerEntry {
            date: *date,
            present: *present,
            remark: self.remark_on(*date),
        })
    }

    /// One line per entry: `YYYY-MM-DD: Present[ - remark]`
    #[must_use]
    pub fn details_text(&self) -> String {
        let mut text = String::new();
        for entry in self.entries() {
            let status = if entry.present { "Present" } else { "Absent" };
            let _ = write!(text, "{}: {status}", entry.date);
            if let Some(remark) = entry.remark {
                let _ = write!(text, " - {remark}");
            }
            text.push('\n');
        }
        text
    }
}

/// `100 * part / whole`, or `0.0` when `whole` is zero
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percentage_of(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}
