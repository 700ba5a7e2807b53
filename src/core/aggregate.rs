//! Class-level and school-level attendance rollups

use super::date::DateValue;
use super::models::{percentage_of, ClassId, Section, Student};
use super::registry::StudentRegistry;
use std::collections::BTreeMap;

/// Shown when a class has no best student
pub const NO_STUDENT: &str = "N/A";

/// Present and total counts for one bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Entries marked present
    pub present: usize,
    /// All entries
    pub total: usize,
}

impl Tally {
    fn record(&mut self, present: bool) {
        self.present += usize::from(present);
        self.total += 1;
    }

    /// `100 * present / total`, `0.0` for an empty bucket
    #[must_use]
    pub fn percentage(self) -> f64 {
        percentage_of(self.present, self.total)
    }
}

/// How many students fall in each attendance band
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Distribution {
    /// 90% and above
    pub excellent: usize,
    /// 75% up to 90%
    pub good: usize,
    /// 60% up to 75%
    pub average: usize,
    /// Below 60%
    pub poor: usize,
}

impl Distribution {
    fn add(&mut self, percentage: f64) {
        if percentage >= 90.0 {
            self.excellent += 1;
        } else if percentage >= 75.0 {
            self.good += 1;
        } else if percentage >= 60.0 {
            self.average += 1;
        } else {
            self.poor += 1;
        }
    }
}

/// Monthly, weekly and daily buckets for one group of students.
///
/// Weeks are ISO-8601 weeks keyed `YYYY-Www`; months are keyed `YYYY-MM`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassStatistics {
    /// Number of students the buckets were built from
    pub students: usize,
    /// Keyed by `YYYY-MM`
    pub monthly: BTreeMap<String, Tally>,
    /// Keyed by ISO week
    pub weekly: BTreeMap<String, Tally>,
    /// Keyed by day
    pub daily: BTreeMap<DateValue, Tally>,
}

impl ClassStatistics {
    /// Build buckets from every ledger entry of `students`
    pub fn from_students<'a>(students: impl IntoIterator<Item = &'a Student>) -> Self {
        let mut stats = Self::default();
        for student in students {
            stats.students += 1;
            for entry in student.ledger.entries() {
                stats
                    .monthly
                    .entry(entry.date.month_key())
                    .or_default()
                    .record(entry.present);
                stats
                    .weekly
                    .entry(entry.date.iso_week_key())
                    .or_default()
                    .record(entry.present);
                stats.daily.entry(entry.date).or_default().record(entry.present);
            }
        }
        stats
    }

    /// Per-day percentage of the whole group marked present.
    ///
    /// Students with no entry for a day count against it.
    #[must_use]
    pub fn daily_trend(&self) -> Vec<(DateValue, f64)> {
        self.daily
            .iter()
            .map(|(date, tally)| (*date, percentage_of(tally.present, self.students)))
            .collect()
    }

    /// Present and total over every entry
    #[must_use]
    pub fn overall(&self) -> Tally {
        self.daily.values().fold(Tally::default(), |acc, t| Tally {
            present: acc.present + t.present,
            total: acc.total + t.total,
        })
    }
}

/// Read-only rollups over a registry
#[derive(Debug, Clone, Copy)]
pub struct AggregationEngine<'a> {
    registry: &'a StudentRegistry,
}

impl<'a> AggregationEngine<'a> {
    /// Aggregate over `registry`
    #[must_use]
    pub const fn new(registry: &'a StudentRegistry) -> Self {
        Self { registry }
    }

    fn class_section(&self, class: ClassId, section: Section) -> impl Iterator<Item = &'a Student> {
        self.registry.iter().filter(move |s| s.is_in(class, section))
    }

    /// Mean of per-student percentages; `0.0` if nobody matches
    #[must_use]
    pub fn class_average(&self, class: ClassId, section: Section) -> f64 {
        mean(self.class_section(class, section).map(Student::attendance_percentage))
    }

    /// First student holding the highest percentage, with that percentage
    #[must_use]
    pub fn best_attendance(&self, class: ClassId, section: Section) -> Option<(&'a Student, f64)> {
        let mut best: Option<(&Student, f64)> = None;
        for student in self.class_section(class, section) {
            let percentage = student.attendance_percentage();
            match best {
                Some((_, top)) if percentage <= top => {}
                _ => best = Some((student, percentage)),
            }
        }
        best
    }

    /// Name of the best student, or `"N/A"` for an empty class
    #[must_use]
    pub fn best_student(&self, class: ClassId, section: Section) -> String {
        self.best_attendance(class, section)
            .map_or_else(|| NO_STUDENT.to_string(), |(s, _)| s.name().to_string())
    }

    /// Longest individual present streak in the class
    #[must_use]
    pub fn longest_streak(&self, class: ClassId, section: Section) -> usize {
        self.class_section(class, section)
            .map(|s| s.ledger.longest_streak())
            .max()
            .unwrap_or(0)
    }

    /// Students per attendance band
    #[must_use]
    pub fn attendance_distribution(&self, class: ClassId, section: Section) -> Distribution {
        let mut distribution = Distribution::default();
        for student in self.class_section(class, section) {
            distribution.add(student.attendance_percentage());
        }
        distribution
    }

    /// Monthly, weekly and daily buckets for one class and section
    #[must_use]
    pub fn class_statistics(&self, class: ClassId, section: Section) -> ClassStatistics {
        ClassStatistics::from_students(self.class_section(class, section))
    }

    /// Seven `(date, percentage)` pairs ending at `today`, oldest first.
    ///
    /// Each percentage is the share of every registered student marked present
    /// that day; `0.0` when nobody is registered.
    #[must_use]
    pub fn weekly_trend(&self, today: DateValue) -> Vec<(DateValue, f64)> {
        (0..7)
            .rev()
            .map(|offset| {
                let day = today.days_before(offset);
                let present = self
                    .registry
                    .iter()
                    .filter(|s| s.ledger.is_present_on(day))
                    .count();
                (day, percentage_of(present, self.registry.len()))
            })
            .collect()
    }

    /// Mean attendance per class number across all its sections
    #[must_use]
    pub fn department_performance(&self) -> BTreeMap<ClassId, f64> {
        let mut grouped: BTreeMap<ClassId, Vec<f64>> = BTreeMap::new();
        for student in self.registry {
            grouped
                .entry(student.class())
                .or_default()
                .push(student.attendance_percentage());
        }
        grouped
            .into_iter()
            .map(|(class, values)| (class, mean(values)))
            .collect()
    }

    /// Class with the highest mean, lowest class number on ties
    #[must_use]
    pub fn best_class(&self) -> Option<(ClassId, f64)> {
        self.department_performance()
            .into_iter()
            .fold(None, |best, (class, value)| match best {
                Some((_, top)) if top >= value => best,
                _ => Some((class, value)),
            })
    }

    /// Mean of every student's percentage
    #[must_use]
    pub fn overall_attendance(&self) -> f64 {
        mean(self.registry.iter().map(Student::attendance_percentage))
    }

    /// Number of students marked present on `today`
    #[must_use]
    pub fn today_present(&self, today: DateValue) -> usize {
        self.registry
            .iter()
            .filter(|s| s.ledger.is_present_on(today))
            .count()
    }

    /// School-wide present/total per month
    #[must_use]
    pub fn monthly_summary(&self) -> BTreeMap<String, Tally> {
        ClassStatistics::from_students(self.registry).monthly
    }

    /// School-wide present/total per day, over students with an entry that day
    #[must_use]
    pub fn daily_trend(&self) -> BTreeMap<DateValue, Tally> {
        ClassStatistics::from_students(self.registry).daily
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0_usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
