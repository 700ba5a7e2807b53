//! Student record and its composite identity

use super::class::{ClassId, Section};
use super::ledger::AttendanceLedger;
use crate::core::date::DateValue;
use crate::core::error::{AttendanceError, Result};
use crate::core::validation::{
    parse_date_of_birth, require_non_empty, validate_contact, validate_email, validate_gender,
};
use std::fmt;
use std::str::FromStr;

/// `(class, section, roll)`: unique within a registry
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StudentIdentity {
    /// Class number
    pub class: ClassId,
    /// Section letter
    pub section: Section,
    /// Roll number, unique within the class and section
    pub roll: String,
}

impl StudentIdentity {
    /// Create an identity
    #[must_use]
    pub fn new(class: ClassId, section: Section, roll: impl Into<String>) -> Self {
        Self {
            class,
            section,
            roll: roll.into(),
        }
    }
}

impl fmt::Display for StudentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.class, self.section, self.roll)
    }
}

/// Gender code stored with each student
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    /// `M`
    Male,
    /// `F`
    Female,
    /// `O`
    Other,
}

impl Gender {
    /// Single-letter code used in files
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
            Self::Other => "O",
        }
    }
}

impl FromStr for Gender {
    type Err = AttendanceError;

    fn from_str(s: &str) -> Result<Self> {
        validate_gender(s)?;
        Ok(match s {
            "M" => Self::Male,
            "F" => Self::Female,
            _ => Self::Other,
        })
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Raw registration fields, as typed by a user or read from a file row
#[derive(Debug, Clone, Default)]
pub struct Registration {
    /// Roll number
    pub roll: String,
    /// Full name
    pub name: String,
    /// Class number text
    pub class: String,
    /// Section letter text
    pub section: String,
    /// Ten-digit contact number
    pub contact: String,
    /// Email address
    pub email: String,
    /// `M`, `F` or `O`
    pub gender: String,
    /// Date of birth, `YYYY-MM-DD`
    pub dob: String,
}

impl Registration {
    /// Validate every field and build a [`Student`] with an empty ledger.
    ///
    /// # Errors
    /// Returns the first [`AttendanceError::InvalidInput`] encountered
    pub fn validate(self) -> Result<Student> {
        let class = ClassId::parse(&self.class)?;
        let section = Section::parse(self.section.trim())?;
        require_non_empty("roll number", &self.roll)?;
        require_non_empty("name", &self.name)?;
        validate_contact(self.contact.trim())?;
        validate_email(self.email.trim())?;
        let gender = self.gender.trim().parse::<Gender>()?;
        let dob = parse_date_of_birth(self.dob.trim())?;

        Ok(Student {
            identity: StudentIdentity::new(class, section, self.roll.trim()),
            name: self.name.trim().to_string(),
            contact: self.contact.trim().to_string(),
            email: self.email.trim().to_string(),
            gender,
            dob,
            ledger: AttendanceLedger::new(),
        })
    }
}

/// A registered student and their attendance ledger
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    identity: StudentIdentity,
    name: String,
    contact: String,
    email: String,
    gender: Gender,
    dob: DateValue,
    /// Day-by-day attendance
    pub ledger: AttendanceLedger,
}

impl Student {
    /// Identity triple
    #[must_use]
    pub const fn identity(&self) -> &StudentIdentity {
        &self.identity
    }

    /// Class number
    #[must_use]
    pub const fn class(&self) -> ClassId {
        self.identity.class
    }

    /// Section letter
    #[must_use]
    pub const fn section(&self) -> Section {
        self.identity.section
    }

    /// Roll number
    #[must_use]
    pub fn roll(&self) -> &str {
        &self.identity.roll
    }

    /// Full name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Contact number
    #[must_use]
    pub fn contact(&self) -> &str {
        &self.contact
    }

    /// Email address
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Gender code
    #[must_use]
    pub const fn gender(&self) -> Gender {
        self.gender
    }

    /// Date of birth
    #[must_use]
    pub const fn dob(&self) -> DateValue {
        self.dob
    }

    /// `true` when the student belongs to `class`-`section`
    #[must_use]
    pub fn is_in(&self, class: ClassId, section: Section) -> bool {
        self.identity.class == class && self.identity.section == section
    }

    /// Record attendance; see [`AttendanceLedger::mark`]
    pub fn mark_attendance(&mut self, date: DateValue, present: bool, remark: &str) {
        self.ledger.mark(date, present, remark);
    }

    /// Overall attendance percentage
    #[must_use]
    pub fn attendance_percentage(&self) -> f64 {
        self.ledger.percentage()
    }
}
