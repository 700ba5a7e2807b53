//! Class file rows and the attendance blob inside them.
//!
//! A current-format row holds eight fields:
//! `roll,name,section,contact,email,gender,dob,attendance`. The attendance
//! field is a list of `date:0|1[:remark];` entries. Remarks escape `\`, `;`
//! and `:` with a backslash. Legacy rows carry only the first seven fields.

use crate::core::date::DateValue;
use crate::core::error::{AttendanceError, Result};
use crate::core::models::{AttendanceLedger, ClassId, Registration, Student};
use crate::warn;

/// Version tag written on the first line of every class file
pub const FORMAT_VERSION: &str = "1.0";

/// Column names on the second line of every class file
pub const HEADER: [&str; 9] = [
    "Roll No",
    "Name",
    "Section",
    "Contact",
    "Email",
    "Gender",
    "DOB",
    "AttendanceData",
    "Remarks",
];

/// Fields in a row without attendance data
pub const LEGACY_FIELDS: usize = 7;

/// One student as stored in a class file, fields unvalidated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentRow {
    /// Roll number
    pub roll: String,
    /// Full name
    pub name: String,
    /// Section letter
    pub section: String,
    /// Contact number
    pub contact: String,
    /// Email address
    pub email: String,
    /// Gender code
    pub gender: String,
    /// Date of birth
    pub dob: String,
    /// Encoded attendance blob
    pub attendance: String,
}

impl StudentRow {
    /// Encode a student for writing
    #[must_use]
    pub fn from_student(student: &Student) -> Self {
        Self {
            roll: student.roll().to_string(),
            name: student.name().to_string(),
            section: student.section().to_string(),
            contact: student.contact().to_string(),
            email: student.email().to_string(),
            gender: student.gender().code().to_string(),
            dob: student.dob().to_string(),
            attendance: encode_attendance(&student.ledger),
        }
    }

    /// Build a row from a parsed CSV record.
    ///
    /// # Errors
    /// Returns [`AttendanceError::MalformedRecord`] if fewer than seven fields are present
    pub fn from_fields<'a>(fields: impl IntoIterator<Item = &'a str>, line: usize) -> Result<Self> {
        let fields: Vec<&str> = fields.into_iter().collect();
        if fields.len() < LEGACY_FIELDS {
            return Err(AttendanceError::malformed(
                line,
                format!("expected at least {LEGACY_FIELDS} fields, found {}", fields.len()),
            ));
        }
        let field = |i: usize| fields.get(i).map_or_else(String::new, |f| f.trim().to_string());
        Ok(Self {
            roll: field(0),
            name: field(1),
            section: field(2),
            contact: field(3),
            email: field(4),
            gender: field(5),
            dob: field(6),
            attendance: field(7),
        })
    }

    /// Fields in write order
    #[must_use]
    pub fn fields(&self) -> [&str; 8] {
        [
            &self.roll,
            &self.name,
            &self.section,
            &self.contact,
            &self.email,
            &self.gender,
            &self.dob,
            &self.attendance,
        ]
    }

    fn registration(&self, class: ClassId) -> Registration {
        Registration {
            roll: self.roll.clone(),
            name: self.name.clone(),
            class: class.to_string(),
            section: self.section.clone(),
            contact: self.contact.clone(),
            email: self.email.clone(),
            gender: self.gender.clone(),
            dob: self.dob.clone(),
        }
    }

    /// Decode into a student of `class`, ledger included.
    ///
    /// Attendance entries that cannot be read are skipped with a warning.
    ///
    /// # Errors
    /// Returns [`AttendanceError::MalformedRecord`] when an identity field fails validation
    pub fn into_student(self, class: ClassId, line: usize) -> Result<Student> {
        let mut student = self
            .registration(class)
            .validate()
            .map_err(|e| AttendanceError::malformed(line, e.to_string()))?;
        decode_attendance(&self.attendance, &mut student.ledger, line);
        Ok(student)
    }
}

/// Check a row against the registration rules without building a student
///
/// # Errors
/// Returns [`AttendanceError::MalformedRecord`] naming the failing field
pub fn validate_row(row: &StudentRow, class: ClassId, line: usize) -> Result<()> {
    row.registration(class)
        .validate()
        .map(|_| ())
        .map_err(|e| AttendanceError::malformed(line, e.to_string()))
}

/// `date:0|1[:remark];` for every entry, oldest first
#[must_use]
pub fn encode_attendance(ledger: &AttendanceLedger) -> String {
    let mut blob = String::new();
    for entry in ledger.entries() {
        blob.push_str(&entry.date.to_string());
        blob.push(':');
        blob.push(if entry.present { '1' } else { '0' });
        if let Some(remark) = entry.remark {
            blob.push(':');
            blob.push_str(&escape_remark(remark));
        }
        blob.push(';');
    }
    blob
}

/// Fill `ledger` from an attendance blob
pub fn decode_attendance(blob: &str, ledger: &mut AttendanceLedger, line: usize) {
    for entry in split_unescaped(blob, ';', usize::MAX) {
        if entry.trim().is_empty() {
            continue;
        }
        let parts = split_unescaped(entry, ':', 3);
        let date = match DateValue::parse(parts[0].trim()) {
            Ok(date) => date,
            Err(e) => {
                warn!("Line {line}: skipping attendance entry '{entry}': {e}");
                continue;
            }
        };
        let present = match parts.get(1).map(|flag| flag.trim()) {
            Some("1") => true,
            Some("0") => false,
            _ => {
                warn!("Line {line}: skipping attendance entry '{entry}': missing 0/1 flag");
                continue;
            }
        };
        let remark = parts.get(2).map(|r| unescape(r)).unwrap_or_default();
        ledger.mark(date, present, &remark);
    }
}

/// Backslash-escape the blob delimiters
#[must_use]
pub fn escape_remark(remark: &str) -> String {
    let mut escaped = String::with_capacity(remark.len());
    for c in remark.chars() {
        if matches!(c, '\\' | ';' | ':') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push(chars.next().unwrap_or('\\'));
        } else {
            out.push(c);
        }
    }
    out
}

/// Split on `sep` where it is not preceded by a backslash, into at most `limit` parts.
/// Escapes are left in place for [`unescape`].
fn split_unescaped(text: &str, sep: char, limit: usize) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if parts.len() + 1 >= limit {
            break;
        }
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == sep {
            parts.push(&text[start..i]);
            start = i + c.len_utf8();
        }
    }
    parts.push(&text[start..]);
    parts
}
