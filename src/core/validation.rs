//! Field validators for student registration and persisted rows

use super::date::DateValue;
use super::error::{AttendanceError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// `local@domain(.domain)+`, optionally one `.` or `_` inside the local part
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\w+[._]?\w*@\w+(\.\w+)+$").expect("email pattern is a valid regex")
});

/// Accepted gender codes
pub const GENDERS: [&str; 3] = ["M", "F", "O"];

/// Contact numbers are exactly this many ASCII digits
pub const CONTACT_DIGITS: usize = 10;

/// Reject empty or whitespace-only text
///
/// # Errors
/// Returns [`AttendanceError::InvalidInput`] naming `field`
pub fn require_non_empty(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(AttendanceError::invalid(field, "must not be empty"))
    } else {
        Ok(())
    }
}

/// # Errors
/// Returns [`AttendanceError::InvalidInput`] unless `contact` is exactly ten digits
pub fn validate_contact(contact: &str) -> Result<()> {
    if contact.len() == CONTACT_DIGITS && contact.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(AttendanceError::invalid(
            "contact",
            format!("'{contact}' must be {CONTACT_DIGITS} digits"),
        ))
    }
}

/// # Errors
/// Returns [`AttendanceError::InvalidInput`] if `email` does not look like `name@host.tld`
pub fn validate_email(email: &str) -> Result<()> {
    if EMAIL_PATTERN.is_match(email) {
        Ok(())
    } else {
        Err(AttendanceError::invalid(
            "email",
            format!("'{email}' is not a valid address"),
        ))
    }
}

/// # Errors
/// Returns [`AttendanceError::InvalidInput`] unless `gender` is `M`, `F` or `O`
pub fn validate_gender(gender: &str) -> Result<()> {
    if GENDERS.contains(&gender) {
        Ok(())
    } else {
        Err(AttendanceError::invalid(
            "gender",
            format!("'{gender}' must be M, F, or O"),
        ))
    }
}

/// Date of birth uses the common date format
///
/// # Errors
/// Returns [`AttendanceError::InvalidInput`] for a malformed date
pub fn parse_date_of_birth(dob: &str) -> Result<DateValue> {
    DateValue::parse(dob).map_err(|_| {
        AttendanceError::invalid("date of birth", format!("'{dob}' must be YYYY-MM-DD"))
    })
}
