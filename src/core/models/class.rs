//! Class number, section letter and the school band they map to

use crate::core::error::{AttendanceError, Result};
use std::fmt;
use std::str::FromStr;

/// Lowest and highest class numbers the school runs
pub const CLASS_RANGE: std::ops::RangeInclusive<u8> = 1..=12;

/// A class number between 1 and 12
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassId(u8);

impl ClassId {
    /// # Errors
    /// Returns [`AttendanceError::InvalidInput`] if `number` is outside 1-12
    pub fn new(number: u8) -> Result<Self> {
        if CLASS_RANGE.contains(&number) {
            Ok(Self(number))
        } else {
            Err(AttendanceError::invalid(
                "class",
                format!("{number} must be between 1 and 12"),
            ))
        }
    }

    /// Parse a class number from text such as `"7"`
    ///
    /// # Errors
    /// Returns [`AttendanceError::InvalidInput`] for non-numeric text or an out-of-range class
    pub fn parse(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AttendanceError::invalid(
                "class",
                format!("'{text}' is not a class number"),
            ));
        }
        let number = trimmed.parse::<u8>().map_err(|_| {
            AttendanceError::invalid("class", format!("'{text}' must be between 1 and 12"))
        })?;
        Self::new(number)
    }

    /// The numeric class
    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }

    /// School band the class belongs to
    #[must_use]
    pub const fn band(self) -> SchoolBand {
        match self.0 {
            1..=3 => SchoolBand::Primary,
            4..=5 => SchoolBand::UpperPrimary,
            6..=8 => SchoolBand::Midschool,
            9..=10 => SchoolBand::HighSchool,
            _ => SchoolBand::HigherSecondary,
        }
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ClassId {
    type Err = AttendanceError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A section: one uppercase letter `A`-`Z`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Section(char);

impl Section {
    /// # Errors
    /// Returns [`AttendanceError::InvalidInput`] unless `letter` is `A`-`Z`
    pub fn new(letter: char) -> Result<Self> {
        if letter.is_ascii_uppercase() {
            Ok(Self(letter))
        } else {
            Err(AttendanceError::invalid(
                "section",
                format!("'{letter}' must be a single uppercase letter (A-Z)"),
            ))
        }
    }

    /// # Errors
    /// Returns [`AttendanceError::InvalidInput`] unless `text` is exactly one uppercase letter
    pub fn parse(text: &str) -> Result<Self> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) => Self::new(letter),
            _ => Err(AttendanceError::invalid(
                "section",
                format!("'{text}' must be a single uppercase letter (A-Z)"),
            )),
        }
    }

    /// The section letter
    #[must_use]
    pub const fn letter(self) -> char {
        self.0
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Section {
    type Err = AttendanceError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// School-level grouping that decides a class file's folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SchoolBand {
    /// Classes 1-3
    Primary,
    /// Classes 4-5
    UpperPrimary,
    /// Classes 6-8
    Midschool,
    /// Classes 9-10
    HighSchool,
    /// Classes 11-12
    HigherSecondary,
}

impl SchoolBand {
    /// Every band, in class order
    pub const ALL: [Self; 5] = [
        Self::Primary,
        Self::UpperPrimary,
        Self::Midschool,
        Self::HighSchool,
        Self::HigherSecondary,
    ];

    /// Folder name under the data directory
    #[must_use]
    pub const fn folder_name(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::UpperPrimary => "upper_primary",
            Self::Midschool => "midschool",
            Self::HighSchool => "high_school",
            Self::HigherSecondary => "higher_secondary",
        }
    }
}

impl fmt::Display for SchoolBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_bounds() {
        assert!(ClassId::new(0).is_err());
        assert!(ClassId::new(1).is_ok());
        assert!(ClassId::new(12).is_ok());
        assert!(ClassId::new(13).is_err());
        assert!(ClassId::parse("7").is_ok());
        assert!(ClassId::parse(" 7 ").is_ok());
        assert!(ClassId::parse("7A").is_err());
        assert!(ClassId::parse("-1").is_err());
        assert!(ClassId::parse("300").is_err());
    }

    #[test]
    fn test_band_boundaries() {
        let band = |n| ClassId::new(n).unwrap().band();
        assert_eq!(band(1), SchoolBand::Primary);
        assert_eq!(band(3), SchoolBand::Primary);
        assert_eq!(band(4), SchoolBand::UpperPrimary);
        assert_eq!(band(5), SchoolBand::UpperPrimary);
        assert_eq!(band(6), SchoolBand::Midschool);
        assert_eq!(band(8), SchoolBand::Midschool);
        assert_eq!(band(9), SchoolBand::HighSchool);
        assert_eq!(band(10), SchoolBand::HighSchool);
        assert_eq!(band(11), SchoolBand::HigherSecondary);
        assert_eq!(band(12), SchoolBand::HigherSecondary);
    }

    #[test]
    fn test_section_parse() {
        assert_eq!(Section::parse("B").unwrap().letter(), 'B');
        assert!(Section::parse("b").is_err());
        assert!(Section::parse("AB").is_err());
        assert!(Section::parse("").is_err());
        assert!(Section::parse("1").is_err());
    }
}
