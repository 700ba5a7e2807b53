//! Data models for school attendance

pub mod class;
pub mod ledger;
pub mod student;

pub use class::{ClassId, SchoolBand, Section};
pub use ledger::{percentage_of, AttendanceLedger, LedgerEntry};
pub use student::{Gender, Registration, Student, StudentIdentity};
