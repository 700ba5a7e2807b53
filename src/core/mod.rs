//! Attendance core: models, registry, storage, aggregation and reports

pub mod aggregate;
pub mod date;
pub mod error;
pub mod models;
pub mod registry;
pub mod report;
pub mod session;
pub mod store;
pub mod validation;

pub use aggregate::AggregationEngine;
pub use date::DateValue;
pub use error::{AttendanceError, Result};
pub use registry::StudentRegistry;
pub use session::Session;
pub use store::{ClassFileStore, ClassRepository};
