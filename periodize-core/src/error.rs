//! Error types for plan generation.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while building a calendar or generating a plan.
#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    #[error("calendar has no days")]
    EmptyCalendar,

    #[error("calendar dates out of order at row {row}: {date} follows {previous}")]
    UnorderedCalendar {
        row: usize,
        previous: NaiveDate,
        date: NaiveDate,
    },

    #[error("duplicate calendar date: {0}")]
    DuplicateDate(NaiveDate),

    #[error("invalid date: {0:?}")]
    InvalidDate(String),

    #[error("capacity values must be positive and finite (capacity={capacity}, reference={reference})")]
    InvalidCapacity { capacity: f64, reference: f64 },

    #[error("taper window must be between 1 and {max} days (got {days})")]
    InvalidWindow { days: u32, max: u32 },
}
