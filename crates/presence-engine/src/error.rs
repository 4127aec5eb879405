//! Error types for presence-engine operations.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PresenceError {
    #[error("Invalid date range: end {end} precedes start {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid month: {0} (must be 1..=12)")]
    InvalidMonth(u32),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, PresenceError>;
