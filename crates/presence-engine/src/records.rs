//! Trip and temporary-presence records.
//!
//! Records are created and edited by the host application. The constructors
//! here are what an entry form calls at save time: they validate the range and
//! derive the cached `days` field. The engine itself only reads records, and
//! any record whose range is inverted contributes nothing to a sum.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::days_between;
use crate::error::{PresenceError, Result};

/// Inclusive number of days from `start` through `end`.
///
/// Both endpoints count. Returns 0 when `start > end`.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (days_between(end, start) + 1).max(0)
}

/// Live duration feedback for an entry form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DurationCheck {
    /// Inclusive day count, 0 when the range is inverted.
    pub days: i64,
    /// Whether the range can be saved.
    pub valid: bool,
}

/// Duration of a prospective record, before it is saved.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use presence_engine::compute_duration;
///
/// let start = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2026, 7, 14).unwrap();
/// let check = compute_duration(start, end);
/// assert_eq!(check.days, 14);
/// assert!(check.valid);
/// ```
pub fn compute_duration(start: NaiveDate, end: NaiveDate) -> DurationCheck {
    DurationCheck {
        days: inclusive_days(start, end),
        valid: start <= end,
    }
}

fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<i64> {
    if start > end {
        return Err(PresenceError::InvalidDateRange { start, end });
    }
    Ok(inclusive_days(start, end))
}

// ── PresencePeriod ──────────────────────────────────────────────────────────

/// A dated record with a cached inclusive day count.
pub trait PresencePeriod {
    fn id(&self) -> &str;
    fn start_date(&self) -> NaiveDate;
    fn end_date(&self) -> NaiveDate;
    /// The `days` value stored with the record.
    fn cached_days(&self) -> i64;

    fn is_valid_range(&self) -> bool {
        self.start_date() <= self.end_date()
    }

    /// Day count recomputed from the record's own dates.
    fn span_days(&self) -> i64 {
        inclusive_days(self.start_date(), self.end_date())
    }

    /// `Some` when the cached count disagrees with the dates.
    fn cached_days_drift(&self) -> Option<DurationDrift> {
        let actual = self.span_days();
        let cached = self.cached_days();
        (cached != actual).then(|| DurationDrift {
            id: self.id().to_string(),
            cached,
            actual,
        })
    }
}

/// Whether a record may contribute to a sum.
///
/// A record with an inverted range counts as 0 everywhere; each skip is logged.
pub(crate) fn counts_toward_totals<P: PresencePeriod>(record: &P) -> bool {
    if record.is_valid_range() {
        return true;
    }
    tracing::warn!(
        id = record.id(),
        start = %record.start_date(),
        end = %record.end_date(),
        "record has inverted date range, counted as 0"
    );
    false
}

/// A record whose cached `days` no longer matches its date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DurationDrift {
    pub id: String,
    pub cached: i64,
    pub actual: i64,
}

// ── TripRecord ──────────────────────────────────────────────────────────────

/// An absence from the country of residence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRecord {
    pub id: String,
    pub country: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Days absent, inclusive of departure and return.
    pub days: i64,
}

impl TripRecord {
    /// Validate and build a trip, deriving `days`.
    ///
    /// # Errors
    ///
    /// [`PresenceError::InvalidDateRange`] if `end < start`, and
    /// [`PresenceError::InvalidRecord`] if the destination is blank.
    pub fn new(
        id: impl Into<String>,
        country: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self> {
        let country = country.trim();
        if country.is_empty() {
            return Err(PresenceError::InvalidRecord(
                "trip destination is empty".to_string(),
            ));
        }
        let days = validate_range(start_date, end_date)?;
        Ok(Self {
            id: id.into(),
            country: country.to_string(),
            start_date,
            end_date,
            days,
        })
    }
}

impl PresencePeriod for TripRecord {
    fn id(&self) -> &str {
        &self.id
    }
    fn start_date(&self) -> NaiveDate {
        self.start_date
    }
    fn end_date(&self) -> NaiveDate {
        self.end_date
    }
    fn cached_days(&self) -> i64 {
        self.days
    }
}

// ── TemporaryPresenceRecord ─────────────────────────────────────────────────

/// Status held while present in the country before permanent residency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PresenceType {
    Student,
    Worker,
    Visitor,
    Claimant,
}

impl fmt::Display for PresenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PresenceType::Student => "Student",
            PresenceType::Worker => "Worker",
            PresenceType::Visitor => "Visitor",
            PresenceType::Claimant => "Claimant",
        };
        f.write_str(label)
    }
}

/// A period of temporary-status presence, credited at half rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporaryPresenceRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: PresenceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permit_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Days present, inclusive.
    pub days: i64,
}

impl TemporaryPresenceRecord {
    /// Validate and build a temporary-presence period, deriving `days`.
    ///
    /// # Errors
    ///
    /// [`PresenceError::InvalidDateRange`] if `end < start`.
    pub fn new(
        id: impl Into<String>,
        kind: PresenceType,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self> {
        let days = validate_range(start_date, end_date)?;
        Ok(Self {
            id: id.into(),
            kind,
            permit_number: None,
            notes: None,
            start_date,
            end_date,
            days,
        })
    }

    pub fn with_permit_number(mut self, permit_number: impl Into<String>) -> Self {
        self.permit_number = Some(permit_number.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

impl PresencePeriod for TemporaryPresenceRecord {
    fn id(&self) -> &str {
        &self.id
    }
    fn start_date(&self) -> NaiveDate {
        self.start_date
    }
    fn end_date(&self) -> NaiveDate {
        self.end_date
    }
    fn cached_days(&self) -> i64 {
        self.days
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
