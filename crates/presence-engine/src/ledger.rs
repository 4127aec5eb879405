//! Caller-owned presence state.
//!
//! A [`PresenceLedger`] holds everything the engine reads: the PR date and
//! both record lists. The host loads it, mutates it, and saves it; the engine
//! only ever borrows it. The JSON shape matches what the host application
//! persists, so a stored file can be read directly.

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::accrual::{compute_accrual, AccrualInput, AccrualSummary};
use crate::calendar::{parse_iso_date, parse_timezone};
use crate::error::{PresenceError, Result};
use crate::projection::{project_eligibility, EligibilityProjection, ProjectionInput, ProjectionOptions};
use crate::records::{DurationDrift, PresencePeriod, TemporaryPresenceRecord, TripRecord};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceLedger {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pr_date: Option<NaiveDate>,
    #[serde(rename = "travelHistory")]
    pub trips: Vec<TripRecord>,
    #[serde(rename = "tempPresenceHistory")]
    pub temp_records: Vec<TemporaryPresenceRecord>,
}

/// The persisted shape before the PR date is resolved to a calendar date.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredLedger {
    #[serde(default)]
    pr_date: Option<String>,
    #[serde(default, rename = "travelHistory")]
    trips: Vec<TripRecord>,
    #[serde(default, rename = "tempPresenceHistory")]
    temp_records: Vec<TemporaryPresenceRecord>,
}

/// Accrual and projection for one reference date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresenceReport {
    pub reference_date: NaiveDate,
    pub accrual: AccrualSummary,
    pub projection: EligibilityProjection,
    /// The projected date, or `None` until a PR date is set.
    pub earliest_eligibility: Option<NaiveDate>,
}

impl PresenceLedger {
    /// Parse a stored ledger, reading a timestamped PR date in the system's
    /// local timezone.
    ///
    /// Records whose cached `days` disagree with their dates are logged but
    /// kept as-is; see [`PresenceLedger::repair_cached_days`].
    ///
    /// # Errors
    ///
    /// Returns [`PresenceError::Serialization`] if the JSON is malformed or a
    /// date cannot be parsed.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_stored(json, &Local)
    }

    /// Parse a stored ledger, reading a timestamped PR date in `timezone`.
    ///
    /// Older stores wrote the PR date as the UTC instant of local midnight,
    /// so the calendar date only comes back right in the user's own zone.
    ///
    /// # Errors
    ///
    /// Returns [`PresenceError::InvalidTimezone`] for an unknown IANA name,
    /// otherwise as [`PresenceLedger::from_json`].
    ///
    /// # Examples
    ///
    /// ```
    /// use presence_engine::PresenceLedger;
    ///
    /// let json = r#"{"prDate": "2024-08-31T15:00:00.000Z"}"#;
    /// let ledger = PresenceLedger::from_json_in(json, "Asia/Tokyo").unwrap();
    /// assert_eq!(ledger.pr_date.unwrap().to_string(), "2024-09-01");
    /// ```
    pub fn from_json_in(json: &str, timezone: &str) -> Result<Self> {
        let tz = parse_timezone(timezone)?;
        Self::from_stored(json, &tz)
    }

    fn from_stored<Z: TimeZone>(json: &str, zone: &Z) -> Result<Self> {
        let stored: StoredLedger =
            serde_json::from_str(json).map_err(|e| PresenceError::Serialization(e.to_string()))?;
        let pr_date = stored
            .pr_date
            .as_deref()
            .map(|s| parse_stored_date(s, zone))
            .transpose()
            .map_err(|e| PresenceError::Serialization(format!("prDate: {e}")))?;
        let ledger = Self {
            pr_date,
            trips: stored.trips,
            temp_records: stored.temp_records,
        };
        for drift in ledger.audit_cached_days() {
            tracing::warn!(
                id = %drift.id,
                cached = drift.cached,
                actual = drift.actual,
                "stored day count does not match record dates"
            );
        }
        Ok(ledger)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| PresenceError::Serialization(e.to_string()))
    }

    /// Every record whose cached `days` differs from its recomputed span.
    pub fn audit_cached_days(&self) -> Vec<DurationDrift> {
        let trips = self.trips.iter().filter_map(|t| t.cached_days_drift());
        let temps = self.temp_records.iter().filter_map(|t| t.cached_days_drift());
        trips.chain(temps).collect()
    }

    /// Overwrite drifted `days` values with the recomputed span.
    ///
    /// Returns what was changed.
    pub fn repair_cached_days(&mut self) -> Vec<DurationDrift> {
        let drifts = self.audit_cached_days();
        for trip in &mut self.trips {
            trip.days = trip.span_days();
        }
        for record in &mut self.temp_records {
            record.days = record.span_days();
        }
        drifts
    }

    pub fn accrual(&self, reference_date: NaiveDate) -> AccrualSummary {
        compute_accrual(&AccrualInput {
            pr_date: self.pr_date,
            trips: &self.trips,
            temp_records: &self.temp_records,
            reference_date,
        })
    }

    /// Accrue as of `reference_date` and project forward from there.
    pub fn report(&self, reference_date: NaiveDate, options: &ProjectionOptions) -> PresenceReport {
        let accrual = self.accrual(reference_date);
        let projection = project_eligibility(&ProjectionInput {
            accumulated_credit: accrual.accumulated_credit,
            requirement: options.requirement,
            reference_date,
            trips: &self.trips,
            include_future_travel: options.include_future_travel,
        });
        PresenceReport {
            reference_date,
            accrual,
            projection,
            earliest_eligibility: self.pr_date.map(|_| projection.eligibility_date),
        }
    }
}

/// Accept either `YYYY-MM-DD` or a full RFC 3339 timestamp, which older
/// stores wrote for the PR date. A timestamp names an instant, so its date is
/// taken in `zone`, not in the offset it was written with.
fn parse_stored_date<Z: TimeZone>(s: &str, zone: &Z) -> Result<NaiveDate> {
    parse_iso_date(s).or_else(|err| {
        DateTime::parse_from_rfc3339(s.trim())
            .map(|dt| dt.with_timezone(zone).date_naive())
            .map_err(|_| err)
    })
}

// ── Tests ───────────────────────────────────────────────────────────────────
