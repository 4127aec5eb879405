//! Historical presence accrual.
//!
//! Three sources feed the credited-day total as of a reference date:
//!
//! - days elapsed since the PR date (full credit),
//! - temporary-status presence before PR (half credit, capped at
//!   [`TEMPORARY_CREDIT_CAP`]),
//! - absences already taken, which are subtracted.
//!
//! Future-dated trips are ignored here; [`crate::projection`] accounts for
//! them when projecting forward.

use chrono::NaiveDate;
use serde::Serialize;

use crate::calendar::days_between;
use crate::records::{counts_toward_totals, PresencePeriod, TemporaryPresenceRecord, TripRecord};

/// Maximum credited days temporary presence may contribute.
pub const TEMPORARY_CREDIT_CAP: i64 = 365;

/// Temporary-presence credit before and after capping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemporaryCredit {
    /// Sum of `days` over every temporary-presence record.
    pub raw: i64,
    /// `floor(raw / 2)`.
    pub credited: i64,
    /// `credited` limited to the cap.
    pub capped: i64,
    pub is_capped: bool,
}

/// One credited day per two days present, floored, then capped.
///
/// Every record counts regardless of the reference date. The stored `days`
/// value is used so that already-persisted records keep their totals; a
/// record with an inverted range contributes 0.
pub fn temporary_credit(records: &[TemporaryPresenceRecord]) -> TemporaryCredit {
    let raw: i64 = records
        .iter()
        .filter(|r| counts_toward_totals(*r))
        .map(|r| r.cached_days().max(0))
        .sum();
    let credited = raw / 2;
    TemporaryCredit {
        raw,
        credited,
        capped: credited.min(TEMPORARY_CREDIT_CAP),
        is_capped: credited > TEMPORARY_CREDIT_CAP,
    }
}

/// Days elapsed from the PR date to `reference`.
///
/// The PR date itself is day 0. Returns 0 when no PR date is set or it lies
/// after `reference`.
pub fn historical_pr_days(pr_date: Option<NaiveDate>, reference: NaiveDate) -> i64 {
    match pr_date {
        Some(pr) if pr <= reference => days_between(reference, pr),
        _ => 0,
    }
}

/// Days absent up to and including `reference`.
///
/// Trips starting after `reference` contribute nothing; a trip in progress is
/// counted only through `reference`.
pub fn historical_absence(trips: &[TripRecord], reference: NaiveDate) -> i64 {
    trips
        .iter()
        .filter(|t| counts_toward_totals(*t) && t.start_date <= reference)
        .map(|t| {
            let end = t.end_date.min(reference);
            days_between(end, t.start_date) + 1
        })
        .sum()
}

/// Every trip's full span, future trips included.
pub fn total_absence(trips: &[TripRecord]) -> i64 {
    trips
        .iter()
        .filter(|t| counts_toward_totals(*t))
        .map(|t| t.span_days())
        .sum()
}

/// Credited days accrued as of `reference`, never negative.
pub fn accumulated_credit(
    pr_date: Option<NaiveDate>,
    trips: &[TripRecord],
    temp_records: &[TemporaryPresenceRecord],
    reference: NaiveDate,
) -> i64 {
    let credit = historical_pr_days(pr_date, reference) - historical_absence(trips, reference)
        + temporary_credit(temp_records).capped;
    credit.max(0)
}

// ── compute_accrual ─────────────────────────────────────────────────────────

/// Inputs to [`compute_accrual`], borrowed from the caller's state.
#[derive(Debug, Clone, Copy)]
pub struct AccrualInput<'a> {
    pub pr_date: Option<NaiveDate>,
    pub trips: &'a [TripRecord],
    pub temp_records: &'a [TemporaryPresenceRecord],
    pub reference_date: NaiveDate,
}

/// Accrual statistics as of the reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccrualSummary {
    /// Days since the PR date (see [`historical_pr_days`]).
    pub historical_credit: i64,
    pub raw_temp_days: i64,
    /// Temporary credit after the cap.
    pub temporary_credit: i64,
    pub is_capped: bool,
    pub historical_absence: i64,
    /// All recorded absence, including trips not yet taken.
    pub total_absence: i64,
    pub accumulated_credit: i64,
}

/// Compute every accrual statistic in one pass over the inputs.
pub fn compute_accrual(input: &AccrualInput<'_>) -> AccrualSummary {
    let historical_credit = historical_pr_days(input.pr_date, input.reference_date);
    let temp = temporary_credit(input.temp_records);
    let historical_absence = historical_absence(input.trips, input.reference_date);
    let accumulated_credit = (historical_credit - historical_absence + temp.capped).max(0);

    let summary = AccrualSummary {
        historical_credit,
        raw_temp_days: temp.raw,
        temporary_credit: temp.capped,
        is_capped: temp.is_capped,
        historical_absence,
        total_absence: total_absence(input.trips),
        accumulated_credit,
    };
    tracing::debug!(reference = %input.reference_date, ?summary, "computed accrual");
    summary
}

// ── Tests ───────────────────────────────────────────────────────────────────
