//! Eligibility date projection.
//!
//! Given the credit already accrued, find the first calendar date on which the
//! requirement is met. Without future travel every day after the reference
//! date earns one credit. With future travel, days inside a planned trip earn
//! nothing and the target moves out accordingly.
//!
//! Future trips are handled as intervals rather than by walking one day at a
//! time: their spans are clipped to start after the reference date, merged,
//! and the free gaps between them are consumed until the remaining credit is
//! used up. This gives the same date as a daily scan in
//! `O(trips log trips)`.

use chrono::{NaiveDate, TimeDelta};
use serde::Serialize;

use crate::calendar::days_between;
use crate::records::{counts_toward_totals, TripRecord};

/// Credited days required when the caller does not say otherwise.
pub const DEFAULT_REQUIREMENT_DAYS: i64 = 1095;

/// Caller-tunable projection settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProjectionOptions {
    pub requirement: i64,
    pub include_future_travel: bool,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            requirement: DEFAULT_REQUIREMENT_DAYS,
            include_future_travel: false,
        }
    }
}

/// Inputs to [`project_eligibility`].
#[derive(Debug, Clone, Copy)]
pub struct ProjectionInput<'a> {
    pub accumulated_credit: i64,
    pub requirement: i64,
    pub reference_date: NaiveDate,
    pub trips: &'a [TripRecord],
    pub include_future_travel: bool,
}

/// Where the caller stands relative to the requirement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EligibilityProjection {
    /// Credited days still needed.
    pub days_remaining: i64,
    pub eligibility_date: NaiveDate,
    /// Calendar days from the reference date to `eligibility_date`. Larger
    /// than `days_remaining` when planned trips were skipped.
    pub days_until_eligible: i64,
    /// Accrued share of the requirement, 0 to 100.
    pub progress_percent: f64,
}

/// Project the date the requirement is met.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use presence_engine::{project_eligibility, ProjectionInput, TripRecord};
///
/// let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
/// let trip = TripRecord::new(
///     "t1",
///     "Portugal",
///     NaiveDate::from_ymd_opt(2026, 1, 2).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 1, 4).unwrap(),
/// )
/// .unwrap();
/// let trips = [trip];
///
/// let projection = project_eligibility(&ProjectionInput {
///     accumulated_credit: 1092,
///     requirement: 1095,
///     reference_date: today,
///     trips: &trips,
///     include_future_travel: true,
/// });
/// assert_eq!(projection.days_remaining, 3);
/// assert_eq!(projection.eligibility_date, NaiveDate::from_ymd_opt(2026, 1, 7).unwrap());
/// assert_eq!(projection.days_until_eligible, 6);
/// ```
pub fn project_eligibility(input: &ProjectionInput<'_>) -> EligibilityProjection {
    let reference = input.reference_date;
    let days_remaining = input
        .requirement
        .saturating_sub(input.accumulated_credit)
        .max(0);

    let offset = if days_remaining == 0 {
        0
    } else if input.include_future_travel {
        let absences = future_absence_offsets(input.trips, reference);
        nth_free_offset(&absences, days_remaining)
    } else {
        days_remaining
    };

    // Saturates at the last representable date instead of overflowing.
    let eligibility_date = TimeDelta::try_days(offset)
        .and_then(|delta| reference.checked_add_signed(delta))
        .unwrap_or(NaiveDate::MAX);

    let projection = EligibilityProjection {
        days_remaining,
        eligibility_date,
        days_until_eligible: days_between(eligibility_date, reference),
        progress_percent: progress_percent(input.accumulated_credit, input.requirement),
    };
    tracing::debug!(
        reference = %reference,
        include_future_travel = input.include_future_travel,
        ?projection,
        "projected eligibility"
    );
    projection
}

fn progress_percent(accumulated: i64, requirement: i64) -> f64 {
    if requirement <= 0 {
        return 100.0;
    }
    (accumulated as f64 / requirement as f64 * 100.0).clamp(0.0, 100.0)
}

/// Future trip spans as inclusive day offsets from `reference`, sorted and
/// merged.
///
/// Only trips ending after `reference` qualify. A trip already under way is
/// clipped to start at offset 1, the first day after `reference`.
fn future_absence_offsets(trips: &[TripRecord], reference: NaiveDate) -> Vec<(i64, i64)> {
    let mut spans: Vec<(i64, i64)> = trips
        .iter()
        .filter(|t| counts_toward_totals(*t) && t.end_date > reference)
        .map(|t| {
            let start = days_between(t.start_date, reference).max(1);
            (start, days_between(t.end_date, reference))
        })
        .collect();
    spans.sort_unstable();

    let mut merged: Vec<(i64, i64)> = Vec::with_capacity(spans.len());
    for (start, end) in spans {
        if let Some(last) = merged.last_mut() {
            if start <= last.1 + 1 {
                last.1 = last.1.max(end);
                continue;
            }
        }
        merged.push((start, end));
    }
    merged
}

/// Offset of the `n`-th day (1-based) after the reference that is not inside
/// any of `absences`.
fn nth_free_offset(absences: &[(i64, i64)], n: i64) -> i64 {
    let mut remaining = n;
    let mut cursor = 0;
    for &(start, end) in absences {
        let free = start - cursor - 1;
        if free >= remaining {
            return cursor + remaining;
        }
        remaining -= free;
        cursor = end;
    }
    cursor.saturating_add(remaining)
}

// ── Tests ───────────────────────────────────────────────────────────────────
