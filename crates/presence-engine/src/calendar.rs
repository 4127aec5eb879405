//! Calendar-day arithmetic.
//!
//! Everything here works on [`NaiveDate`] values: a calendar date with no time
//! of day and no zone. Day counts are therefore exact integers and cannot drift
//! by an hour across a daylight-saving transition. When the caller only has an
//! instant, [`today_in`] and [`days_between_instants`] strip the time of day in
//! the instant's own zone before counting.
//!
//! # Functions
//!
//! - [`days_between`] — signed whole days between two calendar dates
//! - [`days_between_instants`] — same, for zoned datetimes
//! - [`today_in`] — the local calendar date of an instant in an IANA zone
//! - [`days_in_month`] / [`first_weekday_of_month`] / [`leading_blank_days`] — month grid helpers
//! - [`add_months`] / [`step_month`] — month navigation with day clamping and year bounds
//! - [`is_selectable`] — inclusive min/max filter for date-picker cells
//! - [`parse_iso_date`] — `YYYY-MM-DD` parsing at the record boundary

use chrono::{DateTime, Datelike, Months, NaiveDate, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::{PresenceError, Result};

// ── Configurable week start ─────────────────────────────────────────────────

/// Which day begins a row in a month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum WeekStartDay {
    /// ISO 8601 (Monday in the first column).
    Monday,
    /// US/Canada convention, used by the date picker.
    #[default]
    Sunday,
}

/// How many days `weekday` is from the week-start day.
fn days_from_week_start(weekday: Weekday, week_start: WeekStartDay) -> u32 {
    match week_start {
        WeekStartDay::Monday => weekday.num_days_from_monday(),
        WeekStartDay::Sunday => weekday.num_days_from_sunday(),
    }
}

// ── Day counting ────────────────────────────────────────────────────────────

/// Whole days from `earlier` to `later` (`later - earlier`).
///
/// Negative when `later` actually precedes `earlier`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use presence_engine::calendar::days_between;
///
/// let today = NaiveDate::from_ymd_opt(2026, 3, 20).unwrap();
/// let pr = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
/// assert_eq!(days_between(today, pr), 10);
/// assert_eq!(days_between(pr, today), -10);
/// ```
pub fn days_between(later: NaiveDate, earlier: NaiveDate) -> i64 {
    later.signed_duration_since(earlier).num_days()
}

/// Whole calendar days between two zoned instants.
///
/// Each instant is first reduced to its local calendar date, so the result
/// counts midnights crossed rather than 24-hour blocks. Across a DST switch
/// the elapsed time between two local midnights is 23 or 25 hours, and plain
/// timestamp division would be off by one.
pub fn days_between_instants<T: TimeZone>(later: &DateTime<T>, earlier: &DateTime<T>) -> i64 {
    days_between(later.date_naive(), earlier.date_naive())
}

/// The calendar date of `now` as seen on a wall clock in `timezone`.
///
/// # Errors
///
/// Returns [`PresenceError::InvalidTimezone`] if `timezone` is not a valid
/// IANA name.
pub fn today_in(now: DateTime<Utc>, timezone: &str) -> Result<NaiveDate> {
    let tz = parse_timezone(timezone)?;
    Ok(now.with_timezone(&tz).date_naive())
}

// ── Month grid ──────────────────────────────────────────────────────────────

/// Number of days in `month` (1-based) of `year`.
///
/// # Errors
///
/// Returns [`PresenceError::InvalidMonth`] if `month` is not in `1..=12`.
pub fn days_in_month(year: i32, month: u32) -> Result<u32> {
    let first = first_of_month(year, month)?;
    let first_after = first
        .checked_add_months(Months::new(1))
        .ok_or_else(|| PresenceError::DateOutOfRange(format!("{year}-{month:02}")))?;
    Ok(days_between(first_after, first) as u32)
}

/// Weekday of the first day of `month` (1-based) in `year`.
///
/// # Errors
///
/// Returns [`PresenceError::InvalidMonth`] if `month` is not in `1..=12`.
pub fn first_weekday_of_month(year: i32, month: u32) -> Result<Weekday> {
    Ok(first_of_month(year, month)?.weekday())
}

/// Empty cells before day 1 when the month is laid out in week rows.
pub fn leading_blank_days(year: i32, month: u32, week_start: WeekStartDay) -> Result<u32> {
    let weekday = first_weekday_of_month(year, month)?;
    Ok(days_from_week_start(weekday, week_start))
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    if !(1..=12).contains(&month) {
        return Err(PresenceError::InvalidMonth(month));
    }
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| PresenceError::DateOutOfRange(format!("{year}-{month:02}")))
}

// ── Month navigation ────────────────────────────────────────────────────────

/// Shift `date` by `delta` calendar months.
///
/// The day of month is clamped to the length of the target month, so
/// January 31 plus one month is the last day of February rather than a day
/// in March.
///
/// # Errors
///
/// Returns [`PresenceError::DateOutOfRange`] if the result is not
/// representable.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use presence_engine::calendar::add_months;
///
/// let jan31 = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
/// assert_eq!(add_months(jan31, 1).unwrap(), NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
/// ```
pub fn add_months(date: NaiveDate, delta: i32) -> Result<NaiveDate> {
    let months = Months::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    };
    shifted.ok_or_else(|| PresenceError::DateOutOfRange(format!("{date} {delta:+} months")))
}

/// Year window the date picker may navigate within.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthBounds {
    pub min_year: i32,
    pub max_year: i32,
}

impl Default for MonthBounds {
    fn default() -> Self {
        Self {
            min_year: 2000,
            max_year: 2050,
        }
    }
}

/// Move a month view by `delta` months.
///
/// Returns the first day of the new month, or `None` when the move would
/// leave the `bounds` year window (the view stays where it is).
pub fn step_month(view: NaiveDate, delta: i32, bounds: &MonthBounds) -> Option<NaiveDate> {
    let base = view.with_day(1)?;
    let next = add_months(base, delta).ok()?;
    (bounds.min_year..=bounds.max_year)
        .contains(&next.year())
        .then_some(next)
}

/// Whether `date` lies within the optional inclusive `[min, max]` window.
pub fn is_selectable(date: NaiveDate, min: Option<NaiveDate>, max: Option<NaiveDate>) -> bool {
    min.is_none_or(|m| date >= m) && max.is_none_or(|m| date <= m)
}

// ── Parsing ─────────────────────────────────────────────────────────────────

/// Parse a canonical `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns [`PresenceError::InvalidDate`] for anything else.
pub fn parse_iso_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| PresenceError::InvalidDate(format!("'{}': {}", s, e)))
}

/// Parse an IANA timezone string into `Tz`.
pub(crate) fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse::<Tz>()
        .map_err(|_| PresenceError::InvalidTimezone(format!("'{}'", s)))
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ── days_between ────────────────────────────────────────────────────

    #[test]
    fn test_days_between_same_day_is_zero() {
        assert_eq!(days_between(date(2026, 5, 1), date(2026, 5, 1)), 0);
    }

    #[test]
    fn test_days_between_is_signed() {
        assert_eq!(days_between(date(2026, 1, 11), date(2026, 1, 1)), 10);
        assert_eq!(days_between(date(2026, 1, 1), date(2026, 1, 11)), -10);
    }

    #[test]
    fn test_days_between_across_leap_day() {
        assert_eq!(days_between(date(2028, 3, 1), date(2028, 2, 28)), 2);
        assert_eq!(days_between(date(2027, 3, 1), date(2027, 2, 28)), 1);
    }

    #[test]
    fn test_days_between_instants_across_spring_forward() {
        // March 8, 2026: Toronto springs forward, so this span is 47 hours
        let tz: Tz = "America/Toronto".parse().unwrap();
        let before = tz.with_ymd_and_hms(2026, 3, 7, 0, 0, 0).single().unwrap();
        let after = tz.with_ymd_and_hms(2026, 3, 9, 0, 0, 0).single().unwrap();
        assert_eq!((after.clone() - before.clone()).num_hours(), 47);
        assert_eq!(days_between_instants(&after, &before), 2);
    }

    #[test]
    fn test_days_between_instants_ignores_time_of_day() {
        let tz: Tz = "America/Vancouver".parse().unwrap();
        let late = tz.with_ymd_and_hms(2026, 11, 2, 23, 30, 0).single().unwrap();
        let early = tz.with_ymd_and_hms(2026, 10, 31, 0, 15, 0).single().unwrap();
        assert_eq!(days_between_instants(&late, &early), 2);
    }

    #[test]
    fn test_today_in_uses_local_calendar_day() {
        // 03:00 UTC on Jan 16 is still Jan 15 in Toronto
        let now = Utc.with_ymd_and_hms(2026, 1, 16, 3, 0, 0).single().unwrap();
        assert_eq!(today_in(now, "America/Toronto").unwrap(), date(2026, 1, 15));
        assert_eq!(today_in(now, "UTC").unwrap(), date(2026, 1, 16));
    }

    #[test]
    fn test_today_in_invalid_timezone() {
        let now = Utc.with_ymd_and_hms(2026, 1, 16, 3, 0, 0).single().unwrap();
        let err = today_in(now, "Mars/Olympus").unwrap_err().to_string();
        assert!(err.contains("Invalid timezone"), "got: {err}");
    }

    // ── month grid ──────────────────────────────────────────────────────

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2026, 1).unwrap(), 31);
        assert_eq!(days_in_month(2026, 4).unwrap(), 30);
        assert_eq!(days_in_month(2026, 2).unwrap(), 28);
        assert_eq!(days_in_month(2028, 2).unwrap(), 29);
        assert_eq!(days_in_month(2026, 12).unwrap(), 31);
    }

    #[test]
    fn test_days_in_month_rejects_bad_month() {
        assert_eq!(days_in_month(2026, 0), Err(PresenceError::InvalidMonth(0)));
        assert_eq!(days_in_month(2026, 13), Err(PresenceError::InvalidMonth(13)));
    }

    #[test]
    fn test_first_weekday_of_month() {
        // March 1, 2026 is a Sunday
        assert_eq!(first_weekday_of_month(2026, 3).unwrap(), Weekday::Sun);
        assert_eq!(first_weekday_of_month(2026, 10).unwrap(), Weekday::Thu);
    }

    #[test]
    fn test_leading_blank_days_by_week_start() {
        // October 1, 2026 is a Thursday
        assert_eq!(leading_blank_days(2026, 10, WeekStartDay::Sunday).unwrap(), 4);
        assert_eq!(leading_blank_days(2026, 10, WeekStartDay::Monday).unwrap(), 3);
        assert_eq!(leading_blank_days(2026, 3, WeekStartDay::Sunday).unwrap(), 0);
        assert_eq!(leading_blank_days(2026, 3, WeekStartDay::Monday).unwrap(), 6);
    }

    // ── month navigation ────────────────────────────────────────────────

    #[test]
    fn test_add_months_clamps_day() {
        assert_eq!(add_months(date(2026, 1, 31), 1).unwrap(), date(2026, 2, 28));
        assert_eq!(add_months(date(2028, 1, 31), 1).unwrap(), date(2028, 2, 29));
        assert_eq!(add_months(date(2026, 3, 31), -1).unwrap(), date(2026, 2, 28));
    }

    #[test]
    fn test_add_months_crosses_year() {
        assert_eq!(add_months(date(2026, 11, 15), 3).unwrap(), date(2027, 2, 15));
        assert_eq!(add_months(date(2026, 1, 15), -1).unwrap(), date(2025, 12, 15));
        assert_eq!(add_months(date(2026, 6, 15), 0).unwrap(), date(2026, 6, 15));
    }

    #[test]
    fn test_step_month_returns_first_of_month() {
        let bounds = MonthBounds::default();
        assert_eq!(
            step_month(date(2026, 1, 31), 1, &bounds),
            Some(date(2026, 2, 1))
        );
    }

    #[test]
    fn test_step_month_respects_year_window() {
        let bounds = MonthBounds::default();
        assert_eq!(step_month(date(2000, 1, 10), -1, &bounds), None);
        assert_eq!(step_month(date(2050, 12, 10), 1, &bounds), None);
        assert_eq!(
            step_month(date(2050, 11, 10), 1, &bounds),
            Some(date(2050, 12, 1))
        );
    }

    #[test]
    fn test_is_selectable_inclusive_bounds() {
        let min = Some(date(2026, 1, 1));
        let max = Some(date(2026, 1, 31));
        assert!(is_selectable(date(2026, 1, 1), min, max));
        assert!(is_selectable(date(2026, 1, 31), min, max));
        assert!(!is_selectable(date(2025, 12, 31), min, max));
        assert!(!is_selectable(date(2026, 2, 1), min, max));
        assert!(is_selectable(date(1999, 1, 1), None, None));
    }

    // ── parsing ─────────────────────────────────────────────────────────

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_iso_date("2026-02-14").unwrap(), date(2026, 2, 14));
        assert_eq!(parse_iso_date(" 2026-02-14 ").unwrap(), date(2026, 2, 14));
    }

    #[test]
    fn test_parse_iso_date_rejects_garbage() {
        for input in ["", "2026-02-30", "14/02/2026", "yesterday"] {
            let err = parse_iso_date(input).unwrap_err().to_string();
            assert!(err.contains("Invalid date"), "input {input:?} got: {err}");
        }
    }
}
