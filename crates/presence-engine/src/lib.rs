//! # presence-engine
//!
//! Deterministic physical-presence accrual for citizenship eligibility.
//!
//! The engine takes a reference date, an optional permanent-residency date,
//! and the caller's trip and temporary-presence records, and answers two
//! questions: how many credited days have accrued so far, and on which
//! calendar date the requirement will be met. Every function is pure. The
//! caller supplies "today", so results are reproducible and safe to recompute
//! on every edit.
//!
//! ## Modules
//!
//! - [`calendar`] — Calendar-day counting, month grid helpers, month navigation
//! - [`records`] — Trip and temporary-presence records, duration validation
//! - [`accrual`] — Historical PR days, absences, capped temporary credit
//! - [`projection`] — Eligibility date projection around planned trips
//! - [`ledger`] — Caller-owned state with stored-format JSON and day-count audit
//! - [`error`] — Error types

pub mod accrual;
pub mod calendar;
pub mod error;
pub mod ledger;
pub mod projection;
pub mod records;

pub use accrual::{
    accumulated_credit, compute_accrual, historical_absence, historical_pr_days,
    temporary_credit, total_absence, AccrualInput, AccrualSummary, TemporaryCredit,
    TEMPORARY_CREDIT_CAP,
};
pub use calendar::{
    add_months, days_between, days_between_instants, days_in_month, first_weekday_of_month,
    is_selectable, leading_blank_days, parse_iso_date, step_month, today_in, MonthBounds,
    WeekStartDay,
};
pub use error::PresenceError;
pub use ledger::{PresenceLedger, PresenceReport};
pub use projection::{
    project_eligibility, EligibilityProjection, ProjectionInput, ProjectionOptions,
    DEFAULT_REQUIREMENT_DAYS,
};
pub use records::{
    compute_duration, inclusive_days, DurationCheck, DurationDrift, PresencePeriod, PresenceType,
    TemporaryPresenceRecord, TripRecord,
};
