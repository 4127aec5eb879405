//! End-to-end accrual and projection scenarios.

use chrono::{NaiveDate, TimeDelta};
use presence_engine::{
    compute_accrual, compute_duration, historical_absence, historical_pr_days,
    project_eligibility, temporary_credit, AccrualInput, PresenceType, ProjectionInput,
    TemporaryPresenceRecord, TripRecord,
};

fn reference() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

fn day(offset: i64) -> NaiveDate {
    reference() + TimeDelta::days(offset)
}

fn trip(from: i64, to: i64) -> TripRecord {
    TripRecord::new(format!("trip{from}"), "Abroad", day(from), day(to)).unwrap()
}

fn temp_record(days: i64) -> TemporaryPresenceRecord {
    let start = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
    let end = start + TimeDelta::days(days - 1);
    TemporaryPresenceRecord::new("temp", PresenceType::Visitor, start, end).unwrap()
}

#[test]
fn scenario_a_nothing_recorded() {
    let summary = compute_accrual(&AccrualInput {
        pr_date: None,
        trips: &[],
        temp_records: &[],
        reference_date: reference(),
    });
    assert_eq!(summary.historical_credit, 0);
    assert_eq!(summary.accumulated_credit, 0);

    let projection = project_eligibility(&ProjectionInput {
        accumulated_credit: summary.accumulated_credit,
        requirement: 1096,
        reference_date: reference(),
        trips: &[],
        include_future_travel: false,
    });
    assert_eq!(projection.days_remaining, 1096);
    assert_eq!(projection.eligibility_date, day(1096));
    assert_eq!(projection.days_until_eligible, 1096);
}

#[test]
fn scenario_b_ten_days_since_pr() {
    assert_eq!(historical_pr_days(Some(day(-10)), reference()), 10);
    let summary = compute_accrual(&AccrualInput {
        pr_date: Some(day(-10)),
        trips: &[],
        temp_records: &[],
        reference_date: reference(),
    });
    assert_eq!(summary.accumulated_credit, 10);
}

#[test]
fn scenario_c_temporary_credit_cap() {
    let under = temporary_credit(&[temp_record(400)]);
    assert_eq!(under.credited, 200);
    assert_eq!(under.capped, 200);
    assert!(!under.is_capped);

    let over = temporary_credit(&[temp_record(800)]);
    assert_eq!(over.credited, 400);
    assert_eq!(over.capped, 365);
    assert!(over.is_capped);
}

#[test]
fn scenario_d_past_trip() {
    assert_eq!(historical_absence(&[trip(-20, -10)], reference()), 11);
}

#[test]
fn scenario_e_trip_straddling_reference() {
    let trips = [trip(-5, 5)];
    assert_eq!(historical_absence(&trips, reference()), 6);

    let projection = project_eligibility(&ProjectionInput {
        accumulated_credit: 1090,
        requirement: 1096,
        reference_date: reference(),
        trips: &trips,
        include_future_travel: true,
    });
    // Days +1..=+5 are abroad, the six credited days are +6..=+11
    assert_eq!(projection.days_remaining, 6);
    assert_eq!(projection.eligibility_date, day(11));
}

#[test]
fn scenario_f_future_trip_pushes_date_out() {
    let trips = [trip(1, 3)];
    let projection = project_eligibility(&ProjectionInput {
        accumulated_credit: 1093,
        requirement: 1096,
        reference_date: reference(),
        trips: &trips,
        include_future_travel: true,
    });
    assert_eq!(projection.days_remaining, 3);
    assert_eq!(projection.eligibility_date, day(6));
    assert_eq!(projection.days_until_eligible, 6);
}

#[test]
fn trip_starting_on_reference_touches_both_sides() {
    let trips = [trip(0, 2)];
    assert_eq!(historical_absence(&trips, reference()), 1);

    let projection = project_eligibility(&ProjectionInput {
        accumulated_credit: 1095,
        requirement: 1096,
        reference_date: reference(),
        trips: &trips,
        include_future_travel: true,
    });
    assert_eq!(projection.eligibility_date, day(3));
}

#[test]
fn invalid_range_feedback() {
    let check = compute_duration(day(3), day(1));
    assert!(!check.valid);
    assert_eq!(check.days, 0);

    let err = TripRecord::new("x", "Peru", day(3), day(1)).unwrap_err();
    assert!(err.to_string().contains("Invalid date range"), "got: {err}");
}
