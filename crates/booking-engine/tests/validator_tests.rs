//! Tests for ordered reservation validation.

use booking_engine::{
    validate_reservation, CalendarDate, DEFAULT_TIMEZONE, FixedClock, OccupiedInterval, ReasonKind,
    ReservationRequest, TimeOfDay, ValidationVerdict, Validator, ValidatorConfig,
};
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::America::Santiago;

fn d(s: &str) -> CalendarDate {
    s.parse().unwrap()
}

fn t(s: &str) -> TimeOfDay {
    s.parse().unwrap()
}

/// 2024-03-20 00:00 in Santiago.
fn ref_now() -> DateTime<Utc> {
    Santiago
        .with_ymd_and_hms(2024, 3, 20, 0, 0, 0)
        .unwrap()
        .with_timezone(&Utc)
}

fn day() -> Vec<OccupiedInterval> {
    [("09:00", "10:30"), ("12:00", "13:00"), ("15:00", "17:00")]
        .iter()
        .map(|(s, e)| OccupiedInterval::parse(s, e).unwrap())
        .collect()
}

fn validate(date: &str, start: &str, end: &str) -> ValidationVerdict {
    validate_reservation(d(date), t(start), t(end), &day(), ref_now(), Santiago)
}

#[test]
fn free_slot_tomorrow_is_valid() {
    let verdict = validate("2024-03-21", "08:00", "09:00");
    assert!(verdict.is_valid());
    assert_eq!(verdict.rejection, None);
}

#[test]
fn today_is_bookable() {
    assert!(validate("2024-03-20", "13:00", "15:00").is_valid());
}

#[test]
fn past_date_rejected() {
    let verdict = validate("2024-03-19", "08:00", "09:00");
    assert!(!verdict.is_valid());
    assert_eq!(verdict.reason_kind(), Some(ReasonKind::PastDate));
    assert_eq!(
        verdict.message(),
        Some("cannot create reservations on past dates")
    );
    assert_eq!(verdict.conflicting_range(), None);
}

#[test]
fn past_date_takes_priority_over_inconsistent_interval() {
    let verdict = validate("2024-03-19", "10:00", "09:00");
    assert_eq!(verdict.reason_kind(), Some(ReasonKind::PastDate));
}

#[test]
fn inconsistent_interval_rejected() {
    let verdict = validate("2024-03-21", "10:00", "09:00");
    assert_eq!(verdict.reason_kind(), Some(ReasonKind::InconsistentInterval));
    assert_eq!(verdict.message(), Some("end time must be after start time"));
}

#[test]
fn inconsistent_interval_takes_priority_over_conflict() {
    // 10:00-10:00 sits inside an occupied range but is reported as inconsistent.
    let verdict = validate("2024-03-21", "10:00", "10:00");
    assert_eq!(verdict.reason_kind(), Some(ReasonKind::InconsistentInterval));
}

#[test]
fn overlap_rejected_with_range() {
    let verdict = validate("2024-03-21", "09:30", "11:00");
    assert_eq!(verdict.reason_kind(), Some(ReasonKind::ScheduleConflict));
    assert_eq!(verdict.conflicting_range(), Some("09:00 - 10:30"));
    assert_eq!(
        verdict.message(),
        Some("09:30-11:00 overlaps an existing reservation (09:00 - 10:30)")
    );
}

#[test]
fn past_date_takes_priority_over_conflict() {
    let verdict = validate("2024-03-19", "09:30", "11:00");
    assert_eq!(verdict.reason_kind(), Some(ReasonKind::PastDate));
}

#[test]
fn back_to_back_is_valid() {
    assert!(validate("2024-03-21", "10:30", "12:00").is_valid());
}

#[test]
fn identical_inputs_give_identical_verdicts() {
    let first = validate("2024-03-21", "09:30", "11:00");
    let second = validate("2024-03-21", "09:30", "11:00");
    assert_eq!(first, second);
}

#[test]
fn verdict_json_shape() {
    let ok = validate("2024-03-21", "08:00", "09:00");
    assert_eq!(serde_json::to_string(&ok).unwrap(), r#"{"valid":true}"#);

    let conflict = validate("2024-03-21", "12:00", "13:00");
    let value = serde_json::to_value(&conflict).unwrap();
    assert_eq!(value["valid"], false);
    assert_eq!(value["reasonKind"], "SCHEDULE_CONFLICT");
    assert_eq!(value["conflictingRange"], "12:00 - 13:00");

    let past = validate("2024-03-19", "08:00", "09:00");
    let value = serde_json::to_value(&past).unwrap();
    assert_eq!(value["reasonKind"], "PAST_DATE");
    assert!(value.get("conflictingRange").is_none());

    let back: ValidationVerdict = serde_json::from_value(value).unwrap();
    assert_eq!(back, past);
    let back: ValidationVerdict = serde_json::from_str(r#"{"valid":true}"#).unwrap();
    assert_eq!(back, ValidationVerdict::accepted());
}

#[test]
fn validator_facade_matches_free_function() {
    let validator = Validator::with_clock(Santiago, FixedClock(ref_now()));
    let request = ReservationRequest::parse("2024-03-21", "11:30", "14:00").unwrap();

    let verdict = validator.validate(&request, &day());
    assert_eq!(verdict, validate("2024-03-21", "11:30", "14:00"));
    assert_eq!(verdict.conflicting_range(), Some("12:00 - 13:00"));
}

#[test]
fn default_validator_uses_santiago() {
    assert_eq!(Validator::default().timezone(), Santiago);
    assert_eq!(Validator::default().timezone(), DEFAULT_TIMEZONE);

    // The wall-clock default and the config default agree.
    let from_default_config = Validator::from_config(&ValidatorConfig::default()).unwrap();
    assert_eq!(from_default_config.timezone(), Validator::default().timezone());

    let config = ValidatorConfig::from_json(r#"{"timezone":"UTC"}"#).unwrap();
    let validator = Validator::from_config(&config).unwrap();
    assert_eq!(validator.timezone(), chrono_tz::Tz::UTC);
}

#[test]
fn same_snapshot_admits_both_racing_requests() {
    // The engine takes no locks: two overlapping requests checked against the
    // same snapshot both pass. The storage layer must re-check on commit.
    let validator = Validator::with_clock(Santiago, FixedClock(ref_now()));
    let snapshot = day();

    let first = ReservationRequest::parse("2024-03-21", "13:00", "14:00").unwrap();
    let second = ReservationRequest::parse("2024-03-21", "13:30", "14:30").unwrap();

    assert!(validator.validate(&first, &snapshot).is_valid());
    assert!(validator.validate(&second, &snapshot).is_valid());

    // Once the first is visible to the second, the conflict is caught.
    let mut refreshed = snapshot.clone();
    refreshed.push(OccupiedInterval::new(first.start, first.end));
    let verdict = validator.validate(&second, &refreshed);
    assert_eq!(verdict.conflicting_range(), Some("13:00 - 14:00"));
}

#[test]
fn zero_length_occupied_entry_blocks_a_covering_request() {
    // Storage hands back 10:00:00-10:00:45, which truncates to 10:00 - 10:00.
    let occupied = vec![OccupiedInterval::parse("10:00:00", "10:00:45").unwrap()];
    let verdict = validate_reservation(
        d("2024-03-21"),
        t("10:00"),
        t("11:00"),
        &occupied,
        ref_now(),
        Santiago,
    );

    assert_eq!(verdict.reason_kind(), Some(ReasonKind::ScheduleConflict));
    assert_eq!(verdict.conflicting_range(), Some("10:00 - 10:00"));
}
