// Parameterised tests for interval collision and day decomposition

#[path = "../../fixtures/mod.rs"]
mod fixtures;

use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use fixtures::dates::{at, minutes_into_day};
use fixtures::events::interval;
use interval_engine::models::interval::Interval;
use interval_engine::utils::date::{days_touched, format_day_time};
use test_case::test_case;

#[test_case((9, 0), (10, 0), (9, 30), (10, 30), true ; "partial overlap")]
#[test_case((9, 0), (10, 0), (10, 0), (11, 0), false ; "touching edges")]
#[test_case((9, 0), (12, 0), (10, 0), (11, 0), true ; "nested")]
#[test_case((9, 0), (10, 0), (9, 0), (10, 0), true ; "identical")]
#[test_case((9, 0), (10, 0), (11, 0), (12, 0), false ; "disjoint")]
fn test_collision(
    a_start: (u32, u32),
    a_end: (u32, u32),
    b_start: (u32, u32),
    b_end: (u32, u32),
    expected: bool,
) {
    let a = interval(at(a_start.0, a_start.1), at(a_end.0, a_end.1));
    let b = interval(at(b_start.0, b_start.1), at(b_end.0, b_end.1));
    assert_eq!(a.collides_with(&b), expected);
    assert_eq!(b.collides_with(&a), expected, "collision must be symmetric");
}

#[test_case(0 ; "zero length")]
#[test_case(-30 ; "reversed")]
fn test_invalid_interval_rejected(length_minutes: i64) {
    let start = at(9, 0);
    assert!(Interval::new(start, start + Duration::minutes(length_minutes)).is_err());
}

#[test_case(60, 60, 1 ; "within one day")]
#[test_case(23 * 60, 60, 1 ; "ends on midnight")]
#[test_case(23 * 60, 61, 2 ; "crosses midnight")]
#[test_case(0, 3 * 24 * 60, 3 ; "three full days")]
fn test_days_touched(offset_minutes: i64, length_minutes: i64, expected_days: usize) {
    let start = minutes_into_day(offset_minutes);
    let span = interval(start, start + Duration::minutes(length_minutes));
    let days = days_touched(&Tz::UTC, &span);

    assert_eq!(days.len(), expected_days);
    assert_eq!(days[0], NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
}

#[test_case(0, true, "00:00")]
#[test_case(90, true, "01:30")]
#[test_case(23 * 60 + 59, true, "23:59")]
#[test_case(14 * 60 + 5, false, "14")]
fn test_format_day_time(minutes: i64, with_minutes: bool, expected: &str) {
    assert_eq!(format_day_time(Duration::minutes(minutes), with_minutes), expected);
}
