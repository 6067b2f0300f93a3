// src/tests/datetime_tests.rs
// … ≤ ≥ ≠ ≟

//! tests for `datetime.rs` functions

#![allow(non_snake_case)]

use crate::data::datetime::{
    datetime_format,
    datetime_now,
    datetime_parse_from_str,
    dt_pattern_has_tz,
    dt_pattern_validate,
    timedelta_to_duration_clamped,
    Clock,
    DateTimeL,
    DateTimeLOpt,
    DateTimePattern_str,
    SystemClock,
    TimeDelta,
    Utc,
    DATE_FORMAT,
    DATE_FORMAT_WRITE,
};
use crate::readers::stopsignal::StopSignal;
use crate::tests::common::{dt_2020, ymdhms_micro};

use std::time::{Duration, Instant};

use ::more_asserts::{assert_ge, assert_le, assert_lt};
use ::si_trace_print::stack::stack_offset_set;
use ::test_case::test_case;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[test_case("%Y-%m-%dT%H:%M:%S%z", true)]
#[test_case("%Y-%m-%dT%H:%M:%S%:z", true)]
#[test_case("%Y-%m-%dT%H:%M:%S%#z", true)]
#[test_case(DATE_FORMAT, false; "DATE_FORMAT")]
#[test_case("%Y-%m-%d", false)]
fn test_dt_pattern_has_tz(
    pattern: &DateTimePattern_str,
    expect: bool,
) {
    assert_eq!(dt_pattern_has_tz(pattern), expect, "pattern {:?}", pattern);
}

#[test_case(DATE_FORMAT, true; "DATE_FORMAT")]
#[test_case(DATE_FORMAT_WRITE, true; "DATE_FORMAT_WRITE")]
#[test_case("%Y%m%d", true)]
#[test_case("", false; "empty")]
#[test_case("%Q", false; "unknown specifier")]
#[test_case("hello", false; "no specifiers")]
fn test_dt_pattern_validate(
    pattern: &DateTimePattern_str,
    expect_ok: bool,
) {
    let result = dt_pattern_validate(pattern);
    assert_eq!(result.is_ok(), expect_ok, "pattern {:?} result {:?}", pattern, result);
}

#[test_case("2020-01-01T00:00:00.000000Z", DATE_FORMAT, Some(dt_2020()); "micro")]
#[test_case("2020-01-01T00:00:00Z", DATE_FORMAT, Some(dt_2020()); "no fractional")]
#[test_case(
    "2020-01-01T00:00:02.5Z", DATE_FORMAT, Some(ymdhms_micro(2020, 1, 1, 0, 0, 2, 500000));
    "fractional 1 digit"
)]
#[test_case(
    "2020-01-01T01:00:00+0100", "%Y-%m-%dT%H:%M:%S%z", Some(dt_2020());
    "offset +0100"
)]
#[test_case("2020-01-01", "%Y-%m-%d", Some(dt_2020()); "date only")]
#[test_case("2020-01-01T00:00:00.000000Z hello", DATE_FORMAT, None; "trailing data")]
#[test_case(" 2020-01-01T00:00:00.000000Z", DATE_FORMAT, None; "leading space")]
#[test_case("hello", DATE_FORMAT, None; "not a datetime")]
#[test_case("", DATE_FORMAT, None; "empty")]
#[test_case("2020-13-01T00:00:00Z", DATE_FORMAT, None; "bad month")]
fn test_datetime_parse_from_str(
    data: &str,
    pattern: &DateTimePattern_str,
    expect: DateTimeLOpt,
) {
    stack_offset_set(Some(2));
    let result: DateTimeLOpt = datetime_parse_from_str(data, pattern);
    assert_eq!(result, expect, "data {:?} pattern {:?}", data, pattern);
}

#[test]
fn test_datetime_format_DATE_FORMAT_WRITE() {
    let dt: DateTimeL = ymdhms_micro(2020, 1, 1, 0, 0, 2, 250);
    let s: String = datetime_format(&dt, DATE_FORMAT_WRITE);
    assert_eq!(s, "2020-01-01T00:00:02.000250Z");
    // written timestamps are readable with the default format
    assert_eq!(datetime_parse_from_str(s.as_str(), DATE_FORMAT), Some(dt));
}

#[test]
fn test_datetime_now() {
    let before = DateTimeL::from(Utc::now());
    let now: DateTimeL = datetime_now();
    let after = DateTimeL::from(Utc::now());
    assert_le!(before, now);
    assert_ge!(after, now);
    assert_eq!(now.offset().local_minus_utc(), 0);
}

#[test_case(TimeDelta::seconds(2), Duration::from_secs(2); "2s")]
#[test_case(TimeDelta::milliseconds(1500), Duration::from_millis(1500); "1.5s")]
#[test_case(TimeDelta::zero(), Duration::ZERO; "zero")]
#[test_case(TimeDelta::seconds(-2), Duration::ZERO; "negative")]
fn test_timedelta_to_duration_clamped(
    delta: TimeDelta,
    expect: Duration,
) {
    assert_eq!(timedelta_to_duration_clamped(&delta), expect);
}

#[test]
fn test_SystemClock_sleep() {
    let stop = StopSignal::new();
    let mut clock = SystemClock::new(stop);
    let start = Instant::now();
    assert!(clock.sleep(Duration::from_millis(20)));
    assert_ge!(start.elapsed(), Duration::from_millis(20));
}

#[test]
fn test_SystemClock_sleep_stopped() {
    let stop = StopSignal::new();
    let mut clock = SystemClock::new(stop.clone());
    stop.stop();
    let start = Instant::now();
    assert!(!clock.sleep(Duration::from_secs(30)));
    assert_lt!(start.elapsed(), Duration::from_secs(5));
}
