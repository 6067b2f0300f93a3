// src/data/datetime.rs

//! Functions to parse and format the timestamps that lead log records, and
//! the [`Clock`] used to measure and wait out the time between records.
//!
//! Timestamps are chrono [`DateTime`] instances with a [`FixedOffset`],
//! a [`DateTimeL`]. Parsing and [`datetime_now`] share this representation so
//! that differences between them are meaningful.
//!
//! The most relevant documents to understand this file are:
//! - `chrono` crate [`strftime`] format.
//!
//! [`DateTime`]: https://docs.rs/chrono/0.4.40/chrono/struct.DateTime.html
//! [`FixedOffset`]: https://docs.rs/chrono/0.4.40/chrono/offset/struct.FixedOffset.html
//! [`strftime`]: https://docs.rs/chrono/0.4.40/chrono/format/strftime/index.html

#![allow(non_camel_case_types)]

use crate::debug::printers::str_to_String_noraw;
use crate::readers::stopsignal::StopSignal;

use std::time::Duration;

#[doc(hidden)]
pub use ::chrono::{
    DateTime,
    FixedOffset,
    NaiveDate,
    NaiveDateTime,
    TimeDelta,
    TimeZone,
    Utc,
};
use ::chrono::format::{Item, StrftimeItems};
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DateTime parsing and strftime formatting
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Crate `chrono` [`strftime`] formatting pattern, passed to
/// chrono [`DateTime::parse_from_str`] or [`NaiveDateTime::parse_from_str`].
///
/// [`strftime`]: https://docs.rs/chrono/0.4.40/chrono/format/strftime/index.html
/// [`DateTime::parse_from_str`]: https://docs.rs/chrono/0.4.40/chrono/struct.DateTime.html#method.parse_from_str
/// [`NaiveDateTime::parse_from_str`]: https://docs.rs/chrono/0.4.40/chrono/naive/struct.NaiveDateTime.html#method.parse_from_str
pub type DateTimePattern_str = str;

/// A chrono [`DateTime`] type used in _lfrlib_.
///
/// [`DateTime`]: https://docs.rs/chrono/0.4.40/chrono/struct.DateTime.html
pub type DateTimeL = DateTime<FixedOffset>;
pub type DateTimeLOpt = Option<DateTimeL>;

/// Default timestamp format of log records, e.g.
/// `2020-01-01T00:00:00.000000Z`. Always UTC.
///
/// `%.f` accepts any count of fractional digits when parsing.
pub const DATE_FORMAT: &DateTimePattern_str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Format used when writing a timestamp with microsecond precision, e.g.
/// `2020-01-01T00:00:00.000000Z`. Parseable with [`DATE_FORMAT`].
pub const DATE_FORMAT_WRITE: &DateTimePattern_str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// strftime specifiers that carry a timezone offset.
const DTFS_TZ: [&str; 5] = ["%z", "%:z", "%::z", "%:::z", "%#z"];

/// Does the strftime `pattern` include a timezone offset specifier?
pub fn dt_pattern_has_tz(pattern: &DateTimePattern_str) -> bool {
    DTFS_TZ
        .iter()
        .any(|tz| pattern.contains(tz))
}

/// Is the strftime `pattern` usable for parsing?
///
/// Returns the reason it is not usable.
pub fn dt_pattern_validate(pattern: &DateTimePattern_str) -> Result<(), String> {
    if pattern.is_empty() {
        return Err(String::from("datetime format is empty"));
    }
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(format!("datetime format {:?} has an invalid strftime specifier", pattern));
    }
    if !pattern.contains('%') {
        return Err(format!("datetime format {:?} has no strftime specifiers", pattern));
    }

    Ok(())
}

/// Parse `data` as a datetime per strftime `pattern`.
///
/// If `pattern` has a timezone offset specifier then the offset in `data` is
/// used. Otherwise the datetime is presumed UTC. A `pattern` without time
/// specifiers, e.g. `"%Y-%m-%d"`, is presumed midnight.
///
/// All of `data` must match `pattern`; leading or trailing text is an error.
pub fn datetime_parse_from_str(
    data: &str,
    pattern: &DateTimePattern_str,
) -> DateTimeLOpt {
    defn!("(pattern {:?}, data {:?})", pattern, str_to_String_noraw(data));

    if dt_pattern_has_tz(pattern) {
        match DateTime::parse_from_str(data, pattern) {
            Ok(val) => {
                defx!("return Some({:?})", val);
                return Some(val);
            }
            Err(_err) => {
                defx!("DateTime::parse_from_str failed {}; return None", _err);
                return None;
            }
        }
    }

    let naive: NaiveDateTime = match NaiveDateTime::parse_from_str(data, pattern) {
        Ok(val) => val,
        Err(_err) => {
            defo!("NaiveDateTime::parse_from_str failed {}", _err);
            // a date-only pattern, e.g. `"%Y%m%d"`, is not enough for a
            // `NaiveDateTime`
            match NaiveDate::parse_from_str(data, pattern) {
                Ok(date) => match date.and_hms_opt(0, 0, 0) {
                    Some(val) => val,
                    None => {
                        defx!("and_hms_opt failed; return None");
                        return None;
                    }
                },
                Err(_err) => {
                    defx!("NaiveDate::parse_from_str failed {}; return None", _err);
                    return None;
                }
            }
        }
    };
    let dt: DateTimeL = DateTimeL::from(Utc.from_utc_datetime(&naive));
    defx!("return Some({:?})", dt);

    Some(dt)
}

/// The current wall-clock time, same representation as
/// [`datetime_parse_from_str`].
pub fn datetime_now() -> DateTimeL {
    DateTimeL::from(Utc::now())
}

/// Format `dt` per strftime `pattern`.
pub fn datetime_format(
    dt: &DateTimeL,
    pattern: &DateTimePattern_str,
) -> String {
    dt.format(pattern).to_string()
}

/// Convert a chrono [`TimeDelta`] to a [`std::time::Duration`].
/// Negative values become zero.
pub fn timedelta_to_duration_clamped(delta: &TimeDelta) -> Duration {
    match delta.to_std() {
        Ok(val) => val,
        // `to_std` fails only for negative values
        Err(_) => Duration::ZERO,
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Clock
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Source of wall-clock time and of sleeping for a
/// [`PacedLogReader`].
///
/// [`PacedLogReader`]: crate::readers::pacedlogreader::PacedLogReader
pub trait Clock {
    /// The current wall-clock time.
    fn now(&self) -> DateTimeL;
    /// Block for `duration`. Returns `false` if the sleep was interrupted.
    fn sleep(&mut self, duration: Duration) -> bool;
}

/// The system wall clock. Sleeps are interruptible by a [`StopSignal`].
#[derive(Clone, Debug)]
pub struct SystemClock {
    stop: StopSignal,
}

impl SystemClock {
    pub fn new(stop: StopSignal) -> SystemClock {
        SystemClock { stop }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTimeL {
        datetime_now()
    }

    fn sleep(&mut self, duration: Duration) -> bool {
        self.stop.sleep(duration)
    }
}
