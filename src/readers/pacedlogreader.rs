// src/readers/pacedlogreader.rs

//! Implements a [`PacedLogReader`], the driver of reading records from
//! log files and optionally replaying them with their original pacing.
//!
//! Pacing uses the timestamp leading each record. Before returning a record
//! the reader sleeps so that the wall-clock time between two returned
//! records is at least the time between their timestamps.

use crate::common::{
    Count,
    FPath,
    Record,
    ReaderError,
    ResultS3,
    ResultS3Record,
    RECORD_TIMESTAMP_SEP,
};
use crate::data::datetime::{
    datetime_parse_from_str,
    dt_pattern_validate,
    timedelta_to_duration_clamped,
    Clock,
    DateTimeL,
    DateTimeLOpt,
    DateTimePattern_str,
    SystemClock,
    TimeDelta,
    DATE_FORMAT,
};
use crate::debug::printers::{e_wrn, str_to_String_noraw};
use crate::readers::filesequencer::{
    FileSequencer,
    Sequencer,
    SummaryFileSequencer,
};
use crate::readers::helpers::filebase_to_file_spec;
use crate::readers::stopsignal::StopSignal;

use std::fmt;
use std::time::Duration;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ReaderConfig
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Default wait between looking for new records or new files.
pub const RETRY_INTERVAL_DEFAULT: Duration = Duration::from_millis(100);

/// Configuration of a [`PacedLogReader`]. Fixed once the reader is created.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReaderConfig {
    /// Base path of the log files. A wildcard is appended so that files
    /// with suffixes, e.g. a date, are also read.
    /// `None` or empty reads standard input.
    pub filebase: Option<FPath>,
    /// At the end of the last file, wait for more records instead of
    /// returning `Done`.
    pub tail: bool,
    /// At the end of the last file, look for new files matching the file
    /// base.
    pub refresh: bool,
    /// With `tail` or `refresh`, the wait between looking for new records
    /// or new files.
    pub retry_interval: Duration,
    /// Fixed minimum time between returned records.
    /// Mutually exclusive with `use_timestamps`.
    pub interval: Duration,
    /// Pace the returned records per the timestamps leading each record.
    /// Mutually exclusive with a non-zero `interval`.
    pub use_timestamps: bool,
    /// strftime format of the timestamp leading each record.
    pub date_format: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            filebase: None,
            tail: false,
            refresh: false,
            retry_interval: RETRY_INTERVAL_DEFAULT,
            interval: Duration::ZERO,
            use_timestamps: false,
            date_format: String::from(DATE_FORMAT),
        }
    }
}

impl ReaderConfig {
    /// A default `ReaderConfig` for files matching `filebase`.
    pub fn new(filebase: Option<FPath>) -> ReaderConfig {
        ReaderConfig {
            filebase,
            ..Default::default()
        }
    }

    /// Check the settings are usable together.
    pub fn validate(&self) -> Result<(), ReaderError> {
        if !self.interval.is_zero() && self.use_timestamps {
            return Err(ReaderError::Configuration(String::from(
                "can not specify both a fixed interval and use_timestamps",
            )));
        }
        if self.use_timestamps {
            if let Err(reason) = dt_pattern_validate(self.date_format.as_str()) {
                return Err(ReaderError::Configuration(reason));
            }
        }

        Ok(())
    }

    /// The file-matching glob pattern derived from `filebase`.
    /// `None` is standard input.
    pub fn file_spec(&self) -> Option<FPath> {
        filebase_to_file_spec(self.filebase.as_deref())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// record timestamps
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Split a record into the leading timestamp token and the remainder.
/// Splits at the first [`RECORD_TIMESTAMP_SEP`]; neither part includes it.
pub fn record_split_timestamp(record: &str) -> Option<(&str, &str)> {
    record.split_once(RECORD_TIMESTAMP_SEP)
}

/// Parse the timestamp leading the `record` per strftime `date_format`.
pub fn record_timestamp(
    record: &str,
    date_format: &DateTimePattern_str,
) -> Result<DateTimeL, ReaderError> {
    let token: &str = match record_split_timestamp(record) {
        Some((token, _)) => token,
        None => {
            return Err(ReaderError::RecordFormat {
                record: Record::from(record),
                reason: format!("no timestamp separator {:?}", RECORD_TIMESTAMP_SEP),
            });
        }
    };
    match datetime_parse_from_str(token, date_format) {
        Some(dt) => Ok(dt),
        None => Err(ReaderError::RecordFormat {
            record: Record::from(record),
            reason: format!("timestamp {:?} does not match format {:?}", token, date_format),
        }),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PacedLogReader
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Reference points for pacing, from the last record returned.
///
/// Both are `None` until the first paced record is returned. The first
/// record is never delayed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PacingState {
    /// Timestamp of the most recently returned record.
    pub last_record_dt: DateTimeLOpt,
    /// Wall-clock time the most recent record was returned.
    pub last_read_dt: DateTimeLOpt,
}

impl PacingState {
    /// How long to sleep before returning a record with timestamp
    /// `record_dt` at wall-clock time `now`.
    ///
    /// The time between the record timestamps less the wall-clock time
    /// already passed; never negative.
    pub fn sleep_duration(
        &self,
        record_dt: &DateTimeL,
        now: &DateTimeL,
    ) -> Duration {
        let (last_record_dt, last_read_dt) = match (self.last_record_dt, self.last_read_dt) {
            (Some(a), Some(b)) => (a, b),
            _ => return Duration::ZERO,
        };
        let desired: TimeDelta = record_dt.signed_duration_since(last_record_dt);
        let actual: TimeDelta = now.signed_duration_since(last_read_dt);
        let sleep: Duration = match desired.checked_sub(&actual) {
            Some(delta) => timedelta_to_duration_clamped(&delta),
            None => Duration::ZERO,
        };
        defñ!("desired interval {}, actual {}; sleeping {:?}", desired, actual, sleep);

        sleep
    }
}

/// Accumulated statistics of a [`PacedLogReader`].
///
/// For CLI option `--summary`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SummaryPacedLogReader {
    /// records returned
    pub pacedlogreader_records: Count,
    /// empty records returned
    pub pacedlogreader_records_empty: Count,
    /// records without a parseable timestamp
    pub pacedlogreader_format_errors: Count,
    /// pacing sleeps
    pub pacedlogreader_sleeps: Count,
    /// pacing sleeps interrupted by the `StopSignal`
    pub pacedlogreader_sleeps_interrupted: Count,
    /// sum of pacing sleeps requested
    pub pacedlogreader_sleep_total: Duration,
}

/// A reader of log records from one or more files, optionally paced per the
/// timestamps leading each record.
///
/// The underlying [`Sequencer`] is a [`FileSequencer`] and the [`Clock`] a
/// [`SystemClock`] unless given to [`new_with`].
///
/// A `PacedLogReader` has one consumer; `read` takes `&mut self`. To
/// interrupt a blocked `read` from another thread use the [`StopSignal`]
/// from [`stop_signal`].
///
/// _XXX: not a rust "Reader"; does not implement trait [`Read`]._
///
/// [`new_with`]: PacedLogReader::new_with
/// [`stop_signal`]: PacedLogReader::stop_signal
/// [`Read`]: std::io::Read
pub struct PacedLogReader<S = FileSequencer, C = SystemClock>
where
    S: Sequencer,
    C: Clock,
{
    config: ReaderConfig,
    sequencer: S,
    clock: C,
    stop: StopSignal,
    pacing: PacingState,
    /// The sequencer returned `Done` or the reader was stopped.
    exhausted: bool,
    records: Count,
    records_empty: Count,
    format_errors: Count,
    sleeps: Count,
    sleeps_interrupted: Count,
    sleep_total: Duration,
}

impl<S, C> fmt::Debug for PacedLogReader<S, C>
where
    S: Sequencer,
    C: Clock,
{
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("PacedLogReader")
            .field("config", &self.config)
            .field("pacing", &self.pacing)
            .field("exhausted", &self.exhausted)
            .field("stop", &self.stop)
            .finish()
    }
}

impl PacedLogReader<FileSequencer, SystemClock> {
    /// Create a new `PacedLogReader` reading files matching
    /// `config.filebase`, or standard input.
    ///
    /// A fixed `interval` with `use_timestamps`, an unusable `date_format`,
    /// or an invalid file pattern is a [`ReaderError::Configuration`].
    pub fn new(config: ReaderConfig) -> Result<PacedLogReader<FileSequencer, SystemClock>, ReaderError> {
        defn!("({:?})", config);
        if let Err(err) = config.validate() {
            defx!("{}", err);
            return Err(err);
        }
        let stop: StopSignal = StopSignal::new();
        let sequencer: FileSequencer = FileSequencer::new(
            config.file_spec(),
            config.tail,
            config.refresh,
            config.retry_interval,
            // only meaningful when `use_timestamps` is false
            config.interval,
            stop.clone(),
        )?;
        let clock: SystemClock = SystemClock::new(stop.clone());
        defx!();

        Ok(PacedLogReader::new_unchecked(config, sequencer, clock, stop))
    }

    /// Statistics of the underlying `FileSequencer`.
    pub fn summary_filesequencer(&self) -> SummaryFileSequencer {
        self.sequencer.summary()
    }
}

impl<S, C> PacedLogReader<S, C>
where
    S: Sequencer,
    C: Clock,
{
    /// Create a new `PacedLogReader` over the given `sequencer` and `clock`.
    ///
    /// The `config` is validated as in [`new`]; `filebase`, `tail`,
    /// `refresh`, `retry_interval` and `interval` are the business of the
    /// `sequencer`. The `stop` should be the same `StopSignal` the
    /// `sequencer` and `clock` sleep with.
    ///
    /// [`new`]: PacedLogReader::new
    pub fn new_with(
        config: ReaderConfig,
        sequencer: S,
        clock: C,
        stop: StopSignal,
    ) -> Result<PacedLogReader<S, C>, ReaderError> {
        config.validate()?;

        Ok(PacedLogReader::new_unchecked(config, sequencer, clock, stop))
    }

    fn new_unchecked(
        config: ReaderConfig,
        sequencer: S,
        clock: C,
        stop: StopSignal,
    ) -> PacedLogReader<S, C> {
        PacedLogReader {
            config,
            sequencer,
            clock,
            stop,
            pacing: PacingState::default(),
            exhausted: false,
            records: 0,
            records_empty: 0,
            format_errors: 0,
            sleeps: 0,
            sleeps_interrupted: 0,
            sleep_total: Duration::ZERO,
        }
    }

    /// Return the next record.
    ///
    /// - `Found(record)` is the next record, unmodified. An empty line is
    ///   `Found("")`.
    /// - `Done` is the end of the records. It is returned for every
    ///   following call.
    /// - `Err(ReaderError::RecordFormat)`: with `use_timestamps`, the next
    ///   record has no parseable timestamp. The warning is printed and the
    ///   record is skipped; the pacing is not changed. Call `read` again for
    ///   the following record.
    /// - `Err(ReaderError::Io)`: passed along from the underlying sequencer.
    ///
    /// With `use_timestamps`, sleeps before returning so the time since the
    /// previous `read` returned is at least the time between the two record
    /// timestamps. If the caller already took longer than that then there is
    /// no sleep. An interrupted sleep still returns the record.
    pub fn read(&mut self) -> ResultS3Record {
        defn!();
        if self.exhausted {
            defx!("exhausted; return Done");
            return ResultS3::Done;
        }
        if self.stop.is_stopped() {
            self.exhausted = true;
            defx!("stopped; return Done");
            return ResultS3::Done;
        }
        let record: Record = match self.sequencer.read() {
            ResultS3::Found(val) => val,
            ResultS3::Done => {
                self.exhausted = true;
                defx!("return Done");
                return ResultS3::Done;
            }
            ResultS3::Err(err) => {
                defx!("return Err {}", err);
                return ResultS3::Err(err);
            }
        };

        if !self.config.use_timestamps {
            self.count_record(&record);
            defx!("return Found({:?})", str_to_String_noraw(&record));
            return ResultS3::Found(record);
        }

        let record_dt: DateTimeL = match record_timestamp(&record, self.config.date_format.as_str()) {
            Ok(val) => val,
            Err(err) => {
                self.format_errors += 1;
                e_wrn!("{}", err);
                defx!("return Err {}", err);
                return ResultS3::Err(err);
            }
        };
        let now: DateTimeL = self.clock.now();
        let sleep: Duration = self.pacing.sleep_duration(&record_dt, &now);
        if !sleep.is_zero() {
            self.sleeps += 1;
            self.sleep_total += sleep;
            if !self.clock.sleep(sleep) {
                defo!("sleep interrupted");
                self.sleeps_interrupted += 1;
            }
        }
        self.pacing.last_record_dt = Some(record_dt);
        self.pacing.last_read_dt = Some(self.clock.now());
        self.count_record(&record);
        defx!("return Found({:?})", str_to_String_noraw(&record));

        ResultS3::Found(record)
    }

    fn count_record(&mut self, record: &Record) {
        self.records += 1;
        if record.is_empty() {
            self.records_empty += 1;
        }
    }

    pub fn pacing_state(&self) -> PacingState {
        self.pacing
    }

    /// A clone of the `StopSignal`. Calling `stop` on it makes a blocked
    /// `read` return promptly, and every later `read` return `Done`.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// No more records will be returned.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// The underlying source of lines.
    pub fn sequencer(&self) -> &S {
        &self.sequencer
    }

    pub fn summary(&self) -> SummaryPacedLogReader {
        SummaryPacedLogReader {
            pacedlogreader_records: self.records,
            pacedlogreader_records_empty: self.records_empty,
            pacedlogreader_format_errors: self.format_errors,
            pacedlogreader_sleeps: self.sleeps,
            pacedlogreader_sleeps_interrupted: self.sleeps_interrupted,
            pacedlogreader_sleep_total: self.sleep_total,
        }
    }
}
