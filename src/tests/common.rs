// src/tests/common.rs

//! Common test fixtures; a fake [`Clock`] and an in-memory [`Sequencer`].

use crate::common::{ReaderError, Record, ResultS3, ResultS3Record};
use crate::data::datetime::{
    Clock,
    DateTimeL,
    FixedOffset,
    TimeDelta,
    TimeZone,
};
use crate::readers::filesequencer::Sequencer;
use crate::readers::stopsignal::StopSignal;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::ErrorKind;
use std::rc::Rc;
use std::time::Duration;

/// UTC as a `FixedOffset`
pub fn fo_z() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

/// Helper to create a `DateTimeL` in UTC.
pub fn ymdhms_micro(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
    micro: u32,
) -> DateTimeL {
    let dt = fo_z()
        .with_ymd_and_hms(year, month, day, hour, min, sec)
        .unwrap();

    dt + TimeDelta::microseconds(micro as i64)
}

/// `2020-01-01T00:00:00Z`, start of many test scenarios
pub fn dt_2020() -> DateTimeL {
    ymdhms_micro(2020, 1, 1, 0, 0, 0, 0)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// FakeClock
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Shared record of a [`FakeClock`]; the test keeps a handle after the
/// clock is moved into a reader.
#[derive(Debug, Default)]
pub struct FakeClockState {
    /// current fake time
    pub now: Option<DateTimeL>,
    /// every requested sleep, in order
    pub sleeps: Vec<Duration>,
    /// `sleep` stops this and returns `false` (interrupted) when set
    pub interrupt: Option<StopSignal>,
}

pub type FakeClockStateRc = Rc<RefCell<FakeClockState>>;

/// A [`Clock`] that never blocks. A `sleep` advances the fake time by the
/// requested duration.
#[derive(Clone, Debug)]
pub struct FakeClock {
    pub state: FakeClockStateRc,
}

impl FakeClock {
    pub fn new(now: DateTimeL) -> FakeClock {
        FakeClock {
            state: Rc::new(RefCell::new(FakeClockState {
                now: Some(now),
                sleeps: Vec::new(),
                interrupt: None,
            })),
        }
    }

    /// Simulate the caller taking time between calls to `read`.
    pub fn advance(&self, delta: Duration) {
        let mut state = self.state.borrow_mut();
        let now = state.now.unwrap();
        state.now = Some(now + TimeDelta::from_std(delta).unwrap());
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.state.borrow().sleeps.clone()
    }

    /// The next `sleep` is interrupted, as if `stop` was stopped by another
    /// thread during the sleep.
    pub fn set_interrupt(&self, stop: &StopSignal) {
        self.state.borrow_mut().interrupt = Some(stop.clone());
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTimeL {
        self.state.borrow().now.unwrap()
    }

    fn sleep(&mut self, duration: Duration) -> bool {
        let mut state = self.state.borrow_mut();
        state.sleeps.push(duration);
        if let Some(stop) = state.interrupt.take() {
            stop.stop();
            return false;
        }
        let now = state.now.unwrap();
        state.now = Some(now + TimeDelta::from_std(duration).unwrap());

        true
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// VecSequencer
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One scripted result of a [`VecSequencer`].
#[derive(Clone, Debug)]
pub enum Scripted {
    Line(&'static str),
    /// an `ErrorKind::Other` I/O error
    IoError,
}

/// A [`Sequencer`] returning scripted lines, then `Done`.
#[derive(Debug, Default)]
pub struct VecSequencer {
    script: VecDeque<Scripted>,
    /// count of calls to `read`
    pub reads: usize,
}

impl VecSequencer {
    pub fn new(lines: &[&'static str]) -> VecSequencer {
        VecSequencer {
            script: lines
                .iter()
                .map(|line| Scripted::Line(*line))
                .collect(),
            reads: 0,
        }
    }

    pub fn new_scripted(script: &[Scripted]) -> VecSequencer {
        VecSequencer {
            script: script.iter().cloned().collect(),
            reads: 0,
        }
    }
}

impl Sequencer for VecSequencer {
    fn read(&mut self) -> ResultS3Record {
        self.reads += 1;
        match self.script.pop_front() {
            Some(Scripted::Line(line)) => ResultS3::Found(Record::from(line)),
            Some(Scripted::IoError) => {
                ResultS3::Err(ReaderError::Io(std::io::Error::new(ErrorKind::Other, "scripted error")))
            }
            None => ResultS3::Done,
        }
    }
}

/// Read all records until `Done`, panicking on any error.
pub fn read_all<S: Sequencer>(sequencer: &mut S) -> Vec<Record> {
    let mut records: Vec<Record> = Vec::new();
    loop {
        match sequencer.read() {
            ResultS3::Found(record) => records.push(record),
            ResultS3::Done => break,
            ResultS3::Err(err) => panic!("unexpected error {}", err),
        }
    }

    records
}
