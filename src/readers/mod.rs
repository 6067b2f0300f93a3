// src/readers/mod.rs

//! "Readers" for _lfrlib_.
//!
//! ## Overview of readers
//!
//! * A [`PacedLogReader`] drives a [`Sequencer`] to derive [`Record`s].
//! * A [`FileSequencer`] is the `Sequencer` that reads lines from files
//!   matching a glob pattern, or from standard input.
//!
//! <br/>
//!
//! * A `FileSequencer` may _tail_ (wait for lines appended to the last file)
//!   and may _refresh_ (wait for new files matching the pattern).
//! * A `PacedLogReader` may _pace_ records (sleep between records per their
//!   leading timestamps).
//! * All sleeping is interruptible with a [`StopSignal`].
//!
//! <br/>
//!
//! _These are not rust "Readers"; these structs do not implement the trait
//! [`Read`]. These are "readers" in an informal sense._
//!
//! [`Read`]: std::io::Read
//! [`Record`s]: crate::common::Record
//! [`PacedLogReader`]: crate::readers::pacedlogreader::PacedLogReader
//! [`Sequencer`]: crate::readers::filesequencer::Sequencer
//! [`FileSequencer`]: crate::readers::filesequencer::FileSequencer
//! [`StopSignal`]: crate::readers::stopsignal::StopSignal

pub mod filesequencer;
pub mod helpers;
pub mod pacedlogreader;
pub mod stopsignal;
pub mod summary;
