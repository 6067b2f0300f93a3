// src/lib.rs

//! _lfrlib_ reads log records from one or more rotating log files as one
//! stream of records.
//!
//! The readers may _tail_ the last file, waiting for more records, and may
//! _refresh_ the set of files, waiting for new files. Records may be
//! replayed with their original pacing, using the timestamp leading each
//! record.
//!
//! The most relevant struct is [`PacedLogReader`].
//!
//! [`PacedLogReader`]: crate::readers::pacedlogreader::PacedLogReader

pub mod common;
pub mod data;
pub mod debug;
pub mod readers;
pub mod transforms;
#[cfg(test)]
pub mod tests;
