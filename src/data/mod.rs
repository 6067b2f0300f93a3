// src/data/mod.rs

//! The `data` module is specialized data handling for log records.
//!
//! ## Definitions of data
//!
//! ### Record
//!
//! A "record" is a sequence of characters in a log file that:
//!
//! * begin after a prior "record" or the beginning of a file.
//! * end with a newline character `'\n'` (the newline is not part of the
//!   record).
//!
//! A record may be empty. A record is a [`Record`].
//!
//! ### Timestamp
//!
//! A record may begin with a "timestamp" token followed by a single space,
//! e.g. `2020-01-01T00:00:00.000000Z hello`. The token is parsed per a
//! strftime format into a [`DateTimeL`].
//!
//! [`Record`]: crate::common::Record
//! [`DateTimeL`]: crate::data::datetime::DateTimeL

pub mod datetime;
