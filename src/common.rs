// src/common.rs
//
// common imports, type aliases, and other globals (avoids circular imports)

use std::fmt;
use std::io::Error as IoError;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// file-handling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub use std::fs::File;

/// `F`ile `Path` as a `String`; also holds glob patterns
pub type FPath = String;
pub type FileOpenOptions = std::fs::OpenOptions;

/// Offset into a file in bytes
pub type FileOffset = u64;
/// File size in bytes
pub type FileSz = u64;
/// A general-purpose counting type
pub type Count = u64;

/// The wildcard appended to a file base to match rotated or suffixed files,
/// e.g. `"ship.log"` matches `"ship.log-2020-01-01"`.
pub const FILEBASE_WILDCARD: &str = "*";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Lines and records
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A single record; one line of text without the line terminator.
pub type Record = String;

/// Separates a leading timestamp token from the rest of a [`Record`].
pub const RECORD_TIMESTAMP_SEP: char = ' ';

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// custom Results enums for various *Reader functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `Result` Extended
/// for record reading functions.
///
/// `Found("")` is an empty line, `Done` is the end of the stream.
/// The two must never be conflated.
#[derive(Debug, PartialEq)]
pub enum ResultS3<T, E> {
    /// Contains the success data
    Found(T),
    /// No more data, nothing to return, but no bad errors happened
    Done,
    /// Contains the error value, something bad happened
    Err(E),
}

impl<T, E> ResultS3<T, E> {
    /// Returns `true` if the result is [`Done`].
    ///
    /// [`Done`]: ResultS3::Done
    #[inline(always)]
    pub const fn is_done(&self) -> bool {
        matches!(*self, ResultS3::Done)
    }
}

impl<T, E> fmt::Display for ResultS3<T, E>
where
    E: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultS3::Found(_) => { write!(f, "ResultS3::Found") },
            ResultS3::Done => { write!(f, "ResultS3::Done") },
            ResultS3::Err(err) => { write!(f, "ResultS3::Err({})", err) },
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// errors
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Errors of the readers.
pub enum ReaderError {
    /// The reader configuration is not usable. Returned only during
    /// construction; no reader is created.
    Configuration(String),
    /// A record did not begin with a parseable timestamp token.
    /// Returned for one `read` call only; the reader may be read again.
    RecordFormat {
        record: Record,
        reason: String,
    },
    /// Underlying file or standard input failure, passed along unchanged.
    Io(IoError),
}

pub type ResultS3Record = ResultS3<Record, ReaderError>;

impl ReaderError {
    /// Returns `true` if this is a [`ReaderError::Configuration`].
    pub const fn is_configuration(&self) -> bool {
        matches!(*self, ReaderError::Configuration(_))
    }

    /// Returns `true` if this is a [`ReaderError::RecordFormat`].
    pub const fn is_record_format(&self) -> bool {
        matches!(*self, ReaderError::RecordFormat { .. })
    }

    /// Returns `true` if this is a [`ReaderError::Io`].
    pub const fn is_io(&self) -> bool {
        matches!(*self, ReaderError::Io(_))
    }
}

impl fmt::Display for ReaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReaderError::Configuration(msg) => write!(f, "configuration error: {}", msg),
            ReaderError::RecordFormat { record, reason } => {
                write!(f, "record format error: {}; record {:?}", reason, record)
            }
            ReaderError::Io(err) => write!(f, "{}", err),
        }
    }
}

impl fmt::Debug for ReaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReaderError::Configuration(msg) => {
                f.debug_tuple("ReaderError::Configuration")
                    .field(msg)
                    .finish()
            }
            ReaderError::RecordFormat { record, reason } => {
                f.debug_struct("ReaderError::RecordFormat")
                    .field("record", record)
                    .field("reason", reason)
                    .finish()
            }
            ReaderError::Io(err) => {
                f.debug_tuple("ReaderError::Io")
                    .field(&err.kind())
                    .field(&err.to_string())
                    .finish()
            }
        }
    }
}

impl std::error::Error for ReaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReaderError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<IoError> for ReaderError {
    fn from(err: IoError) -> Self {
        ReaderError::Io(err)
    }
}
