// src/readers/summary.rs

//! Implements `Summary` statistics tracking struct.

use crate::common::FPath;
use crate::readers::filesequencer::SummaryFileSequencer;
use crate::readers::pacedlogreader::SummaryPacedLogReader;

use std::fmt;

use ::si_trace_print::defñ;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Summary
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Accumulated statistics about reading activity of a [`PacedLogReader`]
/// and its underlying [`FileSequencer`].
///
/// For CLI option `--summary`.
///
/// [`PacedLogReader`]: crate::readers::pacedlogreader::PacedLogReader
/// [`FileSequencer`]: crate::readers::filesequencer::FileSequencer
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Summary {
    pub pacedlogreader: SummaryPacedLogReader,
    /// `None` if the sequencer was not a `FileSequencer`
    pub filesequencer: Option<SummaryFileSequencer>,
    /// The first encountered error, if any, as a `String`.
    ///
    /// Annoyingly, cannot [Clone `Error`].
    ///
    /// [Clone `Error`]: https://github.com/rust-lang/rust/issues/24135
    pub error: Option<String>,
}

impl Summary {
    /// Create a new `Summary`
    pub fn new(
        pacedlogreader: SummaryPacedLogReader,
        filesequencer: Option<SummaryFileSequencer>,
        error: Option<String>,
    ) -> Summary {
        // some sanity checks
        debug_assert!(
            pacedlogreader.pacedlogreader_records >= pacedlogreader.pacedlogreader_records_empty,
            "There are less records than empty records"
        );
        debug_assert!(
            pacedlogreader.pacedlogreader_sleeps >= pacedlogreader.pacedlogreader_sleeps_interrupted,
            "There are less sleeps than interrupted sleeps"
        );
        defñ!();

        Summary {
            pacedlogreader,
            filesequencer,
            error,
        }
    }
}

/// Helper to display an `Option<FPath>`.
fn fpath_opt_display(path: &Option<FPath>) -> &str {
    match path {
        Some(path_) => path_.as_str(),
        None => "(standard input)",
    }
}

impl fmt::Display for Summary {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        let plr: &SummaryPacedLogReader = &self.pacedlogreader;
        if let Some(fs) = &self.filesequencer {
            writeln!(f, "file pattern       : {}", fpath_opt_display(&fs.filesequencer_file_spec))?;
            match &fs.filesequencer_path_current {
                Some(path) => writeln!(f, "last file          : {}", path)?,
                None => writeln!(f, "last file          : (none)")?,
            }
            writeln!(f, "files opened       : {}", fs.filesequencer_files_opened)?;
            writeln!(f, "lines read         : {}", fs.filesequencer_lines)?;
            writeln!(f, "bytes read         : {}", fs.filesequencer_bytes)?;
            writeln!(f, "file list refreshes: {}", fs.filesequencer_refreshes)?;
            writeln!(f, "polls              : {}", fs.filesequencer_polls)?;
            writeln!(f, "truncations        : {}", fs.filesequencer_truncations)?;
            writeln!(f, "rotations          : {}", fs.filesequencer_rotations)?;
        }
        writeln!(f, "records            : {}", plr.pacedlogreader_records)?;
        writeln!(f, "records empty      : {}", plr.pacedlogreader_records_empty)?;
        writeln!(f, "records bad format : {}", plr.pacedlogreader_format_errors)?;
        writeln!(
            f,
            "pacing sleeps      : {} (interrupted {}, total {:?})",
            plr.pacedlogreader_sleeps,
            plr.pacedlogreader_sleeps_interrupted,
            plr.pacedlogreader_sleep_total,
        )?;
        match &self.error {
            Some(err) => writeln!(f, "error              : {}", err),
            None => Ok(()),
        }
    }
}
