// src/readers/filesequencer.rs

//! Implements a [`FileSequencer`], the driver of reading lines from an
//! ordered set of files matching a glob pattern, or from standard input.
//!
//! A `FileSequencer` may _tail_ the last file (wait for more lines to be
//! appended instead of signaling the end) and may _refresh_ the set of
//! matching files (look for newly created files once the known files are
//! exhausted).

use crate::common::{
    Count,
    FPath,
    File,
    FileOffset,
    FileSz,
    Record,
    ReaderError,
    ResultS3,
    ResultS3Record,
};
use crate::debug::printers::{de_wrn, str_to_String_noraw};
use crate::readers::helpers::{
    basename,
    line_strip_terminator,
    path_to_fpath,
    fpath_to_path,
    FileId,
};
use crate::readers::stopsignal::StopSignal;

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::io::{BufRead, BufReader, Seek, SeekFrom, StdinLock};
use std::time::{Duration, Instant};

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Sequencer
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A source of lines consumed by a [`PacedLogReader`].
///
/// [`PacedLogReader`]: crate::readers::pacedlogreader::PacedLogReader
pub trait Sequencer {
    /// Return the next line without its line terminator.
    ///
    /// An empty line is `Found("")`. The end of all lines is `Done`.
    fn read(&mut self) -> ResultS3Record;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// FileSequencer
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Processing state of a [`FileSequencer`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SequencerState {
    /// A file (or standard input) is open and is read for the next line.
    FileOpen,
    /// At the end of the last file in tail mode; wait for appended data.
    AwaitingNewData,
    /// All known files are read; wait for new files to match the pattern.
    AwaitingNextFile,
    /// Terminal. Every `read` returns `Done`.
    Exhausted,
}

/// A file being read.
struct SourceFile {
    path: FPath,
    /// identity of the opened file, which `path` may no longer name
    id: Option<FileId>,
    reader: BufReader<File>,
    /// bytes consumed by `reader`
    offset: FileOffset,
}

/// Key of the set of files already queued. The path is used only where
/// there is no [`FileId`].
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
enum SeenKey {
    Id(FileId),
    Path(FPath),
}

impl SeenKey {
    fn new(
        id: Option<FileId>,
        path: &FPath,
    ) -> SeenKey {
        match id {
            Some(id_) => SeenKey::Id(id_),
            None => SeenKey::Path(path.clone()),
        }
    }
}

/// Where lines are currently read from.
enum Source {
    /// No file opened yet
    None,
    Stdin(StdinLock<'static>),
    File(SourceFile),
}

/// Accumulated statistics of a [`FileSequencer`].
///
/// For CLI option `--summary`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SummaryFileSequencer {
    pub filesequencer_file_spec: Option<FPath>,
    pub filesequencer_path_current: Option<FPath>,
    pub filesequencer_files_opened: Count,
    pub filesequencer_lines: Count,
    pub filesequencer_bytes: Count,
    pub filesequencer_refreshes: Count,
    pub filesequencer_polls: Count,
    pub filesequencer_truncations: Count,
    pub filesequencer_rotations: Count,
}

/// Reads lines from all files matching a glob pattern, in sorted path order,
/// as one stream of lines. If there is no pattern then reads standard input.
///
/// The processing states are [`SequencerState`]. Standard input is never
/// tailed or refreshed; the end of standard input is the end of the stream.
///
/// _XXX: not a rust "Reader"; does not implement trait [`Read`]._
///
/// [`Read`]: std::io::Read
pub struct FileSequencer {
    /// Glob pattern of files to read. `None` is standard input.
    file_spec: Option<FPath>,
    /// At the end of the last file, wait for more lines.
    tail: bool,
    /// At the end of the last file, look for new files matching `file_spec`.
    refresh: bool,
    /// Wait between looking for new lines or new files.
    retry_interval: Duration,
    /// Minimum time between returned lines.
    interval: Duration,
    stop: StopSignal,
    state: SequencerState,
    source: Source,
    /// Matching files not yet opened, in order.
    files_queued: VecDeque<FPath>,
    /// Matching files ever queued or opened. Never queued again.
    /// A file keeps its key when renamed.
    files_seen: HashSet<SeenKey>,
    /// Bytes of a line not yet terminated by a newline.
    line_partial: Vec<u8>,
    /// When the last line was returned; for `interval`.
    last_return: Option<Instant>,
    files_opened: Count,
    lines: Count,
    bytes: Count,
    refreshes: Count,
    polls: Count,
    truncations: Count,
    rotations: Count,
}

impl fmt::Debug for FileSequencer {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("FileSequencer")
            .field("file_spec", &self.file_spec)
            .field("tail", &self.tail)
            .field("refresh", &self.refresh)
            .field("retry_interval", &self.retry_interval)
            .field("interval", &self.interval)
            .field("state", &self.state)
            .field("path_current", &self.path_current())
            .field("files_queued", &self.files_queued)
            .field("line_partial", &self.line_partial.len())
            .finish()
    }
}

impl FileSequencer {
    /// Create a new `FileSequencer`.
    ///
    /// Files matching `file_spec` are found immediately but not opened until
    /// the first `read`.
    /// An invalid glob pattern is a [`ReaderError::Configuration`].
    pub fn new(
        file_spec: Option<FPath>,
        tail: bool,
        refresh: bool,
        retry_interval: Duration,
        interval: Duration,
        stop: StopSignal,
    ) -> Result<FileSequencer, ReaderError> {
        defn!(
            "({:?}, tail {}, refresh {}, retry_interval {:?}, interval {:?})",
            file_spec, tail, refresh, retry_interval, interval
        );
        let source: Source;
        let state: SequencerState;
        match file_spec.as_ref() {
            Some(spec) => {
                if let Err(err) = ::glob::Pattern::new(spec) {
                    defx!("invalid pattern {:?}; {}", spec, err);
                    return Err(ReaderError::Configuration(format!("invalid file pattern {:?}; {}", spec, err)));
                }
                source = Source::None;
                state = SequencerState::AwaitingNextFile;
            }
            None => {
                source = Source::Stdin(std::io::stdin().lock());
                state = SequencerState::FileOpen;
            }
        }
        let mut sequencer = FileSequencer {
            file_spec,
            tail,
            refresh,
            retry_interval,
            interval,
            stop,
            state,
            source,
            files_queued: VecDeque::new(),
            files_seen: HashSet::new(),
            line_partial: Vec::new(),
            last_return: None,
            files_opened: 0,
            lines: 0,
            bytes: 0,
            refreshes: 0,
            polls: 0,
            truncations: 0,
            rotations: 0,
        };
        sequencer.refresh_file_list();
        if sequencer.file_spec.is_some() {
            if !sequencer.files_queued.is_empty() {
                // the first `read` opens the first file
                sequencer.state = SequencerState::FileOpen;
            } else if !sequencer.tail && !sequencer.refresh {
                sequencer.state = SequencerState::Exhausted;
            }
        }
        defx!("{:?}", sequencer);

        Ok(sequencer)
    }

    /// The glob pattern, `None` if reading standard input.
    pub fn file_spec(&self) -> Option<&FPath> {
        self.file_spec.as_ref()
    }

    pub const fn state(&self) -> SequencerState {
        self.state
    }

    /// Path of the file currently read, if any.
    pub fn path_current(&self) -> Option<&FPath> {
        match &self.source {
            Source::File(sourcefile) => Some(&sourcefile.path),
            Source::None | Source::Stdin(_) => None,
        }
    }

    /// Matching files found but not yet opened, in the order they will be read.
    pub fn files_queued(&self) -> Vec<FPath> {
        self.files_queued
            .iter()
            .cloned()
            .collect()
    }

    pub fn summary(&self) -> SummaryFileSequencer {
        SummaryFileSequencer {
            filesequencer_file_spec: self.file_spec.clone(),
            filesequencer_path_current: self.path_current().cloned(),
            filesequencer_files_opened: self.files_opened,
            filesequencer_lines: self.lines,
            filesequencer_bytes: self.bytes,
            filesequencer_refreshes: self.refreshes,
            filesequencer_polls: self.polls,
            filesequencer_truncations: self.truncations,
            filesequencer_rotations: self.rotations,
        }
    }

    /// Evaluate the glob pattern again. Queue regular files not seen before,
    /// in sorted order.
    ///
    /// A file renamed by log rotation was seen before under its old path and
    /// is not queued again.
    /// Entries that cannot be read during globbing are skipped.
    fn refresh_file_list(&mut self) {
        defn!();
        let spec: &FPath = match self.file_spec.as_ref() {
            Some(val) => val,
            None => {
                defx!("no file_spec");
                return;
            }
        };
        let paths = match ::glob::glob(spec) {
            Ok(val) => val,
            Err(_err) => {
                // validated in `new`
                de_wrn!("glob({:?}) failed {}", spec, _err);
                defx!();
                return;
            }
        };
        let mut paths_new: Vec<(FPath, SeenKey)> = Vec::new();
        for entry in paths {
            let path = match entry {
                Ok(val) => val,
                Err(_err) => {
                    de_wrn!("glob({:?}) entry error {}", spec, _err);
                    continue;
                }
            };
            if !path.is_file() {
                continue;
            }
            let fpath: FPath = path_to_fpath(path.as_path());
            let key = SeenKey::new(FileId::from_path(path.as_path()), &fpath);
            if self.files_seen.contains(&key) {
                continue;
            }
            paths_new.push((fpath, key));
        }
        paths_new.sort_by(|a, b| a.0.cmp(&b.0));
        for (fpath, key) in paths_new.into_iter() {
            defo!("queue {:?} {:?}", fpath, key);
            self.files_seen.insert(key);
            self.files_queued.push_back(fpath);
        }
        self.refreshes += 1;
        defx!("files_queued {:?}", self.files_queued);
    }

    /// Open the next queued file, replacing the current source.
    fn open_next_file(&mut self) -> Result<(), ReaderError> {
        let path: FPath = match self.files_queued.pop_front() {
            Some(val) => val,
            None => return Ok(()),
        };
        defn!("({:?})", path);
        debug_assert!(self.line_partial.is_empty(), "line_partial not empty when opening {:?}", path);
        let file: File = match File::open(fpath_to_path(&path)) {
            Ok(val) => val,
            Err(err) => {
                defx!("File::open({:?}) error {}", path, err);
                self.source = Source::None;
                return Err(ReaderError::Io(err));
            }
        };
        let id: Option<FileId> = FileId::from_file(&file);
        // the path may name another file than when it was queued
        self.files_seen.insert(SeenKey::new(id, &path));
        self.source = Source::File(SourceFile {
            path,
            id,
            reader: BufReader::new(file),
            offset: 0,
        });
        self.files_opened += 1;
        defx!("opened file {}", self.files_opened);

        Ok(())
    }

    /// Take the `line_partial` as a line.
    fn take_line_partial(&mut self) -> Record {
        let bytes: Vec<u8> = std::mem::take(&mut self.line_partial);
        let mut line: Record = match String::from_utf8(bytes) {
            Ok(val) => val,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        };
        line_strip_terminator(&mut line);

        line
    }

    /// Read the next line from the current source.
    ///
    /// Returns `Ok(None)` at the end of the source, in which case a partial
    /// line may be held in `self.line_partial`.
    fn read_line_source(&mut self) -> Result<Option<Record>, ReaderError> {
        let tail_last: bool = self.tail && self.files_queued.is_empty();
        let read: usize = match &mut self.source {
            Source::None => return Ok(None),
            Source::Stdin(stdinlock) => stdinlock.read_until(b'\n', &mut self.line_partial)?,
            Source::File(sourcefile) => {
                let read_ = sourcefile.reader.read_until(b'\n', &mut self.line_partial)?;
                sourcefile.offset += read_ as FileOffset;
                read_
            }
        };
        self.bytes += read as Count;
        if self.line_partial.is_empty() {
            return Ok(None);
        }
        if self.line_partial.ends_with(b"\n") {
            return Ok(Some(self.take_line_partial()));
        }
        // no newline; at the end of the source
        let is_stdin: bool = matches!(self.source, Source::Stdin(_));
        if tail_last && !is_stdin {
            defo!("hold partial line of {} bytes", self.line_partial.len());
            return Ok(None);
        }

        Ok(Some(self.take_line_partial()))
    }

    /// Determine the next state after reaching the end of the current source.
    fn at_source_end(&mut self) -> Result<(), ReaderError> {
        if matches!(self.source, Source::Stdin(_)) {
            self.state = SequencerState::Exhausted;
            return Ok(());
        }
        if !self.files_queued.is_empty() {
            self.open_next_file()?;
            self.state = SequencerState::FileOpen;
        } else if self.tail {
            match self.source {
                Source::File(_) => self.state = SequencerState::AwaitingNewData,
                Source::None | Source::Stdin(_) => self.state = SequencerState::AwaitingNextFile,
            }
        } else if self.refresh {
            self.state = SequencerState::AwaitingNextFile;
        } else {
            self.state = SequencerState::Exhausted;
        }
        defñ!("state {:?}", self.state);

        Ok(())
    }

    /// Look for changes of the current file at the end of its data.
    ///
    /// - The open file grew; read on.
    /// - The open file shrank below the bytes already read, e.g. by
    ///   "copytruncate" log rotation; read it again from the beginning.
    /// - The path names a different file than the one open, e.g. by
    ///   rename-based log rotation; queue the path so it is opened once the
    ///   open file is finished.
    ///
    /// Returns `true` if there is (probably) more data to read.
    fn check_file_change(&mut self) -> Result<bool, ReaderError> {
        let sourcefile: &mut SourceFile = match &mut self.source {
            Source::File(val) => val,
            Source::None | Source::Stdin(_) => return Ok(false),
        };
        // size of the open file, not of whatever file is now at the path
        let filesz: FileSz = sourcefile.reader.get_ref().metadata()?.len();
        if filesz < sourcefile.offset {
            de_wrn!(
                "file {:?} truncated from {} to {} bytes; read from the beginning",
                basename(&sourcefile.path), sourcefile.offset, filesz
            );
            sourcefile.reader.seek(SeekFrom::Start(0))?;
            sourcefile.offset = 0;
            self.line_partial.clear();
            self.truncations += 1;
            return Ok(true);
        }
        if filesz > sourcefile.offset {
            return Ok(true);
        }
        let id_handle: FileId = match sourcefile.id {
            Some(val) => val,
            None => return Ok(false),
        };
        let id_path: FileId = match FileId::from_path(fpath_to_path(&sourcefile.path)) {
            Some(val) => val,
            // renamed, the new file is not yet created
            None => return Ok(false),
        };
        if id_path == id_handle {
            return Ok(false);
        }
        let key = SeenKey::Id(id_path);
        if self.files_seen.contains(&key) {
            return Ok(false);
        }
        defo!("file {:?} rotated; {:?} is now {:?}", sourcefile.path, id_handle, id_path);
        self.files_seen.insert(key);
        self.files_queued.push_front(sourcefile.path.clone());
        self.rotations += 1;

        Ok(true)
    }

    /// Sleep so at least `self.interval` passes between returned lines.
    fn sleep_interval(&mut self) {
        if self.interval.is_zero() {
            return;
        }
        if let Some(last_return) = self.last_return {
            let elapsed: Duration = last_return.elapsed();
            if elapsed < self.interval {
                defo!("sleep {:?}", self.interval - elapsed);
                if !self.stop.sleep(self.interval - elapsed) {
                    self.state = SequencerState::Exhausted;
                }
            }
        }
    }

    /// Sleep the retry interval. Returns `false` if stopped.
    fn sleep_retry(&mut self) -> bool {
        self.polls += 1;
        if !self.stop.sleep(self.retry_interval) {
            self.state = SequencerState::Exhausted;
            return false;
        }

        true
    }
}

impl Sequencer for FileSequencer {
    /// Return the next line.
    ///
    /// In tail or refresh mode this blocks until a line is available or the
    /// `StopSignal` is stopped. A stopped `FileSequencer` is exhausted.
    fn read(&mut self) -> ResultS3Record {
        defn!();
        loop {
            if self.state != SequencerState::Exhausted && self.stop.is_stopped() {
                defo!("stopped");
                self.state = SequencerState::Exhausted;
            }
            match self.state {
                SequencerState::Exhausted => {
                    defx!("return Done");
                    return ResultS3::Done;
                }
                SequencerState::FileOpen => {
                    if matches!(self.source, Source::None) {
                        if let Err(err) = self.open_next_file() {
                            defx!("return Err {}", err);
                            return ResultS3::Err(err);
                        }
                    }
                    match self.read_line_source() {
                        Ok(Some(line)) => {
                            self.sleep_interval();
                            self.lines += 1;
                            self.last_return = Some(Instant::now());
                            defx!("return Found({:?})", str_to_String_noraw(&line));
                            return ResultS3::Found(line);
                        }
                        Ok(None) => {
                            if let Err(err) = self.at_source_end() {
                                defx!("return Err {}", err);
                                return ResultS3::Err(err);
                            }
                        }
                        Err(err) => {
                            defx!("return Err {}", err);
                            return ResultS3::Err(err);
                        }
                    }
                }
                SequencerState::AwaitingNewData => {
                    // data of the open file first, then new files
                    match self.check_file_change() {
                        Ok(true) => {
                            self.state = SequencerState::FileOpen;
                            continue;
                        }
                        Ok(false) => {}
                        Err(err) => {
                            defx!("return Err {}", err);
                            return ResultS3::Err(err);
                        }
                    }
                    if self.refresh {
                        self.refresh_file_list();
                        if !self.files_queued.is_empty() {
                            // the open file is no longer last; a held partial
                            // line is returned, then the next file is opened
                            self.state = SequencerState::FileOpen;
                            continue;
                        }
                    }
                    if self.sleep_retry() {
                        self.state = SequencerState::FileOpen;
                    }
                }
                SequencerState::AwaitingNextFile => {
                    self.refresh_file_list();
                    if !self.files_queued.is_empty() {
                        if let Err(err) = self.open_next_file() {
                            defx!("return Err {}", err);
                            return ResultS3::Err(err);
                        }
                        self.state = SequencerState::FileOpen;
                        continue;
                    }
                    self.sleep_retry();
                }
            }
        }
    }
}
