// src/debug/helpers.rs

//! Miscellaneous helper functions for testing; temporary log files and
//! directories.

use crate::common::{FPath, FileOpenOptions};

use crate::readers::helpers::path_to_fpath;

use std::fs::create_dir;
use std::io::ErrorKind;
use std::io::Write; // for `File.write_all`
use std::path::PathBuf;

use ::lazy_static::lazy_static;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

#[doc(hidden)]
pub use ::tempfile::NamedTempFile;
#[doc(hidden)]
pub use ::tempfile::TempDir;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// temporary file helper functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// NamedTempFile and TempDir instances default to this name prefix.
///
/// Helps find and delete temporary files that remain after an aborted test
/// run.
pub const STR_TEMPFILE_PREFIX: &str = "tmp-lfr-test-";

lazy_static! {
    pub static ref STRING_TEMPFILE_PREFIX: String = String::from(STR_TEMPFILE_PREFIX);
}

/// Small helper function for copying `NamedTempFile` path to a `FPath`.
pub fn ntf_fpath(ntf: &NamedTempFile) -> FPath {
    path_to_fpath(ntf.path())
}

/// Testing helper function to write a `str` to a temporary file.
pub fn create_temp_file(data: &str) -> NamedTempFile {
    let mut ntf = match ::tempfile::Builder::new()
        // use known prefix for easier cleanup
        .prefix::<str>(&STRING_TEMPFILE_PREFIX)
        .tempfile()
    {
        Ok(val) => val,
        Err(err) => {
            panic!("NamedTempFile::new() return Err {}", err);
        }
    };
    match ntf.write_all(data.as_bytes()) {
        Ok(_) => {}
        Err(err) => {
            panic!("NamedTempFile::write_all() return Err {}", err);
        }
    }

    ntf
}

/// Create a temporary directory
pub fn create_temp_dir() -> TempDir {
    defñ!();
    match ::tempfile::Builder::new()
        .prefix::<str>(&STRING_TEMPFILE_PREFIX)
        .tempdir()
    {
        Ok(val) => val,
        Err(err) => {
            panic!("tempfile::Builder::new()..tempdir() return Err {}", err);
        }
    }
}

/// Return the `FPath` of `name` within `tempdir`. The file is not created.
pub fn fpath_in_tmpdir(
    name: &str,
    tempdir: &TempDir,
) -> FPath {
    path_to_fpath(tempdir.path().join(name).as_path())
}

/// Testing helper function to write a `str` to a file named `name` in a
/// temporary directory.
/// Will create leading directories in paths, e.g. `name` value `foo/bar`
/// creates directory `foo` and file `bar`.
pub fn create_file_in_tmpdir(
    data: &str,
    name: &str,
    tempdir: &TempDir,
) -> FPath {
    let pathb: PathBuf = tempdir.path().join(name);
    if let Some(parent) = pathb.parent() {
        if parent != tempdir.path() {
            match create_dir(parent) {
                Ok(_) => {}
                Err(err) if err.kind() == ErrorKind::AlreadyExists => {}
                Err(err) => panic!("create_dir({:?}) Error {:?}", parent, err),
            }
        }
    }
    let mut file = match FileOpenOptions::new()
        .create_new(true)
        .write(true)
        .open(&pathb)
    {
        Ok(val) => val,
        Err(err) => panic!("File::create({:?}) Error {}", pathb, err),
    };
    match file.write_all(data.as_bytes()) {
        Ok(_) => {}
        Err(err) => panic!("File::write_all({:?}) Error {}", pathb, err),
    }
    defñ!("created {:?} with {} bytes", pathb, data.len());

    path_to_fpath(pathb.as_path())
}

/// Testing helper function to append a `str` to an existing file, the way a
/// logging process appends records.
pub fn append_to_file(
    data: &str,
    path: &FPath,
) {
    let mut file = match FileOpenOptions::new()
        .append(true)
        .open(path)
    {
        Ok(val) => val,
        Err(err) => panic!("File::open({:?}) for append Error {}", path, err),
    };
    match file.write_all(data.as_bytes()) {
        Ok(_) => {}
        Err(err) => panic!("File::write_all({:?}) Error {}", path, err),
    }
    match file.flush() {
        Ok(_) => {}
        Err(err) => panic!("File::flush({:?}) Error {}", path, err),
    }
    defñ!("appended {} bytes to {:?}", data.len(), path);
}

/// Testing helper function to truncate an existing file to zero bytes, the
/// way "copytruncate" log rotation does.
pub fn truncate_file(path: &FPath) {
    match FileOpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)
    {
        Ok(_) => {}
        Err(err) => panic!("File::open({:?}) for truncate Error {}", path, err),
    }
    defñ!("truncated {:?}", path);
}

/// Testing helper function to rename a file, the way rename-based log
/// rotation does. A process with the file open keeps reading the renamed
/// file.
pub fn rename_file(
    from: &FPath,
    to: &FPath,
) {
    match std::fs::rename(from, to) {
        Ok(_) => {}
        Err(err) => panic!("rename({:?}, {:?}) Error {}", from, to, err),
    }
    defñ!("renamed {:?} to {:?}", from, to);
}
