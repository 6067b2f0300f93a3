// src/readers/helpers.rs

//! Miscellaneous helper functions for _Readers_.

use std;

#[allow(unused_imports)]
use ::si_trace_print::{
    defn,
    defo,
    defx,
    defñ,
};

use crate::common::{
    FPath,
    File,
    FILEBASE_WILDCARD,
};

/// Return the basename of an `FPath`.
pub fn basename(path: &FPath) -> FPath {
    let mut riter = path.rsplit(std::path::MAIN_SEPARATOR);

    FPath::from(riter.next().unwrap_or(""))
}

/// Helper function for a slightly annoying set of calls.
pub fn path_to_fpath(path: &std::path::Path) -> FPath {
    // `PathBuf` to `String` https://stackoverflow.com/q/37388107/471376
    (*(path.to_string_lossy())).to_string()
}

/// Helper function for completeness.
pub fn fpath_to_path(path: &FPath) -> &std::path::Path {
    std::path::Path::new(path)
}

/// Identity of a file that does not change when the file is renamed; the
/// device and inode numbers.
///
/// Rename-based log rotation moves a file to a new path and creates a new file
/// at the old path. The path is the same, the `FileId` is not.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct FileId {
    dev: u64,
    ino: u64,
}

impl FileId {
    /// `None` on platforms without inode numbers.
    #[cfg(target_family = "unix")]
    pub fn from_metadata(metadata: &std::fs::Metadata) -> Option<FileId> {
        use std::os::unix::fs::MetadataExt;

        Some(FileId {
            dev: metadata.dev(),
            ino: metadata.ino(),
        })
    }

    /// `None` on platforms without inode numbers.
    #[cfg(not(target_family = "unix"))]
    pub fn from_metadata(_metadata: &std::fs::Metadata) -> Option<FileId> {
        None
    }

    /// Identity of an open file handle.
    pub fn from_file(file: &File) -> Option<FileId> {
        match file.metadata() {
            Ok(metadata) => FileId::from_metadata(&metadata),
            Err(_err) => {
                defñ!("metadata error {}", _err);
                None
            }
        }
    }

    /// Identity of the file at `path`, following symbolic links.
    /// `None` if there is no file at `path`.
    pub fn from_path(path: &std::path::Path) -> Option<FileId> {
        match std::fs::metadata(path) {
            Ok(metadata) => FileId::from_metadata(&metadata),
            Err(_err) => {
                defñ!("({:?}) metadata error {}", path, _err);
                None
            }
        }
    }
}

/// Derive the file-matching glob pattern from a file base.
///
/// A non-empty file base has a wildcard appended so that rotated files,
/// e.g. suffixed by date, are also matched.
/// `None` or an empty file base returns `None`, which means "read from
/// standard input".
pub fn filebase_to_file_spec(filebase: Option<&str>) -> Option<FPath> {
    match filebase {
        Some(filebase_) if !filebase_.is_empty() => {
            let mut file_spec: FPath = FPath::with_capacity(filebase_.len() + FILEBASE_WILDCARD.len());
            file_spec.push_str(filebase_);
            file_spec.push_str(FILEBASE_WILDCARD);
            defñ!("({:?}) return {:?}", filebase_, file_spec);

            Some(file_spec)
        }
        _ => {
            defñ!("({:?}) return None", filebase);

            None
        }
    }
}

/// Strip one trailing line terminator, `"\n"` or `"\r\n"`, in-place.
///
/// Returns `true` if a terminator was removed.
pub fn line_strip_terminator(line: &mut String) -> bool {
    if !line.ends_with('\n') {
        return false;
    }
    line.pop();
    if line.ends_with('\r') {
        line.pop();
    }

    true
}
