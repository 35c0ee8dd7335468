//! One-shot directory scanning.
//!
//! The scanner takes a single snapshot of a directory's direct children and
//! splits them into files (candidates for relocation) and sub-directories
//! (reported so the caller can log a skip notice, never descended into).
//! Symlinks and special files are ignored entirely.

use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur while scanning a directory.
#[derive(Debug)]
pub enum ScanError {
    /// The directory to scan does not exist.
    SourceMissing { path: PathBuf },
    /// The directory could not be read.
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SourceMissing { path } => {
                write!(f, "Directory not found: {}", path.display())
            }
            Self::ReadFailed { path, source } => {
                write!(f, "Error reading directory {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ScanError {}

/// A snapshot of a directory's direct children.
#[derive(Debug, Default)]
pub struct Scan {
    /// Regular files, in directory-listing order (not semantically ordered).
    pub files: Vec<PathBuf>,
    /// Sub-directories, listed so callers can notice-and-skip them.
    pub directories: Vec<PathBuf>,
}

/// One-shot, non-recursive directory lister.
pub struct Scanner;

impl Scanner {
    /// Lists the direct children of `dir`, files and directories separately.
    ///
    /// The result reflects a single snapshot of the directory at call time.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dropsort::scanner::Scanner;
    /// use std::path::Path;
    ///
    /// let scan = Scanner::scan(Path::new("/home/user/Downloads"))?;
    /// println!("{} files, {} directories skipped", scan.files.len(), scan.directories.len());
    /// # Ok::<(), dropsort::scanner::ScanError>(())
    /// ```
    pub fn scan(dir: &Path) -> Result<Scan, ScanError> {
        if !dir.is_dir() {
            return Err(ScanError::SourceMissing {
                path: dir.to_path_buf(),
            });
        }

        let entries = fs::read_dir(dir).map_err(|e| ScanError::ReadFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let mut scan = Scan::default();
        for entry in entries.flatten() {
            if let Ok(file_type) = entry.file_type() {
                if file_type.is_file() {
                    scan.files.push(entry.path());
                } else if file_type.is_dir() {
                    scan.directories.push(entry.path());
                }
            }
        }

        Ok(scan)
    }
}
