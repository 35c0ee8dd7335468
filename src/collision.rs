//! Collision-safe destination naming.
//!
//! A relocation must never overwrite an existing file. When the candidate
//! name is taken, a numeric disambiguator is appended before the extension
//! (`report.pdf` → `report_1.pdf` → `report_2.pdf` …) until a free name is
//! found. Smallest integer wins; no randomness.
//!
//! The existence check and the subsequent move are not one atomic operation.
//! The engine serializes all relocations, so nothing else races the resolved
//! name from within this process.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Returns a path inside `dest_dir` for `file_name` at which no file exists.
///
/// The original name is returned unchanged when it is free.
///
/// # Examples
///
/// ```no_run
/// use std::ffi::OsStr;
/// use std::path::Path;
///
/// let target = dropsort::collision::resolve(Path::new("/sorted/documents"), OsStr::new("a.txt"));
/// assert!(!target.exists());
/// ```
pub fn resolve(dest_dir: &Path, file_name: &OsStr) -> PathBuf {
    let direct = dest_dir.join(file_name);
    if !direct.exists() {
        return direct;
    }

    let candidate = Path::new(file_name);
    let stem = candidate.file_stem().unwrap_or(file_name);
    let extension = candidate.extension();

    let mut counter: u64 = 1;
    loop {
        let mut disambiguated = stem.to_os_string();
        disambiguated.push(format!("_{}", counter));
        if let Some(ext) = extension {
            disambiguated.push(".");
            disambiguated.push(ext);
        }

        let attempt = dest_dir.join(&disambiguated);
        if !attempt.exists() {
            return attempt;
        }
        counter += 1;
    }
}
