/// The move engine: collision-safe relocation of one file at a time.
///
/// A forward relocation waits for the file to finish being written (see
/// [`crate::stability`]) before it is moved into a category directory. The
/// reverse relocation used by the full reversal skips that wait, since the
/// files inside category directories were moved there by this engine and are
/// complete by construction.
///
/// Failures never leave partial state: `fs::rename` either succeeds or leaves
/// the source untouched.
use crate::collision;
use crate::stability::{Readiness, StabilityProbe};
use std::fs;
use std::path::{Path, PathBuf};

/// Why a file was left in place instead of being moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The size never stabilized within the wait budget; the file is likely
    /// still being written and stays eligible for a future pass.
    NeverStabilized,
    /// The file disappeared before the move could start.
    Vanished,
}

impl SkipReason {
    /// Short description used in log lines.
    pub fn message(&self) -> &'static str {
        match self {
            SkipReason::NeverStabilized => "size never stabilized, leaving in place",
            SkipReason::Vanished => "file no longer exists",
        }
    }
}

/// Result of a relocation attempt that did not error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The file was moved to `to` (collision-resolved).
    Moved { from: PathBuf, to: PathBuf },
    /// The file was intentionally left where it is.
    Skipped { path: PathBuf, reason: SkipReason },
}

/// Errors that can occur while relocating a file.
#[derive(Debug)]
pub enum MoveError {
    /// The source path has no final name component.
    NamelessSource { path: PathBuf },
    /// The destination directory does not exist or is not a directory.
    DestinationUnavailable { dir: PathBuf },
    /// The rename itself failed (permissions, disk full, cross-device move).
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for MoveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NamelessSource { path } => {
                write!(f, "Path has no file name: {}", path.display())
            }
            Self::DestinationUnavailable { dir } => {
                write!(f, "Destination directory unavailable: {}", dir.display())
            }
            Self::RenameFailed { from, to, source } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    from.display(),
                    to.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for MoveError {}

/// Result type for relocation operations.
pub type MoveResult<T> = Result<T, MoveError>;

/// Moves single files in and out of category directories.
#[derive(Debug, Clone, Default)]
pub struct FileMover {
    probe: StabilityProbe,
}

impl FileMover {
    /// Creates a mover that gates forward moves on the given probe.
    pub fn new(probe: StabilityProbe) -> Self {
        Self { probe }
    }

    /// Relocates `path` into `dest_dir`, waiting for write completion first.
    ///
    /// Returns `Skipped` when the file vanished or never stabilized — both
    /// are warnings, not errors, and the file (if still present) remains
    /// eligible for a later pass. Filesystem failures surface as `MoveError`
    /// with the source untouched.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dropsort::mover::{FileMover, MoveOutcome};
    /// use std::path::Path;
    ///
    /// let mover = FileMover::default();
    /// match mover.relocate(Path::new("/downloads/photo.jpg"), Path::new("/sorted/images")) {
    ///     Ok(MoveOutcome::Moved { to, .. }) => println!("now at {}", to.display()),
    ///     Ok(MoveOutcome::Skipped { reason, .. }) => println!("skipped: {}", reason.message()),
    ///     Err(e) => eprintln!("move failed: {}", e),
    /// }
    /// ```
    pub fn relocate(&self, path: &Path, dest_dir: &Path) -> MoveResult<MoveOutcome> {
        if !path.exists() {
            return Ok(MoveOutcome::Skipped {
                path: path.to_path_buf(),
                reason: SkipReason::Vanished,
            });
        }

        if !dest_dir.is_dir() {
            return Err(MoveError::DestinationUnavailable {
                dir: dest_dir.to_path_buf(),
            });
        }

        if self.probe.await_ready(path) == Readiness::NotReady {
            return Ok(MoveOutcome::Skipped {
                path: path.to_path_buf(),
                reason: SkipReason::NeverStabilized,
            });
        }

        self.finish_move(path, dest_dir)
    }

    /// Relocates `path` back into `source_dir`.
    ///
    /// Symmetric to [`relocate`](Self::relocate) in collision and failure
    /// handling, but without the stability wait: reversal only touches files
    /// this engine placed, which are complete.
    pub fn relocate_back(&self, path: &Path, source_dir: &Path) -> MoveResult<MoveOutcome> {
        if !path.exists() {
            return Ok(MoveOutcome::Skipped {
                path: path.to_path_buf(),
                reason: SkipReason::Vanished,
            });
        }

        if !source_dir.is_dir() {
            return Err(MoveError::DestinationUnavailable {
                dir: source_dir.to_path_buf(),
            });
        }

        self.finish_move(path, source_dir)
    }

    fn finish_move(&self, path: &Path, dest_dir: &Path) -> MoveResult<MoveOutcome> {
        let file_name = path.file_name().ok_or_else(|| MoveError::NamelessSource {
            path: path.to_path_buf(),
        })?;

        let target = collision::resolve(dest_dir, file_name);

        fs::rename(path, &target).map_err(|e| MoveError::RenameFailed {
            from: path.to_path_buf(),
            to: target.clone(),
            source: e,
        })?;

        Ok(MoveOutcome::Moved {
            from: path.to_path_buf(),
            to: target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn quick_mover() -> FileMover {
        FileMover::new(StabilityProbe::new(
            Duration::from_millis(10),
            Duration::from_millis(200),
        ))
    }

    #[test]
    fn test_relocate_moves_stable_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dest = temp_dir.path().join("documents");
        fs::create_dir(&dest).expect("Failed to create dest");

        let source = temp_dir.path().join("report.pdf");
        fs::write(&source, "content").expect("Failed to write file");

        let outcome = quick_mover()
            .relocate(&source, &dest)
            .expect("Relocate failed");

        assert_eq!(
            outcome,
            MoveOutcome::Moved {
                from: source.clone(),
                to: dest.join("report.pdf"),
            }
        );
        assert!(!source.exists());
        assert!(dest.join("report.pdf").exists());
    }

    #[test]
    fn test_relocate_resolves_collision() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dest = temp_dir.path().join("documents");
        fs::create_dir(&dest).expect("Failed to create dest");
        fs::write(dest.join("a.txt"), "pre-existing").expect("Failed to write");

        let source = temp_dir.path().join("a.txt");
        fs::write(&source, "incoming").expect("Failed to write file");

        let outcome = quick_mover()
            .relocate(&source, &dest)
            .expect("Relocate failed");

        assert_eq!(
            outcome,
            MoveOutcome::Moved {
                from: source,
                to: dest.join("a_1.txt"),
            }
        );
        // The pre-existing file is untouched.
        let kept = fs::read_to_string(dest.join("a.txt")).expect("Failed to read");
        assert_eq!(kept, "pre-existing");
        let moved = fs::read_to_string(dest.join("a_1.txt")).expect("Failed to read");
        assert_eq!(moved, "incoming");
    }

    #[test]
    fn test_relocate_skips_vanished_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dest = temp_dir.path().join("documents");
        fs::create_dir(&dest).expect("Failed to create dest");

        let source = temp_dir.path().join("gone.txt");
        let outcome = quick_mover()
            .relocate(&source, &dest)
            .expect("Relocate failed");

        assert_eq!(
            outcome,
            MoveOutcome::Skipped {
                path: source,
                reason: SkipReason::Vanished,
            }
        );
    }

    #[test]
    fn test_relocate_skips_unstable_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dest = temp_dir.path().join("documents");
        fs::create_dir(&dest).expect("Failed to create dest");

        // A zero-byte file never stabilizes.
        let source = temp_dir.path().join("empty.txt");
        fs::write(&source, "").expect("Failed to write file");

        let outcome = quick_mover()
            .relocate(&source, &dest)
            .expect("Relocate failed");

        assert_eq!(
            outcome,
            MoveOutcome::Skipped {
                path: source.clone(),
                reason: SkipReason::NeverStabilized,
            }
        );
        assert!(source.exists(), "skipped file must stay in place");
    }

    #[test]
    fn test_relocate_missing_destination_is_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path().join("report.pdf");
        fs::write(&source, "content").expect("Failed to write file");

        let result = quick_mover().relocate(&source, &temp_dir.path().join("nope"));
        assert!(matches!(
            result,
            Err(MoveError::DestinationUnavailable { .. })
        ));
        assert!(source.exists(), "source must be untouched on failure");
    }

    #[test]
    fn test_relocate_back_does_not_probe() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let category_dir = temp_dir.path().join("documents");
        fs::create_dir(&category_dir).expect("Failed to create dir");

        // Zero-byte file: a forward relocate would skip it, the reverse one
        // moves it anyway.
        let sorted = category_dir.join("empty.txt");
        fs::write(&sorted, "").expect("Failed to write file");

        let outcome = quick_mover()
            .relocate_back(&sorted, temp_dir.path())
            .expect("Relocate back failed");

        assert_eq!(
            outcome,
            MoveOutcome::Moved {
                from: sorted,
                to: temp_dir.path().join("empty.txt"),
            }
        );
    }

    #[test]
    fn test_relocate_back_resolves_collision() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let category_dir = temp_dir.path().join("images");
        fs::create_dir(&category_dir).expect("Failed to create dir");

        fs::write(temp_dir.path().join("photo.jpg"), "new download").expect("Failed to write");
        let sorted = category_dir.join("photo.jpg");
        fs::write(&sorted, "old download").expect("Failed to write");

        let outcome = quick_mover()
            .relocate_back(&sorted, temp_dir.path())
            .expect("Relocate back failed");

        assert_eq!(
            outcome,
            MoveOutcome::Moved {
                from: sorted,
                to: temp_dir.path().join("photo_1.jpg"),
            }
        );
    }
}
