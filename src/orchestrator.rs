//! Drives the move engine from an event source.
//!
//! Three modes share one engine: a one-shot sweep over the files already in
//! the source directory, a watch loop relocating files as they arrive, and a
//! full reversal that empties every category directory back into the source.
//!
//! Consumption is strictly sequential — one relocation at a time, with
//! blocking waits for the settle delay and the stability probe — so no two
//! moves can race each other for a resolved destination name. The watch loop
//! checks a cooperative stop flag between notification ticks; a relocation in
//! flight always completes before the loop exits.

use crate::config::CompiledFilters;
use crate::file_category::{Category, ExtensionMap};
use crate::layout::DestinationLayout;
use crate::mover::{FileMover, MoveOutcome, SkipReason};
use crate::output::OutputFormatter;
use crate::scanner::{ScanError, Scanner};
use crate::watcher::{DirWatcher, WatchError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// How often the watch loop wakes to check the stop flag.
const WATCH_TICK: Duration = Duration::from_millis(250);

/// What happened during a sweep.
#[derive(Debug, Default)]
pub struct SweepReport {
    /// Files moved (or, in a dry run, files that would move).
    pub moved: usize,
    /// Files left in place, with the reason.
    pub skipped: Vec<(PathBuf, String)>,
    /// Files whose move errored, with the reason.
    pub failed: Vec<(PathBuf, String)>,
    /// Moved-file counts keyed by category directory name.
    pub category_counts: HashMap<String, usize>,
}

impl SweepReport {
    /// Total number of files the sweep looked at.
    pub fn total_processed(&self) -> usize {
        self.moved + self.skipped.len() + self.failed.len()
    }

    /// Returns true if nothing was skipped or failed.
    pub fn is_complete_success(&self) -> bool {
        self.skipped.is_empty() && self.failed.is_empty()
    }
}

/// What happened during a full reversal.
#[derive(Debug, Default)]
pub struct ReverseReport {
    /// Files returned to the source directory.
    pub restored: usize,
    /// Files left in place, with the reason.
    pub skipped: Vec<(PathBuf, String)>,
    /// Files whose move errored, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

impl ReverseReport {
    /// Returns true if nothing was skipped or failed.
    pub fn is_complete_success(&self) -> bool {
        self.skipped.is_empty() && self.failed.is_empty()
    }
}

/// Outcome of relocating one file, after logging.
enum Disposition {
    Moved(Category),
    Skipped(PathBuf, SkipReason),
    Failed(String),
}

/// Wires an event source (scanner or watcher) to the move engine.
///
/// Exposes the four operating modes: [`sweep_and_watch`](Self::sweep_and_watch),
/// [`watch_only`](Self::watch_only), [`reverse_all`](Self::reverse_all) and
/// [`noop`](Self::noop).
pub struct Orchestrator {
    source_dir: PathBuf,
    layout: DestinationLayout,
    extensions: ExtensionMap,
    filters: CompiledFilters,
    mover: FileMover,
    settle_delay: Duration,
}

impl Orchestrator {
    /// Assembles an orchestrator from its parts.
    ///
    /// The layout must already be created; every relocation assumes its
    /// category directory exists.
    pub fn new(
        source_dir: PathBuf,
        layout: DestinationLayout,
        extensions: ExtensionMap,
        filters: CompiledFilters,
        mover: FileMover,
        settle_delay: Duration,
    ) -> Self {
        Self {
            source_dir,
            layout,
            extensions,
            filters,
            mover,
            settle_delay,
        }
    }

    /// Relocates every file currently in the source directory.
    ///
    /// One snapshot, one pass: files appearing during the sweep are not
    /// picked up (the watch mode is for those). Sub-directories are noticed
    /// and skipped, never descended into.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::SourceMissing` when the source directory does not
    /// exist — fatal to this sweep, not to the process.
    pub fn sweep(&self) -> Result<SweepReport, ScanError> {
        OutputFormatter::info(&format!(
            "Organizing existing files in {}",
            self.source_dir.display()
        ));

        let scan = Scanner::scan(&self.source_dir)?;
        for dir in &scan.directories {
            OutputFormatter::info(&format!("Skipping directory: {}", file_name_of(dir)));
        }

        let candidates: Vec<&PathBuf> = scan
            .files
            .iter()
            .filter(|p| self.filters.should_include(p))
            .collect();

        let mut report = SweepReport::default();
        let pb = OutputFormatter::create_progress_bar(candidates.len() as u64);
        for path in candidates {
            match self.relocate_one(path) {
                Disposition::Moved(category) => {
                    report.moved += 1;
                    *report
                        .category_counts
                        .entry(category.dir_name().to_string())
                        .or_insert(0) += 1;
                }
                Disposition::Skipped(path, reason) => {
                    report.skipped.push((path, reason.message().to_string()));
                }
                Disposition::Failed(reason) => {
                    report.failed.push((path.clone(), reason));
                }
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        Ok(report)
    }

    /// Reports what a sweep would do without moving anything.
    pub fn dry_run_sweep(&self) -> Result<SweepReport, ScanError> {
        let scan = Scanner::scan(&self.source_dir)?;
        for dir in &scan.directories {
            OutputFormatter::info(&format!("Skipping directory: {}", file_name_of(dir)));
        }

        let mut report = SweepReport::default();
        for path in scan.files.iter().filter(|p| self.filters.should_include(p)) {
            let category = self.extensions.category_of_path(path);
            OutputFormatter::dry_run_notice(&format!(
                "{} → {}/",
                file_name_of(path),
                category.dir_name()
            ));
            report.moved += 1;
            *report
                .category_counts
                .entry(category.dir_name().to_string())
                .or_insert(0) += 1;
        }

        Ok(report)
    }

    /// Relocates files as they arrive, until the stop flag is set.
    ///
    /// Each notification is settled (fixed delay), filtered, probed and moved
    /// before the next one is taken — strictly sequential. Setting `stop`
    /// ends the loop at the next tick; an in-flight relocation finishes
    /// first.
    pub fn watch_only(&self, stop: &AtomicBool) -> Result<(), WatchError> {
        let mut watcher = DirWatcher::open(&self.source_dir)?;
        OutputFormatter::info(&format!(
            "Watching {} for new files",
            self.source_dir.display()
        ));

        while !stop.load(Ordering::Relaxed) {
            let Some(path) = watcher.next_created(WATCH_TICK)? else {
                continue;
            };
            if !self.filters.should_include(&path) {
                continue;
            }

            OutputFormatter::info(&format!("New file detected: {}", file_name_of(&path)));

            // First-pass debounce before the finer-grained size polling.
            thread::sleep(self.settle_delay);
            self.relocate_one(&path);
        }

        OutputFormatter::info("Stopped watching");
        Ok(())
    }

    /// Sweeps the source directory once, then watches it.
    ///
    /// A failed sweep (source directory missing) is logged and does not
    /// prevent the watch phase from being attempted.
    pub fn sweep_and_watch(&self, stop: &AtomicBool) -> Result<(), WatchError> {
        match self.sweep() {
            Ok(report) => self.print_sweep_summary(&report),
            Err(e) => OutputFormatter::error(&e.to_string()),
        }
        self.watch_only(stop)
    }

    /// Moves every file in every category directory back to the source.
    ///
    /// Sub-directories inside category directories are ignored. Collisions in
    /// the source directory get the usual numeric disambiguator. Per-file
    /// failures are reported and do not stop the pass.
    pub fn reverse_all(&self) -> ReverseReport {
        let mut report = ReverseReport::default();

        for (category, dir) in self.layout.category_dirs() {
            let scan = match Scanner::scan(&dir) {
                Ok(scan) => scan,
                Err(e) => {
                    OutputFormatter::warning(&e.to_string());
                    continue;
                }
            };

            for sub in &scan.directories {
                OutputFormatter::info(&format!(
                    "Skipping directory in {}/: {}",
                    category.dir_name(),
                    file_name_of(sub)
                ));
            }

            for file in &scan.files {
                match self.mover.relocate_back(file, &self.source_dir) {
                    Ok(MoveOutcome::Moved { from, .. }) => {
                        OutputFormatter::success(&format!("Moved back: {}", file_name_of(&from)));
                        report.restored += 1;
                    }
                    Ok(MoveOutcome::Skipped { path, reason }) => {
                        OutputFormatter::warning(&format!(
                            "Skipped {}: {}",
                            file_name_of(&path),
                            reason.message()
                        ));
                        report.skipped.push((path, reason.message().to_string()));
                    }
                    Err(e) => {
                        OutputFormatter::error(&e.to_string());
                        report.failed.push((file.clone(), e.to_string()));
                    }
                }
            }
        }

        report
    }

    /// The do-nothing entry point behind the menu's exit option.
    pub fn noop(&self) {}

    /// Prints the post-sweep category summary.
    pub fn print_sweep_summary(&self, report: &SweepReport) {
        if report.total_processed() == 0 {
            OutputFormatter::info("No files found to organize");
            return;
        }
        OutputFormatter::summary_table(&report.category_counts, report.moved);
    }

    /// Classifies and relocates a single file, logging the outcome.
    fn relocate_one(&self, path: &Path) -> Disposition {
        let category = self.extensions.category_of_path(path);
        let dest = self.layout.dir_for(category);

        match self.mover.relocate(path, &dest) {
            Ok(MoveOutcome::Moved { from, .. }) => {
                OutputFormatter::success(&format!(
                    "Moved: {} → {}/",
                    file_name_of(&from),
                    category.dir_name()
                ));
                Disposition::Moved(category)
            }
            Ok(MoveOutcome::Skipped { path, reason }) => {
                OutputFormatter::warning(&format!(
                    "Skipped {}: {}",
                    file_name_of(&path),
                    reason.message()
                ));
                Disposition::Skipped(path, reason)
            }
            Err(e) => {
                OutputFormatter::error(&e.to_string());
                Disposition::Failed(e.to_string())
            }
        }
    }
}

fn file_name_of(path: &Path) -> std::borrow::Cow<'_, str> {
    match path.file_name() {
        Some(name) => name.to_string_lossy(),
        None => path.to_string_lossy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stability::StabilityProbe;
    use std::fs;
    use tempfile::TempDir;

    fn test_orchestrator(source: &Path, root: &Path) -> Orchestrator {
        let layout = DestinationLayout::create(root).expect("Failed to create layout");
        let probe = StabilityProbe::new(Duration::from_millis(10), Duration::from_millis(200));
        Orchestrator::new(
            source.to_path_buf(),
            layout,
            ExtensionMap::default(),
            CompiledFilters::default(),
            FileMover::new(probe),
            Duration::from_millis(10),
        )
    }

    #[test]
    fn test_sweep_sorts_by_category() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path().join("downloads");
        let root = temp_dir.path().join("organized");
        fs::create_dir(&source).expect("Failed to create source");

        fs::write(source.join("report.pdf"), "pdf").expect("Failed to write");
        fs::write(source.join("photo.jpg"), "jpg").expect("Failed to write");
        fs::write(source.join("archive.zip"), "zip").expect("Failed to write");

        let orchestrator = test_orchestrator(&source, &root);
        let report = orchestrator.sweep().expect("Sweep failed");

        assert_eq!(report.moved, 3);
        assert!(report.is_complete_success());
        assert!(root.join("documents").join("report.pdf").exists());
        assert!(root.join("images").join("photo.jpg").exists());
        assert!(root.join("other").join("archive.zip").exists());
        assert_eq!(report.category_counts.get("documents"), Some(&1));
    }

    #[test]
    fn test_sweep_skips_directories_and_filtered_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path().join("downloads");
        let root = temp_dir.path().join("organized");
        fs::create_dir(&source).expect("Failed to create source");

        fs::create_dir(source.join("nested")).expect("Failed to create dir");
        fs::write(source.join("movie.mp4.part"), "partial").expect("Failed to write");
        fs::write(source.join(".hidden.txt"), "secret").expect("Failed to write");

        let orchestrator = test_orchestrator(&source, &root);
        let report = orchestrator.sweep().expect("Sweep failed");

        assert_eq!(report.total_processed(), 0);
        assert!(source.join("nested").exists());
        assert!(source.join("movie.mp4.part").exists());
        assert!(source.join(".hidden.txt").exists());
    }

    #[test]
    fn test_sweep_missing_source_is_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path().join("absent");
        let root = temp_dir.path().join("organized");

        let orchestrator = test_orchestrator(&source, &root);
        assert!(matches!(
            orchestrator.sweep(),
            Err(ScanError::SourceMissing { .. })
        ));
    }

    #[test]
    fn test_dry_run_moves_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path().join("downloads");
        let root = temp_dir.path().join("organized");
        fs::create_dir(&source).expect("Failed to create source");
        fs::write(source.join("song.mp3"), "mp3").expect("Failed to write");

        let orchestrator = test_orchestrator(&source, &root);
        let report = orchestrator.dry_run_sweep().expect("Dry run failed");

        assert_eq!(report.moved, 1);
        assert_eq!(report.category_counts.get("audio"), Some(&1));
        assert!(source.join("song.mp3").exists());
        assert!(!root.join("audio").join("song.mp3").exists());
    }

    #[test]
    fn test_reverse_all_restores_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path().join("downloads");
        let root = temp_dir.path().join("organized");
        fs::create_dir(&source).expect("Failed to create source");

        fs::write(source.join("report.pdf"), "pdf").expect("Failed to write");
        fs::write(source.join("photo.jpg"), "jpg").expect("Failed to write");

        let orchestrator = test_orchestrator(&source, &root);
        orchestrator.sweep().expect("Sweep failed");
        assert!(!source.join("report.pdf").exists());

        let report = orchestrator.reverse_all();
        assert_eq!(report.restored, 2);
        assert!(report.is_complete_success());
        assert!(source.join("report.pdf").exists());
        assert!(source.join("photo.jpg").exists());
    }

    #[test]
    fn test_reverse_all_ignores_subdirectories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path().join("downloads");
        let root = temp_dir.path().join("organized");
        fs::create_dir(&source).expect("Failed to create source");

        let orchestrator = test_orchestrator(&source, &root);
        let keep = root.join("images").join("keep");
        fs::create_dir(&keep).expect("Failed to create dir");
        fs::write(keep.join("inside.jpg"), "jpg").expect("Failed to write");

        let report = orchestrator.reverse_all();
        assert_eq!(report.restored, 0);
        assert!(keep.join("inside.jpg").exists());
    }
}
