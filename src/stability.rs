//! Write-completion detection by size polling.
//!
//! The filesystem gives no explicit "write finished" signal, so a file is
//! declared ready once its byte size stops changing: two consecutive samples
//! with the same non-zero size. This is an approximation of completion, not a
//! guarantee, and it is the reason a settle delay plus a probe precede every
//! relocation of a freshly-arrived file.

use std::fs;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

/// Result of probing a file for write completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// The size held steady across two consecutive non-zero samples.
    Ready,
    /// The size never stabilized (or never left zero) within the wait budget.
    NotReady,
}

/// Polls a file's size until it stabilizes or a wait budget is exhausted.
///
/// A missing file during sampling is treated as transient — the path may be
/// mid-rename by the program that is writing it — and sampling continues
/// until the budget runs out.
///
/// A file that is stably zero bytes never becomes `Ready`: an empty file is
/// indistinguishable from one whose writer has not started yet, so legitimate
/// empty files stay in place. Known limitation.
#[derive(Debug, Clone)]
pub struct StabilityProbe {
    poll_interval: Duration,
    max_wait: Duration,
}

impl StabilityProbe {
    /// Creates a probe sampling every `poll_interval` for at most `max_wait`.
    pub fn new(poll_interval: Duration, max_wait: Duration) -> Self {
        Self {
            poll_interval,
            max_wait,
        }
    }

    /// Blocks until the file at `path` is ready or the wait budget is gone.
    ///
    /// Ready means two consecutive samples observed the same size, strictly
    /// greater than zero. A failed sample (file missing, permission hiccup)
    /// breaks the consecutive pair and sampling starts fresh.
    pub fn await_ready(&self, path: &Path) -> Readiness {
        let deadline = Instant::now() + self.max_wait;
        let mut last_size: Option<u64> = None;

        loop {
            match fs::metadata(path) {
                Ok(meta) => {
                    let size = meta.len();
                    if size > 0 && last_size == Some(size) {
                        return Readiness::Ready;
                    }
                    last_size = Some(size);
                }
                Err(_) => {
                    last_size = None;
                }
            }

            if Instant::now() >= deadline {
                return Readiness::NotReady;
            }
            thread::sleep(self.poll_interval);
        }
    }
}

impl Default for StabilityProbe {
    /// One-second sampling with a thirty-second budget.
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(30))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{File, OpenOptions};
    use std::io::Write;
    use tempfile::TempDir;

    fn quick_probe() -> StabilityProbe {
        StabilityProbe::new(Duration::from_millis(20), Duration::from_millis(400))
    }

    #[test]
    fn test_constant_file_becomes_ready() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("done.bin");
        fs::write(&path, b"finished content").expect("Failed to write file");

        assert_eq!(quick_probe().await_ready(&path), Readiness::Ready);
    }

    #[test]
    fn test_ready_needs_only_two_samples() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("done.bin");
        fs::write(&path, b"x").expect("Failed to write file");

        let probe = StabilityProbe::new(Duration::from_millis(20), Duration::from_secs(5));
        let start = Instant::now();
        assert_eq!(probe.await_ready(&path), Readiness::Ready);
        // Two samples and one sleep, nowhere near the full budget.
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_empty_file_never_ready() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("empty.txt");
        File::create(&path).expect("Failed to create file");

        assert_eq!(quick_probe().await_ready(&path), Readiness::NotReady);
    }

    #[test]
    fn test_missing_file_times_out() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("never-appears.iso");

        assert_eq!(quick_probe().await_ready(&path), Readiness::NotReady);
    }

    #[test]
    fn test_growing_file_not_ready() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("downloading.part");
        fs::write(&path, b"start").expect("Failed to write file");

        let writer_path = path.clone();
        let writer = thread::spawn(move || {
            let began = Instant::now();
            let mut file = OpenOptions::new()
                .append(true)
                .open(&writer_path)
                .expect("Failed to open file for append");
            while began.elapsed() < Duration::from_millis(600) {
                file.write_all(b"chunk").expect("Failed to append");
                file.flush().expect("Failed to flush");
                thread::sleep(Duration::from_millis(2));
            }
        });

        let result = quick_probe().await_ready(&path);
        writer.join().expect("Writer thread panicked");
        assert_eq!(result, Readiness::NotReady);
    }

    #[test]
    fn test_late_arriving_file_becomes_ready() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("late.pdf");

        let writer_path = path.clone();
        let writer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(80));
            fs::write(&writer_path, b"arrived after probing began").expect("Failed to write");
        });

        let probe = StabilityProbe::new(Duration::from_millis(20), Duration::from_secs(5));
        let result = probe.await_ready(&path);
        writer.join().expect("Writer thread panicked");
        assert_eq!(result, Readiness::Ready);
    }
}
