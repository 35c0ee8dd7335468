//! Live "file appeared" notifications for a single directory.
//!
//! Wraps a `notify` recommended watcher in non-recursive mode and reduces its
//! event stream to an ordered sequence of arrival paths. Besides plain create
//! events, rename-to events count as arrivals: browsers routinely finish a
//! download by renaming a temporary file into place.
//!
//! Notifications are pulled with a bounded blocking wait so the caller can
//! check a stop flag between ticks. The underlying OS channel can drop events
//! under extreme load; that loss is accepted, with the one-shot sweep as the
//! compensating control.

use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

/// Errors that can occur while watching a directory.
#[derive(Debug)]
pub enum WatchError {
    /// The directory to watch does not exist.
    InvalidPath { path: PathBuf },
    /// The OS notification backend failed.
    Notify(notify::Error),
    /// The notification channel closed; the watch cannot continue.
    ChannelClosed,
}

impl std::fmt::Display for WatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPath { path } => {
                write!(f, "Cannot watch missing directory: {}", path.display())
            }
            Self::Notify(e) => write!(f, "Notify error: {}", e),
            Self::ChannelClosed => write!(f, "Watch notification channel closed"),
        }
    }
}

impl std::error::Error for WatchError {}

impl From<notify::Error> for WatchError {
    fn from(e: notify::Error) -> Self {
        Self::Notify(e)
    }
}

/// Emits the paths of files appearing in one watched directory.
///
/// Dropping the watcher stops the underlying OS watch.
pub struct DirWatcher {
    // Held for its side effect; events flow through the channel.
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    pending: VecDeque<PathBuf>,
}

impl DirWatcher {
    /// Starts watching `dir` (non-recursive) for new files.
    pub fn open(dir: &Path) -> Result<Self, WatchError> {
        if !dir.is_dir() {
            return Err(WatchError::InvalidPath {
                path: dir.to_path_buf(),
            });
        }

        let (tx, rx) = mpsc::channel();
        let mut watcher = RecommendedWatcher::new(tx, Config::default())?;
        watcher.watch(dir, RecursiveMode::NonRecursive)?;

        Ok(Self {
            _watcher: watcher,
            rx,
            pending: VecDeque::new(),
        })
    }

    /// Returns the next arrived file path, or `None` once `timeout` passes
    /// with nothing to report.
    ///
    /// Arrivals are delivered in notification order. Directory events are
    /// filtered out here; everything else (settling, probing, classifying)
    /// is the caller's business.
    pub fn next_created(&mut self, timeout: Duration) -> Result<Option<PathBuf>, WatchError> {
        loop {
            if let Some(path) = self.pending.pop_front() {
                return Ok(Some(path));
            }

            match self.rx.recv_timeout(timeout) {
                Ok(Ok(event)) => self.collect_arrivals(event),
                // Backend hiccup: the event is lost, the watch stays up. The
                // sweep catches anything missed here.
                Ok(Err(_)) => {}
                Err(RecvTimeoutError::Timeout) => return Ok(None),
                Err(RecvTimeoutError::Disconnected) => return Err(WatchError::ChannelClosed),
            }
        }
    }

    fn collect_arrivals(&mut self, event: Event) {
        let arrivals: Vec<PathBuf> = match event.kind {
            EventKind::Create(_) => event.paths,
            EventKind::Modify(ModifyKind::Name(RenameMode::To)) => event.paths,
            // A full rename carries [from, to]; only the destination arrived.
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
                event.paths.into_iter().last().into_iter().collect()
            }
            _ => return,
        };

        for path in arrivals {
            if !path.is_dir() {
                self.pending.push_back(path);
            }
        }
    }
}
