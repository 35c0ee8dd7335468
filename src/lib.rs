//! dropsort - keep a downloads directory sorted
//!
//! This library watches a source directory for newly-arriving files and moves
//! each one into a category folder chosen by its extension, waiting out files
//! that are still being written. It also provides a one-shot sweep over the
//! files already present and a full reversal that returns every sorted file
//! to the source directory.

pub mod collision;
pub mod config;
pub mod file_category;
pub mod layout;
pub mod mover;
pub mod orchestrator;
pub mod output;
pub mod scanner;
pub mod stability;
pub mod watcher;

pub use config::{CompiledFilters, ConfigError, OrganizerConfig};
pub use file_category::{Category, ExtensionMap};
pub use layout::{DestinationLayout, LayoutError};
pub use mover::{FileMover, MoveError, MoveOutcome, SkipReason};
pub use orchestrator::{Orchestrator, ReverseReport, SweepReport};
pub use scanner::{Scan, ScanError, Scanner};
pub use stability::{Readiness, StabilityProbe};
pub use watcher::{DirWatcher, WatchError};
