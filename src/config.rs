//! Organizer configuration.
//!
//! All paths, timings and filter rules live in one immutable configuration
//! value constructed at process start; nothing reads ambient globals. The
//! configuration is loaded from TOML and every field has a default, so an
//! empty file (or no file at all) yields a working setup.
//!
//! # Configuration File Format
//!
//! ```toml
//! [paths]
//! source_dir = "/home/user/Downloads"
//! organizer_root = "/home/user/FileOrganizer"
//!
//! [timing]
//! settle_delay_secs = 2
//! poll_interval_secs = 1
//! max_wait_secs = 30
//!
//! [filters]
//! enable_hidden_files = false
//!
//! [filters.exclude]
//! filenames = [".DS_Store", "Thumbs.db"]
//! patterns = ["*.crdownload", "*.part"]
//! extensions = ["tmp"]
//! regex = []
//!
//! [filters.include]
//! patterns = []
//!
//! [categories]
//! images = ["kra", "xcf"]
//! ```

use crate::file_category::{Category, ExtensionMap};
use crate::stability::StabilityProbe;
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Errors that can occur during configuration loading and filtering.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// Invalid glob pattern provided.
    InvalidGlobPattern(String),
    /// Invalid regex pattern provided with the actual error reason.
    InvalidRegexPattern {
        /// The regex pattern that failed to compile.
        pattern: String,
        /// The reason why the pattern is invalid.
        reason: String,
    },
    /// A `[categories]` key does not name a known category directory.
    UnknownCategory(String),
    /// Neither an explicit path nor `$HOME` is available to resolve against.
    MissingHomeDirectory,
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(
                    f,
                    "Invalid glob pattern '{}': expected *.ext or name fragment",
                    pattern
                )
            }
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::UnknownCategory(name) => {
                write!(
                    f,
                    "Unknown category '{}' (expected one of the category directory names)",
                    name
                )
            }
            ConfigError::MissingHomeDirectory => {
                write!(
                    f,
                    "Cannot resolve default paths: HOME is not set and no explicit path was given"
                )
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Top-level organizer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizerConfig {
    /// Source and destination locations.
    #[serde(default)]
    pub paths: PathsSection,

    /// Settle, polling and wait durations.
    #[serde(default)]
    pub timing: TimingSection,

    /// File filtering rules.
    #[serde(default)]
    pub filters: FilterRules,

    /// Extra extension mappings, keyed by category directory name.
    #[serde(default)]
    pub categories: HashMap<String, Vec<String>>,
}

/// Where files come from and where the category directories live.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsSection {
    /// Directory swept and watched for arriving files. Defaults to
    /// `$HOME/Downloads`.
    #[serde(default)]
    pub source_dir: Option<PathBuf>,

    /// Root under which the six category directories are created. Defaults
    /// to `$HOME/FileOrganizer`.
    #[serde(default)]
    pub organizer_root: Option<PathBuf>,
}

/// Durations driving the settle delay and the stability probe, in whole
/// seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingSection {
    /// Pause between a watch notification and the first stability sample.
    #[serde(default = "default_settle_delay_secs")]
    pub settle_delay_secs: u64,

    /// Interval between stability samples.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Total budget for a file to stabilize before it is skipped.
    #[serde(default = "default_max_wait_secs")]
    pub max_wait_secs: u64,
}

fn default_settle_delay_secs() -> u64 {
    2
}

fn default_poll_interval_secs() -> u64 {
    1
}

fn default_max_wait_secs() -> u64 {
    30
}

impl Default for TimingSection {
    fn default() -> Self {
        Self {
            settle_delay_secs: default_settle_delay_secs(),
            poll_interval_secs: default_poll_interval_secs(),
            max_wait_secs: default_max_wait_secs(),
        }
    }
}

impl TimingSection {
    /// The settle delay as a `Duration`.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }

    /// Builds the stability probe configured by this section.
    pub fn stability_probe(&self) -> StabilityProbe {
        StabilityProbe::new(
            Duration::from_secs(self.poll_interval_secs),
            Duration::from_secs(self.max_wait_secs),
        )
    }
}

/// Root-level filter rules configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRules {
    /// Whether to include hidden files (starting with "."). Defaults to false.
    #[serde(default = "default_enable_hidden_files")]
    pub enable_hidden_files: bool,

    /// Rules for excluding files.
    #[serde(default)]
    pub exclude: ExcludeRules,

    /// Rules for including files (whitelist, overrides exclude rules).
    #[serde(default)]
    pub include: IncludeRules,
}

/// Helper function for default value of `enable_hidden_files`.
fn default_enable_hidden_files() -> bool {
    false
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            enable_hidden_files: false,
            exclude: ExcludeRules::default(),
            include: IncludeRules::default(),
        }
    }
}

/// Rules for excluding files from sorting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames to exclude (e.g., ".DS_Store", "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns to exclude, matched against the file name.
    #[serde(default)]
    pub patterns: Vec<String>,

    /// File extensions to exclude (without the dot).
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns to exclude, matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

impl Default for ExcludeRules {
    /// In-progress browser downloads are excluded out of the box; the
    /// stability probe would skip them anyway, but filtering saves the wait.
    fn default() -> Self {
        Self {
            filenames: vec![".DS_Store".to_string(), "Thumbs.db".to_string()],
            patterns: vec![
                "*.crdownload".to_string(),
                "*.part".to_string(),
                "*.download".to_string(),
            ],
            extensions: Vec::new(),
            regex: Vec::new(),
        }
    }
}

/// Rules for including files (whitelist, overrides exclude rules).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncludeRules {
    /// Glob patterns that force inclusion, matched against the file name.
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl OrganizerConfig {
    /// Load configuration from a file or fall back to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.dropsortrc.toml` in the current directory
    /// 3. Look for `~/.config/dropsort/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but
    /// cannot be read.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        // If explicitly specified, load from that path
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        // Try current directory
        let local_config = PathBuf::from(".dropsortrc.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        // Try home directory
        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("dropsort")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        // Fall back to defaults
        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if file does not exist.
    /// Returns `ConfigError::ConfigInvalid` if TOML parsing fails.
    /// Returns `ConfigError::IoError` if file cannot be read.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// The directory swept and watched for arriving files.
    pub fn source_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.paths.source_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(home_dir()?.join("Downloads")),
        }
    }

    /// The root under which category directories are created.
    pub fn organizer_root(&self) -> Result<PathBuf, ConfigError> {
        match &self.paths.organizer_root {
            Some(dir) => Ok(dir.clone()),
            None => Ok(home_dir()?.join("FileOrganizer")),
        }
    }

    /// Builds the extension table: the standard mappings plus any
    /// `[categories]` additions from this configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownCategory` when a key does not name one of
    /// the category directories.
    pub fn extension_map(&self) -> Result<ExtensionMap, ConfigError> {
        let mut map = ExtensionMap::new();
        for (dir_name, extensions) in &self.categories {
            let category = Category::from_dir_name(dir_name)
                .ok_or_else(|| ConfigError::UnknownCategory(dir_name.clone()))?;
            for ext in extensions {
                map.add_mapping(ext, category);
            }
        }
        Ok(map)
    }

    /// Compiles the filter rules into matchers.
    ///
    /// # Errors
    ///
    /// Returns an error if any regex or glob patterns are invalid.
    pub fn compiled_filters(&self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(self.filters.clone())
    }
}

fn home_dir() -> Result<PathBuf, ConfigError> {
    std::env::var("HOME")
        .map(PathBuf::from)
        .map_err(|_| ConfigError::MissingHomeDirectory)
}

/// Compiled, optimized filter structures for efficient file matching.
///
/// Glob and regex patterns are parsed once here so that per-file matching
/// never reparses a pattern.
#[derive(Debug, Clone)]
pub struct CompiledFilters {
    include_hidden: bool,
    excluded_filenames: HashSet<String>,
    excluded_patterns: Vec<Pattern>,
    excluded_extensions: HashSet<String>,
    excluded_regex: Vec<Regex>,
    include_patterns: Vec<Pattern>,
}

impl CompiledFilters {
    /// Compiles the given rules.
    pub fn new(rules: FilterRules) -> Result<Self, ConfigError> {
        let excluded_patterns = compile_globs(&rules.exclude.patterns)?;
        let include_patterns = compile_globs(&rules.include.patterns)?;

        let excluded_regex = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            include_hidden: rules.enable_hidden_files,
            excluded_filenames: rules.exclude.filenames.into_iter().collect(),
            excluded_patterns,
            excluded_extensions: rules
                .exclude
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
            excluded_regex,
            include_patterns,
        })
    }

    /// Decides whether a file takes part in sorting.
    ///
    /// Include patterns win over every exclude rule; hidden files are
    /// excluded unless enabled; then exact names, glob patterns, extensions
    /// and regexes are checked in that order. All matching is against the
    /// file name, not the full path.
    pub fn should_include(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };

        if self.include_patterns.iter().any(|p| p.matches(name)) {
            return true;
        }

        if !self.include_hidden && name.starts_with('.') {
            return false;
        }

        if self.excluded_filenames.contains(name) {
            return false;
        }

        if self.excluded_patterns.iter().any(|p| p.matches(name)) {
            return false;
        }

        if let Some(ext) = path.extension().and_then(|e| e.to_str())
            && self.excluded_extensions.contains(&ext.to_lowercase())
        {
            return false;
        }

        if self.excluded_regex.iter().any(|r| r.is_match(name)) {
            return false;
        }

        true
    }
}

impl Default for CompiledFilters {
    fn default() -> Self {
        Self::new(FilterRules::default()).expect("Default filter rules must compile")
    }
}

fn compile_globs(patterns: &[String]) -> Result<Vec<Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
        })
        .collect()
}
