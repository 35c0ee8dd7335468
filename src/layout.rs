/// Destination directory layout for sorted files.
///
/// One subdirectory per category under a single organizing root, created
/// idempotently before any move happens. Every relocation assumes its target
/// directory exists, so the layout must be built before an orchestrator runs.
use crate::file_category::Category;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur while building the destination layout.
///
/// Failing to create the layout is the one configuration failure that aborts
/// the process: nothing can be sorted without its target directories.
#[derive(Debug)]
pub enum LayoutError {
    /// Failed to create a category directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for LayoutError {}

/// Maps each category to an absolute directory under the organizing root.
///
/// # Examples
///
/// ```no_run
/// use dropsort::file_category::Category;
/// use dropsort::layout::DestinationLayout;
/// use std::path::Path;
///
/// let layout = DestinationLayout::create(Path::new("/home/user/FileOrganizer"))?;
/// assert!(layout.dir_for(Category::Image).ends_with("images"));
/// # Ok::<(), dropsort::layout::LayoutError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DestinationLayout {
    root: PathBuf,
}

impl DestinationLayout {
    /// Creates the six category directories under `root`, idempotently.
    ///
    /// Existing directories are left untouched; missing ones (including the
    /// root itself) are created.
    pub fn create(root: &Path) -> Result<Self, LayoutError> {
        for category in Category::ALL {
            let dir = root.join(category.dir_name());
            fs::create_dir_all(&dir).map_err(|e| LayoutError::DirectoryCreationFailed {
                path: dir.clone(),
                source: e,
            })?;
        }

        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// The organizing root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The directory files of `category` are sorted into.
    pub fn dir_for(&self, category: Category) -> PathBuf {
        self.root.join(category.dir_name())
    }

    /// All category directories, in the fixed category order.
    pub fn category_dirs(&self) -> impl Iterator<Item = (Category, PathBuf)> + '_ {
        Category::ALL
            .into_iter()
            .map(|category| (category, self.dir_for(category)))
    }
}
