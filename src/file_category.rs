/// File categorization by extension.
///
/// This module maps file extensions to the fixed set of sorting categories
/// used to organize a downloads directory. The extension string is the sole
/// classification signal; file content is never inspected.
///
/// # Examples
///
/// ```
/// use dropsort::file_category::{Category, ExtensionMap};
///
/// let map = ExtensionMap::default();
/// assert_eq!(map.category_of(".png"), Category::Image);
/// assert_eq!(map.category_of(".PDF"), Category::Document);
/// assert_eq!(map.category_of(".zip"), Category::Other);
/// ```
use std::collections::HashMap;
use std::path::Path;

/// One of the fixed sorting buckets.
///
/// `Other` is the fallback for every extension the table does not know,
/// including the empty extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Image files (PNG, JPG, GIF, etc.)
    Image,
    /// Document files (PDF, DOCX, TXT, etc.)
    Document,
    /// Video files (MP4, MKV, MOV, etc.)
    Video,
    /// Audio files (MP3, WAV, FLAC, etc.)
    Audio,
    /// Installer packages (EXE, MSI, DEB, etc.)
    Installer,
    /// Everything else.
    Other,
}

impl Category {
    /// All categories, in the order their directories are created and swept.
    pub const ALL: [Category; 6] = [
        Category::Image,
        Category::Document,
        Category::Video,
        Category::Audio,
        Category::Installer,
        Category::Other,
    ];

    /// Returns the directory name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use dropsort::file_category::Category;
    ///
    /// assert_eq!(Category::Image.dir_name(), "images");
    /// assert_eq!(Category::Installer.dir_name(), "installers");
    /// assert_eq!(Category::Other.dir_name(), "other");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Image => "images",
            Category::Document => "documents",
            Category::Video => "videos",
            Category::Audio => "audio",
            Category::Installer => "installers",
            Category::Other => "other",
        }
    }

    /// Returns a human-readable description of this category.
    pub fn description(&self) -> &'static str {
        match self {
            Category::Image => "Image files",
            Category::Document => "Document files",
            Category::Video => "Video files",
            Category::Audio => "Audio files",
            Category::Installer => "Installer packages",
            Category::Other => "Other files",
        }
    }

    /// Parses a category from its directory name.
    ///
    /// Used when merging user-configured extension mappings, which name
    /// categories by their directory.
    pub fn from_dir_name(name: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.dir_name() == name)
    }
}

/// Maps file extensions to categories.
///
/// Keys are stored lowercase with a leading dot (`".jpg"`). Lookups normalize
/// case and tolerate a missing dot, so `category_of` is total: every input
/// string produces a category.
///
/// The table is built once at startup and treated as immutable afterwards.
#[derive(Debug, Clone)]
pub struct ExtensionMap {
    extensions: HashMap<String, Category>,
}

impl ExtensionMap {
    /// Creates a new `ExtensionMap` with the standard mappings.
    pub fn new() -> Self {
        let mut map = Self {
            extensions: HashMap::new(),
        };
        map.populate_standard_mappings();
        map
    }

    /// Populates the map with the standard extension table.
    fn populate_standard_mappings(&mut self) {
        // Image extensions
        self.add_mapping(".jpg", Category::Image);
        self.add_mapping(".jpeg", Category::Image);
        self.add_mapping(".png", Category::Image);
        self.add_mapping(".gif", Category::Image);
        self.add_mapping(".bmp", Category::Image);
        self.add_mapping(".tiff", Category::Image);
        self.add_mapping(".svg", Category::Image);
        self.add_mapping(".webp", Category::Image);

        // Document extensions
        self.add_mapping(".pdf", Category::Document);
        self.add_mapping(".doc", Category::Document);
        self.add_mapping(".docx", Category::Document);
        self.add_mapping(".txt", Category::Document);
        self.add_mapping(".xls", Category::Document);
        self.add_mapping(".xlsx", Category::Document);
        self.add_mapping(".ppt", Category::Document);
        self.add_mapping(".pptx", Category::Document);
        self.add_mapping(".rtf", Category::Document);
        self.add_mapping(".odt", Category::Document);

        // Video extensions
        self.add_mapping(".mp4", Category::Video);
        self.add_mapping(".avi", Category::Video);
        self.add_mapping(".mov", Category::Video);
        self.add_mapping(".mkv", Category::Video);
        self.add_mapping(".flv", Category::Video);
        self.add_mapping(".wmv", Category::Video);
        self.add_mapping(".webm", Category::Video);
        self.add_mapping(".m4v", Category::Video);

        // Audio extensions
        self.add_mapping(".mp3", Category::Audio);
        self.add_mapping(".wav", Category::Audio);
        self.add_mapping(".aac", Category::Audio);
        self.add_mapping(".flac", Category::Audio);
        self.add_mapping(".ogg", Category::Audio);
        self.add_mapping(".wma", Category::Audio);
        self.add_mapping(".m4a", Category::Audio);

        // Installer extensions
        self.add_mapping(".exe", Category::Installer);
        self.add_mapping(".msi", Category::Installer);
        self.add_mapping(".dmg", Category::Installer);
        self.add_mapping(".pkg", Category::Installer);
        self.add_mapping(".deb", Category::Installer);
        self.add_mapping(".rpm", Category::Installer);
        self.add_mapping(".appimage", Category::Installer);
    }

    /// Adds an extension to category mapping.
    ///
    /// The extension is lowercased and a leading dot is added if missing, so
    /// `"jpg"` and `".JPG"` register the same key.
    pub fn add_mapping(&mut self, ext: &str, category: Category) {
        self.extensions.insert(Self::normalize(ext), category);
    }

    /// Maps an extension string to its category.
    ///
    /// Unknown and empty extensions map to `Category::Other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dropsort::file_category::{Category, ExtensionMap};
    ///
    /// let map = ExtensionMap::default();
    /// assert_eq!(map.category_of(".mp3"), Category::Audio);
    /// assert_eq!(map.category_of("Mp4"), Category::Video);
    /// assert_eq!(map.category_of(""), Category::Other);
    /// ```
    pub fn category_of(&self, ext: &str) -> Category {
        if ext.is_empty() {
            return Category::Other;
        }
        self.extensions
            .get(&Self::normalize(ext))
            .copied()
            .unwrap_or(Category::Other)
    }

    /// Maps a path to a category via its extension.
    ///
    /// Paths without an extension map to `Category::Other`.
    pub fn category_of_path(&self, path: &Path) -> Category {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self.category_of(ext),
            None => Category::Other,
        }
    }

    fn normalize(ext: &str) -> String {
        let lower = ext.to_lowercase();
        if lower.starts_with('.') {
            lower
        } else {
            format!(".{}", lower)
        }
    }
}

impl Default for ExtensionMap {
    fn default() -> Self {
        Self::new()
    }
}
