use std::path::PathBuf;
use std::time::SystemTime;

/// A project being packed: a name, a root path, and the files discovered
/// under it.
///
/// Files are kept in discovery order. The order is whatever the filesystem
/// enumeration produced; it is never sorted or deduplicated downstream, so
/// two runs over an unmodified tree yield the same sequence.
#[derive(Debug, Clone)]
pub struct Project {
    /// Project name, derived from the target's base name
    pub name: String,

    /// Root path the relative paths are computed against
    pub root: PathBuf,

    /// Files in discovery order
    pub files: Vec<FileRecord>,
}

impl Project {
    /// Creates an empty project.
    #[must_use]
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            files: Vec::new(),
        }
    }

    /// Number of files collected so far.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// A single collected file.
///
/// A record is either text (`content` populated, `is_binary` false) or
/// binary (`content` empty, `is_binary` true); the constructors keep the two
/// states from mixing. `content_size` always equals the UTF-8 byte length of
/// `content`.
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// File name without directory components
    pub name: String,

    /// Path relative to the project root, `/`-separated
    pub path: String,

    /// Decoded text content; empty for binary or unreadable files
    pub content: String,

    /// Whether a null byte was found in the first 1 KiB
    pub is_binary: bool,

    /// UTF-8 byte length of `content`
    pub content_size: usize,

    /// Best-effort filesystem metadata; `None` when the stat call failed
    pub metadata: Option<FileMetadata>,

    /// Line, character and token counts of `content`
    pub stats: FileStats,
}

/// Best-effort filesystem metadata for a collected file.
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// Size on disk in bytes
    pub size: u64,

    /// Last modification time, when the platform reports one
    pub modified: Option<SystemTime>,

    /// Unix permission bits; `None` on platforms without them
    pub mode: Option<u32>,
}

/// Per-file content statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileStats {
    /// Number of lines in the decoded content
    pub lines: usize,

    /// Number of characters in the decoded content
    pub chars: usize,

    /// Token count under the configured tokenizer (0 when unavailable)
    pub tokens: usize,
}

impl FileRecord {
    /// Creates a text record. `content_size` is computed from the content.
    #[must_use]
    pub fn new_text(
        name: impl Into<String>,
        path: impl Into<String>,
        content: String,
        metadata: Option<FileMetadata>,
        stats: FileStats,
    ) -> Self {
        let content_size = content.len();
        Self {
            name: name.into(),
            path: path.into(),
            content,
            is_binary: false,
            content_size,
            metadata,
            stats,
        }
    }

    /// Creates a binary record with empty content and zeroed statistics.
    #[must_use]
    pub fn new_binary(
        name: impl Into<String>,
        path: impl Into<String>,
        metadata: Option<FileMetadata>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            content: String::new(),
            is_binary: true,
            content_size: 0,
            metadata,
            stats: FileStats::default(),
        }
    }

    /// Returns true if this is a text record.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        !self.is_binary
    }
}
