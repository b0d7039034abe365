use crate::error::{Error, Result};
use crate::token::TokenizerKind;
use chrono::Local;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use std::path::{Path, PathBuf};

const DEFAULT_MAX_FILE_SIZE: u64 = 512 * 1024 * 1024;
const DEFAULT_LINE_WARN_THRESHOLD: usize = 700;
const DEFAULT_CONTEXT_WINDOW: usize = 128_000;
const DEFAULT_TOP_FILES: usize = 5;

/// Configuration for the promptpack pipeline.
///
/// Immutable once built; every component receives what it needs at
/// construction time. Use [`Config::builder()`] to construct one.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Config {
    /// Target file or directory to pack
    pub target: PathBuf,

    /// Path of the output document
    pub output: PathBuf,

    /// Decode attempts in order; the first clean decode wins
    pub encodings: Vec<&'static Encoding>,

    /// Directory names pruned from traversal before pattern matching
    pub ignored_dirs: Vec<String>,

    /// Ignore source file names in priority order, resolved against the root
    pub ignore_sources: Vec<String>,

    /// Files larger than this many bytes are skipped, never truncated
    pub max_file_size: u64,

    /// Line count above which a file draws a warning
    pub line_warn_threshold: usize,

    /// Token budget of the downstream consumer, for advisory reporting
    pub context_window: usize,

    /// How many files the token-usage ranking reports
    pub top_files: usize,

    /// Tokenizer used for token counts
    pub tokenizer: TokenizerKind,

    /// Whether to query git for a status block
    pub use_git: bool,

    /// Whether to copy the finished document to the clipboard
    pub use_clipboard: bool,
}

impl Config {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the target does not exist, and a
    /// configuration error for out-of-range limits.
    pub fn validate(&self) -> Result<()> {
        if !self.target.exists() {
            return Err(Error::not_found(&self.target));
        }

        if self.encodings.is_empty() {
            return Err(Error::config("encodings list must not be empty"));
        }

        if self.context_window == 0 {
            return Err(Error::config("context_window must be greater than 0"));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: PathBuf::from("."),
            output: PathBuf::from(default_output_name(Path::new("."))),
            encodings: vec![UTF_8, WINDOWS_1252],
            ignored_dirs: default_ignored_dirs(),
            ignore_sources: vec![".gitignore".to_string(), ".promptpackignore".to_string()],
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            line_warn_threshold: DEFAULT_LINE_WARN_THRESHOLD,
            context_window: DEFAULT_CONTEXT_WINDOW,
            top_files: DEFAULT_TOP_FILES,
            tokenizer: TokenizerKind::Bpe,
            use_git: true,
            use_clipboard: true,
        }
    }
}

fn default_ignored_dirs() -> Vec<String> {
    [".git", ".svn", ".hg", "__pycache__", "node_modules", "target"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Returns the default timestamped output file name for a target.
///
/// Incorporates the target's base name with spaces replaced by underscores,
/// falling back to `folder` or `file` when the name is empty.
#[must_use]
pub fn default_output_name(target: &Path) -> String {
    let base = target
        .file_name()
        .map(|n| n.to_string_lossy().replace(' ', "_"))
        .filter(|n| !n.is_empty() && n.as_str() != ".")
        .unwrap_or_else(|| {
            if target.is_dir() {
                "folder".to_string()
            } else {
                "file".to_string()
            }
        });
    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    format!("promptpack-{base}-{stamp}.txt")
}

/// Builder for creating a [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    target: Option<PathBuf>,
    output: Option<PathBuf>,
    encodings: Option<Vec<&'static Encoding>>,
    ignored_dirs: Option<Vec<String>>,
    ignore_sources: Option<Vec<String>>,
    max_file_size: Option<u64>,
    line_warn_threshold: Option<usize>,
    context_window: Option<usize>,
    top_files: Option<usize>,
    tokenizer: Option<TokenizerKind>,
    use_git: Option<bool>,
    use_clipboard: Option<bool>,
}

impl ConfigBuilder {
    /// Sets the target file or directory.
    #[must_use]
    pub fn target(mut self, path: impl Into<PathBuf>) -> Self {
        self.target = Some(path.into());
        self
    }

    /// Sets the output document path.
    #[must_use]
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Sets the ordered encoding fallback list.
    #[must_use]
    pub fn encodings(mut self, encodings: Vec<&'static Encoding>) -> Self {
        self.encodings = Some(encodings);
        self
    }

    /// Sets the always-pruned directory names.
    #[must_use]
    pub fn ignored_dirs(mut self, dirs: Vec<String>) -> Self {
        self.ignored_dirs = Some(dirs);
        self
    }

    /// Sets the ignore source file names, in priority order.
    #[must_use]
    pub fn ignore_sources(mut self, sources: Vec<String>) -> Self {
        self.ignore_sources = Some(sources);
        self
    }

    /// Sets the per-file size ceiling in bytes.
    #[must_use]
    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = Some(bytes);
        self
    }

    /// Sets the line count warning threshold.
    #[must_use]
    pub fn line_warn_threshold(mut self, lines: usize) -> Self {
        self.line_warn_threshold = Some(lines);
        self
    }

    /// Sets the advisory context window in tokens.
    #[must_use]
    pub fn context_window(mut self, tokens: usize) -> Self {
        self.context_window = Some(tokens);
        self
    }

    /// Sets how many files the token ranking reports.
    #[must_use]
    pub fn top_files(mut self, count: usize) -> Self {
        self.top_files = Some(count);
        self
    }

    /// Sets the tokenizer implementation.
    #[must_use]
    pub fn tokenizer(mut self, kind: TokenizerKind) -> Self {
        self.tokenizer = Some(kind);
        self
    }

    /// Enables or disables the git status block.
    #[must_use]
    pub fn use_git(mut self, enabled: bool) -> Self {
        self.use_git = Some(enabled);
        self
    }

    /// Enables or disables the clipboard copy.
    #[must_use]
    pub fn use_clipboard(mut self, enabled: bool) -> Self {
        self.use_clipboard = Some(enabled);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn build(self) -> Result<Config> {
        let target = self.target.unwrap_or_else(|| PathBuf::from("."));
        let output = self
            .output
            .unwrap_or_else(|| PathBuf::from(default_output_name(&target)));

        let config = Config {
            target,
            output,
            encodings: self.encodings.unwrap_or_else(|| vec![UTF_8, WINDOWS_1252]),
            ignored_dirs: self.ignored_dirs.unwrap_or_else(default_ignored_dirs),
            ignore_sources: self.ignore_sources.unwrap_or_else(|| {
                vec![".gitignore".to_string(), ".promptpackignore".to_string()]
            }),
            max_file_size: self.max_file_size.unwrap_or(DEFAULT_MAX_FILE_SIZE),
            line_warn_threshold: self
                .line_warn_threshold
                .unwrap_or(DEFAULT_LINE_WARN_THRESHOLD),
            context_window: self.context_window.unwrap_or(DEFAULT_CONTEXT_WINDOW),
            top_files: self.top_files.unwrap_or(DEFAULT_TOP_FILES),
            tokenizer: self.tokenizer.unwrap_or_default(),
            use_git: self.use_git.unwrap_or(true),
            use_clipboard: self.use_clipboard.unwrap_or(true),
        };

        config.validate()?;
        Ok(config)
    }
}
