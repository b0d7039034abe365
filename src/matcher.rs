use crate::error::{Error, Result};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Gitignore-style matcher compiled from the project's ignore sources.
///
/// Pattern sources are concatenated in a fixed priority order (`.gitignore`
/// first, then the tool-specific ignore file), so later patterns override
/// earlier ones exactly as git resolves precedence: the last matching line
/// wins and `!` negations un-ignore earlier matches. The matcher is immutable
/// once built.
pub struct IgnoreMatcher {
    gitignore: Gitignore,
    pattern_count: usize,
}

impl IgnoreMatcher {
    /// Builds a matcher from the named source files under `root`.
    ///
    /// A missing source contributes no patterns and is logged as a warning;
    /// an unreadable or syntactically broken source is a configuration error.
    ///
    /// # Errors
    ///
    /// Returns an error if a present source cannot be read or the combined
    /// pattern set fails to compile.
    pub fn from_sources(root: &Path, source_names: &[String]) -> Result<Self> {
        let mut builder = GitignoreBuilder::new(root);
        let mut pattern_count = 0;

        for name in source_names {
            let source_path = root.join(name);
            if !source_path.exists() {
                warn!(
                    "Ignore source {} not found, proceeding without it",
                    source_path.display()
                );
                continue;
            }

            let text =
                fs::read_to_string(&source_path).map_err(|e| Error::io(&source_path, e))?;
            for line in text.lines() {
                builder
                    .add_line(Some(source_path.clone()), line)
                    .map_err(|e| {
                        Error::config(format!("Invalid ignore pattern '{}': {}", line, e))
                    })?;
                let trimmed = line.trim();
                if !trimmed.is_empty() && !trimmed.starts_with('#') {
                    pattern_count += 1;
                }
            }
            info!("Loaded ignore patterns from {}", source_path.display());
        }

        let gitignore = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to compile ignore patterns: {}", e)))?;

        Ok(Self {
            gitignore,
            pattern_count,
        })
    }

    /// Builds a matcher with no patterns; nothing matches.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            gitignore: Gitignore::empty(),
            pattern_count: 0,
        }
    }

    /// Returns true if the root-relative path is ignored.
    ///
    /// The path must use `/` separators and be relative to the traversal
    /// root. Directory patterns (`build/`) exclude everything beneath the
    /// directory.
    #[must_use]
    pub fn matches(&self, relative_path: &str) -> bool {
        let matched = self
            .gitignore
            .matched_path_or_any_parents(relative_path, false);
        if matched.is_ignore() {
            debug!("File {} is ignored", relative_path);
        }
        matched.is_ignore()
    }

    /// Number of effective pattern lines loaded from all sources; blank and
    /// comment lines are not counted.
    #[must_use]
    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher_with(patterns: &[(&str, &str)], root: &Path, names: &[&str]) -> IgnoreMatcher {
        for (name, body) in patterns {
            fs::write(root.join(name), body).unwrap();
        }
        let names: Vec<String> = names.iter().map(|s| (*s).to_string()).collect();
        IgnoreMatcher::from_sources(root, &names).unwrap()
    }

    #[test]
    fn test_basic_glob() {
        let temp = assert_fs::TempDir::new().unwrap();
        let m = matcher_with(&[(".gitignore", "*.bin\n")], temp.path(), &[".gitignore"]);

        assert!(m.matches("b.bin"));
        assert!(m.matches("sub/dir/b.bin"));
        assert!(!m.matches("a.txt"));
    }

    #[test]
    fn test_negation_last_match_wins() {
        let temp = assert_fs::TempDir::new().unwrap();
        let m = matcher_with(
            &[(".gitignore", "*.log\n!keep.log\n")],
            temp.path(),
            &[".gitignore"],
        );

        assert!(m.matches("debug.log"));
        assert!(!m.matches("keep.log"));
    }

    #[test]
    fn test_second_source_overrides_first() {
        let temp = assert_fs::TempDir::new().unwrap();
        let m = matcher_with(
            &[
                (".gitignore", "*.txt\n"),
                (".promptpackignore", "!notes.txt\n"),
            ],
            temp.path(),
            &[".gitignore", ".promptpackignore"],
        );

        assert!(m.matches("other.txt"));
        assert!(!m.matches("notes.txt"));
    }

    #[test]
    fn test_directory_pattern_excludes_children() {
        let temp = assert_fs::TempDir::new().unwrap();
        let m = matcher_with(&[(".gitignore", "build/\n")], temp.path(), &[".gitignore"]);

        assert!(m.matches("build/output.txt"));
        assert!(m.matches("build/nested/deep.txt"));
        assert!(!m.matches("src/build.rs"));
    }

    #[test]
    fn test_missing_sources_are_empty() {
        let temp = assert_fs::TempDir::new().unwrap();
        let names = vec![".gitignore".to_string(), ".promptpackignore".to_string()];
        let m = IgnoreMatcher::from_sources(temp.path(), &names).unwrap();

        assert_eq!(m.pattern_count(), 0);
        assert!(!m.matches("anything.txt"));
    }

    #[test]
    fn test_empty_matcher() {
        let m = IgnoreMatcher::empty();
        assert!(!m.matches("any/path.rs"));
        assert_eq!(m.pattern_count(), 0);
    }

    #[test]
    fn test_pattern_count_skips_blanks_and_comments() {
        let temp = assert_fs::TempDir::new().unwrap();
        let m = matcher_with(
            &[(".gitignore", "# build artifacts\n\n*.bin\n\n!keep.bin\n")],
            temp.path(),
            &[".gitignore"],
        );

        assert_eq!(m.pattern_count(), 2);
        assert!(m.matches("other.bin"));
        assert!(!m.matches("keep.bin"));
    }

    #[test]
    fn test_anchored_pattern() {
        let temp = assert_fs::TempDir::new().unwrap();
        let m = matcher_with(&[(".gitignore", "/top.txt\n")], temp.path(), &[".gitignore"]);

        assert!(m.matches("top.txt"));
        assert!(!m.matches("sub/top.txt"));
    }
}
