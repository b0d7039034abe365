use crate::{
    config::Config,
    error::{Error, Result},
    loader::FileLoader,
    matcher::IgnoreMatcher,
    project::Project,
};
use ignore::WalkBuilder;
use std::path::Path;
use tracing::{debug, warn};

/// Walks a target directory (or accepts a single file) and builds the
/// in-memory [`Project`] by running every surviving entry through the
/// [`FileLoader`].
///
/// Traversal order is the natural filesystem enumeration order. This is a
/// documented non-guarantee: the resulting file order is
/// filesystem-dependent, and callers needing a stable order must sort the
/// document themselves.
pub(crate) struct ProjectCollector {
    loader: FileLoader,
    ignored_dirs: Vec<String>,
    ignore_sources: Vec<String>,
}

impl ProjectCollector {
    /// Creates a new collector from configuration.
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            loader: FileLoader::new(config),
            ignored_dirs: config.ignored_dirs.clone(),
            ignore_sources: config.ignore_sources.clone(),
        }
    }

    /// Collects the configured target, dispatching on its type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the target does not exist.
    pub(crate) fn collect(&self, target: &Path) -> Result<Project> {
        if target.is_dir() {
            self.collect_directory(target)
        } else if target.is_file() {
            self.collect_file(target)
        } else {
            Err(Error::not_found(target))
        }
    }

    /// Recursively collects all files under `root`.
    ///
    /// Built-in ignored directory names are pruned before descending and
    /// never reach the pattern matcher; everything else is filtered through
    /// the ignore sources loaded from the root.
    pub(crate) fn collect_directory(&self, root: &Path) -> Result<Project> {
        if !root.is_dir() {
            return Err(Error::not_found(root));
        }

        let matcher = IgnoreMatcher::from_sources(root, &self.ignore_sources)?;
        let mut project = Project::new(project_name(root), root);

        let ignored_dirs = self.ignored_dirs.clone();
        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(false)
            .filter_entry(move |entry| {
                // Prune built-in directories before pattern matching
                let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
                if is_dir && entry.depth() > 0 {
                    let name = entry.file_name().to_string_lossy();
                    if ignored_dirs.iter().any(|d| d.as_str() == name) {
                        return false;
                    }
                }
                true
            })
            .build();

        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Walk error: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            let relative_path = relative_to(path, root);
            if matcher.matches(&relative_path) {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();
            match self.loader.load(path, &name, &relative_path) {
                Ok(Some(record)) => project.files.push(record),
                Ok(None) => debug!("Skipped {}", relative_path),
                Err(e) => warn!("Failed to load {}: {}", relative_path, e),
            }
        }

        debug!(
            "Collected {} files under {}",
            project.file_count(),
            root.display()
        );
        Ok(project)
    }

    /// Collects a single explicitly named file as its own project.
    ///
    /// Ignore matching is bypassed entirely: an explicit target expresses
    /// intent more strongly than any pattern file.
    pub(crate) fn collect_file(&self, path: &Path) -> Result<Project> {
        if !path.is_file() {
            return Err(Error::not_found(path));
        }

        let root = path.parent().filter(|p| !p.as_os_str().is_empty());
        let name = match root {
            Some(parent) => project_name(parent),
            None => "SingleFileProject".to_string(),
        };
        let mut project = Project::new(name, root.unwrap_or_else(|| Path::new(".")));

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let relative_path = file_name.clone();

        match self.loader.load(path, &file_name, &relative_path) {
            Ok(Some(record)) => project.files.push(record),
            Ok(None) => debug!("Skipped {}", relative_path),
            Err(e) => warn!("Failed to load {}: {}", relative_path, e),
        }

        Ok(project)
    }
}

/// Root-relative path with forward slashes, regardless of host OS.
fn relative_to(path: &Path, root: &Path) -> String {
    let rel = pathdiff::diff_paths(path, root).unwrap_or_else(|| path.to_path_buf());
    let s = rel.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        s.into_owned()
    } else {
        s.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

/// Project name derived from the path's base name.
fn project_name(path: &Path) -> String {
    let resolved = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    resolved
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "project".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenizerKind;
    use assert_fs::prelude::*;

    fn collector_for(root: &Path) -> ProjectCollector {
        let config = Config::builder()
            .target(root)
            .tokenizer(TokenizerKind::None)
            .build()
            .unwrap();
        ProjectCollector::new(&config)
    }

    #[test]
    fn test_collects_nested_files() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("top.txt").write_str("top\n").unwrap();
        temp.child("sub/inner.txt").write_str("inner\n").unwrap();

        let project = collector_for(temp.path())
            .collect_directory(temp.path())
            .unwrap();

        assert_eq!(project.file_count(), 2);
        let paths: Vec<&str> = project.files.iter().map(|f| f.path.as_str()).collect();
        assert!(paths.contains(&"top.txt"));
        assert!(paths.contains(&"sub/inner.txt"));
    }

    #[test]
    fn test_builtin_directories_pruned() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("kept.txt").write_str("x").unwrap();
        temp.child(".git/config").write_str("[core]").unwrap();
        temp.child("node_modules/pkg/index.js")
            .write_str("module.exports = {}")
            .unwrap();

        let project = collector_for(temp.path())
            .collect_directory(temp.path())
            .unwrap();

        assert_eq!(project.file_count(), 1);
        assert_eq!(project.files[0].path, "kept.txt");
    }

    #[test]
    fn test_pattern_excludes_binary_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.txt").write_str("hello\nworld\n").unwrap();
        temp.child("b.bin").write_binary(b"\x00\x01\x02").unwrap();
        temp.child(".gitignore").write_str("*.bin\n").unwrap();

        let project = collector_for(temp.path())
            .collect_directory(temp.path())
            .unwrap();

        let paths: Vec<&str> = project.files.iter().map(|f| f.path.as_str()).collect();
        assert!(paths.contains(&"a.txt"));
        assert!(!paths.contains(&"b.bin"));
    }

    #[test]
    fn test_binary_included_without_pattern() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.txt").write_str("hello\nworld\n").unwrap();
        temp.child("b.bin").write_binary(b"\x00\x01\x02").unwrap();

        let project = collector_for(temp.path())
            .collect_directory(temp.path())
            .unwrap();

        assert_eq!(project.file_count(), 2);
        let bin = project.files.iter().find(|f| f.path == "b.bin").unwrap();
        assert!(bin.is_binary);
        assert!(bin.content.is_empty());
    }

    #[test]
    fn test_negation_pattern_unignores() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("debug.log").write_str("noise").unwrap();
        temp.child("keep.log").write_str("signal").unwrap();
        temp.child(".gitignore")
            .write_str("*.log\n!keep.log\n")
            .unwrap();

        let project = collector_for(temp.path())
            .collect_directory(temp.path())
            .unwrap();

        let paths: Vec<&str> = project.files.iter().map(|f| f.path.as_str()).collect();
        assert!(paths.contains(&"keep.log"));
        assert!(!paths.contains(&"debug.log"));
    }

    #[test]
    fn test_missing_ignore_sources_include_everything() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("one.txt").write_str("1").unwrap();
        temp.child("two.txt").write_str("2").unwrap();

        let project = collector_for(temp.path())
            .collect_directory(temp.path())
            .unwrap();

        assert_eq!(project.file_count(), 2);
    }

    #[test]
    fn test_missing_root_is_not_found() {
        let temp = assert_fs::TempDir::new().unwrap();
        let collector = collector_for(temp.path());
        let result = collector.collect(&temp.path().join("missing"));

        assert!(matches!(result, Err(Error::NotFound { .. })));
    }

    #[test]
    fn test_single_file_bypasses_ignores() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child(".gitignore").write_str("*.txt\n").unwrap();
        let target = temp.child("picked.txt");
        target.write_str("explicitly chosen\n").unwrap();

        let collector = collector_for(temp.path());
        let project = collector.collect_file(target.path()).unwrap();

        assert_eq!(project.file_count(), 1);
        assert_eq!(project.files[0].path, "picked.txt");
        assert_eq!(project.files[0].content, "explicitly chosen\n");
    }

    #[test]
    fn test_repeat_runs_are_identical() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.txt").write_str("alpha\n").unwrap();
        temp.child("b/c.txt").write_str("beta\ngamma\n").unwrap();

        let collector = collector_for(temp.path());
        let first = collector.collect_directory(temp.path()).unwrap();
        let second = collector.collect_directory(temp.path()).unwrap();

        let shape = |p: &Project| -> Vec<(String, usize, usize)> {
            p.files
                .iter()
                .map(|f| (f.path.clone(), f.content_size, f.stats.lines))
                .collect()
        };
        assert_eq!(shape(&first), shape(&second));
    }
}
