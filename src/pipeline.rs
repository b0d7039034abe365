use crate::{
    clipboard::{ClipboardSink, NoClipboard, SystemClipboard},
    collector::ProjectCollector,
    config::Config,
    error::{Error, Result},
    output::OutputBuilder,
    stats::{StatsAggregator, Summary},
    vcs::{GitCli, NoVcs, VcsStatus},
};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

/// Outcome of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Project statistics
    pub stats: Summary,

    /// Path the document was written to
    pub output_path: String,

    /// Size of the written document in bytes
    pub document_bytes: usize,

    /// Whether the document also landed on the clipboard
    pub copied_to_clipboard: bool,

    /// Total execution time
    pub duration: Duration,
}

/// Orchestrates a single batch run: collect, summarize, render, write.
///
/// Either the whole document is built and written, or the run ends with an
/// error and no output file; partial output is never produced.
pub struct Pipeline {
    config: Config,
    collector: ProjectCollector,
    aggregator: StatsAggregator,
    vcs: Box<dyn VcsStatus>,
    clipboard: Box<dyn ClipboardSink>,
}

impl Pipeline {
    /// Creates a new pipeline with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let collector = ProjectCollector::new(&config);
        let aggregator = StatsAggregator::new(&config);
        let vcs: Box<dyn VcsStatus> = if config.use_git {
            Box::new(GitCli)
        } else {
            Box::new(NoVcs)
        };
        let clipboard: Box<dyn ClipboardSink> = if config.use_clipboard {
            Box::new(SystemClipboard)
        } else {
            Box::new(NoClipboard)
        };

        Ok(Self {
            config,
            collector,
            aggregator,
            vcs,
            clipboard,
        })
    }

    /// Replaces the version-control provider.
    #[must_use]
    pub fn with_vcs(mut self, vcs: Box<dyn VcsStatus>) -> Self {
        self.vcs = vcs;
        self
    }

    /// Replaces the clipboard sink.
    #[must_use]
    pub fn with_clipboard(mut self, clipboard: Box<dyn ClipboardSink>) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// Executes the run and returns its summary.
    ///
    /// # Process
    ///
    /// 1. **Collect**: walk the target and load every surviving file
    /// 2. **Summarize**: totals, ranking and context-usage advisories
    /// 3. **Render**: build the document sequentially
    /// 4. **Write**: persist the document, then opportunistically copy it
    ///
    /// # Errors
    ///
    /// Returns an error when the target is missing or the document cannot be
    /// written.
    #[instrument(skip(self), fields(target = %self.config.target.display()))]
    pub fn run(self) -> Result<RunSummary> {
        let start_time = Instant::now();

        info!("Collecting {}", self.config.target.display());
        let project = self.collector.collect(&self.config.target)?;
        info!(
            "Collected {} files from project '{}'",
            project.file_count(),
            project.name
        );

        let stats = self.aggregator.summarize(&project);

        let mut builder = OutputBuilder::new();
        builder.write_header();
        builder.write_project_header(&project);
        if let Some(status) = self.vcs.query(&project.root) {
            builder.write_git_status(&status);
        }
        for file in &project.files {
            builder.write_file_block(file);
            builder.write_separator();
        }
        let content = builder.into_content();

        self.write_output(&content)?;
        info!("Files were combined into {}", self.config.output.display());

        let copied_to_clipboard = self.clipboard.copy(&content);
        if copied_to_clipboard {
            info!("Document copied to clipboard");
        }

        Ok(RunSummary {
            stats,
            output_path: self.config.output.display().to_string(),
            document_bytes: content.len(),
            copied_to_clipboard,
            duration: start_time.elapsed(),
        })
    }

    /// Writes the document atomically: a temporary file in the output's
    /// directory is renamed into place, so an interrupted write never leaves
    /// a truncated document behind.
    fn write_output(&self, content: &str) -> Result<()> {
        if let Some(parent) = self.config.output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
        }

        let mut temp_name = self.config.output.clone().into_os_string();
        temp_name.push(".tmp");
        let temp_path = PathBuf::from(temp_name);
        fs::write(&temp_path, content).map_err(|e| {
            warn!("Failed to write {}: {}", temp_path.display(), e);
            Error::io(&temp_path, e)
        })?;

        fs::rename(&temp_path, &self.config.output).map_err(|e| {
            warn!("Failed to write {}: {}", self.config.output.display(), e);
            let _ = fs::remove_file(&temp_path);
            Error::io(&self.config.output, e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenizerKind;
    use assert_fs::prelude::*;
    use std::path::Path;

    fn test_config(root: &Path, output: &Path) -> Config {
        Config::builder()
            .target(root)
            .output(output)
            .tokenizer(TokenizerKind::None)
            .use_git(false)
            .use_clipboard(false)
            .build()
            .unwrap()
    }

    #[test]
    fn test_full_run_writes_document() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.txt").write_str("hello\nworld\n").unwrap();
        let output = temp.path().join("out.txt");

        let config = test_config(temp.path(), &output);
        let summary = Pipeline::new(config).unwrap().run().unwrap();

        assert_eq!(summary.stats.total_files, 1);
        assert!(!summary.copied_to_clipboard);

        let doc = std::fs::read_to_string(&output).unwrap();
        assert!(doc.starts_with("This file was generated"));
        assert!(doc.contains("Total Files: 1\n"));
        assert!(doc.contains("File: a.txt\nhello\nworld\n"));
        assert_eq!(summary.document_bytes, doc.len());
    }

    #[test]
    fn test_pattern_scenario_from_requirements() {
        // a.txt kept in full, b.bin excluded by pattern
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.txt").write_str("hello\nworld\n").unwrap();
        temp.child("b.bin").write_binary(b"\x00\x01").unwrap();
        temp.child(".gitignore").write_str("*.bin\n").unwrap();
        let output = temp.path().join("out.txt");

        let config = test_config(temp.path(), &output);
        Pipeline::new(config).unwrap().run().unwrap();

        let doc = std::fs::read_to_string(&output).unwrap();
        assert!(doc.contains("File: a.txt\nhello\nworld\n"));
        assert!(!doc.contains("b.bin"));
    }

    #[test]
    fn test_binary_placeholder_without_pattern() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.txt").write_str("hello\nworld\n").unwrap();
        temp.child("b.bin").write_binary(b"\x00\x01").unwrap();
        let output = temp.path().join("out.txt");

        let config = test_config(temp.path(), &output);
        Pipeline::new(config).unwrap().run().unwrap();

        let doc = std::fs::read_to_string(&output).unwrap();
        assert!(doc.contains("File: b.bin (Binary file present)\n"));
    }

    #[test]
    fn test_missing_target_writes_nothing() {
        let temp = assert_fs::TempDir::new().unwrap();
        let output = temp.path().join("out.txt");

        let result = Config::builder()
            .target(temp.path().join("missing"))
            .output(&output)
            .build();

        assert!(matches!(result, Err(Error::NotFound { .. })));
        assert!(!output.exists());
    }

    #[test]
    fn test_single_file_target() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("only.txt");
        file.write_str("solo\n").unwrap();
        let output = temp.path().join("out.txt");

        let config = test_config(file.path(), &output);
        let summary = Pipeline::new(config).unwrap().run().unwrap();

        assert_eq!(summary.stats.total_files, 1);
        let doc = std::fs::read_to_string(&output).unwrap();
        assert!(doc.contains("File: only.txt\nsolo\n"));
    }

    #[test]
    fn test_no_temp_file_left_after_write() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.txt").write_str("x\n").unwrap();
        let output = temp.path().join("out.txt");

        let config = test_config(temp.path(), &output);
        Pipeline::new(config).unwrap().run().unwrap();

        assert!(output.exists());
        assert!(!temp.path().join("out.txt.tmp").exists());
    }

    #[test]
    fn test_failed_write_leaves_no_partial_output() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.txt").write_str("x\n").unwrap();
        // A directory squatting on the output path makes the final rename fail
        let output = temp.path().join("out.txt");
        std::fs::create_dir(&output).unwrap();

        let config = test_config(temp.path(), &output);
        let result = Pipeline::new(config).unwrap().run();

        assert!(matches!(result, Err(Error::Io { .. })));
        assert!(output.is_dir());
        assert!(!temp.path().join("out.txt.tmp").exists());
    }

    #[test]
    fn test_git_block_from_custom_provider() {
        struct FixedStatus;
        impl VcsStatus for FixedStatus {
            fn query(&self, _root: &Path) -> Option<String> {
                Some("On branch main\nworking tree clean".to_string())
            }
        }

        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("a.txt").write_str("x\n").unwrap();
        let output = temp.path().join("out.txt");

        let config = test_config(temp.path(), &output);
        Pipeline::new(config)
            .unwrap()
            .with_vcs(Box::new(FixedStatus))
            .run()
            .unwrap();

        let doc = std::fs::read_to_string(&output).unwrap();
        assert!(doc.contains("Git Status:\nOn branch main\nworking tree clean\n"));
    }
}
