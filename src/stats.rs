use crate::{config::Config, project::Project};
use serde::Serialize;
use tracing::{info, warn};

/// Project-level statistics derived from a read-only pass over the files.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    /// Total number of collected files, binary included
    pub total_files: usize,

    /// Number of text files
    pub text_files: usize,

    /// Number of binary files
    pub binary_files: usize,

    /// Total lines across all text files
    pub total_lines: usize,

    /// Total characters across all text files
    pub total_chars: usize,

    /// Total tokens across all text files
    pub total_tokens: usize,

    /// Context window the usage percentage is computed against
    pub context_window: usize,

    /// Percentage of the context window the project consumes
    pub usage_percent: f64,

    /// Heaviest files by token count, descending
    pub top_files: Vec<TopFile>,
}

/// One entry of the token-usage ranking.
#[derive(Debug, Clone, Serialize)]
pub struct TopFile {
    /// Root-relative path
    pub path: String,

    /// Token count
    pub tokens: usize,
}

impl Summary {
    /// True when the project does not fit the context window.
    #[must_use]
    pub fn exceeds_window(&self) -> bool {
        self.usage_percent > 100.0
    }

    /// True when more than half of the window is consumed.
    #[must_use]
    pub fn above_half_window(&self) -> bool {
        self.usage_percent > 50.0
    }
}

/// Summarizes a project into totals and a top-N token ranking.
pub(crate) struct StatsAggregator {
    context_window: usize,
    top_files: usize,
}

impl StatsAggregator {
    /// Creates a new aggregator from configuration.
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            context_window: config.context_window,
            top_files: config.top_files,
        }
    }

    /// Computes the summary and emits a log-level report.
    ///
    /// The advisories are informational only; they never block output
    /// generation.
    pub(crate) fn summarize(&self, project: &Project) -> Summary {
        let mut total_lines = 0;
        let mut total_chars = 0;
        let mut total_tokens = 0;
        let mut text_files = 0;
        let mut binary_files = 0;

        for file in &project.files {
            if file.is_binary {
                binary_files += 1;
                continue;
            }
            text_files += 1;
            total_lines += file.stats.lines;
            total_chars += file.stats.chars;
            total_tokens += file.stats.tokens;
        }

        // Stable sort keeps discovery order on token ties
        let mut ranked: Vec<&crate::project::FileRecord> =
            project.files.iter().filter(|f| !f.is_binary).collect();
        ranked.sort_by(|a, b| b.stats.tokens.cmp(&a.stats.tokens));
        let top_files = ranked
            .into_iter()
            .take(self.top_files)
            .map(|f| TopFile {
                path: f.path.clone(),
                tokens: f.stats.tokens,
            })
            .collect();

        let usage_percent = total_tokens as f64 / self.context_window as f64 * 100.0;

        let summary = Summary {
            total_files: project.file_count(),
            text_files,
            binary_files,
            total_lines,
            total_chars,
            total_tokens,
            context_window: self.context_window,
            usage_percent,
            top_files,
        };

        self.report(&summary);
        summary
    }

    fn report(&self, summary: &Summary) {
        info!(
            "Project totals: {} files ({} text, {} binary), {} lines, {} chars, {} tokens",
            summary.total_files,
            summary.text_files,
            summary.binary_files,
            summary.total_lines,
            summary.total_chars,
            summary.total_tokens
        );
        for (rank, entry) in summary.top_files.iter().enumerate() {
            info!("  #{} {} ({} tokens)", rank + 1, entry.path, entry.tokens);
        }
        info!(
            "Context usage: {:.2}% of {} tokens",
            summary.usage_percent, summary.context_window
        );

        if summary.exceeds_window() {
            warn!(
                "Project exceeds the context window ({:.2}% of {} tokens)",
                summary.usage_percent, summary.context_window
            );
        } else if summary.above_half_window() {
            warn!(
                "Project uses over half the context window ({:.2}%)",
                summary.usage_percent
            );
        }
    }
}
