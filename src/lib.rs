//! # promptpack
//!
//! Concatenates a project's text files into a single document sized for an
//! LLM context window.
//!
//! ## Features
//!
//! - Gitignore-style filtering from `.gitignore` and `.promptpackignore`
//! - Binary detection and multi-encoding text decoding
//! - Size, line, character and BPE token accounting per file
//! - Context-window usage advisories and a top-N token ranking
//! - Optional git status block and clipboard copy
//!
//! ## Quick Start
//!
//! ```no_run
//! use promptpack::{Config, Pipeline};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::builder()
//!     .target("./my-project")
//!     .output("context.txt")
//!     .build()?;
//!
//! let summary = Pipeline::new(config)?.run()?;
//! println!("{:.2}% of the context window", summary.stats.usage_percent);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! A single-threaded batch pipeline:
//! 1. **Collector**: walks the target, filtering through the ignore matcher
//! 2. **Loader**: classifies binary/text, decodes, computes statistics
//! 3. **Aggregator**: project totals and context-usage advisories
//! 4. **Builder**: renders the final separator-delimited document

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod clipboard;
mod collector;
mod config;
mod error;
mod loader;
mod matcher;
mod output;
mod pipeline;
mod project;
mod stats;
mod token;
mod vcs;

pub use clipboard::{ClipboardSink, NoClipboard, SystemClipboard};
pub use config::{default_output_name, Config, ConfigBuilder};
pub use error::{Error, Result};
pub use matcher::IgnoreMatcher;
pub use pipeline::{Pipeline, RunSummary};
pub use project::{FileMetadata, FileRecord, FileStats, Project};
pub use stats::{Summary, TopFile};
pub use token::{TokenCounter, TokenizerKind};
pub use vcs::{GitCli, NoVcs, VcsStatus};

/// Runs the complete pipeline with the given configuration.
///
/// This is the main entry point for the library.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is invalid
/// - The target does not exist
/// - The output document cannot be written
pub fn run(config: Config) -> Result<RunSummary> {
    Pipeline::new(config)?.run()
}
