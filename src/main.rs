use anyhow::Context;
use clap::Parser;
use promptpack::{default_output_name, Config, Pipeline, TokenizerKind};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_FILE: &str = "promptpack.log";

#[derive(Parser, Debug)]
#[command(
    name = "promptpack",
    version,
    about = "Concatenate a project's files into a single LLM-ready document",
    long_about = "Concatenate the contents of a project's text files into a single document \
    for use in a large-language-model context window.\n\n\
    The tool walks the target directory, filters files against .gitignore and \
    .promptpackignore patterns, detects binary files, and reports how much of the \
    context window the result consumes.\n\n\
    USAGE EXAMPLES:\n  \
      # Pack the current directory\n  \
      promptpack\n\n  \
      # Pack a specific project into a named file\n  \
      promptpack ./my-project -o context.txt\n\n  \
      # Pack a single file, skipping the git status block\n  \
      promptpack ./src/main.rs --no-git"
)]
struct Cli {
    /// Target file or directory to process
    #[arg(default_value = ".", value_name = "PATH")]
    target: PathBuf,

    /// Output file path (default: timestamped name derived from the target)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Enable debug logging (also saves logs to promptpack.log)
    #[arg(long)]
    debug: bool,

    /// Skip the git status block
    #[arg(long)]
    no_git: bool,

    /// Do not copy the document to the clipboard
    #[arg(long)]
    no_clipboard: bool,

    /// Skip token counting (token counts become 0)
    #[arg(long)]
    no_tokens: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose, cli.debug)?;

    let output = cli
        .output
        .unwrap_or_else(|| PathBuf::from(default_output_name(&cli.target)));

    let tokenizer = if cli.no_tokens {
        TokenizerKind::None
    } else {
        TokenizerKind::Bpe
    };

    let config = Config::builder()
        .target(cli.target)
        .output(output)
        .tokenizer(tokenizer)
        .use_git(!cli.no_git)
        .use_clipboard(!cli.no_clipboard)
        .build()
        .context("Failed to build configuration")?;

    let summary = Pipeline::new(config)
        .context("Failed to create pipeline")?
        .run()
        .context("Run failed, no output was written")?;

    println!(
        "Wrote {} ({} files, {} tokens, {:.2}% of a {}-token window)",
        summary.output_path,
        summary.stats.total_files,
        summary.stats.total_tokens,
        summary.stats.usage_percent,
        summary.stats.context_window
    );

    Ok(())
}

fn setup_tracing(verbosity: u8, debug: bool) -> anyhow::Result<()> {
    let filter = match (debug, verbosity) {
        (false, 0) => EnvFilter::new("promptpack=info"),
        (true, 0) | (false, 1) => EnvFilter::new("promptpack=debug"),
        _ => EnvFilter::new("promptpack=trace"),
    };

    let file_layer = if debug {
        let file = File::create(LOG_FILE)
            .with_context(|| format!("Failed to create log file {LOG_FILE}"))?;
        Some(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file)),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_thread_ids(false))
        .with(file_layer)
        .init();

    Ok(())
}
