use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Capability interface for the optional version-control status block.
///
/// Implementations run synchronously and must never abort the build: a
/// failing query degrades to `None` (block omitted) or to placeholder text.
pub trait VcsStatus {
    /// Returns the status text for the project root, or `None` when no
    /// version-control information is available.
    fn query(&self, root: &Path) -> Option<String>;
}

/// Queries git by shelling out to the `git` binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCli;

impl VcsStatus for GitCli {
    fn query(&self, root: &Path) -> Option<String> {
        // Anything other than a clean "true" means no usable repository
        match run_git(root, &["rev-parse", "--is-inside-work-tree"]) {
            Some(out) if out == "true" => {}
            _ => {
                debug!("No git repository at {}", root.display());
                return None;
            }
        }

        let branch = run_git(root, &["rev-parse", "--abbrev-ref", "HEAD"])
            .unwrap_or_else(|| "(unavailable)".to_string());
        let commit = run_git(root, &["log", "-1", "--pretty=%h %s"])
            .unwrap_or_else(|| "(unavailable)".to_string());
        let status = match run_git(root, &["status", "--short"]) {
            Some(out) if out.is_empty() => "working tree clean".to_string(),
            Some(out) => out,
            None => "(unavailable)".to_string(),
        };

        Some(format!(
            "On branch {branch}\nLast commit: {commit}\n{status}"
        ))
    }
}

/// Status provider that reports nothing; the default for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVcs;

impl VcsStatus for NoVcs {
    fn query(&self, _root: &Path) -> Option<String> {
        None
    }
}

fn run_git(root: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .current_dir(root)
        .args(args)
        .output()
        .ok()?;
    if !output.status.success() {
        debug!("git {:?} exited with {}", args, output.status);
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    Some(text.trim_end().to_string())
}
