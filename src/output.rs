use crate::project::{FileRecord, Project};

/// Width of the `=` separator lines between document sections.
pub(crate) const SEPARATOR_WIDTH: usize = 40;

const ATTRIBUTION: &str =
    "This file was generated using the promptpack tool. For more information, visit https://github.com/promptpack/promptpack";

/// Append-only builder for the final document.
///
/// Building is strictly sequential; sections are delimited by fixed-width
/// separator lines and nothing is ever rewritten.
#[derive(Debug, Default)]
pub(crate) struct OutputBuilder {
    content: String,
}

impl OutputBuilder {
    /// Creates an empty builder.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Writes the tool attribution line.
    pub(crate) fn write_header(&mut self) {
        self.content.push_str(ATTRIBUTION);
        self.content.push('\n');
        self.write_separator();
    }

    /// Writes the project name and file count.
    pub(crate) fn write_project_header(&mut self, project: &Project) {
        self.content
            .push_str(&format!("Project Name: {}\n", project.name));
        self.content
            .push_str(&format!("Total Files: {}\n", project.file_count()));
        self.write_separator();
    }

    /// Writes the optional version-control status block.
    pub(crate) fn write_git_status(&mut self, status: &str) {
        self.content.push_str("Git Status:\n");
        self.content.push_str(status);
        self.content.push('\n');
        self.write_separator();
    }

    /// Writes one file block: a path header followed by verbatim content,
    /// or a one-line placeholder for binary files.
    pub(crate) fn write_file_block(&mut self, file: &FileRecord) {
        if file.is_binary {
            self.content
                .push_str(&format!("File: {} (Binary file present)\n", file.path));
        } else {
            self.content.push_str(&format!("File: {}\n", file.path));
            self.content.push_str(&file.content);
            self.content.push('\n');
        }
    }

    /// Writes a fixed-width separator line.
    pub(crate) fn write_separator(&mut self) {
        self.content.push_str(&"=".repeat(SEPARATOR_WIDTH));
        self.content.push('\n');
    }

    /// Consumes the builder and returns the document.
    pub(crate) fn into_content(self) -> String {
        self.content
    }
}
