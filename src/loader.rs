use crate::{
    config::Config,
    error::{Error, Result},
    project::{FileMetadata, FileRecord, FileStats},
    token::TokenCounter,
};
use encoding_rs::Encoding;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

const SNIFF_SIZE: usize = 1024;

/// Reads files, detects binary content, decodes text under the configured
/// encoding order and computes per-file statistics.
pub(crate) struct FileLoader {
    encodings: Vec<&'static Encoding>,
    max_file_size: u64,
    line_warn_threshold: usize,
    tokenizer: Arc<dyn TokenCounter>,
}

impl FileLoader {
    /// Creates a new loader from configuration.
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            encodings: config.encodings.clone(),
            max_file_size: config.max_file_size,
            line_warn_threshold: config.line_warn_threshold,
            tokenizer: config.tokenizer.create(),
        }
    }

    /// Loads a single file into a record.
    ///
    /// Returns `Ok(None)` when the file is rejected by the size cap. Binary
    /// files come back as placeholder records with empty content.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or decoded under any
    /// configured encoding. Callers treat both as non-fatal and skip the file.
    pub(crate) fn load(
        &self,
        path: &Path,
        name: &str,
        relative_path: &str,
    ) -> Result<Option<FileRecord>> {
        let metadata = read_metadata(path);

        if let Some(meta) = &metadata {
            if meta.size > self.max_file_size {
                warn!(
                    "Skipping {}: {} bytes exceeds the {} byte ceiling",
                    relative_path, meta.size, self.max_file_size
                );
                return Ok(None);
            }
        }

        if self.sniff_binary(path)? {
            info!("Binary file detected: {}", name);
            return Ok(Some(FileRecord::new_binary(name, relative_path, metadata)));
        }

        let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
        let content = self.decode(path, &bytes)?;

        let stats = FileStats {
            lines: content.lines().count(),
            chars: content.chars().count(),
            tokens: self.tokenizer.count(&content),
        };

        if stats.lines > self.line_warn_threshold {
            warn!(
                "{} has {} lines (over the {} line threshold)",
                relative_path, stats.lines, self.line_warn_threshold
            );
        }

        Ok(Some(FileRecord::new_text(
            name,
            relative_path,
            content,
            metadata,
            stats,
        )))
    }

    /// Checks the first 1 KiB for a null byte.
    fn sniff_binary(&self, path: &Path) -> Result<bool> {
        let mut file = File::open(path).map_err(|e| Error::io(path, e))?;
        let mut buffer = [0u8; SNIFF_SIZE];
        let bytes_read = file.read(&mut buffer).map_err(|e| Error::io(path, e))?;

        Ok(memchr::memchr(0, &buffer[..bytes_read]).is_some())
    }

    /// Decodes the full content, first clean decode wins.
    fn decode(&self, path: &Path, bytes: &[u8]) -> Result<String> {
        for encoding in &self.encodings {
            let (decoded, had_errors) = encoding.decode_without_bom_handling(bytes);
            if !had_errors {
                debug!(
                    "Decoded {} with encoding {}",
                    path.display(),
                    encoding.name()
                );
                return Ok(decoded.into_owned());
            }
        }
        Err(Error::decode(path))
    }
}

/// Stats the file; a failure is logged and leaves the metadata unknown.
fn read_metadata(path: &Path) -> Option<FileMetadata> {
    match fs::metadata(path) {
        Ok(meta) => Some(FileMetadata {
            size: meta.len(),
            modified: meta.modified().ok(),
            mode: permission_bits(&meta),
        }),
        Err(e) => {
            warn!("Could not stat {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(unix)]
fn permission_bits(meta: &fs::Metadata) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    Some(meta.permissions().mode())
}

#[cfg(not(unix))]
fn permission_bits(_meta: &fs::Metadata) -> Option<u32> {
    None
}
