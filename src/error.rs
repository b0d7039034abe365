use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the promptpack pipeline.
///
/// Only `NotFound`, `Config` and the fatal `Io` paths abort a run; per-file
/// conditions (`Decode`, non-fatal `Io`) are logged by the collector and the
/// affected file is skipped.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// Target path does not exist.
    #[error("Target not found: '{path}'")]
    NotFound {
        /// The missing path
        path: PathBuf,
    },

    /// IO error with context about the file path.
    #[error("IO error accessing '{path}': {message}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// File could not be decoded under any configured encoding.
    #[error("Failed to decode '{path}' with any configured encoding")]
    Decode {
        /// Path to the undecodable file
        path: PathBuf,
    },

    /// Configuration validation error.
    #[error("Invalid configuration: {message}")]
    Config {
        /// Detailed error message
        message: String,
    },
}

impl Error {
    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Creates an IO error with path context.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Creates a decode error.
    #[must_use]
    pub fn decode(path: impl Into<PathBuf>) -> Self {
        Self::Decode { path: path.into() }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns true if this is a not-found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is an IO error.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Returns true if this is a decode error.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}
