//! Error types for the scheduler module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that end a batch before any file is converted.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The directory holds no mp3, wav, aif or aiff files.
    #[error("No eligible files found in {directory}")]
    NoEligibleFiles { directory: PathBuf },

    /// The directory could not be listed.
    #[error("Failed to read directory {directory}: {source}")]
    DirectoryUnreadable {
        directory: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The path exists but is not a directory.
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },
}

impl BatchError {
    pub(crate) fn unreadable(directory: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryUnreadable {
            directory: directory.into(),
            source,
        }
    }
}
