//! Error types for the task module.

use std::path::PathBuf;
use thiserror::Error;

use crate::codec::{CodecError, Encoding};

/// Errors scoped to one input file or one of its encodings.
///
/// None of these abort a batch; they are recorded as failed results.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// Input extension is not one of mp3, wav, aif, aiff.
    #[error("Unsupported input format: {extension}")]
    UnsupportedFormat { extension: String },

    /// Input file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input file could not be decoded.
    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    /// One target encoding could not be produced.
    #[error("Failed to convert to {encoding}: {source}")]
    Encode {
        encoding: Encoding,
        #[source]
        source: CodecError,
    },

    /// The encoder reported success but nothing is on disk.
    #[error("Output file not created: {path}")]
    OutputMissing { path: PathBuf },
}
