//! Error types for the codec module.

use std::fmt::Display;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while decoding or encoding audio.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The container format is not handled by this codec.
    #[error("Unsupported format: {format}")]
    UnsupportedFormat { format: String },

    /// The input bytes could not be decoded.
    #[error("Failed to decode {format} data: {reason}")]
    DecodeFailed { format: String, reason: String },

    /// Encoding to the target container failed.
    #[error("Failed to encode {format}: {reason}")]
    EncodeFailed {
        format: String,
        reason: String,
        stderr: Option<String>,
    },

    /// External encoder binary not found.
    #[error("Encoder not found at path: {path}")]
    EncoderNotFound { path: PathBuf },

    /// Buffer parameters are out of range.
    #[error("Invalid audio buffer: {reason}")]
    InvalidBuffer { reason: String },

    /// I/O error while reading or writing audio data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    /// Creates a new unsupported format error.
    pub fn unsupported(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Creates a new decode failed error.
    pub fn decode_failed(format: impl Into<String>, reason: impl Display) -> Self {
        Self::DecodeFailed {
            format: format.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates a new encode failed error with optional stderr output.
    pub fn encode_failed(
        format: impl Into<String>,
        reason: impl Display,
        stderr: Option<String>,
    ) -> Self {
        Self::EncodeFailed {
            format: format.into(),
            reason: reason.to_string(),
            stderr,
        }
    }

    /// Creates a new invalid buffer error.
    pub fn invalid_buffer(reason: impl Into<String>) -> Self {
        Self::InvalidBuffer {
            reason: reason.into(),
        }
    }

    /// Whether this error happened while reading input rather than writing output.
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Self::DecodeFailed { .. })
    }
}
