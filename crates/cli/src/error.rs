use std::path::PathBuf;
use thiserror::Error;

use convertino_core::{BatchError, ConversionError};

/// Mistakes in how the tool was invoked or answered.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("The --encoding option is required when converting a directory")]
    MissingEncodingArgument,

    #[error("Invalid option: {input:?} (expected 1, 2 or 3)")]
    InvalidUserChoice { input: String },

    #[error("No eligible audio files found in {directory}")]
    NoEligibleFiles { directory: PathBuf },
}

/// Errors that end a run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Usage(#[from] UsageError),

    #[error(transparent)]
    Batch(BatchError),

    #[error("Could not read audio file: {0}")]
    UnreadableInput(#[source] ConversionError),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<BatchError> for AppError {
    fn from(err: BatchError) -> Self {
        match err {
            BatchError::NoEligibleFiles { directory } => {
                Self::Usage(UsageError::NoEligibleFiles { directory })
            }
            other => Self::Batch(other),
        }
    }
}

impl AppError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(UsageError::MissingEncodingArgument)
            | Self::Usage(UsageError::NoEligibleFiles { .. }) => 2,
            _ => 1,
        }
    }
}
