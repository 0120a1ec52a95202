//! Types for the task module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::codec::Encoding;

use super::error::ConversionError;

/// One input file and the encodings requested for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    /// Input file path.
    pub input_path: PathBuf,
    /// Directory outputs are written to (the input's directory).
    pub directory: PathBuf,
    /// File name without its last extension.
    pub base_name: String,
    /// Requested encodings, in order. Duplicates are converted independently.
    pub encodings: Vec<Encoding>,
}

impl ConversionRequest {
    /// Derives directory and base name from the input path.
    pub fn new(input_path: impl Into<PathBuf>, encodings: Vec<Encoding>) -> Self {
        let input_path = input_path.into();
        let directory = input_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let base_name = input_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            input_path,
            directory,
            base_name,
            encodings,
        }
    }
}

/// Outcome of one target encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConversionOutcome {
    /// Output written.
    Converted {
        /// Final output path.
        path: PathBuf,
        /// Size on disk in bytes.
        size_bytes: u64,
    },
    /// Conversion failed.
    Failed {
        /// Human-readable description.
        error: String,
    },
}

/// Result for one requested encoding of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Encoding as requested; `None` when the input itself failed.
    pub encoding: Option<Encoding>,
    /// What happened.
    pub outcome: ConversionOutcome,
}

impl ConversionResult {
    /// Creates a success result.
    pub fn converted(encoding: Encoding, path: PathBuf, size_bytes: u64) -> Self {
        Self {
            encoding: Some(encoding),
            outcome: ConversionOutcome::Converted { path, size_bytes },
        }
    }

    /// Creates a failure result.
    pub fn failed(encoding: Option<Encoding>, error: &ConversionError) -> Self {
        Self::failed_with_message(encoding, error.to_string())
    }

    /// Creates a failure result from a plain message.
    pub fn failed_with_message(encoding: Option<Encoding>, error: impl Into<String>) -> Self {
        Self {
            encoding,
            outcome: ConversionOutcome::Failed {
                error: error.into(),
            },
        }
    }

    /// Whether the output was written.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ConversionOutcome::Converted { .. })
    }

    /// Output path, for successful results.
    pub fn output_path(&self) -> Option<&Path> {
        match &self.outcome {
            ConversionOutcome::Converted { path, .. } => Some(path),
            ConversionOutcome::Failed { .. } => None,
        }
    }

    /// Error description, for failed results.
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            ConversionOutcome::Converted { .. } => None,
            ConversionOutcome::Failed { error } => Some(error),
        }
    }
}

/// Everything that happened to one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    /// Input file path.
    pub input_path: PathBuf,
    /// One entry per requested encoding, or a single failure if the input
    /// could not be read.
    pub results: Vec<ConversionResult>,
    /// Time spent on this file in milliseconds.
    pub duration_ms: u64,
}

impl FileReport {
    /// A report for a file that failed before any encoding.
    pub fn input_failed(
        input_path: impl Into<PathBuf>,
        error: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            results: vec![ConversionResult::failed_with_message(None, error)],
            duration_ms,
        }
    }

    /// Number of outputs written.
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    /// Number of failure entries.
    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    /// Whether every requested encoding was written.
    pub fn is_complete_success(&self) -> bool {
        !self.results.is_empty() && self.failed() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_derives_directory_and_base_name() {
        let request = ConversionRequest::new("/music/live/set.01.wav", vec![Encoding::Mp3]);
        assert_eq!(request.directory, PathBuf::from("/music/live"));
        assert_eq!(request.base_name, "set.01");
        assert_eq!(request.encodings, vec![Encoding::Mp3]);
    }

    #[test]
    fn test_request_with_bare_file_name() {
        let request = ConversionRequest::new("take.aif", vec![]);
        assert_eq!(request.directory, PathBuf::new());
        assert_eq!(request.base_name, "take");
    }

    #[test]
    fn test_file_report_counts() {
        let report = FileReport {
            input_path: PathBuf::from("a.wav"),
            results: vec![
                ConversionResult::converted(Encoding::Mp3, PathBuf::from("a.mp3"), 10),
                ConversionResult::failed_with_message(Some(Encoding::Aif), "boom"),
            ],
            duration_ms: 5,
        };
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_complete_success());
        assert_eq!(report.results[0].output_path(), Some(Path::new("a.mp3")));
        assert_eq!(report.results[1].error(), Some("boom"));
    }

    #[test]
    fn test_input_failure_has_single_entry() {
        let report = FileReport::input_failed("x.mp3", "corrupt", 1);
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].encoding, None);
        assert_eq!(report.failed(), 1);
    }

    #[test]
    fn test_outcome_serialization() {
        let result = ConversionResult::converted(Encoding::Aif, PathBuf::from("a.aiff"), 42);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["encoding"], "aif");
        assert_eq!(json["outcome"]["status"], "converted");
        assert_eq!(json["outcome"]["size_bytes"], 42);
    }
}
