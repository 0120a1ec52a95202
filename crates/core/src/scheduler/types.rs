//! Types for the scheduler module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::codec::Encoding;
use crate::task::FileReport;

/// Outcome of converting every eligible file in a directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Unique id of this batch run.
    pub batch_id: Uuid,
    /// When the batch started.
    pub started_at: DateTime<Utc>,
    /// Directory that was scanned.
    pub directory: PathBuf,
    /// Encodings requested for every file.
    pub encodings: Vec<Encoding>,
    /// Number of conversion tasks allowed to run at once.
    pub pool_width: usize,
    /// Wall-clock time from dispatch to the last completion, in milliseconds.
    pub elapsed_ms: u64,
    /// One report per eligible file, in completion order.
    pub files: Vec<FileReport>,
}

impl BatchReport {
    /// Number of files in the batch.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Outputs written across all files.
    pub fn succeeded(&self) -> usize {
        self.files.iter().map(FileReport::succeeded).sum()
    }

    /// Failure entries across all files.
    pub fn failed(&self) -> usize {
        self.files.iter().map(FileReport::failed).sum()
    }

    /// Files for which every encoding was written.
    pub fn files_fully_converted(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.is_complete_success())
            .count()
    }

    /// Elapsed time in seconds.
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_ms as f64 / 1000.0
    }
}

/// Progress notifications sent while a batch runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BatchProgress {
    /// Files found and pool sized; tasks are being dispatched.
    Started {
        batch_id: Uuid,
        total: usize,
        width: usize,
    },
    /// One file finished, successfully or not.
    FileCompleted {
        path: PathBuf,
        succeeded: usize,
        failed: usize,
        completed: usize,
        total: usize,
    },
    /// Every file finished.
    Finished { batch_id: Uuid, elapsed_ms: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::ConversionResult;

    fn report(files: Vec<FileReport>) -> BatchReport {
        BatchReport {
            batch_id: Uuid::new_v4(),
            started_at: Utc::now(),
            directory: PathBuf::from("/music"),
            encodings: vec![Encoding::Mp3],
            pool_width: 5,
            elapsed_ms: 1500,
            files,
        }
    }

    #[test]
    fn test_counters() {
        let ok = FileReport {
            input_path: PathBuf::from("/music/a.wav"),
            results: vec![ConversionResult::converted(
                Encoding::Mp3,
                PathBuf::from("/music/a.mp3"),
                10,
            )],
            duration_ms: 3,
        };
        let bad = FileReport::input_failed("/music/b.mp3", "corrupt", 1);

        let batch = report(vec![ok, bad]);
        assert_eq!(batch.file_count(), 2);
        assert_eq!(batch.succeeded(), 1);
        assert_eq!(batch.failed(), 1);
        assert_eq!(batch.files_fully_converted(), 1);
        assert!((batch.elapsed_secs() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_json_shape() {
        let batch = report(vec![FileReport::input_failed("/music/b.mp3", "corrupt", 1)]);
        let json = serde_json::to_value(&batch).unwrap();

        assert_eq!(json["directory"], "/music");
        assert_eq!(json["pool_width"], 5);
        assert_eq!(json["encodings"][0], "mp3");
        assert_eq!(json["files"][0]["results"][0]["encoding"], serde_json::Value::Null);
        assert_eq!(json["files"][0]["results"][0]["outcome"]["status"], "failed");
    }
}
