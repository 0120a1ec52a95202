//! Batch scheduler implementation.

use chrono::Utc;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::codec::{AudioCodec, Encoding};
use crate::task::{ConversionTask, FileReport};

use super::error::BatchError;
use super::pool::WorkerPoolConfig;
use super::scan::scan_eligible_files;
use super::types::{BatchProgress, BatchReport};

/// Converts every eligible file in a directory on a fixed-width pool.
///
/// One task is spawned per file; a semaphore sized by
/// [`WorkerPoolConfig::for_batch`] bounds how many run at once. A failing
/// or panicking file never stops the others, and the report always holds
/// one entry per eligible file.
pub struct BatchScheduler<C: AudioCodec + ?Sized> {
    task: ConversionTask<C>,
    progress_tx: Option<mpsc::Sender<BatchProgress>>,
}

impl<C: AudioCodec + ?Sized + 'static> BatchScheduler<C> {
    /// Creates a scheduler sharing `codec` across all workers.
    pub fn new(codec: Arc<C>) -> Self {
        Self {
            task: ConversionTask::new(codec),
            progress_tx: None,
        }
    }

    /// Sends progress notifications to `tx`.
    ///
    /// Notifications are dropped when the channel is full; the batch never
    /// waits on the receiver.
    pub fn with_progress(mut self, tx: mpsc::Sender<BatchProgress>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    /// Scans `directory` and converts every eligible file to each encoding.
    ///
    /// Returns [`BatchError::NoEligibleFiles`] without dispatching anything
    /// when the scan comes back empty.
    pub async fn run_batch(
        &self,
        directory: &Path,
        encodings: &[Encoding],
    ) -> Result<BatchReport, BatchError> {
        let files = scan_eligible_files(directory).await?;
        if files.is_empty() {
            return Err(BatchError::NoEligibleFiles {
                directory: directory.to_path_buf(),
            });
        }

        Ok(self.run_files(directory, files, encodings).await)
    }

    /// Converts an already enumerated list of files.
    pub async fn run_files(
        &self,
        directory: &Path,
        files: Vec<PathBuf>,
        encodings: &[Encoding],
    ) -> BatchReport {
        let batch_id = Uuid::new_v4();
        let started_at = Utc::now();
        let start = Instant::now();
        let total = files.len();
        let pool = WorkerPoolConfig::for_batch(total);

        info!(
            batch_id = %batch_id,
            directory = %directory.display(),
            files = total,
            width = pool.width,
            encodings = ?encodings,
            "Starting batch"
        );
        self.notify(BatchProgress::Started {
            batch_id,
            total,
            width: pool.width,
        });

        let semaphore = Arc::new(Semaphore::new(pool.width));
        let mut join_set = JoinSet::new();

        for path in files.iter().cloned() {
            let task = self.task.clone();
            let semaphore = Arc::clone(&semaphore);
            let encodings = encodings.to_vec();

            join_set.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return FileReport::input_failed(path, "Worker pool closed", 0),
                };

                let file_start = Instant::now();
                let outcome = AssertUnwindSafe(task.run(&path, &encodings))
                    .catch_unwind()
                    .await;

                match outcome {
                    Ok(report) => report,
                    Err(panic) => {
                        let message = panic_message(panic.as_ref());
                        warn!(input = %path.display(), panic = %message, "Conversion task panicked");
                        FileReport::input_failed(
                            path,
                            format!("Conversion task panicked: {}", message),
                            file_start.elapsed().as_millis() as u64,
                        )
                    }
                }
            });
        }

        let mut reports = Vec::with_capacity(total);
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(report) => {
                    self.notify(BatchProgress::FileCompleted {
                        path: report.input_path.clone(),
                        succeeded: report.succeeded(),
                        failed: report.failed(),
                        completed: reports.len() + 1,
                        total,
                    });
                    reports.push(report);
                }
                Err(e) => warn!(batch_id = %batch_id, error = %e, "Conversion task did not complete"),
            }
        }

        // A task that never returned still owes its file an entry
        if reports.len() < total {
            let missing: Vec<PathBuf> = files
                .into_iter()
                .filter(|path| !reports.iter().any(|r| &r.input_path == path))
                .collect();
            for path in missing {
                reports.push(FileReport::input_failed(
                    path,
                    "Conversion task did not complete",
                    0,
                ));
            }
        }

        let elapsed_ms = start.elapsed().as_millis() as u64;
        let report = BatchReport {
            batch_id,
            started_at,
            directory: directory.to_path_buf(),
            encodings: encodings.to_vec(),
            pool_width: pool.width,
            elapsed_ms,
            files: reports,
        };

        info!(
            batch_id = %batch_id,
            files = report.file_count(),
            succeeded = report.succeeded(),
            failed = report.failed(),
            elapsed_ms,
            "Batch finished"
        );
        self.notify(BatchProgress::Finished {
            batch_id,
            elapsed_ms,
        });

        report
    }

    fn notify(&self, progress: BatchProgress) {
        if let Some(ref tx) = self.progress_tx {
            if let Err(e) = tx.try_send(progress) {
                debug!(error = %e, "Dropped batch progress notification");
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{SourceFormat, TargetFormat};
    use crate::testing::MockCodec;
    use std::collections::HashSet;
    use std::time::Duration;
    use tempfile::TempDir;

    fn populate(dir: &Path, names: &[&str]) {
        for name in names {
            std::fs::write(dir.join(name), b"audio").unwrap();
        }
    }

    #[tokio::test]
    async fn test_every_file_gets_a_report() {
        let dir = TempDir::new().unwrap();
        let names: Vec<String> = (0..13).map(|i| format!("track{:02}.wav", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        populate(dir.path(), &refs);
        let codec = Arc::new(MockCodec::new());

        let report = BatchScheduler::new(Arc::clone(&codec))
            .run_batch(dir.path(), &[Encoding::Mp3])
            .await
            .unwrap();

        assert_eq!(report.pool_width, 8);
        assert_eq!(report.file_count(), 13);
        assert_eq!(report.succeeded(), 13);
        let inputs: HashSet<_> = report.files.iter().map(|f| f.input_path.clone()).collect();
        assert_eq!(inputs.len(), 13);
        assert_eq!(codec.decode_count().await, 13);
    }

    #[tokio::test]
    async fn test_failures_do_not_abort_batch() {
        let dir = TempDir::new().unwrap();
        populate(dir.path(), &["bad.mp3", "one.wav", "two.wav"]);
        let codec = Arc::new(MockCodec::new());
        codec.fail_decode(SourceFormat::Mp3).await;

        let report = BatchScheduler::new(codec)
            .run_batch(dir.path(), &[Encoding::Aif])
            .await
            .unwrap();

        assert_eq!(report.file_count(), 3);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.succeeded(), 2);
        assert!(dir.path().join("one.aiff").exists());
        assert!(dir.path().join("two.aiff").exists());
    }

    #[tokio::test]
    async fn test_empty_directory_dispatches_nothing() {
        let dir = TempDir::new().unwrap();
        populate(dir.path(), &["readme.txt"]);
        let codec = Arc::new(MockCodec::new());

        let result = BatchScheduler::new(Arc::clone(&codec))
            .run_batch(dir.path(), &[Encoding::Wav])
            .await;

        assert!(matches!(result, Err(BatchError::NoEligibleFiles { .. })));
        assert_eq!(codec.decode_count().await, 0);
    }

    #[tokio::test]
    async fn test_concurrency_bounded_by_pool_width() {
        let dir = TempDir::new().unwrap();
        let names: Vec<String> = (0..12).map(|i| format!("f{}.wav", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        populate(dir.path(), &refs);
        let codec = Arc::new(MockCodec::new());
        codec.set_delay(Duration::from_millis(30)).await;

        let report = BatchScheduler::new(Arc::clone(&codec))
            .run_batch(dir.path(), &[Encoding::Wav])
            .await
            .unwrap();

        assert_eq!(report.pool_width, 8);
        let peak = codec.peak_concurrency();
        assert!(peak <= 8, "peak concurrency {} exceeded width", peak);
        assert!(peak > 1, "files never overlapped");
    }

    #[tokio::test]
    async fn test_panicking_file_becomes_failure() {
        let dir = TempDir::new().unwrap();
        populate(dir.path(), &["boom.aiff", "fine.wav"]);
        let codec = Arc::new(MockCodec::new());
        codec.panic_on_decode(SourceFormat::Aiff).await;

        let report = BatchScheduler::new(codec)
            .run_batch(dir.path(), &[Encoding::Wav])
            .await
            .unwrap();

        assert_eq!(report.file_count(), 2);
        let boom = report
            .files
            .iter()
            .find(|f| f.input_path.ends_with("boom.aiff"))
            .unwrap();
        assert!(boom.results[0].error().unwrap().contains("panicked"));
        assert_eq!(report.succeeded(), 1);
    }

    #[tokio::test]
    async fn test_encode_failure_is_per_encoding() {
        let dir = TempDir::new().unwrap();
        populate(dir.path(), &["a.wav"]);
        let codec = Arc::new(MockCodec::new());
        codec.fail_encode(TargetFormat::Mp3).await;

        let report = BatchScheduler::new(codec)
            .run_batch(dir.path(), &[Encoding::Mp3, Encoding::Aiff])
            .await
            .unwrap();

        assert_eq!(report.files[0].results.len(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.files_fully_converted(), 0);
    }

    #[tokio::test]
    async fn test_progress_notifications() {
        let dir = TempDir::new().unwrap();
        populate(dir.path(), &["a.wav", "b.mp3"]);
        let (tx, mut rx) = mpsc::channel(16);

        let report = BatchScheduler::new(Arc::new(MockCodec::new()))
            .with_progress(tx)
            .run_batch(dir.path(), &[Encoding::Wav])
            .await
            .unwrap();

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }

        assert_eq!(events.len(), 4);
        assert_eq!(
            events[0],
            BatchProgress::Started {
                batch_id: report.batch_id,
                total: 2,
                width: 5
            }
        );
        assert!(matches!(
            events[2],
            BatchProgress::FileCompleted {
                completed: 2,
                total: 2,
                ..
            }
        ));
        assert_eq!(
            events[3],
            BatchProgress::Finished {
                batch_id: report.batch_id,
                elapsed_ms: report.elapsed_ms
            }
        );
    }
}
