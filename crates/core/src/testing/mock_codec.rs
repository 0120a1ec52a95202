//! Mock codec for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::codec::{AudioBuffer, AudioCodec, CodecError, SourceFormat, TargetFormat};

/// Mock implementation of the AudioCodec trait.
///
/// Provides controllable behavior for testing:
/// - Record decode and encode calls for assertions
/// - Fail or panic on chosen formats
/// - Hold each decode for a fixed delay and track how many overlap
///
/// Decoding yields an 8 kHz, 8-bit mono buffer whose payload is the input
/// bytes; encoding returns the payload unchanged.
///
/// # Example
///
/// ```rust,ignore
/// use convertino_core::testing::MockCodec;
///
/// let codec = Arc::new(MockCodec::new());
/// codec.fail_decode(SourceFormat::Mp3).await;
/// codec.set_delay(Duration::from_millis(20)).await;
///
/// let report = BatchScheduler::new(Arc::clone(&codec))
///     .run_batch(dir, &[Encoding::Wav])
///     .await?;
///
/// assert!(codec.peak_concurrency() <= report.pool_width);
/// ```
#[derive(Debug)]
pub struct MockCodec {
    /// Recorded decode calls.
    decodes: RwLock<Vec<SourceFormat>>,
    /// Recorded encode calls.
    encodes: RwLock<Vec<TargetFormat>>,
    /// Source formats whose decode returns an error.
    failing_decodes: RwLock<HashSet<SourceFormat>>,
    /// Source formats whose decode panics.
    panicking_decodes: RwLock<HashSet<SourceFormat>>,
    /// Target formats whose encode returns an error.
    failing_encodes: RwLock<HashSet<TargetFormat>>,
    /// Simulated decode duration in milliseconds.
    delay_ms: RwLock<u64>,
    /// Decodes currently in progress.
    active: Arc<AtomicUsize>,
    /// Highest number of overlapping decodes seen.
    peak: Arc<AtomicUsize>,
    /// Scratch directory for size estimates.
    temp_dir: PathBuf,
}

impl Default for MockCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCodec {
    /// Create a new mock codec.
    pub fn new() -> Self {
        Self {
            decodes: RwLock::new(Vec::new()),
            encodes: RwLock::new(Vec::new()),
            failing_decodes: RwLock::new(HashSet::new()),
            panicking_decodes: RwLock::new(HashSet::new()),
            failing_encodes: RwLock::new(HashSet::new()),
            delay_ms: RwLock::new(0),
            active: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
            temp_dir: std::env::temp_dir().join("convertino-mock"),
        }
    }

    /// Use `dir` for size estimate scratch files.
    pub fn with_temp_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.temp_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Make every decode of `format` fail.
    pub async fn fail_decode(&self, format: SourceFormat) {
        self.failing_decodes.write().await.insert(format);
    }

    /// Make every decode of `format` panic.
    pub async fn panic_on_decode(&self, format: SourceFormat) {
        self.panicking_decodes.write().await.insert(format);
    }

    /// Make every encode to `format` fail.
    pub async fn fail_encode(&self, format: TargetFormat) {
        self.failing_encodes.write().await.insert(format);
    }

    /// Set the simulated decode duration.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay_ms.write().await = delay.as_millis() as u64;
    }

    /// Formats passed to decode, in call order.
    pub async fn recorded_decodes(&self) -> Vec<SourceFormat> {
        self.decodes.read().await.clone()
    }

    /// Formats passed to encode, in call order.
    pub async fn recorded_encodes(&self) -> Vec<TargetFormat> {
        self.encodes.read().await.clone()
    }

    /// Number of decode calls.
    pub async fn decode_count(&self) -> usize {
        self.decodes.read().await.len()
    }

    /// Number of encode calls.
    pub async fn encode_count(&self) -> usize {
        self.encodes.read().await.len()
    }

    /// Highest number of decodes that were in progress at the same time.
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// Decrements the active counter when a decode ends.
struct ActiveGuard(Arc<AtomicUsize>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl AudioCodec for MockCodec {
    fn name(&self) -> &str {
        "mock"
    }

    async fn decode(
        &self,
        bytes: Vec<u8>,
        format: SourceFormat,
    ) -> Result<AudioBuffer, CodecError> {
        self.decodes.write().await.push(format);

        let should_panic = self.panicking_decodes.read().await.contains(&format);
        if should_panic {
            panic!("mock decode panic for {}", format);
        }

        let current = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = ActiveGuard(Arc::clone(&self.active));
        self.peak.fetch_max(current, Ordering::SeqCst);

        let delay_ms = *self.delay_ms.read().await;
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }

        if self.failing_decodes.read().await.contains(&format) {
            return Err(CodecError::decode_failed(
                format.extension(),
                "mock decode failure",
            ));
        }

        AudioBuffer::new(8000, 1, 1, bytes)
    }

    async fn encode(
        &self,
        buffer: Arc<AudioBuffer>,
        format: TargetFormat,
    ) -> Result<Vec<u8>, CodecError> {
        self.encodes.write().await.push(format);

        if self.failing_encodes.read().await.contains(&format) {
            return Err(CodecError::encode_failed(
                format.extension(),
                "mock encode failure",
                None,
            ));
        }

        Ok(buffer.data().to_vec())
    }

    fn temp_dir(&self) -> PathBuf {
        self.temp_dir.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_calls_and_injects_failures() {
        let codec = MockCodec::new();
        codec.fail_decode(SourceFormat::Mp3).await;
        codec.fail_encode(TargetFormat::Aiff).await;

        let buffer = codec.decode(vec![1, 2, 3], SourceFormat::Wav).await.unwrap();
        assert_eq!(buffer.data(), &[1, 2, 3]);
        assert!(codec.decode(vec![1], SourceFormat::Mp3).await.is_err());

        let buffer = Arc::new(buffer);
        assert!(codec
            .encode(Arc::clone(&buffer), TargetFormat::Wav)
            .await
            .is_ok());
        assert!(codec.encode(buffer, TargetFormat::Aiff).await.is_err());

        assert_eq!(
            codec.recorded_decodes().await,
            vec![SourceFormat::Wav, SourceFormat::Mp3]
        );
        assert_eq!(
            codec.recorded_encodes().await,
            vec![TargetFormat::Wav, TargetFormat::Aiff]
        );
        assert_eq!(codec.peak_concurrency(), 1);
    }
}
