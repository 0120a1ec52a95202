//! Output size estimation for the interactive single-file flow.

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::codec::{AudioBuffer, AudioCodec, Encoding};

/// Bytes in one reported megabyte.
const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;

/// Estimated output size for one encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeEstimate {
    /// Encoding the estimate is for.
    pub encoding: Encoding,
    /// Size in bytes, or why it could not be measured.
    pub bytes: Result<u64, String>,
}

impl SizeEstimate {
    /// Size in megabytes (1 MB = 1024 * 1024 bytes).
    pub fn megabytes(&self) -> Option<f64> {
        self.bytes
            .as_ref()
            .ok()
            .map(|&bytes| bytes as f64 / BYTES_PER_MEGABYTE)
    }
}

/// Measures the exported size of `buffer` in every encoding.
///
/// Each encoding is measured in its own task; all are awaited before
/// returning. The result is in the order of `encodings`.
pub async fn estimate_sizes<C>(
    codec: Arc<C>,
    buffer: Arc<AudioBuffer>,
    encodings: &[Encoding],
) -> Vec<SizeEstimate>
where
    C: AudioCodec + ?Sized + 'static,
{
    let handles = encodings.iter().map(|&encoding| {
        let codec = Arc::clone(&codec);
        let buffer = Arc::clone(&buffer);
        tokio::spawn(async move {
            codec
                .estimated_size(buffer, encoding.target_format())
                .await
                .map_err(|e| e.to_string())
        })
    });

    join_all(handles)
        .await
        .into_iter()
        .zip(encodings)
        .map(|(joined, &encoding)| {
            let bytes = joined.unwrap_or_else(|e| Err(format!("estimate task failed: {}", e)));
            if let Err(ref error) = bytes {
                warn!(encoding = %encoding, error = %error, "Size estimate failed");
            }
            SizeEstimate { encoding, bytes }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::TargetFormat;
    use crate::testing::MockCodec;
    use tempfile::TempDir;

    #[test]
    fn test_megabytes() {
        let estimate = SizeEstimate {
            encoding: Encoding::Wav,
            bytes: Ok(1_572_864),
        };
        assert_eq!(estimate.megabytes(), Some(1.5));

        let failed = SizeEstimate {
            encoding: Encoding::Mp3,
            bytes: Err("no encoder".to_string()),
        };
        assert_eq!(failed.megabytes(), None);
    }

    #[tokio::test]
    async fn test_estimates_follow_request_order() {
        let dir = TempDir::new().unwrap();
        let codec = Arc::new(MockCodec::new().with_temp_dir(dir.path()));
        codec.fail_encode(TargetFormat::Mp3).await;
        let buffer = Arc::new(AudioBuffer::new(8000, 1, 1, vec![0; 4096]).unwrap());

        let estimates = estimate_sizes(
            Arc::clone(&codec),
            buffer,
            &[Encoding::Wav, Encoding::Aif, Encoding::Mp3],
        )
        .await;

        let order: Vec<Encoding> = estimates.iter().map(|e| e.encoding).collect();
        assert_eq!(order, vec![Encoding::Wav, Encoding::Aif, Encoding::Mp3]);
        assert_eq!(estimates[0].bytes, Ok(4096));
        assert_eq!(estimates[1].bytes, Ok(4096));
        assert!(estimates[2].bytes.is_err());

        // Scratch files are gone once the estimates are back
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
