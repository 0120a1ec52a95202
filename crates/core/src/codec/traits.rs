//! Trait definitions for the codec module.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use super::error::CodecError;
use super::types::{AudioBuffer, SourceFormat, TargetFormat};

/// A codec that turns container bytes into PCM and back.
///
/// Implementations must be safe to call concurrently: the batch scheduler
/// shares one codec across every worker, and several encodes may read the
/// same buffer at once.
#[async_trait]
pub trait AudioCodec: Send + Sync {
    /// Returns the name of this codec implementation.
    fn name(&self) -> &str;

    /// Decodes a complete file held in memory.
    async fn decode(&self, bytes: Vec<u8>, format: SourceFormat)
        -> Result<AudioBuffer, CodecError>;

    /// Encodes a buffer into the target container.
    async fn encode(
        &self,
        buffer: Arc<AudioBuffer>,
        format: TargetFormat,
    ) -> Result<Vec<u8>, CodecError>;

    /// Validates that the codec is properly configured and ready.
    async fn validate(&self) -> Result<(), CodecError> {
        Ok(())
    }

    /// Directory for scratch files created by [`AudioCodec::estimated_size`].
    fn temp_dir(&self) -> PathBuf {
        std::env::temp_dir()
    }

    /// Encodes the buffer and writes it to `path`, returning the bytes written.
    async fn export(
        &self,
        buffer: Arc<AudioBuffer>,
        format: TargetFormat,
        path: &Path,
    ) -> Result<u64, CodecError> {
        let bytes = self.encode(buffer, format).await?;
        if let Err(e) = tokio::fs::write(path, &bytes).await {
            // A partial file would claim the name for later outputs
            if let Err(remove) = tokio::fs::remove_file(path).await {
                if remove.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %path.display(), error = %remove, "Failed to remove partial output");
                }
            }
            return Err(e.into());
        }
        Ok(bytes.len() as u64)
    }

    /// Size in bytes the buffer would occupy once exported to `format`.
    ///
    /// Exports into a uniquely named scratch file, measures it and removes
    /// it before returning. A failed removal is logged, not returned.
    async fn estimated_size(
        &self,
        buffer: Arc<AudioBuffer>,
        format: TargetFormat,
    ) -> Result<u64, CodecError> {
        let dir = self.temp_dir();
        tokio::fs::create_dir_all(&dir).await?;
        let scratch = dir.join(format!("estimate-{}.{}", Uuid::new_v4(), format.extension()));

        let size = match self.export(buffer, format, &scratch).await {
            Ok(_) => tokio::fs::metadata(&scratch)
                .await
                .map(|m| m.len())
                .map_err(CodecError::from),
            Err(e) => Err(e),
        };

        match tokio::fs::remove_file(&scratch).await {
            Ok(()) => debug!(path = %scratch.display(), "Removed estimate scratch file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                path = %scratch.display(),
                error = %e,
                "Failed to remove estimate scratch file"
            ),
        }

        size
    }
}
