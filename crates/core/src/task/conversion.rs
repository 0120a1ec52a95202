//! Conversion of one input file into every requested encoding.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::codec::{AudioBuffer, AudioCodec, Encoding, SourceFormat};
use crate::naming::resolve_output_path;

use super::error::ConversionError;
use super::types::{ConversionRequest, ConversionResult, FileReport};

/// Converts a single input file through a shared codec.
///
/// Never deletes or modifies the input. Outputs are written next to it.
pub struct ConversionTask<C: AudioCodec + ?Sized> {
    codec: Arc<C>,
}

impl<C: AudioCodec + ?Sized> Clone for ConversionTask<C> {
    fn clone(&self) -> Self {
        Self {
            codec: Arc::clone(&self.codec),
        }
    }
}

impl<C: AudioCodec + ?Sized> ConversionTask<C> {
    /// Creates a task runner over the given codec.
    pub fn new(codec: Arc<C>) -> Self {
        Self { codec }
    }

    /// Decodes `input` and writes one output per encoding.
    ///
    /// Input failures (unknown extension, unreadable file, decode error)
    /// produce a report with a single failed entry. Encode failures only
    /// affect their own encoding. Encodings run in order so duplicates
    /// resolve to distinct names.
    pub async fn run(&self, input: &Path, encodings: &[Encoding]) -> FileReport {
        let start = Instant::now();
        let request = ConversionRequest::new(input, encodings.to_vec());

        let buffer = match self.load(&request.input_path).await {
            Ok(buffer) => buffer,
            Err(e) => {
                warn!(
                    input = %request.input_path.display(),
                    error = %e,
                    "Skipping input"
                );
                return FileReport::input_failed(
                    request.input_path,
                    e.to_string(),
                    start.elapsed().as_millis() as u64,
                );
            }
        };

        let mut results = Vec::with_capacity(request.encodings.len());
        for &encoding in &request.encodings {
            let result = self
                .convert_buffer(
                    Arc::clone(&buffer),
                    &request.directory,
                    &request.base_name,
                    encoding,
                )
                .await;
            results.push(result);
        }

        FileReport {
            input_path: request.input_path,
            results,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Reads and decodes an input file.
    pub async fn load(&self, input: &Path) -> Result<Arc<AudioBuffer>, ConversionError> {
        let format =
            SourceFormat::from_path(input).ok_or_else(|| ConversionError::UnsupportedFormat {
                extension: input
                    .extension()
                    .map(|e| e.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            })?;

        let bytes = tokio::fs::read(input)
            .await
            .map_err(|source| ConversionError::Read {
                path: input.to_path_buf(),
                source,
            })?;

        let buffer = self
            .codec
            .decode(bytes, format)
            .await
            .map_err(|source| ConversionError::Decode {
                path: input.to_path_buf(),
                source,
            })?;

        debug!(
            input = %input.display(),
            format = %format,
            sample_rate = buffer.sample_rate(),
            sample_width = buffer.sample_width(),
            channels = buffer.channels(),
            frames = buffer.frame_count(),
            "Decoded input"
        );

        Ok(Arc::new(buffer))
    }

    /// Writes one encoding of an already decoded buffer into `directory`.
    pub async fn convert_buffer(
        &self,
        buffer: Arc<AudioBuffer>,
        directory: &Path,
        base_name: &str,
        encoding: Encoding,
    ) -> ConversionResult {
        match self.export(buffer, directory, base_name, encoding).await {
            Ok((path, size_bytes)) => {
                info!(
                    output = %path.display(),
                    encoding = %encoding,
                    size_bytes,
                    "Wrote output"
                );
                ConversionResult::converted(encoding, path, size_bytes)
            }
            Err(e) => {
                warn!(
                    directory = %directory.display(),
                    base_name,
                    encoding = %encoding,
                    error = %e,
                    "Conversion failed"
                );
                ConversionResult::failed(Some(encoding), &e)
            }
        }
    }

    async fn export(
        &self,
        buffer: Arc<AudioBuffer>,
        directory: &Path,
        base_name: &str,
        encoding: Encoding,
    ) -> Result<(std::path::PathBuf, u64), ConversionError> {
        let path = resolve_output_path(directory, base_name, encoding.extension());

        self.codec
            .export(buffer, encoding.target_format(), &path)
            .await
            .map_err(|source| ConversionError::Encode { encoding, source })?;

        let size_bytes = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta.len(),
            Err(_) => return Err(ConversionError::OutputMissing { path }),
        };

        Ok((path, size_bytes))
    }
}
