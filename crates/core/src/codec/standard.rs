//! The codec used by the command-line tool.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

use super::aiff::write_aiff;
use super::config::CodecConfig;
use super::demux::decode_container;
use super::error::CodecError;
use super::ffmpeg::FfmpegMp3Encoder;
use super::traits::AudioCodec;
use super::types::{AudioBuffer, SourceFormat, TargetFormat};
use super::wav::{read_wav, write_wav};

/// WAV and AIFF handled in-process, MP3 decoded with symphonia and
/// encoded by ffmpeg.
#[derive(Debug, Clone)]
pub struct StandardCodec {
    config: CodecConfig,
    mp3_encoder: FfmpegMp3Encoder,
}

impl StandardCodec {
    /// Creates a new codec with the given configuration.
    pub fn new(config: CodecConfig) -> Self {
        let mp3_encoder = FfmpegMp3Encoder::new(config.clone());
        Self {
            config,
            mp3_encoder,
        }
    }

    /// Creates a codec with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(CodecConfig::default())
    }
}

/// Runs CPU-bound codec work off the async worker threads.
async fn run_blocking<T, F>(work: F) -> Result<T, CodecError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, CodecError> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| CodecError::Io(std::io::Error::other(format!("codec worker failed: {}", e))))?
}

#[async_trait]
impl AudioCodec for StandardCodec {
    fn name(&self) -> &str {
        "standard"
    }

    async fn decode(
        &self,
        bytes: Vec<u8>,
        format: SourceFormat,
    ) -> Result<AudioBuffer, CodecError> {
        match format {
            SourceFormat::Wav => run_blocking(move || read_wav(&bytes)).await,
            SourceFormat::Mp3 | SourceFormat::Aiff => {
                run_blocking(move || decode_container(bytes, format)).await
            }
        }
    }

    async fn encode(
        &self,
        buffer: Arc<AudioBuffer>,
        format: TargetFormat,
    ) -> Result<Vec<u8>, CodecError> {
        match format {
            TargetFormat::Wav => run_blocking(move || write_wav(&buffer)).await,
            TargetFormat::Aiff => run_blocking(move || write_aiff(&buffer)).await,
            TargetFormat::Mp3 => self.mp3_encoder.encode(buffer).await,
        }
    }

    async fn validate(&self) -> Result<(), CodecError> {
        self.mp3_encoder.validate().await
    }

    fn temp_dir(&self) -> PathBuf {
        self.config.temp_dir.clone()
    }
}
