//! MP3 encoding through an external ffmpeg process.

use std::process::Stdio;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use super::config::CodecConfig;
use super::error::CodecError;
use super::types::AudioBuffer;

const LABEL: &str = "mp3";

/// Pipes raw PCM into `ffmpeg -c:a libmp3lame` and collects the MP3 stream.
#[derive(Debug, Clone)]
pub struct FfmpegMp3Encoder {
    config: CodecConfig,
}

impl FfmpegMp3Encoder {
    /// Creates a new encoder with the given configuration.
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Raw PCM demuxer name matching the buffer layout.
    fn raw_format(sample_width: u16) -> &'static str {
        match sample_width {
            1 => "s8",
            3 => "s24le",
            4 => "s32le",
            _ => "s16le",
        }
    }

    /// Builds ffmpeg arguments for a stdin-to-stdout MP3 encode.
    fn build_args(&self, buffer: &AudioBuffer) -> Vec<String> {
        vec![
            "-hide_banner".to_string(),
            "-nostdin".to_string(),
            "-loglevel".to_string(),
            self.config.ffmpeg_log_level.clone(),
            "-f".to_string(),
            Self::raw_format(buffer.sample_width()).to_string(),
            "-ar".to_string(),
            buffer.sample_rate().to_string(),
            "-ac".to_string(),
            buffer.channels().to_string(),
            "-i".to_string(),
            "pipe:0".to_string(),
            "-c:a".to_string(),
            "libmp3lame".to_string(),
            "-b:a".to_string(),
            format!("{}k", self.config.mp3_bitrate_kbps),
            "-f".to_string(),
            "mp3".to_string(),
            "pipe:1".to_string(),
        ]
    }

    /// Encodes the buffer, returning the MP3 bytes.
    pub async fn encode(&self, buffer: Arc<AudioBuffer>) -> Result<Vec<u8>, CodecError> {
        let args = self.build_args(&buffer);
        debug!(ffmpeg = %self.config.ffmpeg_path.display(), ?args, "Spawning MP3 encoder");

        let mut child = Command::new(&self.config.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CodecError::EncoderNotFound {
                        path: self.config.ffmpeg_path.clone(),
                    }
                } else {
                    CodecError::Io(e)
                }
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| CodecError::encode_failed(LABEL, "encoder stdin not captured", None))?;

        // Feed stdin concurrently so a full stdout pipe cannot deadlock us
        let input = Arc::clone(&buffer);
        let feeder = tokio::spawn(async move {
            stdin.write_all(input.data()).await?;
            stdin.shutdown().await
        });

        let output = child.wait_with_output().await?;

        match feeder.await {
            Ok(Ok(())) => {}
            // ffmpeg closed its input early; the exit status tells the story
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
            Ok(Err(e)) => return Err(CodecError::Io(e)),
            Err(e) => return Err(CodecError::encode_failed(LABEL, e, None)),
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(CodecError::encode_failed(
                LABEL,
                format!("ffmpeg exited with code: {:?}", output.status.code()),
                if stderr.is_empty() { None } else { Some(stderr) },
            ));
        }
        if output.stdout.is_empty() {
            return Err(CodecError::encode_failed(LABEL, "encoder produced no output", None));
        }

        Ok(output.stdout)
    }

    /// Checks that the ffmpeg binary can be executed.
    pub async fn validate(&self) -> Result<(), CodecError> {
        let result = Command::new(&self.config.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match result {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => Err(CodecError::encode_failed(
                LABEL,
                format!("ffmpeg -version exited with code: {:?}", status.code()),
                None,
            )),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(CodecError::EncoderNotFound {
                path: self.config.ffmpeg_path.clone(),
            }),
            Err(e) => Err(CodecError::Io(e)),
        }
    }
}
