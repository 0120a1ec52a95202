//! Types for the codec module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use super::error::CodecError;

/// File extensions accepted as conversion input, lowercase.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "wav", "aif", "aiff"];

/// Decoded PCM audio.
///
/// Samples are interleaved, little-endian, signed, `sample_width` bytes each.
/// The buffer is immutable once built; share it between concurrent encodes
/// behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBuffer {
    sample_rate: u32,
    sample_width: u16,
    channels: u16,
    data: Vec<u8>,
}

impl AudioBuffer {
    /// Builds a buffer, validating the header fields against the payload.
    pub fn new(
        sample_rate: u32,
        sample_width: u16,
        channels: u16,
        data: Vec<u8>,
    ) -> Result<Self, CodecError> {
        if sample_rate == 0 {
            return Err(CodecError::invalid_buffer("sample rate must be positive"));
        }
        if !(1..=4).contains(&sample_width) {
            return Err(CodecError::invalid_buffer(format!(
                "sample width must be 1-4 bytes, got {}",
                sample_width
            )));
        }
        if channels == 0 {
            return Err(CodecError::invalid_buffer("channel count must be positive"));
        }
        let frame_size = sample_width as usize * channels as usize;
        if data.len() % frame_size != 0 {
            return Err(CodecError::invalid_buffer(format!(
                "payload of {} bytes is not a whole number of {}-byte frames",
                data.len(),
                frame_size
            )));
        }

        Ok(Self {
            sample_rate,
            sample_width,
            channels,
            data,
        })
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Bytes per sample.
    pub fn sample_width(&self) -> u16 {
        self.sample_width
    }

    /// Bits per sample.
    pub fn bits_per_sample(&self) -> u16 {
        self.sample_width * 8
    }

    /// Number of interleaved channels.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Raw interleaved payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Bytes per frame (one sample for every channel).
    pub fn frame_size(&self) -> usize {
        self.sample_width as usize * self.channels as usize
    }

    /// Number of frames in the payload.
    pub fn frame_count(&self) -> usize {
        self.data.len() / self.frame_size()
    }

    /// Playback duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }
}

/// Input container formats, recognised by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    /// MPEG Audio Layer III
    Mp3,
    /// RIFF WAVE
    Wav,
    /// Audio Interchange File Format (`.aif` or `.aiff`)
    Aiff,
}

impl SourceFormat {
    /// Maps an extension (without dot, any case) to a source format.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "mp3" => Some(Self::Mp3),
            "wav" => Some(Self::Wav),
            "aif" | "aiff" => Some(Self::Aiff),
            _ => None,
        }
    }

    /// Recognises the format of a path from its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Canonical extension, used as a probe hint.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Aiff => "aiff",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Output container formats a codec can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetFormat {
    /// RIFF WAVE, integer PCM
    Wav,
    /// AIFF, big-endian PCM
    Aiff,
    /// MPEG Audio Layer III
    Mp3,
}

impl TargetFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Aiff => "aiff",
            Self::Mp3 => "mp3",
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A requested target encoding, as the user named it.
///
/// `aif` and `aiff` produce the same container and the same `.aiff`
/// extension; the distinction only survives for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    Wav,
    Aif,
    Aiff,
    Mp3,
}

impl Encoding {
    /// The identifier as requested.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Aif => "aif",
            Self::Aiff => "aiff",
            Self::Mp3 => "mp3",
        }
    }

    /// Container the encoding is written as.
    pub fn target_format(&self) -> TargetFormat {
        match self {
            Self::Wav => TargetFormat::Wav,
            Self::Aif | Self::Aiff => TargetFormat::Aiff,
            Self::Mp3 => TargetFormat::Mp3,
        }
    }

    /// Extension used for output paths (`aif` is normalised to `aiff`).
    pub fn extension(&self) -> &'static str {
        self.target_format().extension()
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encoding {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wav" => Ok(Self::Wav),
            "aif" => Ok(Self::Aif),
            "aiff" => Ok(Self::Aiff),
            "mp3" => Ok(Self::Mp3),
            other => Err(CodecError::unsupported(other)),
        }
    }
}
