//! Codec module: the boundary between conversion logic and audio bytes.
//!
//! This module provides the `AudioCodec` trait and `StandardCodec`, the
//! implementation the command-line tool uses.
//!
//! # Formats
//!
//! - WAV: parsed structurally (header fields plus frame payload) and written in-process
//! - AIFF: decoded with symphonia, written in-process
//! - MP3: decoded with symphonia, encoded by an external ffmpeg (`libmp3lame`)
//!
//! # Example
//!
//! ```ignore
//! use convertino_core::codec::{AudioCodec, SourceFormat, StandardCodec, TargetFormat};
//!
//! let codec = StandardCodec::with_defaults();
//!
//! let bytes = tokio::fs::read("/music/take1.wav").await?;
//! let buffer = Arc::new(codec.decode(bytes, SourceFormat::Wav).await?);
//! println!("{} Hz, {} channels", buffer.sample_rate(), buffer.channels());
//!
//! codec.export(buffer, TargetFormat::Aiff, Path::new("/music/take1.aiff")).await?;
//! ```

mod aiff;
mod config;
mod demux;
mod error;
mod ffmpeg;
pub(crate) mod pcm;
mod standard;
mod traits;
mod types;
mod wav;

pub use config::CodecConfig;
pub use error::CodecError;
pub use ffmpeg::FfmpegMp3Encoder;
pub use standard::StandardCodec;
pub use traits::AudioCodec;
pub use types::{AudioBuffer, Encoding, SourceFormat, TargetFormat, SUPPORTED_EXTENSIONS};
pub use wav::{read_wav, write_wav};
