//! Testing utilities: a mock codec and audio fixtures.
//!
//! # Example
//!
//! ```rust,ignore
//! use convertino_core::testing::{fixtures, MockCodec};
//!
//! fixtures::write_test_wav(&dir.join("tone.wav"), 44100, 16, 2, 4410)?;
//!
//! let codec = Arc::new(MockCodec::new());
//! codec.fail_decode(SourceFormat::Mp3).await;
//! ```

mod mock_codec;

pub use mock_codec::MockCodec;

/// Test fixtures and helper functions.
pub mod fixtures {
    use hound::{SampleFormat, WavSpec, WavWriter};
    use std::f64::consts::PI;
    use std::path::Path;

    use crate::codec::pcm;
    use crate::codec::{AudioBuffer, CodecError};

    /// Frequency of generated test tones.
    const TONE_HZ: f64 = 440.0;

    fn tone_sample(frame: usize, sample_rate: u32, bits: u16) -> i32 {
        let peak = ((1i64 << (bits - 1)) - 1) as f64;
        let t = frame as f64 / sample_rate as f64;
        ((2.0 * PI * TONE_HZ * t).sin() * peak * 0.5) as i32
    }

    /// Writes a 440 Hz integer PCM WAV file.
    pub fn write_test_wav(
        path: &Path,
        sample_rate: u32,
        bits_per_sample: u16,
        channels: u16,
        frames: usize,
    ) -> Result<(), hound::Error> {
        let spec = WavSpec {
            channels,
            sample_rate,
            bits_per_sample,
            sample_format: SampleFormat::Int,
        };

        let mut writer = WavWriter::create(path, spec)?;
        for frame in 0..frames {
            let value = tone_sample(frame, sample_rate, bits_per_sample);
            for _ in 0..channels {
                writer.write_sample(value)?;
            }
        }
        writer.finalize()
    }

    /// Builds a 440 Hz buffer without touching the filesystem.
    pub fn tone_buffer(
        sample_rate: u32,
        sample_width: u16,
        channels: u16,
        frames: usize,
    ) -> Result<AudioBuffer, CodecError> {
        let width = sample_width as usize;
        let mut data = Vec::with_capacity(frames * channels as usize * width);
        for frame in 0..frames {
            let value = tone_sample(frame, sample_rate, sample_width * 8);
            for _ in 0..channels {
                pcm::push_sample(&mut data, value, width);
            }
        }
        AudioBuffer::new(sample_rate, sample_width, channels, data)
    }

    /// Writes bytes that no decoder accepts.
    pub fn write_corrupt_file(path: &Path) -> std::io::Result<()> {
        std::fs::write(path, b"this is not audio at all".repeat(64))
    }
}
