//! Structural WAV reader and writer.
//!
//! WAV input does not go through the general demuxer: the RIFF header is
//! parsed directly for sample rate, bit depth and channel count, and the
//! frame payload is copied out as-is (re-packed to the canonical layout).

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::Cursor;
use tracing::debug;

use super::error::CodecError;
use super::pcm;
use super::types::AudioBuffer;

const LABEL: &str = "wav";

/// Parses a RIFF WAVE file held in memory.
pub fn read_wav(bytes: &[u8]) -> Result<AudioBuffer, CodecError> {
    let reader =
        WavReader::new(Cursor::new(bytes)).map_err(|e| CodecError::decode_failed(LABEL, e))?;
    let spec = reader.spec();

    if spec.sample_format != SampleFormat::Int {
        return Err(CodecError::decode_failed(
            LABEL,
            "floating-point samples are not supported",
        ));
    }
    let width = match spec.bits_per_sample {
        8 | 16 | 24 | 32 => (spec.bits_per_sample / 8) as usize,
        other => {
            return Err(CodecError::decode_failed(
                LABEL,
                format!("unsupported bit depth: {}", other),
            ))
        }
    };

    debug!(
        sample_rate = spec.sample_rate,
        bits_per_sample = spec.bits_per_sample,
        channels = spec.channels,
        frames = reader.duration(),
        "Parsed WAV header"
    );

    let mut data = Vec::with_capacity(reader.len() as usize * width);
    for sample in reader.into_samples::<i32>() {
        let value = sample.map_err(|e| CodecError::decode_failed(LABEL, e))?;
        pcm::push_sample(&mut data, value, width);
    }

    AudioBuffer::new(spec.sample_rate, width as u16, spec.channels, data)
}

/// Serialises a buffer as an integer PCM WAV file.
pub fn write_wav(buffer: &AudioBuffer) -> Result<Vec<u8>, CodecError> {
    let spec = WavSpec {
        channels: buffer.channels(),
        sample_rate: buffer.sample_rate(),
        bits_per_sample: buffer.bits_per_sample(),
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(buffer.data().len() + 44));
    {
        let mut writer =
            WavWriter::new(&mut cursor, spec).map_err(|e| CodecError::encode_failed(LABEL, e, None))?;
        for value in pcm::samples(buffer) {
            writer
                .write_sample(value)
                .map_err(|e| CodecError::encode_failed(LABEL, e, None))?;
        }
        writer
            .finalize()
            .map_err(|e| CodecError::encode_failed(LABEL, e, None))?;
    }

    Ok(cursor.into_inner())
}
