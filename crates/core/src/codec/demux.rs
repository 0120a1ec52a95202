//! MP3 and AIFF decoding through symphonia.

use std::io::Cursor;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use super::error::CodecError;
use super::pcm;
use super::types::{AudioBuffer, SourceFormat};

/// Sample width used when the stream does not declare a bit depth (MP3).
const DEFAULT_SAMPLE_WIDTH: u16 = 2;

/// Decodes a whole in-memory file to interleaved PCM.
pub fn decode_container(bytes: Vec<u8>, format: SourceFormat) -> Result<AudioBuffer, CodecError> {
    let label = format.extension();
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

    let mut hint = Hint::new();
    hint.with_extension(label);

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| CodecError::decode_failed(label, e))?;
    let mut reader = probed.format;

    let track = reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| CodecError::decode_failed(label, "no audio track found"))?;
    let track_id = track.id;
    let params = track.codec_params.clone();

    let sample_width = params
        .bits_per_sample
        .map(|bits| bits.div_ceil(8) as u16)
        .filter(|width| (1..=4).contains(width))
        .unwrap_or(DEFAULT_SAMPLE_WIDTH);
    let mut sample_rate = params.sample_rate;
    let mut channels = params.channels.map(|c| c.count() as u16);

    let mut decoder = symphonia::default::get_codecs()
        .make(&params, &DecoderOptions::default())
        .map_err(|e| CodecError::decode_failed(label, e))?;

    let mut data = Vec::new();
    let mut samples: Option<SampleBuffer<i32>> = None;
    let mut skipped_packets = 0usize;

    loop {
        let packet = match reader.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => return Err(CodecError::decode_failed(label, e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(reason)) => {
                // A damaged frame; keep going with the rest of the stream
                skipped_packets += 1;
                debug!(format = label, reason, "Skipping undecodable packet");
                continue;
            }
            Err(e) => return Err(CodecError::decode_failed(label, e)),
        };

        let spec = *decoded.spec();
        sample_rate.get_or_insert(spec.rate);
        channels.get_or_insert(spec.channels.count() as u16);

        let needed = decoded.capacity() * spec.channels.count();
        if samples.as_ref().map_or(true, |buf| buf.capacity() < needed) {
            samples = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
        }
        let buf = samples.get_or_insert_with(|| SampleBuffer::new(decoded.capacity() as u64, spec));
        buf.copy_interleaved_ref(decoded);
        for &value in buf.samples() {
            pcm::push_scaled(&mut data, value, sample_width as usize);
        }
    }

    let sample_rate =
        sample_rate.ok_or_else(|| CodecError::decode_failed(label, "sample rate unknown"))?;
    let channels = channels.ok_or_else(|| CodecError::decode_failed(label, "channels unknown"))?;

    debug!(
        format = label,
        sample_rate,
        channels,
        sample_width,
        bytes = data.len(),
        skipped_packets,
        "Decoded audio stream"
    );

    AudioBuffer::new(sample_rate, sample_width, channels, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::aiff::write_aiff;

    #[test]
    fn test_garbage_mp3_fails_to_decode() {
        let bytes = b"this is plainly not an mp3 stream ".repeat(64);
        let err = decode_container(bytes, SourceFormat::Mp3).unwrap_err();
        assert!(err.is_decode_error());
    }

    #[test]
    fn test_empty_input_fails_to_decode() {
        let err = decode_container(Vec::new(), SourceFormat::Aiff).unwrap_err();
        assert!(err.is_decode_error());
    }

    #[test]
    fn test_zero_frame_aiff_decodes_empty() {
        let empty = AudioBuffer::new(44100, 2, 2, Vec::new()).unwrap();
        let bytes = write_aiff(&empty).unwrap();

        let decoded = decode_container(bytes, SourceFormat::Aiff).unwrap();
        assert_eq!(decoded.sample_rate(), 44100);
        assert_eq!(decoded.channels(), 2);
        assert_eq!(decoded.frame_count(), 0);
    }
}
