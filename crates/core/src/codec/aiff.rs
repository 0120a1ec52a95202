//! AIFF writer.
//!
//! Layout: `FORM` container holding a `COMM` chunk (channels, frame count,
//! bit depth, 80-bit extended sample rate) and an `SSND` chunk with
//! big-endian signed samples.

use super::error::CodecError;
use super::types::AudioBuffer;

const COMM_CHUNK_SIZE: u32 = 18;
const SSND_HEADER_SIZE: u32 = 8;

/// Serialises a buffer as an AIFF file.
pub fn write_aiff(buffer: &AudioBuffer) -> Result<Vec<u8>, CodecError> {
    let payload_len = u32::try_from(buffer.data().len())
        .map_err(|_| CodecError::encode_failed("aiff", "payload exceeds 4 GiB", None))?;
    let frame_count = u32::try_from(buffer.frame_count())
        .map_err(|_| CodecError::encode_failed("aiff", "too many frames", None))?;

    let ssnd_size = SSND_HEADER_SIZE + payload_len;
    let pad = (ssnd_size % 2) as usize;
    let form_size = 4 + (8 + COMM_CHUNK_SIZE) + (8 + ssnd_size) + pad as u32;

    let mut out = Vec::with_capacity(form_size as usize + 8);
    out.extend_from_slice(b"FORM");
    out.extend_from_slice(&form_size.to_be_bytes());
    out.extend_from_slice(b"AIFF");

    out.extend_from_slice(b"COMM");
    out.extend_from_slice(&COMM_CHUNK_SIZE.to_be_bytes());
    out.extend_from_slice(&buffer.channels().to_be_bytes());
    out.extend_from_slice(&frame_count.to_be_bytes());
    out.extend_from_slice(&buffer.bits_per_sample().to_be_bytes());
    out.extend_from_slice(&extended_from_u32(buffer.sample_rate()));

    out.extend_from_slice(b"SSND");
    out.extend_from_slice(&ssnd_size.to_be_bytes());
    out.extend_from_slice(&0u32.to_be_bytes()); // offset
    out.extend_from_slice(&0u32.to_be_bytes()); // block size
    for sample in buffer.data().chunks_exact(buffer.sample_width() as usize) {
        out.extend(sample.iter().rev());
    }
    out.resize(out.len() + pad, 0);

    Ok(out)
}

/// Encodes an integer as an IEEE 754 80-bit extended float.
fn extended_from_u32(value: u32) -> [u8; 10] {
    let mut out = [0u8; 10];
    if value == 0 {
        return out;
    }

    let shift = value.leading_zeros();
    let exponent = (16383 + 31 - shift) as u16;
    let mantissa = u64::from(value) << (32 + shift);

    out[..2].copy_from_slice(&exponent.to_be_bytes());
    out[2..].copy_from_slice(&mantissa.to_be_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extended_sample_rates() {
        assert_eq!(
            extended_from_u32(44100),
            [0x40, 0x0e, 0xac, 0x44, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(
            extended_from_u32(48000),
            [0x40, 0x0e, 0xbb, 0x80, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(extended_from_u32(1), [0x3f, 0xff, 0x80, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(extended_from_u32(0), [0; 10]);
    }

    #[test]
    fn test_header_layout() {
        // 2 frames of 16-bit stereo
        let data = vec![0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
        let buffer = AudioBuffer::new(44100, 2, 2, data).unwrap();
        let bytes = write_aiff(&buffer).unwrap();

        assert_eq!(&bytes[0..4], b"FORM");
        assert_eq!(
            u32::from_be_bytes(bytes[4..8].try_into().unwrap()) as usize,
            bytes.len() - 8
        );
        assert_eq!(&bytes[8..12], b"AIFF");
        assert_eq!(&bytes[12..16], b"COMM");
        assert_eq!(u16::from_be_bytes([bytes[20], bytes[21]]), 2); // channels
        assert_eq!(u32::from_be_bytes(bytes[22..26].try_into().unwrap()), 2); // frames
        assert_eq!(u16::from_be_bytes([bytes[26], bytes[27]]), 16); // bits
        assert_eq!(&bytes[38..42], b"SSND");
        // Samples are byte-swapped to big-endian
        assert_eq!(&bytes[54..], &[0x02, 0x01, 0x04, 0x03, 0x06, 0x05, 0x08, 0x07]);
    }

    #[test]
    fn test_odd_payload_is_padded() {
        // 3 frames of 8-bit mono leaves the SSND chunk odd-sized
        let buffer = AudioBuffer::new(8000, 1, 1, vec![1, 2, 3]).unwrap();
        let bytes = write_aiff(&buffer).unwrap();
        assert_eq!(bytes.len() % 2, 0);
        assert_eq!(*bytes.last().unwrap(), 0);
        assert_eq!(
            u32::from_be_bytes(bytes[4..8].try_into().unwrap()) as usize,
            bytes.len() - 8
        );
    }
}
