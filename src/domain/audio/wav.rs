//! WAV container encoding
//!
//! Produces a 44-byte RIFF header followed by interleaved little-endian PCM.
//! The byte layout is load-bearing: the server validates uploads as 32-bit
//! 96kHz WAV and third-party players must accept the file as-is.
//!
//! Sample conversion clamps to [-1.0, 1.0] and then scales asymmetrically:
//! `2^(b-1) - 1` for non-negative samples, `2^(b-1)` for negative ones. The
//! positive rail cannot overflow and the slight negative bias is part of the
//! established output format; existing fixtures depend on these exact bytes.

use thiserror::Error;

use super::sample_buffer::SampleBuffer;

/// Size of the RIFF header in bytes
pub const WAV_HEADER_SIZE: usize = 44;

/// PCM bit depths the encoder can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitDepth {
    Sixteen,
    ThirtyTwo,
}

impl BitDepth {
    pub const fn bits(self) -> u16 {
        match self {
            Self::Sixteen => 16,
            Self::ThirtyTwo => 32,
        }
    }

    pub const fn bytes(self) -> usize {
        self.bits() as usize / 8
    }
}

/// WAV encoding errors
#[derive(Debug, Clone, Error)]
pub enum EncodeError {
    #[error("Sample data too large for a RIFF container: {0} bytes")]
    TooLarge(u64),
}

/// Errors when reading back a WAV container
#[derive(Debug, Clone, Error)]
pub enum WavParseError {
    #[error("File too short to hold a WAV header")]
    TooShort,

    #[error("Not a RIFF/WAVE container")]
    BadMagic,

    #[error("Unsupported audio format code: {0}")]
    UnsupportedFormat(u16),

    #[error("Unsupported bit depth: {0}")]
    UnsupportedBitDepth(u16),

    #[error("Data section shorter than the declared size")]
    TruncatedData,

    #[error("Header declares zero channels")]
    NoChannels,
}

/// Serialize a sample buffer into a WAV byte blob.
///
/// The result is exactly `44 + frames * channels * bit_depth/8` bytes.
/// Frames are interleaved channel-major within a frame: channel 0, channel 1,
/// ..., then the next frame.
pub fn encode(buffer: &SampleBuffer, depth: BitDepth) -> Result<Vec<u8>, EncodeError> {
    let frames = buffer.frame_count();
    let channels = buffer.channel_count() as usize;
    let data_size = frames as u64 * channels as u64 * depth.bytes() as u64;
    if data_size > u64::from(u32::MAX) - 36 {
        return Err(EncodeError::TooLarge(data_size));
    }
    let data_size = data_size as u32;

    let sample_rate = buffer.sample_rate();
    let byte_rate = sample_rate * channels as u32 * depth.bytes() as u32;
    let block_align = (channels * depth.bytes()) as u16;

    let mut out = Vec::with_capacity(WAV_HEADER_SIZE + data_size as usize);

    // RIFF chunk descriptor
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(data_size + 36).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    // fmt sub-chunk
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM format code
    out.extend_from_slice(&buffer.channel_count().to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&depth.bits().to_le_bytes());

    // data sub-chunk
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_size.to_le_bytes());

    for frame in 0..frames {
        for ch in 0..channels {
            let sample = buffer.channel(ch)[frame];
            match depth {
                BitDepth::Sixteen => out.extend_from_slice(&quantize_i16(sample).to_le_bytes()),
                BitDepth::ThirtyTwo => out.extend_from_slice(&quantize_i32(sample).to_le_bytes()),
            }
        }
    }

    Ok(out)
}

fn quantize_i16(sample: f32) -> i16 {
    let s = f64::from(sample).clamp(-1.0, 1.0);
    let scaled = if s < 0.0 { s * 32768.0 } else { s * 32767.0 };
    // `as` truncates toward zero
    scaled as i16
}

fn quantize_i32(sample: f32) -> i32 {
    let s = f64::from(sample).clamp(-1.0, 1.0);
    let scaled = if s < 0.0 {
        s * 2147483648.0
    } else {
        s * 2147483647.0
    };
    scaled as i32
}

/// Parse a PCM WAV blob produced by [`encode`] back into a sample buffer.
///
/// Used for re-uploading a saved file and for verifying produced bytes.
pub fn decode(bytes: &[u8]) -> Result<SampleBuffer, WavParseError> {
    if bytes.len() < WAV_HEADER_SIZE {
        return Err(WavParseError::TooShort);
    }
    if &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" || &bytes[12..16] != b"fmt " {
        return Err(WavParseError::BadMagic);
    }

    let format_code = u16::from_le_bytes([bytes[20], bytes[21]]);
    if format_code != 1 {
        return Err(WavParseError::UnsupportedFormat(format_code));
    }

    let channel_count = u16::from_le_bytes([bytes[22], bytes[23]]);
    if channel_count == 0 {
        return Err(WavParseError::NoChannels);
    }
    let sample_rate = u32::from_le_bytes([bytes[24], bytes[25], bytes[26], bytes[27]]);
    let bits = u16::from_le_bytes([bytes[34], bytes[35]]);
    let data_size = u32::from_le_bytes([bytes[40], bytes[41], bytes[42], bytes[43]]) as usize;

    let data = bytes
        .get(WAV_HEADER_SIZE..WAV_HEADER_SIZE + data_size)
        .ok_or(WavParseError::TruncatedData)?;

    let samples: Vec<f32> = match bits {
        16 => data
            .chunks_exact(2)
            .map(|b| dequantize_i16(i16::from_le_bytes([b[0], b[1]])))
            .collect(),
        32 => data
            .chunks_exact(4)
            .map(|b| dequantize_i32(i32::from_le_bytes([b[0], b[1], b[2], b[3]])))
            .collect(),
        other => return Err(WavParseError::UnsupportedBitDepth(other)),
    };

    SampleBuffer::from_interleaved(&samples, channel_count, sample_rate)
        .map_err(|_| WavParseError::TruncatedData)
}

fn dequantize_i16(value: i16) -> f32 {
    let v = f64::from(value);
    let s = if v < 0.0 { v / 32768.0 } else { v / 32767.0 };
    s as f32
}

fn dequantize_i32(value: i32) -> f32 {
    let v = f64::from(value);
    let s = if v < 0.0 { v / 2147483648.0 } else { v / 2147483647.0 };
    s as f32
}
