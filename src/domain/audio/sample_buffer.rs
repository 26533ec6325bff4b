//! Sample buffer value object and raw-capture decoding

use thiserror::Error;

/// Error when captured data cannot be decoded into a sample buffer
#[derive(Debug, Clone, Error)]
pub enum DecodeError {
    #[error("Capture delivered data without a stream format")]
    MissingFormat,

    #[error("Channel count must be at least 1")]
    NoChannels,

    #[error("Interleaved data length {len} is not divisible by channel count {channels}")]
    RaggedInterleave { len: usize, channels: u16 },

    #[error("Channel sequences have unequal lengths")]
    UnequalChannels,
}

/// Immutable multi-channel audio buffer.
///
/// Samples are normalized floats, nominally in [-1.0, 1.0]. Values outside
/// that range (gain overshoot) are tolerated here and clamped at encode time.
/// Every channel holds exactly `frame_count` samples.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Build a buffer from per-channel sample sequences.
    pub fn from_channels(channels: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self, DecodeError> {
        if channels.is_empty() {
            return Err(DecodeError::NoChannels);
        }
        let frame_count = channels[0].len();
        if channels.iter().any(|c| c.len() != frame_count) {
            return Err(DecodeError::UnequalChannels);
        }
        Ok(Self {
            channels,
            sample_rate,
        })
    }

    /// Build a buffer from interleaved samples (channel-major within a frame).
    pub fn from_interleaved(
        samples: &[f32],
        channel_count: u16,
        sample_rate: u32,
    ) -> Result<Self, DecodeError> {
        if channel_count == 0 {
            return Err(DecodeError::NoChannels);
        }
        let n = channel_count as usize;
        if samples.len() % n != 0 {
            return Err(DecodeError::RaggedInterleave {
                len: samples.len(),
                channels: channel_count,
            });
        }
        let frame_count = samples.len() / n;
        let mut channels = vec![Vec::with_capacity(frame_count); n];
        for frame in samples.chunks_exact(n) {
            for (ch, &sample) in frame.iter().enumerate() {
                channels[ch].push(sample);
            }
        }
        Ok(Self {
            channels,
            sample_rate,
        })
    }

    /// Number of channels (always >= 1)
    pub fn channel_count(&self) -> u16 {
        self.channels.len() as u16
    }

    /// Samples per channel
    pub fn frame_count(&self) -> usize {
        self.channels[0].len()
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Samples of a single channel
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    /// Playback duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        (self.frame_count() as u64 * 1000) / self.sample_rate as u64
    }
}

/// Raw audio captured from the device: ordered interleaved chunks plus the
/// stream format they were delivered in.
///
/// Chunks are kept in arrival order; order matters, this is a sequential
/// waveform.
#[derive(Debug, Clone, Default)]
pub struct RawCapture {
    pub chunks: Vec<Vec<f32>>,
    pub channel_count: u16,
    pub sample_rate: u32,
}

impl RawCapture {
    /// Number of chunks delivered by the device
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Concatenate the chunks in arrival order and deinterleave them into a
    /// sample buffer.
    pub fn decode(self) -> Result<SampleBuffer, DecodeError> {
        if self.sample_rate == 0 {
            return Err(DecodeError::MissingFormat);
        }
        let total: usize = self.chunks.iter().map(Vec::len).sum();
        let mut interleaved = Vec::with_capacity(total);
        for chunk in &self.chunks {
            interleaved.extend_from_slice(chunk);
        }
        SampleBuffer::from_interleaved(&interleaved, self.channel_count, self.sample_rate)
    }
}
