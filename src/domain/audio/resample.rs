//! Offline resampling of a finished recording
//!
//! The whole take is rendered at the server's canonical rate in one pass.
//! This always runs, even when the capture rate already matches the target,
//! so there is a single encode path.

use rubato::{FftFixedIn, Resampler};
use thiserror::Error;

use super::sample_buffer::SampleBuffer;

/// Sample rate required by the intercom server
pub const TARGET_SAMPLE_RATE: u32 = 96_000;

/// Resampling errors
#[derive(Debug, Clone, Error)]
pub enum ResampleError {
    #[error("Resampler init failed: {0}")]
    Init(String),

    #[error("Resampling failed: {0}")]
    Process(String),
}

/// Render `buffer` at `target_rate`.
///
/// The output frame count is exactly
/// `round(input_frames * target_rate / input_rate)`; the channel count is
/// preserved and each channel is reconstructed independently. The tail is
/// zero-padded into the resampler until the expected length is reached, then
/// truncated, so equal input and output rates preserve the frame count
/// exactly.
pub fn resample(buffer: &SampleBuffer, target_rate: u32) -> Result<SampleBuffer, ResampleError> {
    let channels = buffer.channel_count() as usize;
    let input_frames = buffer.frame_count();

    let expected = ((input_frames as f64) * f64::from(target_rate)
        / f64::from(buffer.sample_rate()))
    .round() as usize;

    if expected == 0 {
        return SampleBuffer::from_channels(vec![Vec::new(); channels], target_rate)
            .map_err(|e| ResampleError::Process(e.to_string()));
    }

    let mut resampler = FftFixedIn::<f32>::new(
        buffer.sample_rate() as usize,
        target_rate as usize,
        1024, // Chunk size
        2,    // Sub-chunks
        channels,
    )
    .map_err(|e| ResampleError::Init(e.to_string()))?;

    // The FFT pipeline delays its output; skip that lead-in so frame 0 of
    // the result lines up with frame 0 of the input.
    let delay = resampler.output_delay();

    let mut output: Vec<Vec<f32>> = vec![Vec::with_capacity(expected + delay); channels];
    let mut input_pos = 0;

    // Feed fixed-size input chunks; once the input runs out, keep feeding
    // silence until the resampler has flushed enough frames.
    while output[0].len() < expected + delay {
        let frames_needed = resampler.input_frames_next();
        let end_pos = (input_pos + frames_needed).min(input_frames);

        let mut chunk: Vec<Vec<f32>> = Vec::with_capacity(channels);
        for ch in 0..channels {
            let mut samples = buffer.channel(ch)[input_pos..end_pos].to_vec();
            samples.resize(frames_needed, 0.0);
            chunk.push(samples);
        }
        input_pos = end_pos;

        let rendered = resampler
            .process(&chunk, None)
            .map_err(|e| ResampleError::Process(e.to_string()))?;

        for (ch, samples) in rendered.into_iter().enumerate() {
            output[ch].extend(samples);
        }
    }

    for channel in &mut output {
        channel.drain(..delay);
        channel.truncate(expected);
    }

    SampleBuffer::from_channels(output, target_rate)
        .map_err(|e| ResampleError::Process(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(frames: usize, rate: u32, freq: f32) -> Vec<f32> {
        (0..frames)
            .map(|i| {
                let t = i as f32 / rate as f32;
                (2.0 * std::f32::consts::PI * freq * t).sin() * 0.5
            })
            .collect()
    }

    #[test]
    fn output_frame_count_is_rounded_ratio() {
        let buffer = SampleBuffer::from_channels(vec![vec![0.0; 44100]], 44100).unwrap();
        let rendered = resample(&buffer, TARGET_SAMPLE_RATE).unwrap();
        assert_eq!(rendered.frame_count(), 96000);
        assert_eq!(rendered.sample_rate(), 96000);
    }

    #[test]
    fn short_input_rounds() {
        // 441 frames at 44.1kHz -> round(441 * 96000 / 44100) = 960
        let buffer = SampleBuffer::from_channels(vec![vec![0.0; 441]], 44100).unwrap();
        let rendered = resample(&buffer, TARGET_SAMPLE_RATE).unwrap();
        assert_eq!(rendered.frame_count(), 960);
    }

    #[test]
    fn same_rate_preserves_frame_count() {
        let buffer =
            SampleBuffer::from_channels(vec![sine(9600, 96000, 440.0)], 96000).unwrap();
        let rendered = resample(&buffer, 96000).unwrap();
        assert_eq!(rendered.frame_count(), 9600);
        assert_eq!(rendered.sample_rate(), 96000);
    }

    #[test]
    fn deterministic_for_same_input() {
        let buffer =
            SampleBuffer::from_channels(vec![sine(4410, 44100, 440.0)], 44100).unwrap();
        let first = resample(&buffer, TARGET_SAMPLE_RATE).unwrap();
        let second = resample(&buffer, TARGET_SAMPLE_RATE).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn silence_stays_silent() {
        let buffer = SampleBuffer::from_channels(vec![vec![0.0; 44100]], 44100).unwrap();
        let rendered = resample(&buffer, TARGET_SAMPLE_RATE).unwrap();
        assert!(rendered.channel(0).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn preserves_channel_count_without_crosstalk() {
        // Left carries a tone, right is silent; silence must stay silent.
        let left = sine(4410, 44100, 440.0);
        let right = vec![0.0; 4410];
        let buffer = SampleBuffer::from_channels(vec![left, right], 44100).unwrap();

        let rendered = resample(&buffer, TARGET_SAMPLE_RATE).unwrap();
        assert_eq!(rendered.channel_count(), 2);
        assert!(rendered.channel(1).iter().all(|&s| s == 0.0));
        assert!(rendered.channel(0).iter().any(|&s| s.abs() > 0.1));
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let buffer = SampleBuffer::from_channels(vec![Vec::new()], 44100).unwrap();
        let rendered = resample(&buffer, TARGET_SAMPLE_RATE).unwrap();
        assert_eq!(rendered.frame_count(), 0);
        assert_eq!(rendered.sample_rate(), TARGET_SAMPLE_RATE);
    }
}
