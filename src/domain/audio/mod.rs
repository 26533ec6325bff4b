//! Audio value objects and pure signal processing
//!
//! Covers the capture-to-container pipeline: the sample buffer, the gain
//! stage, the offline resampler, the WAV encoder, and the finished artifact.

pub mod artifact;
pub mod gain;
pub mod resample;
pub mod sample_buffer;
pub mod wav;

pub use artifact::EncodedArtifact;
pub use gain::{GainControl, GainSetting};
pub use resample::{resample, ResampleError, TARGET_SAMPLE_RATE};
pub use sample_buffer::{DecodeError, RawCapture, SampleBuffer};
pub use wav::{BitDepth, EncodeError, WavParseError, WAV_HEADER_SIZE};
