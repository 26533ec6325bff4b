//! Domain layer - Core business logic
//!
//! Contains value objects, the capture state machine, pure audio processing,
//! and domain errors. This layer has no dependencies on external systems.

pub mod audio;
pub mod config;
pub mod error;
pub mod intercom;
pub mod session;

// Re-export common types
pub use audio::{
    BitDepth, EncodedArtifact, GainControl, GainSetting, RawCapture, SampleBuffer,
    TARGET_SAMPLE_RATE,
};
pub use config::AppConfig;
pub use error::*;
pub use intercom::{Collection, DeviceSettings, RecordInfo};
pub use session::{CaptureSession, CaptureState, InvalidStateTransition};
