//! Local playback port for previewing the finished recording

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::audio::EncodedArtifact;

/// Errors that can occur during preview playback
#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    #[error("Audio output device not available: {0}")]
    DeviceNotAvailable(String),
}

/// Port trait for artifact playback
#[async_trait]
pub trait PreviewPlayer: Send + Sync {
    /// Play the artifact to completion through the default output device.
    async fn play(&self, artifact: &EncodedArtifact) -> Result<(), PreviewError>;
}
