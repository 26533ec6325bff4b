//! Rodio-based preview adapter
//!
//! Plays the finished WAV artifact through the default output device.

use std::io::Cursor;

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, Sink};

use crate::application::ports::{PreviewError, PreviewPlayer};
use crate::domain::audio::EncodedArtifact;

/// Preview implementation using rodio
pub struct RodioPreview;

impl RodioPreview {
    /// Create a new rodio-based preview player
    pub fn new() -> Self {
        Self
    }
}

impl Default for RodioPreview {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PreviewPlayer for RodioPreview {
    async fn play(&self, artifact: &EncodedArtifact) -> Result<(), PreviewError> {
        let data = artifact.data().to_vec();

        // Run playback in a blocking thread to avoid stalling the async runtime
        tokio::task::spawn_blocking(move || play_sync(data))
            .await
            .map_err(|e| PreviewError::PlaybackFailed(format!("Task join error: {}", e)))?
    }
}

/// Play a WAV blob synchronously (called from spawn_blocking)
fn play_sync(data: Vec<u8>) -> Result<(), PreviewError> {
    let (_stream, stream_handle) = OutputStream::try_default()
        .map_err(|e| PreviewError::DeviceNotAvailable(e.to_string()))?;

    let sink =
        Sink::try_new(&stream_handle).map_err(|e| PreviewError::PlaybackFailed(e.to_string()))?;

    let source =
        Decoder::new(Cursor::new(data)).map_err(|e| PreviewError::PlaybackFailed(e.to_string()))?;

    sink.append(source);
    sink.sleep_until_end();

    Ok(())
}
