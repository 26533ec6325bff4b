//! Capture port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::audio::{GainControl, RawCapture};

/// Capture errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("No audio input device available")]
    DeviceUnavailable,

    #[error("Failed to start capture: {0}")]
    StartFailed(String),

    #[error("Capture failed: {0}")]
    CaptureFailed(String),
}

/// Port for the capture device.
///
/// The device contract is minimal: acquire a live audio stream, then deliver
/// sequential chunks until stopped. Exactly one capture may be active at a
/// time per implementation; the device handle is exclusively owned by the
/// active session.
#[async_trait]
pub trait AudioCapture: Send + Sync {
    /// Acquire the default input stream and begin buffering chunks.
    ///
    /// The gain handle is read at application time on every delivered chunk,
    /// so gain changes take effect mid-capture.
    async fn start(&self, gain: GainControl) -> Result<(), CaptureError>;

    /// Stop the stream and return the buffered chunks in arrival order.
    ///
    /// A capture with zero chunks is not an error; the returned value is
    /// simply empty.
    async fn stop(&self) -> Result<RawCapture, CaptureError>;

    /// Stop the stream and drop any buffered chunks.
    async fn cancel(&self) -> Result<(), CaptureError>;

    /// Get elapsed capture time in milliseconds
    fn elapsed_ms(&self) -> u64;
}
