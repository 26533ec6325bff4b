//! No-op preview adapter
//!
//! Used when preview is disabled or no output device exists.

use async_trait::async_trait;

use crate::application::ports::{PreviewError, PreviewPlayer};
use crate::domain::audio::EncodedArtifact;

/// No-op preview player that does nothing
pub struct NoOpPreview;

impl NoOpPreview {
    /// Create a new no-op preview player
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpPreview {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PreviewPlayer for NoOpPreview {
    async fn play(&self, _artifact: &EncodedArtifact) -> Result<(), PreviewError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_returns_ok() {
        let preview = NoOpPreview::new();
        let artifact = EncodedArtifact::new(vec![0u8; 44], 0);
        assert!(preview.play(&artifact).await.is_ok());
    }
}
