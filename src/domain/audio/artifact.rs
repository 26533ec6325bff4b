//! Encoded artifact value object

/// The finished WAV recording, ready for preview and upload.
///
/// At most one artifact is live per capture session; a new `start` or a
/// `discard` drops it.
#[derive(Debug, Clone)]
pub struct EncodedArtifact {
    data: Vec<u8>,
    duration_ms: u64,
}

impl EncodedArtifact {
    /// Media type declared when uploading or previewing
    pub const MEDIA_TYPE: &'static str = "audio/wav";

    /// Upload filename convention expected by the server
    pub const FILE_NAME: &'static str = "recording.wav";

    pub fn new(data: Vec<u8>, duration_ms: u64) -> Self {
        Self { data, duration_ms }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        let bytes = self.size_bytes();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_and_filename() {
        assert_eq!(EncodedArtifact::MEDIA_TYPE, "audio/wav");
        assert_eq!(EncodedArtifact::FILE_NAME, "recording.wav");
    }

    #[test]
    fn size_and_duration() {
        let artifact = EncodedArtifact::new(vec![0u8; 1024], 2500);
        assert_eq!(artifact.size_bytes(), 1024);
        assert_eq!(artifact.duration_ms(), 2500);
    }

    #[test]
    fn human_readable_size_bytes() {
        let artifact = EncodedArtifact::new(vec![0u8; 500], 0);
        assert_eq!(artifact.human_readable_size(), "500 B");
    }

    #[test]
    fn human_readable_size_kb() {
        let artifact = EncodedArtifact::new(vec![0u8; 2048], 0);
        assert_eq!(artifact.human_readable_size(), "2.0 KB");
    }

    #[test]
    fn human_readable_size_mb() {
        let artifact = EncodedArtifact::new(vec![0u8; 2 * 1024 * 1024], 0);
        assert_eq!(artifact.human_readable_size(), "2.0 MB");
    }
}
