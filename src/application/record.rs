//! Record-message use case
//!
//! Drives one capture attempt end to end: acquire the stream, buffer chunks
//! behind the gain stage, and on stop run the decode -> resample -> encode
//! continuation as a single sequential task. The finished artifact is held
//! here until it is saved, discarded, or invalidated by the next start.

use std::sync::Mutex as StdMutex;

use thiserror::Error;

use crate::domain::audio::{
    resample, wav, BitDepth, DecodeError, EncodeError, EncodedArtifact, GainControl, GainSetting,
    ResampleError, TARGET_SAMPLE_RATE,
};
use crate::domain::intercom::{Collection, RecordInfo};
use crate::domain::session::{CaptureSession, CaptureState, InvalidStateTransition};

use super::ports::{
    AudioCapture, CaptureError, PreviewError, PreviewPlayer, RecordingStore, StoreError,
};

/// Bit depth of the produced container; the server validates uploads as
/// 32-bit 96kHz WAV.
pub const ENCODE_BIT_DEPTH: BitDepth = BitDepth::ThirtyTwo;

/// Errors from the record use case
#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    State(#[from] InvalidStateTransition),

    #[error("Recording failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("Failed to decode captured audio: {0}")]
    Decode(#[from] DecodeError),

    #[error("Resampling failed: {0}")]
    Resample(#[from] ResampleError),

    #[error("Encoding failed: {0}")]
    Encode(#[from] EncodeError),

    #[error("Upload failed: {0}")]
    Store(#[from] StoreError),

    #[error("Preview failed: {0}")]
    Preview(#[from] PreviewError),

    #[error("No finished recording to hand off")]
    NoArtifact,

    #[error("Pipeline task failed: {0}")]
    Pipeline(String),
}

/// Record-message use case.
///
/// Exposes the narrow capability surface a front end drives:
/// start / stop / discard / set_gain / artifact / save / play_preview.
pub struct RecordMessageUseCase<C, S, P>
where
    C: AudioCapture,
    S: RecordingStore,
    P: PreviewPlayer,
{
    capture: C,
    store: S,
    preview: P,
    gain: GainControl,
    session: StdMutex<CaptureSession>,
    artifact: StdMutex<Option<EncodedArtifact>>,
}

impl<C, S, P> RecordMessageUseCase<C, S, P>
where
    C: AudioCapture,
    S: RecordingStore,
    P: PreviewPlayer,
{
    /// Create a new use case instance
    pub fn new(capture: C, store: S, preview: P, gain: GainSetting) -> Self {
        Self {
            capture,
            store,
            preview,
            gain: GainControl::new(gain),
            session: StdMutex::new(CaptureSession::new()),
            artifact: StdMutex::new(None),
        }
    }

    /// Current session state
    pub fn state(&self) -> CaptureState {
        self.session.lock().unwrap().state()
    }

    /// Elapsed capture time in milliseconds
    pub fn elapsed_ms(&self) -> u64 {
        self.capture.elapsed_ms()
    }

    /// Adjust the gain; takes effect on the next processed chunk, even while
    /// recording.
    pub fn set_gain(&self, setting: GainSetting) {
        self.gain.set(setting);
    }

    /// The gain currently applied
    pub fn gain(&self) -> GainSetting {
        GainSetting::new(self.gain.get())
    }

    /// Begin a capture attempt.
    ///
    /// Any artifact from a previous attempt is invalidated. A device
    /// acquisition failure ends the attempt and leaves the session idle, so
    /// subsequent attempts are unaffected.
    pub async fn start(&self) -> Result<(), RecordError> {
        self.session.lock().unwrap().start()?;
        *self.artifact.lock().unwrap() = None;

        if let Err(e) = self.capture.start(self.gain.clone()).await {
            self.session.lock().unwrap().abort_start();
            return Err(e.into());
        }
        Ok(())
    }

    /// Stop the capture and run the encode pipeline.
    ///
    /// With zero buffered chunks the session lands in `StoppedEmpty` and no
    /// artifact is produced; that is a no-op, not a failure. Otherwise the
    /// buffered chunks are decoded, resampled to the canonical rate, and
    /// encoded; the artifact becomes available via [`Self::artifact`].
    pub async fn stop(&self) -> Result<CaptureState, RecordError> {
        {
            let session = self.session.lock().unwrap();
            if !session.is_recording() {
                return Err(InvalidStateTransition {
                    current_state: session.state(),
                    action: "stop recording".to_string(),
                }
                .into());
            }
        }

        let raw = self.capture.stop().await?;
        let state = self.session.lock().unwrap().stop(raw.chunk_count())?;
        if state == CaptureState::StoppedEmpty {
            return Ok(state);
        }

        // CPU-bound continuation, off the async runtime
        let artifact = tokio::task::spawn_blocking(move || -> Result<EncodedArtifact, RecordError> {
            let buffer = raw.decode()?;
            let rendered = resample(&buffer, TARGET_SAMPLE_RATE)?;
            let blob = wav::encode(&rendered, ENCODE_BIT_DEPTH)?;
            Ok(EncodedArtifact::new(blob, rendered.duration_ms()))
        })
        .await
        .map_err(|e| RecordError::Pipeline(e.to_string()))??;

        *self.artifact.lock().unwrap() = Some(artifact);
        Ok(state)
    }

    /// Drop the capture attempt and any artifact; returns to idle.
    ///
    /// Also the cancellation path for an in-flight capture.
    pub async fn discard(&self) -> Result<(), RecordError> {
        let was_recording = {
            let mut session = self.session.lock().unwrap();
            let was_recording = session.is_recording();
            session.discard()?;
            was_recording
        };

        if was_recording {
            self.capture.cancel().await?;
        }
        *self.artifact.lock().unwrap() = None;
        Ok(())
    }

    /// The finished artifact, if one is live
    pub fn artifact(&self) -> Option<EncodedArtifact> {
        self.artifact.lock().unwrap().clone()
    }

    /// Upload the artifact to a collection.
    ///
    /// On success the artifact is considered handed off and dropped; on
    /// failure it stays live so the save can be retried without
    /// re-recording.
    pub async fn save(&self, collection: Collection) -> Result<RecordInfo, RecordError> {
        let artifact = self
            .artifact
            .lock()
            .unwrap()
            .clone()
            .ok_or(RecordError::NoArtifact)?;

        let info = self.store.upload(collection, &artifact).await?;

        *self.artifact.lock().unwrap() = None;
        Ok(info)
    }

    /// Play the artifact through the local output device.
    pub async fn play_preview(&self) -> Result<(), RecordError> {
        let artifact = self
            .artifact
            .lock()
            .unwrap()
            .clone()
            .ok_or(RecordError::NoArtifact)?;

        self.preview.play(&artifact).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::audio::RawCapture;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// Capture that yields a scripted set of chunks
    struct ScriptedCapture {
        raw: RawCapture,
        active: Arc<AtomicBool>,
    }

    impl ScriptedCapture {
        fn new(raw: RawCapture) -> Self {
            Self {
                raw,
                active: Arc::new(AtomicBool::new(false)),
            }
        }

        fn empty() -> Self {
            Self::new(RawCapture::default())
        }

        fn live_flag(&self) -> Arc<AtomicBool> {
            Arc::clone(&self.active)
        }
    }

    #[async_trait]
    impl AudioCapture for ScriptedCapture {
        async fn start(&self, _gain: GainControl) -> Result<(), CaptureError> {
            self.active.store(true, Ordering::SeqCst);
            Ok(())
        }

        async fn stop(&self) -> Result<RawCapture, CaptureError> {
            self.active.store(false, Ordering::SeqCst);
            Ok(self.raw.clone())
        }

        async fn cancel(&self) -> Result<(), CaptureError> {
            self.active.store(false, Ordering::SeqCst);
            Ok(())
        }

        fn elapsed_ms(&self) -> u64 {
            0
        }
    }

    /// Capture whose device cannot be acquired
    struct UnavailableCapture;

    #[async_trait]
    impl AudioCapture for UnavailableCapture {
        async fn start(&self, _gain: GainControl) -> Result<(), CaptureError> {
            Err(CaptureError::DeviceUnavailable)
        }

        async fn stop(&self) -> Result<RawCapture, CaptureError> {
            Err(CaptureError::CaptureFailed("no capture in progress".into()))
        }

        async fn cancel(&self) -> Result<(), CaptureError> {
            Ok(())
        }

        fn elapsed_ms(&self) -> u64 {
            0
        }
    }

    struct MockStore {
        fail: bool,
        uploads: Arc<AtomicBool>,
    }

    impl MockStore {
        fn ok() -> Self {
            Self {
                fail: false,
                uploads: Arc::new(AtomicBool::new(false)),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                uploads: Arc::new(AtomicBool::new(false)),
            }
        }
    }

    #[async_trait]
    impl RecordingStore for MockStore {
        async fn upload(
            &self,
            _collection: Collection,
            artifact: &EncodedArtifact,
        ) -> Result<RecordInfo, StoreError> {
            if self.fail {
                return Err(StoreError::Network("connection refused".into()));
            }
            self.uploads.store(true, Ordering::SeqCst);
            Ok(RecordInfo {
                id: "mock-id".into(),
                length: artifact.duration_ms(),
                record_timestamp: 1_700_000_000,
            })
        }

        async fn list(&self, _collection: Collection) -> Result<Vec<RecordInfo>, StoreError> {
            Ok(Vec::new())
        }

        async fn delete(&self, _collection: Collection, _id: &str) -> Result<(), StoreError> {
            Ok(())
        }
    }

    struct MockPreview;

    #[async_trait]
    impl PreviewPlayer for MockPreview {
        async fn play(&self, _artifact: &EncodedArtifact) -> Result<(), PreviewError> {
            Ok(())
        }
    }

    fn mono_silence(frames: usize, rate: u32) -> RawCapture {
        RawCapture {
            chunks: vec![vec![0.0; frames]],
            channel_count: 1,
            sample_rate: rate,
        }
    }

    #[tokio::test]
    async fn stop_without_chunks_yields_stopped_empty_and_no_artifact() {
        let use_case = RecordMessageUseCase::new(
            ScriptedCapture::empty(),
            MockStore::ok(),
            MockPreview,
            GainSetting::default(),
        );

        use_case.start().await.unwrap();
        let state = use_case.stop().await.unwrap();
        assert_eq!(state, CaptureState::StoppedEmpty);
        assert!(use_case.artifact().is_none());

        use_case.discard().await.unwrap();
        assert_eq!(use_case.state(), CaptureState::Idle);
    }

    #[tokio::test]
    async fn stop_from_idle_is_rejected() {
        let use_case = RecordMessageUseCase::new(
            ScriptedCapture::empty(),
            MockStore::ok(),
            MockPreview,
            GainSetting::default(),
        );

        let err = use_case.stop().await.unwrap_err();
        assert!(matches!(err, RecordError::State(_)));
    }

    #[tokio::test]
    async fn start_while_recording_is_rejected() {
        let use_case = RecordMessageUseCase::new(
            ScriptedCapture::new(mono_silence(480, 96000)),
            MockStore::ok(),
            MockPreview,
            GainSetting::default(),
        );

        use_case.start().await.unwrap();
        let err = use_case.start().await.unwrap_err();
        assert!(matches!(err, RecordError::State(_)));
    }

    #[tokio::test]
    async fn device_failure_leaves_session_idle_for_retry() {
        let use_case = RecordMessageUseCase::new(
            UnavailableCapture,
            MockStore::ok(),
            MockPreview,
            GainSetting::default(),
        );

        let err = use_case.start().await.unwrap_err();
        assert!(matches!(
            err,
            RecordError::Capture(CaptureError::DeviceUnavailable)
        ));
        assert_eq!(use_case.state(), CaptureState::Idle);
    }

    #[tokio::test]
    async fn pipeline_produces_canonical_artifact() {
        // 0.1s of 96kHz mono silence
        let use_case = RecordMessageUseCase::new(
            ScriptedCapture::new(mono_silence(9600, 96000)),
            MockStore::ok(),
            MockPreview,
            GainSetting::default(),
        );

        use_case.start().await.unwrap();
        let state = use_case.stop().await.unwrap();
        assert_eq!(state, CaptureState::StoppedWithData);

        let artifact = use_case.artifact().unwrap();
        assert_eq!(artifact.size_bytes(), 44 + 9600 * 4);
        assert_eq!(artifact.duration_ms(), 100);
    }

    #[tokio::test]
    async fn save_hands_off_and_clears_artifact() {
        let use_case = RecordMessageUseCase::new(
            ScriptedCapture::new(mono_silence(960, 96000)),
            MockStore::ok(),
            MockPreview,
            GainSetting::default(),
        );

        use_case.start().await.unwrap();
        use_case.stop().await.unwrap();

        let info = use_case.save(Collection::Messages).await.unwrap();
        assert_eq!(info.id, "mock-id");
        assert!(use_case.artifact().is_none());
    }

    #[tokio::test]
    async fn failed_upload_keeps_artifact_for_retry() {
        let use_case = RecordMessageUseCase::new(
            ScriptedCapture::new(mono_silence(960, 96000)),
            MockStore::failing(),
            MockPreview,
            GainSetting::default(),
        );

        use_case.start().await.unwrap();
        use_case.stop().await.unwrap();

        let err = use_case.save(Collection::Messages).await.unwrap_err();
        assert!(matches!(err, RecordError::Store(_)));
        assert!(use_case.artifact().is_some());
    }

    #[tokio::test]
    async fn new_start_invalidates_previous_artifact() {
        let use_case = RecordMessageUseCase::new(
            ScriptedCapture::new(mono_silence(960, 96000)),
            MockStore::ok(),
            MockPreview,
            GainSetting::default(),
        );

        use_case.start().await.unwrap();
        use_case.stop().await.unwrap();
        assert!(use_case.artifact().is_some());

        use_case.discard().await.unwrap();
        use_case.start().await.unwrap();
        assert!(use_case.artifact().is_none());
    }

    #[tokio::test]
    async fn save_without_artifact_fails() {
        let use_case = RecordMessageUseCase::new(
            ScriptedCapture::empty(),
            MockStore::ok(),
            MockPreview,
            GainSetting::default(),
        );

        let err = use_case.save(Collection::Records).await.unwrap_err();
        assert!(matches!(err, RecordError::NoArtifact));
    }

    #[tokio::test]
    async fn discard_while_recording_tears_down_the_stream() {
        let capture = ScriptedCapture::new(mono_silence(960, 96000));
        let live = capture.live_flag();
        let use_case = RecordMessageUseCase::new(
            capture,
            MockStore::ok(),
            MockPreview,
            GainSetting::default(),
        );

        use_case.start().await.unwrap();
        assert!(live.load(Ordering::SeqCst));

        use_case.discard().await.unwrap();
        assert!(!live.load(Ordering::SeqCst));
        assert_eq!(use_case.state(), CaptureState::Idle);
    }

    #[tokio::test]
    async fn set_gain_updates_live_value() {
        let use_case = RecordMessageUseCase::new(
            ScriptedCapture::empty(),
            MockStore::ok(),
            MockPreview,
            GainSetting::default(),
        );

        use_case.set_gain(GainSetting::new(1.5));
        assert_eq!(use_case.gain().value(), 1.5);
    }
}
