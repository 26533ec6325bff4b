//! Cross-platform microphone capture using cpal
//!
//! Acquires the default input stream and buffers every callback delivery as
//! one chunk, in arrival order. The gain stage sits between the raw stream
//! and the chunk buffer: each chunk is multiplied by the live gain value
//! before it is stored, so slider movements are audible in the take without
//! interrupting capture.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, StreamConfig};
use tokio::time::Duration as TokioDuration;

use crate::application::ports::{AudioCapture, CaptureError};
use crate::domain::audio::{gain, GainControl, RawCapture};

/// Poll interval while waiting for the capture thread to bring up the stream
const START_POLL_INTERVAL_MS: u64 = 10;
/// Give up on stream acquisition after this many polls
const START_POLL_ATTEMPTS: u32 = 200;

/// Microphone capture adapter backed by cpal.
///
/// The stream is managed on a dedicated thread because cpal::Stream is not
/// Send; the adapter communicates with it through atomics and the shared
/// chunk buffer.
pub struct CpalCapture {
    /// Captured chunks (interleaved f32, post-gain), in arrival order
    chunks: Arc<StdMutex<Vec<Vec<f32>>>>,
    /// Device sample rate, set once the stream is configured
    device_sample_rate: Arc<AtomicU32>,
    /// Device channel count, set once the stream is configured
    device_channels: Arc<AtomicU32>,
    /// Capture state flag
    is_active: Arc<AtomicBool>,
    /// Set by the capture thread once the stream is playing
    is_ready: Arc<AtomicBool>,
    /// Device acquisition error from the capture thread, if any
    start_error: Arc<StdMutex<Option<CaptureError>>>,
    /// Capture start time (millis since epoch, for atomic access)
    start_time_ms: Arc<AtomicU64>,
    /// Elapsed capture time in milliseconds
    elapsed_ms: Arc<AtomicU64>,
}

impl CpalCapture {
    /// Create a new cpal-based capture adapter
    pub fn new() -> Self {
        Self {
            chunks: Arc::new(StdMutex::new(Vec::new())),
            device_sample_rate: Arc::new(AtomicU32::new(0)),
            device_channels: Arc::new(AtomicU32::new(0)),
            is_active: Arc::new(AtomicBool::new(false)),
            is_ready: Arc::new(AtomicBool::new(false)),
            start_error: Arc::new(StdMutex::new(None)),
            start_time_ms: Arc::new(AtomicU64::new(0)),
            elapsed_ms: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Get the default input device
    fn get_input_device() -> Result<cpal::Device, CaptureError> {
        let host = cpal::default_host();
        host.default_input_device()
            .ok_or(CaptureError::DeviceUnavailable)
    }

    /// Get the device's default input configuration
    fn get_input_config(
        device: &cpal::Device,
    ) -> Result<(StreamConfig, SampleFormat), CaptureError> {
        let supported = device
            .default_input_config()
            .map_err(|e| CaptureError::StartFailed(format!("Failed to get config: {}", e)))?;

        let sample_format = supported.sample_format();
        Ok((supported.config(), sample_format))
    }

    /// Convert an i16 device buffer to normalized f32
    fn i16_to_f32(data: &[i16]) -> Vec<f32> {
        data.iter().map(|&s| s as f32 / 32768.0).collect()
    }

    fn now_ms() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    /// Whether a capture is currently active
    pub fn is_active(&self) -> bool {
        self.is_active.load(Ordering::SeqCst)
    }

    /// Wait for the capture thread to report a playing stream or a failure.
    ///
    /// The thread clears `is_active` and records the cause in `start_error`
    /// when device acquisition or stream setup fails at any point, so a slow
    /// failure still surfaces here instead of silently producing an empty
    /// take.
    async fn wait_until_ready(&self) -> Result<(), CaptureError> {
        for _ in 0..START_POLL_ATTEMPTS {
            if self.is_ready.load(Ordering::SeqCst) {
                return Ok(());
            }
            if !self.is_active.load(Ordering::SeqCst) {
                let error = self.start_error.lock().unwrap().take();
                return Err(error.unwrap_or_else(|| {
                    CaptureError::StartFailed("Failed to start capture".to_string())
                }));
            }
            tokio::time::sleep(TokioDuration::from_millis(START_POLL_INTERVAL_MS)).await;
        }

        // Stream never came up; tell the thread to shut down
        self.is_active.store(false, Ordering::SeqCst);
        Err(CaptureError::StartFailed(
            "Timed out waiting for the input stream".to_string(),
        ))
    }
}

impl Default for CpalCapture {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioCapture for CpalCapture {
    async fn start(&self, gain_control: GainControl) -> Result<(), CaptureError> {
        if self.is_active.load(Ordering::SeqCst) {
            return Err(CaptureError::StartFailed(
                "Capture already in progress".to_string(),
            ));
        }

        {
            let mut chunks = self.chunks.lock().unwrap();
            chunks.clear();
        }
        {
            let mut error = self.start_error.lock().unwrap();
            *error = None;
        }

        self.is_active.store(true, Ordering::SeqCst);
        self.is_ready.store(false, Ordering::SeqCst);
        self.start_time_ms.store(Self::now_ms(), Ordering::SeqCst);
        self.elapsed_ms.store(0, Ordering::SeqCst);

        // Clone Arcs for the capture thread
        let chunks = Arc::clone(&self.chunks);
        let device_sample_rate = Arc::clone(&self.device_sample_rate);
        let device_channels = Arc::clone(&self.device_channels);
        let is_active = Arc::clone(&self.is_active);
        let is_ready = Arc::clone(&self.is_ready);
        let start_error = Arc::clone(&self.start_error);
        let start_time_ms = Arc::clone(&self.start_time_ms);
        let elapsed_ms = Arc::clone(&self.elapsed_ms);

        // The stream lives on this thread (cpal::Stream is not Send)
        std::thread::spawn(move || {
            let fail = |error: CaptureError| {
                *start_error.lock().unwrap() = Some(error);
                is_active.store(false, Ordering::SeqCst);
            };

            let device = match CpalCapture::get_input_device() {
                Ok(d) => d,
                Err(e) => return fail(e),
            };

            let (config, sample_format) = match CpalCapture::get_input_config(&device) {
                Ok(c) => c,
                Err(e) => return fail(e),
            };

            device_sample_rate.store(config.sample_rate.0, Ordering::SeqCst);
            device_channels.store(u32::from(config.channels), Ordering::SeqCst);

            let chunks_clone = Arc::clone(&chunks);
            let is_active_clone = Arc::clone(&is_active);
            let gain_clone = gain_control.clone();

            let stream_result = match sample_format {
                SampleFormat::F32 => device.build_input_stream(
                    &config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        if is_active_clone.load(Ordering::SeqCst) {
                            let mut chunk = data.to_vec();
                            gain::apply(&mut chunk, gain_clone.get());
                            if let Ok(mut buffer) = chunks_clone.lock() {
                                buffer.push(chunk);
                            }
                        }
                    },
                    |err| eprintln!("Audio stream error: {}", err),
                    None,
                ),

                SampleFormat::I16 => {
                    let chunks_clone = Arc::clone(&chunks);
                    let is_active_clone = Arc::clone(&is_active);
                    let gain_clone = gain_control.clone();

                    device.build_input_stream(
                        &config,
                        move |data: &[i16], _: &cpal::InputCallbackInfo| {
                            if is_active_clone.load(Ordering::SeqCst) {
                                let mut chunk = CpalCapture::i16_to_f32(data);
                                gain::apply(&mut chunk, gain_clone.get());
                                if let Ok(mut buffer) = chunks_clone.lock() {
                                    buffer.push(chunk);
                                }
                            }
                        },
                        |err| eprintln!("Audio stream error: {}", err),
                        None,
                    )
                }

                other => {
                    return fail(CaptureError::StartFailed(format!(
                        "Unsupported sample format: {:?}",
                        other
                    )))
                }
            };

            let stream = match stream_result {
                Ok(s) => s,
                Err(e) => return fail(CaptureError::StartFailed(e.to_string())),
            };

            if let Err(e) = stream.play() {
                return fail(CaptureError::StartFailed(e.to_string()));
            }

            is_ready.store(true, Ordering::SeqCst);

            // Keep capturing until stopped
            while is_active.load(Ordering::SeqCst) {
                let start = start_time_ms.load(Ordering::SeqCst);
                elapsed_ms.store(
                    CpalCapture::now_ms().saturating_sub(start),
                    Ordering::SeqCst,
                );
                std::thread::sleep(std::time::Duration::from_millis(100));
            }

            drop(stream);
        });

        self.wait_until_ready().await
    }

    async fn stop(&self) -> Result<RawCapture, CaptureError> {
        if !self.is_active.load(Ordering::SeqCst) {
            return Err(CaptureError::CaptureFailed(
                "No capture in progress".to_string(),
            ));
        }

        self.is_active.store(false, Ordering::SeqCst);

        // Give the thread a moment to flush and release the device
        tokio::time::sleep(TokioDuration::from_millis(100)).await;

        let chunks = {
            let mut buffer = self.chunks.lock().unwrap();
            std::mem::take(&mut *buffer)
        };

        Ok(RawCapture {
            chunks,
            channel_count: self.device_channels.load(Ordering::SeqCst) as u16,
            sample_rate: self.device_sample_rate.load(Ordering::SeqCst),
        })
    }

    async fn cancel(&self) -> Result<(), CaptureError> {
        self.is_active.store(false, Ordering::SeqCst);

        tokio::time::sleep(TokioDuration::from_millis(100)).await;

        {
            let mut buffer = self.chunks.lock().unwrap();
            buffer.clear();
        }
        self.elapsed_ms.store(0, Ordering::SeqCst);

        Ok(())
    }

    fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms.load(Ordering::SeqCst)
    }
}
