//! Gain stage and the shared gain setting

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// A gain scalar bounded to the volume-slider range.
///
/// Values above 1.0 deliberately overdrive the signal; clamping happens only
/// at encode time, so transient overshoot survives the pipeline intact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainSetting(f32);

impl GainSetting {
    pub const MIN: f32 = 0.0;
    pub const MAX: f32 = 2.0;

    /// Create a gain setting, clamped into the slider range.
    pub fn new(value: f32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(&self) -> f32 {
        self.0
    }
}

impl Default for GainSetting {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Shared handle to the live gain value.
///
/// Written from the control flow, read by the audio callback on every chunk.
/// The value is stored as an f32 bit pattern in an atomic; reads see the last
/// write eventually, which is all audio fidelity needs.
#[derive(Debug, Clone)]
pub struct GainControl {
    bits: Arc<AtomicU32>,
}

impl GainControl {
    pub fn new(setting: GainSetting) -> Self {
        Self {
            bits: Arc::new(AtomicU32::new(setting.value().to_bits())),
        }
    }

    /// Takes effect on the next processed chunk; no smoothing or ramping.
    pub fn set(&self, setting: GainSetting) {
        self.bits.store(setting.value().to_bits(), Ordering::Relaxed);
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

impl Default for GainControl {
    fn default() -> Self {
        Self::new(GainSetting::default())
    }
}

/// Apply a gain multiplier to every sample of a frame, in place.
///
/// Pure scalar multiply; no clamping here.
pub fn apply(samples: &mut [f32], gain: f32) {
    for sample in samples {
        *sample *= gain;
    }
}
