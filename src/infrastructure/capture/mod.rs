//! Capture infrastructure module
//!
//! Cross-platform microphone capture using cpal, with the gain stage wired
//! into the stream callback.

mod cpal_capture;

pub use cpal_capture::CpalCapture;
