//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod capture;
pub mod config;
pub mod preview;
pub mod store;

// Re-export common types
pub use capture::{AudioCapture, CaptureError};
pub use config::ConfigStore;
pub use preview::{PreviewError, PreviewPlayer};
pub use store::{RecordingStore, SettingsGateway, StoreError};
