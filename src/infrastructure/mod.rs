//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with the audio devices and the intercom server.

pub mod capture;
pub mod config;
pub mod preview;
pub mod storage;

// Re-export adapters
pub use capture::CpalCapture;
pub use config::XdgConfigStore;
pub use preview::{NoOpPreview, RodioPreview};
pub use storage::IntercomClient;
