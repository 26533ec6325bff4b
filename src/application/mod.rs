//! Application layer - Use cases and port interfaces
//!
//! Contains the core capture-to-upload operation and trait definitions
//! for external system interactions.

pub mod ports;
pub mod record;

// Re-export use cases
pub use record::{RecordError, RecordMessageUseCase, ENCODE_BIT_DEPTH};
