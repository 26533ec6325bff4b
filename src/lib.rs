//! Doorline - voice message recorder for an intercom base unit
//!
//! This crate records audio from the microphone, conditions it through a gain
//! stage, resamples it to the unit's canonical 96kHz rate, packs it into a
//! 32-bit PCM WAV container, and uploads it to the unit's REST API.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Value objects, the capture state machine, and the pure
//!   audio pipeline (gain, resample, WAV codec)
//! - **Application**: Use cases and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, rodio, HTTP, config)
//! - **CLI**: Command-line interface and argument parsing

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
