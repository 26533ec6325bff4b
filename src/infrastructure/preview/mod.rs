//! Preview playback infrastructure module

mod noop;
mod rodio;

pub use self::rodio::RodioPreview;
pub use noop::NoOpPreview;
