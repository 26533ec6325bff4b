//! Server storage infrastructure module

mod http;

pub use http::IntercomClient;
