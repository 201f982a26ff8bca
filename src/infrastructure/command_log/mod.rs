//! Command persistence adapters

mod http;
mod noop;

pub use http::HttpCommandLog;
pub use noop::NoopCommandLog;
