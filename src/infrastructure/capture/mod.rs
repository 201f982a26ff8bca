//! Speech capture adapters

mod unsupported;
mod voice;

pub use unsupported::UnsupportedCapture;
pub use voice::VoiceCapture;
