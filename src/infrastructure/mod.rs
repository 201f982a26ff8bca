//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with external systems like cpal, espeak, Gemini API, etc.

pub mod audio;
pub mod capture;
pub mod command_log;
pub mod config;
pub mod gemini;
pub mod synthesis;

// Re-export adapters
pub use capture::{UnsupportedCapture, VoiceCapture};
pub use command_log::{HttpCommandLog, NoopCommandLog};
pub use config::XdgConfigStore;
pub use gemini::{GeminiClient, GeminiProcessor, GeminiStt};
pub use synthesis::{create_synthesizer, EspeakSpeaker, SilentSpeaker};
