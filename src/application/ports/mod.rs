//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod capture;
pub mod command_log;
pub mod config;
pub mod processor;
pub mod synthesizer;

// Re-export common types
pub use capture::{CaptureError, SpeechCapture};
pub use command_log::{CommandLog, CommandRecord, PersistenceError};
pub use config::ConfigStore;
pub use processor::{CommandProcessor, ProcessingError};
pub use synthesizer::{SpeechSynthesizer, SynthesisError};
