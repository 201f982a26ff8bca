//! Gemini API adapters
//!
//! One shared generateContent client, used by the speech-to-text adapter
//! and by the command processor.

mod chat;
mod client;
mod stt;

pub use chat::GeminiProcessor;
pub use client::{GeminiClient, GeminiError};
pub use stt::GeminiStt;
