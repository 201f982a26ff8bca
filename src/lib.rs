//! VoxButler - voice-driven AI assistant CLI
//!
//! This crate provides an interactive assistant session: speech captured
//! from the microphone is transcribed and dispatched to Google Gemini,
//! and replies are spoken back through espeak.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Core business logic, value objects, entities, and errors
//! - **Application**: The interaction orchestrator and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, Gemini, espeak, etc.)
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
