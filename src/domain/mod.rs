//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod activity;
pub mod config;
pub mod conversation;
pub mod duration;
pub mod error;
pub mod persona;

// Re-export common types
pub use activity::{ActivationToken, ActivitySession, ActivityState, InvalidStateTransition, TokenSeries};
pub use config::AppConfig;
pub use conversation::{ConversationLog, InputMode, Role, Turn};
pub use duration::Duration;
pub use error::*;
pub use persona::{PersonaPrompt, FALLBACK_REPLY};
