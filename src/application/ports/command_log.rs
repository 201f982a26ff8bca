//! Command persistence port interface

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::conversation::InputMode;

/// Persistence errors
#[derive(Debug, Clone, Error)]
pub enum PersistenceError {
    #[error("Failed to record command: {0}")]
    RecordFailed(String),

    #[error("Persistence endpoint rejected the record: {0}")]
    Rejected(String),
}

/// One completed command/response pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRecord {
    pub command: String,
    pub response: String,
    pub mode: InputMode,
}

impl CommandRecord {
    pub fn new(command: impl Into<String>, response: impl Into<String>, mode: InputMode) -> Self {
        Self {
            command: command.into(),
            response: response.into(),
            mode,
        }
    }
}

/// Port for best-effort command persistence.
/// Callers fire and forget; a failed record never affects the session.
#[async_trait]
pub trait CommandLog: Send + Sync {
    /// Record a completed command/response pair.
    async fn record(&self, record: &CommandRecord) -> Result<(), PersistenceError>;
}

/// Blanket implementation for boxed command log types
#[async_trait]
impl CommandLog for Box<dyn CommandLog> {
    async fn record(&self, record: &CommandRecord) -> Result<(), PersistenceError> {
        self.as_ref().record(record).await
    }
}
