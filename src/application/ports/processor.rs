//! Command processing port interface

use async_trait::async_trait;
use thiserror::Error;

/// Processing errors
#[derive(Debug, Clone, Error)]
pub enum ProcessingError {
    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Empty model response")]
    EmptyResponse,

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("No reply within {0} seconds")]
    TimedOut(u64),
}

/// Port for turning a user command into an assistant reply.
/// One opaque async call per command. No retries, no streaming.
#[async_trait]
pub trait CommandProcessor: Send + Sync {
    /// Process a command and produce the reply text.
    async fn process(&self, command: &str) -> Result<String, ProcessingError>;
}
