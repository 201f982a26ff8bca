//! Gemini command processor adapter

use async_trait::async_trait;

use super::client::{GeminiClient, GeminiError};
use crate::application::ports::{CommandProcessor, ProcessingError};
use crate::domain::persona::PersonaPrompt;

/// Command processor backed by Gemini chat with a persona prompt
pub struct GeminiProcessor {
    client: GeminiClient,
    persona: PersonaPrompt,
}

impl GeminiProcessor {
    pub fn new(client: GeminiClient, persona: PersonaPrompt) -> Self {
        Self { client, persona }
    }
}

impl From<GeminiError> for ProcessingError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::InvalidApiKey => Self::InvalidApiKey,
            GeminiError::RateLimited => Self::RateLimited,
            GeminiError::EmptyResponse => Self::EmptyResponse,
            GeminiError::RequestFailed(msg) => Self::RequestFailed(msg),
            GeminiError::ParseError(msg) => Self::ParseError(msg),
            GeminiError::ApiError(msg) => Self::ApiError(msg),
        }
    }
}

#[async_trait]
impl CommandProcessor for GeminiProcessor {
    async fn process(&self, command: &str) -> Result<String, ProcessingError> {
        let reply = self
            .client
            .generate_text(command, &self.persona.system_instruction())
            .await?;
        Ok(reply)
    }
}
