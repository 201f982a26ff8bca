//! Gemini speech-to-text adapter

use super::client::{GeminiClient, GeminiError};
use crate::infrastructure::audio::AudioClip;

/// Transcription system instruction
const TRANSCRIBE_INSTRUCTION: &str = r#"You are a speech-to-text engine. Transcribe the spoken audio into plain text.

Instructions:
- Output ONLY the words that were spoken
- Use correct grammar and punctuation
- Do NOT transcribe stutters, false starts, or filler words (um, ah)
- If the audio contains no intelligible speech, output nothing at all
- Do NOT include meta-commentary or explanations"#;

/// Speech-to-text over the Gemini generateContent endpoint
pub struct GeminiStt {
    client: GeminiClient,
}

impl GeminiStt {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    /// Transcribe one clip. Returns None when nothing intelligible was
    /// spoken, which the model signals with an empty reply.
    pub async fn transcribe(&self, clip: &AudioClip) -> Result<Option<String>, GeminiError> {
        match self
            .client
            .generate_from_audio(clip, TRANSCRIBE_INSTRUCTION)
            .await
        {
            Ok(text) => Ok(Some(text)),
            Err(GeminiError::EmptyResponse) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_demands_transcript_only() {
        assert!(TRANSCRIBE_INSTRUCTION.contains("speech-to-text"));
        assert!(TRANSCRIBE_INSTRUCTION.contains("ONLY the words"));
    }
}
