//! No-op speech synthesizer for systems without a speech backend

use async_trait::async_trait;

use crate::application::ports::{SpeechSynthesizer, SynthesisError};

/// Synthesizer that completes every utterance immediately without audio
pub struct SilentSpeaker;

impl SilentSpeaker {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SilentSpeaker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechSynthesizer for SilentSpeaker {
    async fn speak(&self, _text: &str) -> Result<(), SynthesisError> {
        Ok(())
    }

    async fn cancel(&self) -> Result<(), SynthesisError> {
        Ok(())
    }

    fn is_speaking(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn speak_completes_immediately() {
        let speaker = SilentSpeaker::new();
        assert!(speaker.speak("anything").await.is_ok());
        assert!(!speaker.is_speaking());
    }
}
