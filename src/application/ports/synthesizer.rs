//! Speech synthesis port interface

use async_trait::async_trait;
use thiserror::Error;

/// Synthesis errors
#[derive(Debug, Clone, Error)]
pub enum SynthesisError {
    #[error("No speech synthesizer available")]
    Unavailable,

    #[error("Failed to start utterance: {0}")]
    StartFailed(String),

    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),
}

/// Port for speech synthesis.
///
/// At most one utterance plays at a time; `speak` implicitly cancels any
/// utterance still in flight rather than queueing behind it. `speak`
/// resolves when playback completes or is cancelled, and the resolver
/// cannot tell the two apart. Callers that need to distinguish them must
/// keep their own bookkeeping.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Speak the given text, cancelling any in-flight utterance first.
    /// Resolves when playback finishes or is cancelled.
    async fn speak(&self, text: &str) -> Result<(), SynthesisError>;

    /// Stop the current utterance immediately. No-op when nothing plays.
    async fn cancel(&self) -> Result<(), SynthesisError>;

    /// Check if an utterance is currently playing
    fn is_speaking(&self) -> bool;
}

/// Blanket implementation for boxed synthesizer types
#[async_trait]
impl SpeechSynthesizer for Box<dyn SpeechSynthesizer> {
    async fn speak(&self, text: &str) -> Result<(), SynthesisError> {
        self.as_ref().speak(text).await
    }

    async fn cancel(&self) -> Result<(), SynthesisError> {
        self.as_ref().cancel().await
    }

    fn is_speaking(&self) -> bool {
        self.as_ref().is_speaking()
    }
}
