//! Speech capture port interface

use async_trait::async_trait;
use thiserror::Error;

/// Capture errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("Speech capture is not supported on this platform")]
    Unsupported,

    #[error("Failed to start capture: {0}")]
    StartFailed(String),

    #[error("A capture session is already active")]
    AlreadyActive,

    #[error("No capture session is active")]
    NotActive,

    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    #[error("No audio device available")]
    NoAudioDevice,
}

/// Port for push-to-talk speech capture.
///
/// A capture session runs from `start` until `finalize` resolves. Each
/// session resolves exactly once: with a transcript, with `None` when
/// nothing usable was heard, or with an error.
#[async_trait]
pub trait SpeechCapture: Send + Sync {
    /// Whether this platform can capture speech at all.
    fn is_supported(&self) -> bool;

    /// Begin a capture session.
    ///
    /// # Returns
    /// `CaptureError::AlreadyActive` if a session is in progress.
    async fn start(&self) -> Result<(), CaptureError>;

    /// Wait for the active session to end and produce its result.
    ///
    /// # Returns
    /// `Ok(Some(transcript))` when speech was recognized, `Ok(None)` when
    /// the session ended without usable speech.
    async fn finalize(&self) -> Result<Option<String>, CaptureError>;

    /// Request early termination of the active session.
    /// `finalize` still resolves, possibly with a transcript.
    async fn stop(&self) -> Result<(), CaptureError>;

    /// Tear down the active session. Never yields a transcript.
    async fn abort(&self) -> Result<(), CaptureError>;

    /// Check if a session is active
    fn is_active(&self) -> bool;
}

/// Blanket implementation for boxed capture types
#[async_trait]
impl SpeechCapture for Box<dyn SpeechCapture> {
    fn is_supported(&self) -> bool {
        self.as_ref().is_supported()
    }

    async fn start(&self) -> Result<(), CaptureError> {
        self.as_ref().start().await
    }

    async fn finalize(&self) -> Result<Option<String>, CaptureError> {
        self.as_ref().finalize().await
    }

    async fn stop(&self) -> Result<(), CaptureError> {
        self.as_ref().stop().await
    }

    async fn abort(&self) -> Result<(), CaptureError> {
        self.as_ref().abort().await
    }

    fn is_active(&self) -> bool {
        self.as_ref().is_active()
    }
}
