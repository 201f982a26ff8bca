//! No-op capture adapter
//!
//! Used in text-only mode and when no input device exists.

use async_trait::async_trait;

use crate::application::ports::{CaptureError, SpeechCapture};

/// Capture adapter that reports speech input as unavailable
pub struct UnsupportedCapture;

impl UnsupportedCapture {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UnsupportedCapture {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechCapture for UnsupportedCapture {
    fn is_supported(&self) -> bool {
        false
    }

    async fn start(&self) -> Result<(), CaptureError> {
        Err(CaptureError::Unsupported)
    }

    async fn finalize(&self) -> Result<Option<String>, CaptureError> {
        Err(CaptureError::Unsupported)
    }

    async fn stop(&self) -> Result<(), CaptureError> {
        Ok(())
    }

    async fn abort(&self) -> Result<(), CaptureError> {
        Ok(())
    }

    fn is_active(&self) -> bool {
        false
    }
}
