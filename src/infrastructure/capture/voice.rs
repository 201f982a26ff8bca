//! Microphone + Gemini speech capture adapter

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::application::ports::{CaptureError, SpeechCapture};
use crate::infrastructure::audio::MicRecorder;
use crate::infrastructure::gemini::GeminiStt;

/// Push-to-talk capture: record from the microphone until released,
/// then transcribe the clip.
pub struct VoiceCapture {
    recorder: MicRecorder,
    stt: GeminiStt,
    active: AtomicBool,
    discard: AtomicBool,
    /// Fresh per session so a stale release permit cannot leak across
    release: StdMutex<Arc<Notify>>,
}

impl VoiceCapture {
    pub fn new(recorder: MicRecorder, stt: GeminiStt) -> Self {
        Self {
            recorder,
            stt,
            active: AtomicBool::new(false),
            discard: AtomicBool::new(false),
            release: StdMutex::new(Arc::new(Notify::new())),
        }
    }

    fn release_handle(&self) -> Arc<Notify> {
        Arc::clone(&self.release.lock().unwrap())
    }
}

#[async_trait]
impl SpeechCapture for VoiceCapture {
    fn is_supported(&self) -> bool {
        MicRecorder::has_input_device()
    }

    async fn start(&self) -> Result<(), CaptureError> {
        if self.active.load(Ordering::SeqCst) {
            return Err(CaptureError::AlreadyActive);
        }

        self.recorder.start().await?;
        self.discard.store(false, Ordering::SeqCst);
        *self.release.lock().unwrap() = Arc::new(Notify::new());
        self.active.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn finalize(&self) -> Result<Option<String>, CaptureError> {
        if !self.active.load(Ordering::SeqCst) {
            return Err(CaptureError::NotActive);
        }

        self.release_handle().notified().await;
        self.active.store(false, Ordering::SeqCst);

        if self.discard.load(Ordering::SeqCst) {
            self.recorder.cancel().await?;
            return Ok(None);
        }

        let clip = match self.recorder.stop().await? {
            Some(clip) => clip,
            None => return Ok(None),
        };

        self.stt
            .transcribe(&clip)
            .await
            .map_err(|e| CaptureError::CaptureFailed(e.to_string()))
    }

    async fn stop(&self) -> Result<(), CaptureError> {
        self.release_handle().notify_one();
        Ok(())
    }

    async fn abort(&self) -> Result<(), CaptureError> {
        self.discard.store(true, Ordering::SeqCst);
        self.release_handle().notify_one();
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}
