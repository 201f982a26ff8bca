//! eSpeak speech synthesizer adapter
//!
//! Each utterance is one espeak subprocess playing straight to the audio
//! device. Cancellation kills the child, which stops playback instantly.

use std::process::Stdio;
use std::sync::Mutex as StdMutex;

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tokio::time::{sleep, Duration as TokioDuration};

use crate::application::ports::{SpeechSynthesizer, SynthesisError};

/// How often the playback watcher polls the child
const POLL_INTERVAL_MS: u64 = 50;

/// Speech synthesizer backed by the espeak (or espeak-ng) binary
pub struct EspeakSpeaker {
    command: String,
    voice: String,
    rate: u32,
    /// Current utterance; taking it out of the slot cancels it
    child: StdMutex<Option<Child>>,
}

impl EspeakSpeaker {
    /// Probe for espeak, falling back to espeak-ng.
    /// Returns None when neither binary is installed.
    pub async fn detect(voice: &str, rate: u32) -> Option<Self> {
        let command = Self::espeak_command().await?;
        Some(Self {
            command,
            voice: voice.to_string(),
            rate,
            child: StdMutex::new(None),
        })
    }

    /// Get the espeak command name (espeak or espeak-ng)
    async fn espeak_command() -> Option<String> {
        if Command::new("espeak").arg("--version").output().await.is_ok() {
            Some("espeak".to_string())
        } else if Command::new("espeak-ng")
            .arg("--version")
            .output()
            .await
            .is_ok()
        {
            Some("espeak-ng".to_string())
        } else {
            None
        }
    }

    /// Build espeak command arguments for one utterance
    fn build_args(&self, text: &str) -> Vec<String> {
        vec![
            "-v".to_string(),
            self.voice.clone(),
            "-s".to_string(),
            self.rate.to_string(),
            text.to_string(),
        ]
    }

    /// Take the current child out of the slot, if any
    fn take_child(&self) -> Option<Child> {
        self.child.lock().unwrap().take()
    }
}

#[async_trait]
impl SpeechSynthesizer for EspeakSpeaker {
    async fn speak(&self, text: &str) -> Result<(), SynthesisError> {
        // One utterance at a time
        self.cancel().await?;

        let child = Command::new(&self.command)
            .args(self.build_args(text))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SynthesisError::StartFailed(e.to_string()))?;

        let id = child.id();
        *self.child.lock().unwrap() = Some(child);

        // Poll until the child exits or another utterance takes the slot
        loop {
            sleep(TokioDuration::from_millis(POLL_INTERVAL_MS)).await;

            let mut guard = self.child.lock().unwrap();
            match guard.as_mut() {
                None => break, // cancelled
                Some(current) if current.id() != id => break, // superseded
                Some(current) => match current.try_wait() {
                    Ok(Some(_status)) => {
                        guard.take();
                        break;
                    }
                    Ok(None) => {}
                    Err(err) => {
                        guard.take();
                        return Err(SynthesisError::SynthesisFailed(err.to_string()));
                    }
                },
            }
        }

        Ok(())
    }

    async fn cancel(&self) -> Result<(), SynthesisError> {
        if let Some(mut child) = self.take_child() {
            let _ = child.start_kill();
            let _ = child.wait().await;
        }
        Ok(())
    }

    fn is_speaking(&self) -> bool {
        self.child.lock().unwrap().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn speaker() -> EspeakSpeaker {
        EspeakSpeaker {
            command: "espeak".to_string(),
            voice: "en-gb".to_string(),
            rate: 175,
            child: StdMutex::new(None),
        }
    }

    #[test]
    fn build_args_sets_voice_and_rate() {
        let args = speaker().build_args("Hello, sir.");
        assert_eq!(
            args,
            vec!["-v", "en-gb", "-s", "175", "Hello, sir."]
        );
    }

    #[test]
    fn idle_speaker_is_not_speaking() {
        assert!(!speaker().is_speaking());
    }

    #[tokio::test]
    async fn cancel_without_utterance_is_ok() {
        assert!(speaker().cancel().await.is_ok());
    }
}
