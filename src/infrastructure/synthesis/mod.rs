//! Speech synthesis adapters

mod espeak;
mod silent;

pub use espeak::EspeakSpeaker;
pub use silent::SilentSpeaker;

use crate::application::ports::SpeechSynthesizer;

/// Pick the best available synthesizer: espeak when installed, a silent
/// stand-in otherwise.
pub async fn create_synthesizer(voice: &str, rate: u32) -> Box<dyn SpeechSynthesizer> {
    match EspeakSpeaker::detect(voice, rate).await {
        Some(speaker) => Box::new(speaker),
        None => {
            tracing::warn!("espeak not found, speech output disabled");
            Box::new(SilentSpeaker::new())
        }
    }
}
