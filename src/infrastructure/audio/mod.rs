//! Microphone capture and audio encoding

mod flac;
mod mic;

pub use flac::{encode_to_flac, EncodingError, TARGET_SAMPLE_RATE};
pub use mic::MicRecorder;

use base64::{engine::general_purpose::STANDARD, Engine};

/// One recorded utterance, FLAC-encoded for the transcription API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    data: Vec<u8>,
}

impl AudioClip {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub const fn mime_type(&self) -> &'static str {
        "audio/flac"
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_reports_flac_mime_type() {
        let clip = AudioClip::new(vec![1, 2, 3]);
        assert_eq!(clip.mime_type(), "audio/flac");
        assert_eq!(clip.len(), 3);
    }

    #[test]
    fn clip_base64_encodes_payload() {
        let clip = AudioClip::new(b"fLaC".to_vec());
        assert_eq!(clip.to_base64(), "ZkxhQw==");
    }
}
