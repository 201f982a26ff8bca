//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::duration::Duration;

/// Speech synthesis tuning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechConfig {
    pub voice: Option<String>,
    pub rate: Option<u32>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub persona: Option<String>,
    pub muted: Option<bool>,
    pub voice_input: Option<bool>,
    pub voice_output: Option<bool>,
    pub reply_timeout: Option<String>,
    pub log_endpoint: Option<String>,
    pub speech: Option<SpeechConfig>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            api_key: None,
            model: Some("gemini-2.0-flash".to_string()),
            persona: Some("Jarvis".to_string()),
            muted: Some(false),
            voice_input: Some(true),
            voice_output: Some(true),
            reply_timeout: Some("30s".to_string()),
            log_endpoint: None,
            speech: Some(SpeechConfig {
                voice: Some("en-gb".to_string()),
                rate: Some(175),
            }),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            api_key: other.api_key.or(self.api_key),
            model: other.model.or(self.model),
            persona: other.persona.or(self.persona),
            muted: other.muted.or(self.muted),
            voice_input: other.voice_input.or(self.voice_input),
            voice_output: other.voice_output.or(self.voice_output),
            reply_timeout: other.reply_timeout.or(self.reply_timeout),
            log_endpoint: other.log_endpoint.or(self.log_endpoint),
            speech: Self::merge_speech_config(self.speech, other.speech),
        }
    }

    /// Merge speech config sections
    fn merge_speech_config(
        base: Option<SpeechConfig>,
        other: Option<SpeechConfig>,
    ) -> Option<SpeechConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(SpeechConfig {
                voice: o.voice.or(b.voice),
                rate: o.rate.or(b.rate),
            }),
        }
    }

    /// Get model name, or the default model if not set
    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or("gemini-2.0-flash")
    }

    /// Get persona name, or "Jarvis" if not set
    pub fn persona_or_default(&self) -> &str {
        self.persona.as_deref().unwrap_or("Jarvis")
    }

    /// Get muted setting, or false if not set
    pub fn muted_or_default(&self) -> bool {
        self.muted.unwrap_or(false)
    }

    /// Get voice input setting, or true if not set
    pub fn voice_input_or_default(&self) -> bool {
        self.voice_input.unwrap_or(true)
    }

    /// Get voice output setting, or true if not set
    pub fn voice_output_or_default(&self) -> bool {
        self.voice_output.unwrap_or(true)
    }

    /// Get reply_timeout as parsed Duration, or default if not set/invalid
    pub fn reply_timeout_or_default(&self) -> Duration {
        self.reply_timeout
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_reply_timeout)
    }

    /// Get espeak voice preference, or "en-gb" if not set
    pub fn speech_voice_or_default(&self) -> &str {
        self.speech
            .as_ref()
            .and_then(|s| s.voice.as_deref())
            .unwrap_or("en-gb")
    }

    /// Get speech rate in words per minute, or 175 if not set
    pub fn speech_rate_or_default(&self) -> u32 {
        self.speech.as_ref().and_then(|s| s.rate).unwrap_or(175)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert!(config.api_key.is_none());
        assert_eq!(config.model, Some("gemini-2.0-flash".to_string()));
        assert_eq!(config.persona, Some("Jarvis".to_string()));
        assert_eq!(config.muted, Some(false));
        assert_eq!(config.voice_input, Some(true));
        assert_eq!(config.voice_output, Some(true));
        assert_eq!(config.reply_timeout, Some("30s".to_string()));
        assert!(config.log_endpoint.is_none());
        let speech = config.speech.as_ref().unwrap();
        assert_eq!(speech.voice, Some("en-gb".to_string()));
        assert_eq!(speech.rate, Some(175));
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.api_key.is_none());
        assert!(config.model.is_none());
        assert!(config.persona.is_none());
        assert!(config.muted.is_none());
        assert!(config.speech.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            api_key: Some("base_key".to_string()),
            persona: Some("Jarvis".to_string()),
            model: Some("gemini-2.0-flash".to_string()),
            ..Default::default()
        };

        let other = AppConfig {
            api_key: Some("other_key".to_string()),
            persona: None, // Should not override
            model: Some("gemini-2.5-pro".to_string()),
            ..Default::default()
        };

        let merged = base.merge(other);

        assert_eq!(merged.api_key, Some("other_key".to_string()));
        assert_eq!(merged.persona, Some("Jarvis".to_string())); // Kept from base
        assert_eq!(merged.model, Some("gemini-2.5-pro".to_string()));
    }

    #[test]
    fn merge_preserves_base_when_other_is_none() {
        let base = AppConfig {
            api_key: Some("key".to_string()),
            muted: Some(true),
            ..Default::default()
        };

        let other = AppConfig::empty();
        let merged = base.merge(other);

        assert_eq!(merged.api_key, Some("key".to_string()));
        assert_eq!(merged.muted, Some(true));
    }

    #[test]
    fn reply_timeout_or_default_parses() {
        let config = AppConfig {
            reply_timeout: Some("45s".to_string()),
            ..Default::default()
        };
        assert_eq!(config.reply_timeout_or_default().as_secs(), 45);
    }

    #[test]
    fn reply_timeout_or_default_uses_default_on_invalid() {
        let config = AppConfig {
            reply_timeout: Some("invalid".to_string()),
            ..Default::default()
        };
        assert_eq!(config.reply_timeout_or_default().as_secs(), 30);
    }

    #[test]
    fn reply_timeout_or_default_uses_default_on_none() {
        let config = AppConfig::empty();
        assert_eq!(config.reply_timeout_or_default().as_secs(), 30);
    }

    #[test]
    fn boolean_defaults() {
        let config = AppConfig::empty();
        assert!(!config.muted_or_default());
        assert!(config.voice_input_or_default());
        assert!(config.voice_output_or_default());
    }

    #[test]
    fn speech_defaults() {
        let config = AppConfig::empty();
        assert_eq!(config.speech_voice_or_default(), "en-gb");
        assert_eq!(config.speech_rate_or_default(), 175);
    }

    #[test]
    fn speech_configured_values() {
        let config = AppConfig {
            speech: Some(SpeechConfig {
                voice: Some("en-us".to_string()),
                rate: Some(150),
            }),
            ..Default::default()
        };
        assert_eq!(config.speech_voice_or_default(), "en-us");
        assert_eq!(config.speech_rate_or_default(), 150);
    }

    #[test]
    fn merge_speech_config() {
        let base = AppConfig {
            speech: Some(SpeechConfig {
                voice: Some("en-gb".to_string()),
                rate: Some(175),
            }),
            ..Default::default()
        };
        let other = AppConfig {
            speech: Some(SpeechConfig {
                voice: Some("en-us".to_string()),
                rate: None,
            }),
            ..Default::default()
        };
        let merged = base.merge(other);
        assert_eq!(merged.speech_voice_or_default(), "en-us");
        assert_eq!(merged.speech_rate_or_default(), 175);
    }

    #[test]
    fn merge_speech_config_preserves_base() {
        let base = AppConfig {
            speech: Some(SpeechConfig {
                voice: Some("de".to_string()),
                rate: None,
            }),
            ..Default::default()
        };
        let other = AppConfig::empty();
        let merged = base.merge(other);
        assert_eq!(merged.speech_voice_or_default(), "de");
    }
}
