//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};

/// VoxButler - voice-driven AI assistant
#[derive(Parser, Debug)]
#[command(name = "voxbutler")]
#[command(version = "1.0.0")]
#[command(about = "Voice-driven AI assistant using Google Gemini")]
#[command(long_about = None)]
pub struct Cli {
    /// Gemini API key (overrides config file)
    #[arg(long, value_name = "KEY", env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Gemini model to use
    #[arg(short = 'm', long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Assistant persona name
    #[arg(short = 'p', long, value_name = "NAME")]
    pub persona: Option<String>,

    /// Start with spoken replies muted
    #[arg(long)]
    pub muted: bool,

    /// Disable voice capture, typed commands only
    #[arg(short = 't', long)]
    pub text_only: bool,

    /// Speech synthesis voice (e.g., en-gb)
    #[arg(long, value_name = "VOICE")]
    pub speech_voice: Option<String>,

    /// Speech synthesis rate in words per minute
    #[arg(long, value_name = "WPM")]
    pub speech_rate: Option<u32>,

    /// Endpoint for command history persistence
    #[arg(long, value_name = "URL")]
    pub log_endpoint: Option<String>,

    /// Reply timeout (e.g., 30s, 1m)
    #[arg(long, value_name = "TIME")]
    pub reply_timeout: Option<String>,

    /// Subcommand (omit for an interactive session)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask a single question and print the reply
    Ask {
        /// Command text
        text: Vec<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "api_key",
    "model",
    "persona",
    "muted",
    "voice_input",
    "voice_output",
    "reply_timeout",
    "log_endpoint",
    "speech.voice",
    "speech.rate",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::parse_from(["voxbutler"]);
        assert!(cli.model.is_none());
        assert!(cli.persona.is_none());
        assert!(!cli.muted);
        assert!(!cli.text_only);
        assert!(cli.speech_voice.is_none());
        assert!(cli.speech_rate.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn cli_parses_persona() {
        let cli = Cli::parse_from(["voxbutler", "-p", "Friday"]);
        assert_eq!(cli.persona, Some("Friday".to_string()));
    }

    #[test]
    fn cli_parses_flags() {
        let cli = Cli::parse_from(["voxbutler", "--muted", "-t"]);
        assert!(cli.muted);
        assert!(cli.text_only);
    }

    #[test]
    fn cli_parses_speech_tuning() {
        let cli = Cli::parse_from(["voxbutler", "--speech-voice", "en-us", "--speech-rate", "150"]);
        assert_eq!(cli.speech_voice, Some("en-us".to_string()));
        assert_eq!(cli.speech_rate, Some(150));
    }

    #[test]
    fn cli_parses_ask() {
        let cli = Cli::parse_from(["voxbutler", "ask", "what", "time", "is", "it"]);
        if let Some(Commands::Ask { text }) = cli.command {
            assert_eq!(text.join(" "), "what time is it");
        } else {
            panic!("Expected Ask command");
        }
    }

    #[test]
    fn cli_parses_config_init() {
        let cli = Cli::parse_from(["voxbutler", "config", "init"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                action: ConfigAction::Init
            })
        ));
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["voxbutler", "config", "set", "persona", "Friday"]);
        if let Some(Commands::Config {
            action: ConfigAction::Set { key, value },
        }) = cli.command
        {
            assert_eq!(key, "persona");
            assert_eq!(value, "Friday");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("api_key"));
        assert!(is_valid_config_key("speech.voice"));
        assert!(is_valid_config_key("speech.rate"));
        assert!(!is_valid_config_key("invalid_key"));
    }

    #[test]
    fn verify_cli() {
        // Verify the CLI definition is valid
        Cli::command().debug_assert();
    }
}
