//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::SpeechConfig;
use crate::domain::duration::Duration;
use crate::domain::error::ConfigError;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    // Validate key
    if !is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    // Validate value based on key type
    validate_config_value(key, value)?;

    // Load existing config
    let mut config = store.load().await?;

    // Update the appropriate field
    match key {
        "api_key" => config.api_key = Some(value.to_string()),
        "model" => config.model = Some(value.to_string()),
        "persona" => config.persona = Some(value.to_string()),
        "reply_timeout" => config.reply_timeout = Some(value.to_string()),
        "log_endpoint" => config.log_endpoint = Some(value.to_string()),
        "muted" => config.muted = Some(parse_bool_config(key, value)?),
        "voice_input" => config.voice_input = Some(parse_bool_config(key, value)?),
        "voice_output" => config.voice_output = Some(parse_bool_config(key, value)?),
        "speech.voice" => {
            let speech = config.speech.get_or_insert_with(SpeechConfig::default);
            speech.voice = Some(value.to_string());
        }
        "speech.rate" => {
            let rate = value
                .parse::<u32>()
                .map_err(|_| ConfigError::ValidationError {
                    key: key.to_string(),
                    message: "Value must be a positive number".to_string(),
                })?;
            let speech = config.speech.get_or_insert_with(SpeechConfig::default);
            speech.rate = Some(rate);
        }
        _ => unreachable!(), // Already validated
    }

    // Save config
    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    // Validate key
    if !is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    let config = store.load().await?;

    let value = match key {
        "api_key" => config.api_key.map(|s| mask_api_key(&s)),
        "model" => config.model,
        "persona" => config.persona,
        "reply_timeout" => config.reply_timeout,
        "log_endpoint" => config.log_endpoint,
        "muted" => config.muted.map(|b| b.to_string()),
        "voice_input" => config.voice_input.map(|b| b.to_string()),
        "voice_output" => config.voice_output.map(|b| b.to_string()),
        "speech.voice" => config.speech.as_ref().and_then(|s| s.voice.clone()),
        "speech.rate" => config
            .speech
            .as_ref()
            .and_then(|s| s.rate)
            .map(|r| r.to_string()),
        _ => unreachable!(),
    };

    match value {
        Some(v) => presenter.output(&v),
        None => presenter.output("(not set)"),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    presenter.key_value(
        "api_key",
        &config
            .api_key
            .map(|s| mask_api_key(&s))
            .unwrap_or_else(|| "(not set)".to_string()),
    );
    presenter.key_value("model", config.model.as_deref().unwrap_or("(not set)"));
    presenter.key_value("persona", config.persona.as_deref().unwrap_or("(not set)"));
    presenter.key_value(
        "muted",
        &config
            .muted
            .map(|b| b.to_string())
            .unwrap_or_else(|| "(not set)".to_string()),
    );
    presenter.key_value(
        "voice_input",
        &config
            .voice_input
            .map(|b| b.to_string())
            .unwrap_or_else(|| "(not set)".to_string()),
    );
    presenter.key_value(
        "voice_output",
        &config
            .voice_output
            .map(|b| b.to_string())
            .unwrap_or_else(|| "(not set)".to_string()),
    );
    presenter.key_value(
        "reply_timeout",
        config.reply_timeout.as_deref().unwrap_or("(not set)"),
    );
    presenter.key_value(
        "log_endpoint",
        config.log_endpoint.as_deref().unwrap_or("(not set)"),
    );
    presenter.key_value(
        "speech.voice",
        config
            .speech
            .as_ref()
            .and_then(|s| s.voice.as_deref())
            .unwrap_or("(not set)"),
    );
    presenter.key_value(
        "speech.rate",
        &config
            .speech
            .as_ref()
            .and_then(|s| s.rate)
            .map(|r| r.to_string())
            .unwrap_or_else(|| "(not set)".to_string()),
    );

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

/// Validate a config value based on key type
fn validate_config_value(key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "reply_timeout" => {
            value
                .parse::<Duration>()
                .map_err(|e| ConfigError::ValidationError {
                    key: key.to_string(),
                    message: e.to_string(),
                })?;
        }
        "muted" | "voice_input" | "voice_output" => {
            parse_bool(value).map_err(|_| ConfigError::ValidationError {
                key: key.to_string(),
                message: "Value must be 'true' or 'false'".to_string(),
            })?;
        }
        "speech.rate" => {
            value
                .parse::<u32>()
                .map_err(|_| ConfigError::ValidationError {
                    key: key.to_string(),
                    message: "Value must be a positive number".to_string(),
                })?;
        }
        _ => {} // string keys accept any value
    }
    Ok(())
}

fn parse_bool_config(key: &str, value: &str) -> Result<bool, ConfigError> {
    parse_bool(value).map_err(|_| ConfigError::ValidationError {
        key: key.to_string(),
        message: "Value must be 'true' or 'false'".to_string(),
    })
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(()),
    }
}

/// Mask API key for display (show first 4 and last 4 chars)
fn mask_api_key(key: &str) -> String {
    if key.len() <= 8 {
        "*".repeat(key.len())
    } else {
        format!("{}...{}", &key[..4], &key[key.len() - 4..])
    }
}
