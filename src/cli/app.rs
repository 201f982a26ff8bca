//! Main app runner for interactive and one-shot modes

use std::env;
use std::process::ExitCode;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::application::ports::{
    CaptureError, CommandLog, ConfigStore, SpeechCapture, SpeechSynthesizer,
};
use crate::application::{Orchestrator, OrchestratorConfig, OrchestratorError, SessionEvent};
use crate::domain::activity::ActivityState;
use crate::domain::config::AppConfig;
use crate::domain::conversation::{InputMode, Role};
use crate::domain::persona::PersonaPrompt;
use crate::infrastructure::audio::MicRecorder;
use crate::infrastructure::{
    create_synthesizer, GeminiClient, GeminiProcessor, GeminiStt, HttpCommandLog, NoopCommandLog,
    SilentSpeaker, UnsupportedCapture, VoiceCapture, XdgConfigStore,
};

use super::args::Cli;
use super::presenter::Presenter;
use super::signals::ShutdownSignal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

type SessionOrchestrator = Orchestrator<
    Box<dyn SpeechCapture>,
    Box<dyn SpeechSynthesizer>,
    GeminiProcessor,
    Box<dyn CommandLog>,
>;

/// Run the interactive session
pub async fn run_session(cli: Cli) -> ExitCode {
    let config = load_merged_config(cli_overrides(&cli)).await;

    let persona = PersonaPrompt::new(config.persona_or_default());
    let mut presenter = Presenter::new(persona.name());

    let api_key = match require_api_key(&config) {
        Ok(key) => key,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let shutdown = ShutdownSignal::new();
    if let Err(e) = shutdown.setup().await {
        presenter.error(&format!("Failed to setup signal handler: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }

    let (orchestrator, mut events) =
        build_orchestrator(&config, &persona, api_key, !cli.text_only).await;

    // Render session events in the background
    let event_task = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                SessionEvent::State(state) => presenter.state_changed(state),
                SessionEvent::Turn(turn) => presenter.turn(&turn),
            }
        }
        presenter
    });

    let errors = Presenter::new(persona.name());
    if let Err(e) = orchestrator.announce(&persona.greeting()).await {
        errors.warn(&format!("Greeting failed: {}", e));
    }
    errors.info("Enter a command, or: /talk  /mute  /log  /quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut voice_hint_shown = false;
    loop {
        if shutdown.is_shutdown() {
            break;
        }

        let line = tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    errors.error(&format!("stdin error: {}", e));
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => break,
        };

        match line.trim() {
            "/quit" | "/exit" => break,
            "" | "/talk" => {
                let result = if orchestrator.state().await == ActivityState::Listening {
                    orchestrator.deactivate_capture().await
                } else {
                    orchestrator.activate_capture().await
                };
                match result {
                    Err(OrchestratorError::Capture(CaptureError::Unsupported)) => {
                        // Normal in text-only mode; hint once, then stay quiet
                        if !voice_hint_shown {
                            errors.info("Voice input is unavailable in this session; type your command instead");
                            voice_hint_shown = true;
                        } else {
                            tracing::debug!("voice toggle ignored, capture unsupported");
                        }
                    }
                    Err(e) => errors.error(&e.to_string()),
                    Ok(()) => {}
                }
            }
            "/mute" => {
                let muted = orchestrator.toggle_mute().await;
                errors.info(if muted { "Muted" } else { "Unmuted" });
            }
            "/log" => {
                for turn in orchestrator.log().await {
                    let speaker = match turn.role {
                        Role::User => "you",
                        Role::Assistant => persona.name(),
                    };
                    errors.output(&format!(
                        "[{}] {}: {}",
                        turn.timestamp.format("%H:%M:%S"),
                        speaker,
                        turn.content
                    ));
                }
            }
            command => {
                if let Err(e) = orchestrator.submit_command(command, InputMode::Text).await {
                    errors.error(&e.to_string());
                }
            }
        }
    }

    orchestrator.shutdown().await;
    drop(orchestrator);
    if let Ok(mut presenter) = event_task.await {
        presenter.stop_spinner();
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// Run a single typed command and print the reply
pub async fn run_ask(text: String, cli: Cli) -> ExitCode {
    let config = load_merged_config(cli_overrides(&cli)).await;
    let persona = PersonaPrompt::new(config.persona_or_default());
    let presenter = Presenter::new(persona.name());

    if text.trim().is_empty() {
        presenter.error("Nothing to ask");
        return ExitCode::from(EXIT_USAGE_ERROR);
    }

    let api_key = match require_api_key(&config) {
        Ok(key) => key,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let client = GeminiClient::with_model(api_key, config.model_or_default());
    let processor = GeminiProcessor::new(client, persona.clone());

    let session_config = OrchestratorConfig {
        persona: persona.clone(),
        reply_timeout: Some(config.reply_timeout_or_default()),
        muted: true,
    };
    let command_log = build_command_log(&config);
    let (orchestrator, _events) = Orchestrator::new(
        Box::new(UnsupportedCapture::new()) as Box<dyn SpeechCapture>,
        Box::new(SilentSpeaker::new()) as Box<dyn SpeechSynthesizer>,
        processor,
        command_log,
        session_config,
    );

    if let Err(e) = orchestrator.submit_command(&text, InputMode::Text).await {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }

    let reply = orchestrator
        .log()
        .await
        .into_iter()
        .rev()
        .find(|turn| turn.role == Role::Assistant);

    match reply {
        Some(turn) => {
            presenter.output(&turn.content);
            ExitCode::from(EXIT_SUCCESS)
        }
        None => {
            presenter.error("No reply");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Assemble the orchestrator from configured adapters
async fn build_orchestrator(
    config: &AppConfig,
    persona: &PersonaPrompt,
    api_key: String,
    allow_voice: bool,
) -> (
    SessionOrchestrator,
    tokio::sync::mpsc::UnboundedReceiver<SessionEvent>,
) {
    let client = GeminiClient::with_model(api_key, config.model_or_default());
    let processor = GeminiProcessor::new(client.clone(), persona.clone());

    let capture: Box<dyn SpeechCapture> = if allow_voice && config.voice_input_or_default() {
        Box::new(VoiceCapture::new(MicRecorder::new(), GeminiStt::new(client)))
    } else {
        Box::new(UnsupportedCapture::new())
    };

    let synthesizer: Box<dyn SpeechSynthesizer> = if config.voice_output_or_default() {
        create_synthesizer(
            config.speech_voice_or_default(),
            config.speech_rate_or_default(),
        )
        .await
    } else {
        Box::new(SilentSpeaker::new())
    };

    let command_log = build_command_log(config);

    let session_config = OrchestratorConfig {
        persona: persona.clone(),
        reply_timeout: Some(config.reply_timeout_or_default()),
        muted: config.muted_or_default(),
    };

    Orchestrator::new(capture, synthesizer, processor, command_log, session_config)
}

fn build_command_log(config: &AppConfig) -> Box<dyn CommandLog> {
    match config.log_endpoint.as_deref() {
        Some(endpoint) if !endpoint.is_empty() => Box::new(HttpCommandLog::new(endpoint)),
        _ => Box::new(NoopCommandLog::new()),
    }
}

fn require_api_key(config: &AppConfig) -> Result<String, String> {
    config.api_key.clone().filter(|k| !k.is_empty()).ok_or_else(|| {
        "Missing API key. Set GEMINI_API_KEY or run 'voxbutler config set api_key <key>'"
            .to_string()
    })
}

/// Build a partial config from CLI flags
fn cli_overrides(cli: &Cli) -> AppConfig {
    AppConfig {
        api_key: cli.api_key.clone().filter(|k| !k.is_empty()),
        model: cli.model.clone(),
        persona: cli.persona.clone(),
        muted: cli.muted.then_some(true),
        voice_input: cli.text_only.then_some(false),
        voice_output: None,
        reply_timeout: cli.reply_timeout.clone(),
        log_endpoint: cli.log_endpoint.clone(),
        speech: match (&cli.speech_voice, cli.speech_rate) {
            (None, None) => None,
            (voice, rate) => Some(crate::domain::config::SpeechConfig {
                voice: voice.clone(),
                rate,
            }),
        },
    }
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    // Build env config
    let env_config = AppConfig {
        api_key: env::var("GEMINI_API_KEY").ok().filter(|s| !s.is_empty()),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}
