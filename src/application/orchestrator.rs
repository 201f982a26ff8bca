//! Interaction orchestration use case
//!
//! Sequences speech capture, command processing, and speech synthesis for
//! one conversational session. The orchestrator owns the activity state
//! machine and the conversation log; adapters never see either.
//!
//! Every capture session and every utterance is tagged with an activation
//! token. A completion arriving with a token that is no longer active
//! belongs to a superseded activation and is dropped, which is what makes
//! interruption safe: cancelled audio can finish late without corrupting
//! the session.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};

use crate::domain::activity::{
    ActivationToken, ActivitySession, ActivityState, InvalidStateTransition, TokenSeries,
};
use crate::domain::conversation::{ConversationLog, InputMode, Turn};
use crate::domain::duration::Duration;
use crate::domain::persona::PersonaPrompt;

use super::ports::{
    CaptureError, CommandLog, CommandProcessor, CommandRecord, ProcessingError, SpeechCapture,
    SpeechSynthesizer,
};

/// Errors from the orchestrator use case
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("Invalid state transition: {0}")]
    InvalidState(#[from] InvalidStateTransition),
}

/// Observable session happenings, emitted for presentation only.
/// Delivery is best-effort and never influences orchestration.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    State(ActivityState),
    Turn(Turn),
}

/// Configuration for an interactive session
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Assistant persona (greeting, fallback reply)
    pub persona: PersonaPrompt,
    /// Bound on a single processor reply; None disables the bound
    pub reply_timeout: Option<Duration>,
    /// Initial mute flag
    pub muted: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            persona: PersonaPrompt::default(),
            reply_timeout: Some(Duration::default_reply_timeout()),
            muted: false,
        }
    }
}

/// State guarded by one lock: the state machine, the log, the mute flag,
/// and the active activation tokens.
struct SessionInner {
    session: ActivitySession,
    log: ConversationLog,
    muted: bool,
    capture_tokens: TokenSeries,
    speech_tokens: TokenSeries,
    active_capture: Option<ActivationToken>,
    active_speech: Option<ActivationToken>,
}

/// Interaction orchestrator over the four session ports.
/// Cheap to clone; clones share the same session.
pub struct Orchestrator<C, S, P, L> {
    capture: Arc<C>,
    synthesizer: Arc<S>,
    processor: Arc<P>,
    command_log: Arc<L>,
    inner: Arc<Mutex<SessionInner>>,
    events: mpsc::UnboundedSender<SessionEvent>,
    config: Arc<OrchestratorConfig>,
}

impl<C, S, P, L> Clone for Orchestrator<C, S, P, L> {
    fn clone(&self) -> Self {
        Self {
            capture: Arc::clone(&self.capture),
            synthesizer: Arc::clone(&self.synthesizer),
            processor: Arc::clone(&self.processor),
            command_log: Arc::clone(&self.command_log),
            inner: Arc::clone(&self.inner),
            events: self.events.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

impl<C, S, P, L> Orchestrator<C, S, P, L>
where
    C: SpeechCapture + 'static,
    S: SpeechSynthesizer + 'static,
    P: CommandProcessor + 'static,
    L: CommandLog + 'static,
{
    /// Create a new orchestrator and the event stream for its observers
    pub fn new(
        capture: C,
        synthesizer: S,
        processor: P,
        command_log: L,
        config: OrchestratorConfig,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let muted = config.muted;
        let orchestrator = Self {
            capture: Arc::new(capture),
            synthesizer: Arc::new(synthesizer),
            processor: Arc::new(processor),
            command_log: Arc::new(command_log),
            inner: Arc::new(Mutex::new(SessionInner {
                session: ActivitySession::new(),
                log: ConversationLog::new(),
                muted,
                capture_tokens: TokenSeries::new(),
                speech_tokens: TokenSeries::new(),
                active_capture: None,
                active_speech: None,
            })),
            events,
            config: Arc::new(config),
        };
        (orchestrator, receiver)
    }

    /// Get current activity state
    pub async fn state(&self) -> ActivityState {
        self.inner.lock().await.session.state()
    }

    /// Get a snapshot of the conversation log
    pub async fn log(&self) -> Vec<Turn> {
        self.inner.lock().await.log.turns().to_vec()
    }

    /// Get the current mute flag
    pub async fn is_muted(&self) -> bool {
        self.inner.lock().await.muted
    }

    /// Begin a push-to-talk capture session.
    ///
    /// No-op while already listening or while a command is processing.
    /// While speaking, the in-flight utterance is cancelled first. A
    /// capture backend failure leaves the session idle.
    pub async fn activate_capture(&self) -> Result<(), OrchestratorError> {
        if !self.capture.is_supported() {
            return Err(CaptureError::Unsupported.into());
        }

        let (token, interrupted) = {
            let mut inner = self.inner.lock().await;
            match inner.session.state() {
                ActivityState::Listening | ActivityState::Processing => return Ok(()),
                _ => {}
            }
            let interrupted = inner.active_speech.take().is_some();
            inner.session.begin_listening()?;
            let token = inner.capture_tokens.issue();
            inner.active_capture = Some(token);
            self.emit(SessionEvent::State(ActivityState::Listening));
            (token, interrupted)
        };

        if interrupted {
            let _ = self.synthesizer.cancel().await;
        }

        if let Err(err) = self.capture.start().await {
            let mut inner = self.inner.lock().await;
            if inner.active_capture == Some(token) {
                inner.active_capture = None;
                let _ = inner.session.abort_listening();
                self.emit(SessionEvent::State(ActivityState::Idle));
            }
            return Err(err.into());
        }

        let this = self.clone();
        tokio::spawn(async move {
            let result = this.capture.finalize().await;
            this.on_capture_finalized(token, result).await;
        });

        Ok(())
    }

    /// Request early termination of the active capture session.
    /// No-op unless listening. A transcript produced anyway is still
    /// processed.
    pub async fn deactivate_capture(&self) -> Result<(), OrchestratorError> {
        {
            let inner = self.inner.lock().await;
            if !inner.session.is_listening() || inner.active_capture.is_none() {
                return Ok(());
            }
        }
        if let Err(err) = self.capture.stop().await {
            tracing::warn!(error = %err, "failed to stop capture session");
        }
        Ok(())
    }

    /// Submit a command for processing.
    ///
    /// Whitespace-only input is a no-op. Ignored while a command is
    /// already processing, and typed input is ignored while listening.
    /// Submitting while speaking interrupts the utterance. The user turn
    /// is logged before the processor runs; a processor failure or
    /// timeout substitutes the fixed fallback reply.
    pub async fn submit_command(
        &self,
        text: &str,
        mode: InputMode,
    ) -> Result<(), OrchestratorError> {
        let command = text.trim();
        if command.is_empty() {
            return Ok(());
        }

        let interrupted = {
            let mut inner = self.inner.lock().await;
            match inner.session.state() {
                ActivityState::Processing => return Ok(()),
                ActivityState::Listening if mode == InputMode::Text => return Ok(()),
                _ => {}
            }
            let interrupted = inner.active_speech.take().is_some();
            let turn = inner.log.append(Turn::user(command));
            self.emit(SessionEvent::Turn(turn));
            inner.session.begin_processing()?;
            self.emit(SessionEvent::State(ActivityState::Processing));
            interrupted
        };

        if interrupted {
            let _ = self.synthesizer.cancel().await;
        }

        let reply = self.process_command(command).await;
        self.finish_turn(command.to_string(), reply, mode).await
    }

    /// Speak an unprompted announcement from idle, logging it as an
    /// assistant turn. Used for the session greeting.
    pub async fn announce(&self, text: &str) -> Result<(), OrchestratorError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }

        let token = {
            let mut inner = self.inner.lock().await;
            if !inner.session.is_idle() {
                return Ok(());
            }
            let turn = inner.log.append(Turn::assistant(text));
            self.emit(SessionEvent::Turn(turn));
            if inner.muted {
                None
            } else {
                inner.session.begin_speaking()?;
                self.emit(SessionEvent::State(ActivityState::Speaking));
                let token = inner.speech_tokens.issue();
                inner.active_speech = Some(token);
                Some(token)
            }
        };

        if let Some(token) = token {
            self.spawn_utterance(text.to_string(), token);
        }
        Ok(())
    }

    /// Set the mute flag. Muting mid-utterance cancels the audio; the
    /// logged turns are untouched.
    pub async fn set_muted(&self, muted: bool) -> bool {
        let interrupted = {
            let mut inner = self.inner.lock().await;
            inner.muted = muted;
            if muted && inner.session.is_speaking() {
                inner.active_speech = None;
                let _ = inner.session.finish_speaking();
                self.emit(SessionEvent::State(ActivityState::Idle));
                true
            } else {
                false
            }
        };
        if interrupted {
            let _ = self.synthesizer.cancel().await;
        }
        muted
    }

    /// Flip the mute flag, returning the new value
    pub async fn toggle_mute(&self) -> bool {
        let target = !self.inner.lock().await.muted;
        self.set_muted(target).await
    }

    /// Tear down the session: abort capture, cancel synthesis, return to
    /// idle. The conversation log survives until the orchestrator drops.
    pub async fn shutdown(&self) {
        {
            let mut inner = self.inner.lock().await;
            inner.active_capture = None;
            inner.active_speech = None;
        }
        if self.capture.is_active() {
            if let Err(err) = self.capture.abort().await {
                tracing::debug!(error = %err, "capture abort failed during shutdown");
            }
        }
        let _ = self.synthesizer.cancel().await;

        let mut inner = self.inner.lock().await;
        match inner.session.state() {
            ActivityState::Listening => {
                let _ = inner.session.abort_listening();
            }
            ActivityState::Speaking => {
                let _ = inner.session.finish_speaking();
            }
            ActivityState::Processing => {
                let _ = inner.session.abort_processing();
            }
            ActivityState::Idle => {}
        }
        self.emit(SessionEvent::State(ActivityState::Idle));
    }

    /// Resolve a finished capture session. Stale tokens are dropped.
    async fn on_capture_finalized(
        &self,
        token: ActivationToken,
        result: Result<Option<String>, CaptureError>,
    ) {
        {
            let mut inner = self.inner.lock().await;
            if inner.active_capture != Some(token) {
                tracing::debug!(token = %token, "stale capture completion ignored");
                return;
            }
            inner.active_capture = None;
        }

        let transcript = match result {
            Ok(Some(text)) if !text.trim().is_empty() => Some(text),
            Ok(_) => None,
            Err(err) => {
                tracing::warn!(error = %err, "speech capture failed");
                None
            }
        };

        match transcript {
            Some(text) => {
                if let Err(err) = self.submit_command(&text, InputMode::Voice).await {
                    tracing::warn!(error = %err, "failed to submit captured command");
                }
            }
            None => {
                let mut inner = self.inner.lock().await;
                if inner.session.is_listening() {
                    let _ = inner.session.abort_listening();
                    self.emit(SessionEvent::State(ActivityState::Idle));
                }
            }
        }
    }

    /// Run the processor under the reply timeout, funnelling every
    /// failure into the fixed fallback reply.
    async fn process_command(&self, command: &str) -> String {
        let result = match self.config.reply_timeout {
            Some(limit) => {
                match tokio::time::timeout(limit.as_std(), self.processor.process(command)).await {
                    Ok(res) => res,
                    Err(_) => Err(ProcessingError::TimedOut(limit.as_secs())),
                }
            }
            None => self.processor.process(command).await,
        };

        match result {
            Ok(reply) if !reply.trim().is_empty() => reply,
            Ok(_) => {
                tracing::warn!("processor returned an empty reply");
                self.config.persona.fallback_reply().to_string()
            }
            Err(err) => {
                tracing::warn!(error = %err, "command processing failed");
                self.config.persona.fallback_reply().to_string()
            }
        }
    }

    /// Log the assistant turn, start speaking unless muted, and record
    /// the command pair without awaiting the persistence call.
    async fn finish_turn(
        &self,
        command: String,
        reply: String,
        mode: InputMode,
    ) -> Result<(), OrchestratorError> {
        let token = {
            let mut inner = self.inner.lock().await;
            let turn = inner.log.append(Turn::assistant(reply.clone()));
            self.emit(SessionEvent::Turn(turn));
            inner.session.begin_speaking()?;
            self.emit(SessionEvent::State(ActivityState::Speaking));
            if inner.muted {
                inner.session.finish_speaking()?;
                self.emit(SessionEvent::State(ActivityState::Idle));
                None
            } else {
                let token = inner.speech_tokens.issue();
                inner.active_speech = Some(token);
                Some(token)
            }
        };

        let record = CommandRecord::new(command, reply.clone(), mode);
        let command_log = Arc::clone(&self.command_log);
        tokio::spawn(async move {
            if let Err(err) = command_log.record(&record).await {
                tracing::debug!(error = %err, "command persistence failed");
            }
        });

        if let Some(token) = token {
            self.spawn_utterance(reply, token);
        }
        Ok(())
    }

    /// Play one utterance in the background and resolve its token
    fn spawn_utterance(&self, text: String, token: ActivationToken) {
        let this = self.clone();
        tokio::spawn(async move {
            if let Err(err) = this.synthesizer.speak(&text).await {
                tracing::warn!(error = %err, "speech synthesis failed");
            }
            this.on_utterance_finished(token).await;
        });
    }

    /// Resolve a finished (or cancelled) utterance. Stale tokens are
    /// dropped, which is how interrupted utterances die quietly.
    async fn on_utterance_finished(&self, token: ActivationToken) {
        let mut inner = self.inner.lock().await;
        if inner.active_speech != Some(token) {
            tracing::debug!(token = %token, "stale utterance completion ignored");
            return;
        }
        inner.active_speech = None;
        if inner.session.is_speaking() {
            let _ = inner.session.finish_speaking();
            self.emit(SessionEvent::State(ActivityState::Idle));
        }
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }
}
