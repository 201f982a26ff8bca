//! Interaction activity state machine and activation tokens

use std::fmt;
use thiserror::Error;

/// Activity states visible to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActivityState {
    #[default]
    Idle,
    Listening,
    Processing,
    Speaking,
}

impl ActivityState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Listening => "listening",
            Self::Processing => "processing",
            Self::Speaking => "speaking",
        }
    }
}

impl fmt::Display for ActivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while in {current_state} state")]
pub struct InvalidStateTransition {
    pub current_state: ActivityState,
    pub action: String,
}

/// Activity session entity.
/// Manages state transitions for one interactive session.
///
/// State machine:
///   IDLE -> LISTENING (begin_listening)
///   SPEAKING -> LISTENING (begin_listening, interrupts the utterance)
///   LISTENING -> IDLE (abort_listening, no transcript)
///   IDLE | LISTENING | SPEAKING -> PROCESSING (begin_processing)
///   PROCESSING -> SPEAKING (begin_speaking)
///   IDLE -> SPEAKING (begin_speaking, unprompted announcement)
///   SPEAKING -> IDLE (finish_speaking)
///   PROCESSING -> IDLE (abort_processing, reply discarded)
#[derive(Debug, Default)]
pub struct ActivitySession {
    state: ActivityState,
}

impl ActivitySession {
    /// Create a new session in idle state
    pub fn new() -> Self {
        Self {
            state: ActivityState::Idle,
        }
    }

    /// Get the current state
    pub fn state(&self) -> ActivityState {
        self.state
    }

    /// Check if currently idle
    pub fn is_idle(&self) -> bool {
        self.state == ActivityState::Idle
    }

    /// Check if currently listening
    pub fn is_listening(&self) -> bool {
        self.state == ActivityState::Listening
    }

    /// Check if currently processing
    pub fn is_processing(&self) -> bool {
        self.state == ActivityState::Processing
    }

    /// Check if currently speaking
    pub fn is_speaking(&self) -> bool {
        self.state == ActivityState::Speaking
    }

    /// Transition into LISTENING from IDLE or SPEAKING
    pub fn begin_listening(&mut self) -> Result<(), InvalidStateTransition> {
        match self.state {
            ActivityState::Idle | ActivityState::Speaking => {
                self.state = ActivityState::Listening;
                Ok(())
            }
            _ => Err(InvalidStateTransition {
                current_state: self.state,
                action: "begin listening".to_string(),
            }),
        }
    }

    /// Transition from LISTENING back to IDLE (no transcript produced)
    pub fn abort_listening(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != ActivityState::Listening {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "abort listening".to_string(),
            });
        }
        self.state = ActivityState::Idle;
        Ok(())
    }

    /// Transition into PROCESSING. Valid from every state except PROCESSING
    /// itself: a new command while speaking interrupts the utterance.
    pub fn begin_processing(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state == ActivityState::Processing {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "begin processing".to_string(),
            });
        }
        self.state = ActivityState::Processing;
        Ok(())
    }

    /// Transition into SPEAKING from PROCESSING, or from IDLE for an
    /// unprompted announcement.
    pub fn begin_speaking(&mut self) -> Result<(), InvalidStateTransition> {
        match self.state {
            ActivityState::Processing | ActivityState::Idle => {
                self.state = ActivityState::Speaking;
                Ok(())
            }
            _ => Err(InvalidStateTransition {
                current_state: self.state,
                action: "begin speaking".to_string(),
            }),
        }
    }

    /// Transition from SPEAKING back to IDLE
    pub fn finish_speaking(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != ActivityState::Speaking {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "finish speaking".to_string(),
            });
        }
        self.state = ActivityState::Idle;
        Ok(())
    }

    /// Transition from PROCESSING back to IDLE, discarding the reply
    pub fn abort_processing(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != ActivityState::Processing {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "abort processing".to_string(),
            });
        }
        self.state = ActivityState::Idle;
        Ok(())
    }
}

/// Token identifying one capture activation or one utterance.
///
/// Completion callbacks carry the token they were issued under; a callback
/// whose token is no longer the active one is stale and must be ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivationToken(u64);

impl fmt::Display for ActivationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic issuer of activation tokens
#[derive(Debug, Default)]
pub struct TokenSeries {
    next: u64,
}

impl TokenSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next token. Every issued token is distinct.
    pub fn issue(&mut self) -> ActivationToken {
        self.next += 1;
        ActivationToken(self.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_idle() {
        let session = ActivitySession::new();
        assert!(session.is_idle());
        assert!(!session.is_listening());
        assert!(!session.is_processing());
        assert!(!session.is_speaking());
    }

    #[test]
    fn begin_listening_from_idle() {
        let mut session = ActivitySession::new();
        assert!(session.begin_listening().is_ok());
        assert!(session.is_listening());
    }

    #[test]
    fn begin_listening_from_listening_fails() {
        let mut session = ActivitySession::new();
        session.begin_listening().unwrap();

        let err = session.begin_listening().unwrap_err();
        assert_eq!(err.current_state, ActivityState::Listening);
        assert!(err.action.contains("begin listening"));
    }

    #[test]
    fn begin_listening_from_processing_fails() {
        let mut session = ActivitySession::new();
        session.begin_processing().unwrap();

        let err = session.begin_listening().unwrap_err();
        assert_eq!(err.current_state, ActivityState::Processing);
    }

    #[test]
    fn begin_listening_from_speaking_interrupts() {
        let mut session = ActivitySession::new();
        session.begin_processing().unwrap();
        session.begin_speaking().unwrap();

        assert!(session.begin_listening().is_ok());
        assert!(session.is_listening());
    }

    #[test]
    fn abort_listening_returns_to_idle() {
        let mut session = ActivitySession::new();
        session.begin_listening().unwrap();

        assert!(session.abort_listening().is_ok());
        assert!(session.is_idle());
    }

    #[test]
    fn abort_listening_from_idle_fails() {
        let mut session = ActivitySession::new();

        let err = session.abort_listening().unwrap_err();
        assert_eq!(err.current_state, ActivityState::Idle);
    }

    #[test]
    fn begin_processing_from_idle() {
        let mut session = ActivitySession::new();
        assert!(session.begin_processing().is_ok());
        assert!(session.is_processing());
    }

    #[test]
    fn begin_processing_from_listening() {
        let mut session = ActivitySession::new();
        session.begin_listening().unwrap();

        assert!(session.begin_processing().is_ok());
        assert!(session.is_processing());
    }

    #[test]
    fn begin_processing_from_speaking_interrupts() {
        let mut session = ActivitySession::new();
        session.begin_processing().unwrap();
        session.begin_speaking().unwrap();

        assert!(session.begin_processing().is_ok());
        assert!(session.is_processing());
    }

    #[test]
    fn begin_processing_while_processing_fails() {
        let mut session = ActivitySession::new();
        session.begin_processing().unwrap();

        let err = session.begin_processing().unwrap_err();
        assert_eq!(err.current_state, ActivityState::Processing);
    }

    #[test]
    fn begin_speaking_from_processing() {
        let mut session = ActivitySession::new();
        session.begin_processing().unwrap();

        assert!(session.begin_speaking().is_ok());
        assert!(session.is_speaking());
    }

    #[test]
    fn begin_speaking_from_idle_announcement() {
        let mut session = ActivitySession::new();
        assert!(session.begin_speaking().is_ok());
        assert!(session.is_speaking());
    }

    #[test]
    fn begin_speaking_from_listening_fails() {
        let mut session = ActivitySession::new();
        session.begin_listening().unwrap();

        let err = session.begin_speaking().unwrap_err();
        assert_eq!(err.current_state, ActivityState::Listening);
    }

    #[test]
    fn finish_speaking_returns_to_idle() {
        let mut session = ActivitySession::new();
        session.begin_processing().unwrap();
        session.begin_speaking().unwrap();

        assert!(session.finish_speaking().is_ok());
        assert!(session.is_idle());
    }

    #[test]
    fn finish_speaking_from_idle_fails() {
        let mut session = ActivitySession::new();

        let err = session.finish_speaking().unwrap_err();
        assert_eq!(err.current_state, ActivityState::Idle);
    }

    #[test]
    fn abort_processing_returns_to_idle() {
        let mut session = ActivitySession::new();
        session.begin_processing().unwrap();

        assert!(session.abort_processing().is_ok());
        assert!(session.is_idle());
    }

    #[test]
    fn full_voice_cycle() {
        let mut session = ActivitySession::new();
        assert!(session.is_idle());

        session.begin_listening().unwrap();
        assert!(session.is_listening());

        session.begin_processing().unwrap();
        assert!(session.is_processing());

        session.begin_speaking().unwrap();
        assert!(session.is_speaking());

        session.finish_speaking().unwrap();
        assert!(session.is_idle());

        // Can start another cycle
        session.begin_listening().unwrap();
        assert!(session.is_listening());
    }

    #[test]
    fn state_display() {
        assert_eq!(ActivityState::Idle.to_string(), "idle");
        assert_eq!(ActivityState::Listening.to_string(), "listening");
        assert_eq!(ActivityState::Processing.to_string(), "processing");
        assert_eq!(ActivityState::Speaking.to_string(), "speaking");
    }

    #[test]
    fn error_display() {
        let err = InvalidStateTransition {
            current_state: ActivityState::Speaking,
            action: "finish speaking".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("finish speaking"));
        assert!(msg.contains("speaking"));
    }

    #[test]
    fn tokens_are_monotonic_and_distinct() {
        let mut series = TokenSeries::new();
        let a = series.issue();
        let b = series.issue();
        let c = series.issue();
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }
}
