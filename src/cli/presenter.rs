//! CLI presenter for output formatting

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::activity::ActivityState;
use crate::domain::conversation::{Role, Turn};

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
    is_spinner_active: Arc<AtomicBool>,
    persona: String,
}

impl Presenter {
    /// Create a new presenter
    pub fn new(persona: impl Into<String>) -> Self {
        Self {
            spinner: None,
            is_spinner_active: Arc::new(AtomicBool::new(false)),
            persona: persona.into(),
        }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
        self.is_spinner_active.store(true, Ordering::SeqCst);
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
        self.is_spinner_active.store(false, Ordering::SeqCst);
    }

    /// Render a session state change
    pub fn state_changed(&mut self, state: ActivityState) {
        match state {
            ActivityState::Listening => {
                self.stop_spinner();
                self.info("Listening... press Enter or type /talk to stop");
            }
            ActivityState::Processing => {
                self.start_spinner("Thinking...");
            }
            ActivityState::Speaking | ActivityState::Idle => {
                self.stop_spinner();
            }
        }
    }

    /// Render a conversation turn
    pub fn turn(&mut self, turn: &Turn) {
        self.stop_spinner();
        match turn.role {
            Role::User => {
                // Typed commands are already visible at the prompt, but voice
                // transcripts are not. Echo every user turn for a uniform log.
                self.output(&format!("{} {}", "you>".bold(), turn.content));
            }
            Role::Assistant => {
                self.output(&format!(
                    "{} {}",
                    format!("{}>", self.persona).cyan().bold(),
                    turn.content
                ));
            }
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new("Jarvis")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::Turn;

    #[test]
    fn turn_rendering_does_not_panic() {
        let mut presenter = Presenter::new("Jarvis");
        presenter.turn(&Turn::user("hello"));
        presenter.turn(&Turn::assistant("Good evening, sir."));
    }

    #[test]
    fn state_changes_do_not_panic() {
        let mut presenter = Presenter::new("Jarvis");
        presenter.state_changed(ActivityState::Listening);
        presenter.state_changed(ActivityState::Processing);
        presenter.state_changed(ActivityState::Speaking);
        presenter.state_changed(ActivityState::Idle);
    }
}
