//! Assistant persona value object

use chrono::Local;

/// Spoken when the command processor fails for any reason
pub const FALLBACK_REPLY: &str =
    "I'm detecting a network anomaly, sir. Unable to process that request.";

const DEFAULT_PERSONA: &str = "Jarvis";

/// Value object holding the assistant persona.
/// Produces the system prompt for the command processor, the session
/// greeting, and the fixed fallback reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaPrompt {
    name: String,
}

impl PersonaPrompt {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let name = if name.trim().is_empty() {
            DEFAULT_PERSONA.to_string()
        } else {
            name
        };
        Self { name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// System instruction for the command processor. Replies are spoken
    /// aloud, so the prompt forbids markup.
    pub fn system_instruction(&self) -> String {
        format!(
            "You are {name}, a highly advanced AI assistant.\n\
             Keep your responses concise, intelligent, and slightly witty.\n\
             Do not use markdown formatting (like **bold**), just plain text as \
             this will be spoken aloud.\n\
             If asked to do something you can't (like control real world hardware), \
             explain your limitations politely.\n\
             Current Date: {date}",
            name = self.name,
            date = Local::now().format("%a %b %d %Y"),
        )
    }

    /// Announcement spoken when a session starts
    pub fn greeting(&self) -> String {
        format!("{} initialized. Ready for commands.", self.name)
    }

    /// Fixed reply substituted when processing fails
    pub fn fallback_reply(&self) -> &'static str {
        FALLBACK_REPLY
    }
}

impl Default for PersonaPrompt {
    fn default() -> Self {
        Self::new(DEFAULT_PERSONA)
    }
}
