//! Chat history as stored for a session, and the text shown when the
//! completion provider fails.

use std::fmt;
use std::io::{self, Write};
use std::path::Path;

use codespan_reporting::term::termcolor::WriteColor;
use serde::Deserialize;

use crate::error::RenderError;
use crate::terminal;
use crate::theme::Theme;

/// Longest prefix of the first message used as a session title.
pub const TITLE_CHARS: usize = 30;

/// Replaces provider failure messages that mention the provider by name.
pub const MASKED_FAILURE: &str = "Connection interrupted";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        ChatMessage {
            role,
            content: content.into(),
        }
    }
}

/// An append-only message log, oldest first.
///
/// On disk it is a TOML document of `[[message]]` tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Transcript {
    #[serde(default, rename = "message")]
    pub messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn from_toml(source: &str) -> Result<Transcript, RenderError> {
        toml::from_str(source).map_err(|e| RenderError::Transcript(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Transcript, RenderError> {
        let source = std::fs::read_to_string(path)?;
        let transcript = Transcript::from_toml(&source)?;
        tracing::debug!(
            path = %path.display(),
            messages = transcript.messages.len(),
            "loaded transcript"
        );
        Ok(transcript)
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Messages worth sending back to the provider: blank ones are dropped.
    pub fn history(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter().filter(|m| !m.content.trim().is_empty())
    }

    /// Title for the session, taken from the first user message.
    pub fn title(&self) -> Option<String> {
        self.messages
            .iter()
            .find(|m| m.role == Role::User)
            .map(|m| session_title(&m.content))
    }

    /// Write every message under a role header. Only assistant replies go
    /// through the markdown renderer.
    pub fn render(&self, out: &mut dyn WriteColor, theme: &Theme) -> io::Result<()> {
        for (index, message) in self.history().enumerate() {
            if index > 0 {
                writeln!(out)?;
            }
            out.set_color(&theme.label.spec())?;
            write!(out, "{}:", message.role)?;
            out.reset()?;
            writeln!(out)?;
            match message.role {
                Role::Assistant => terminal::render_message(out, &message.content, theme)?,
                Role::System | Role::User => writeln!(out, "{}", message.content)?,
            }
        }
        Ok(())
    }
}

/// The first [`TITLE_CHARS`] characters of `first_message`, then `...`.
pub fn session_title(first_message: &str) -> String {
    let mut title: String = first_message.chars().take(TITLE_CHARS).collect();
    title.push_str("...");
    title
}

/// The assistant message recorded when a completion request fails.
///
/// Errors whose text names `provider` (any case) are masked so the backend
/// is not revealed.
pub fn failure_notice(error: &dyn std::error::Error, provider: &str) -> String {
    let message = error.to_string();
    let shown = if !provider.is_empty()
        && message.to_lowercase().contains(&provider.to_lowercase())
    {
        MASKED_FAILURE
    } else {
        message.as_str()
    };
    format!("System Error: {}", shown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_are_truncated_by_chars() {
        assert_eq!(session_title("hi"), "hi...");
        let long = "é".repeat(40);
        assert_eq!(session_title(&long), format!("{}...", "é".repeat(30)));
    }

    #[test]
    fn failure_mentioning_provider_is_masked() {
        let err = io::Error::other("Mistral API returned 401");
        assert_eq!(
            failure_notice(&err, "mistral"),
            "System Error: Connection interrupted"
        );
    }

    #[test]
    fn other_failures_are_shown() {
        let err = io::Error::other("timeout after 30s");
        assert_eq!(failure_notice(&err, "mistral"), "System Error: timeout after 30s");
        assert_eq!(failure_notice(&err, ""), "System Error: timeout after 30s");
    }

    #[test]
    fn history_skips_blank_messages() {
        let mut transcript = Transcript::default();
        transcript.push(ChatMessage::new(Role::User, "hello"));
        transcript.push(ChatMessage::new(Role::Assistant, "  \n"));
        transcript.push(ChatMessage::new(Role::Assistant, "hi"));
        let roles: Vec<Role> = transcript.history().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant]);
    }

    #[test]
    fn title_comes_from_first_user_message() {
        let transcript = Transcript::from_toml(
            r#"
[[message]]
role = "system"
content = "be brief"

[[message]]
role = "user"
content = "how do closures work"
"#,
        )
        .expect("transcript parses");
        assert_eq!(transcript.title().as_deref(), Some("how do closures work..."));
        assert_eq!(Transcript::default().title(), None);
    }

    #[test]
    fn unknown_roles_are_rejected() {
        let err = Transcript::from_toml("[[message]]\nrole = \"bot\"\ncontent = \"x\"").unwrap_err();
        assert!(matches!(err, RenderError::Transcript(_)));
    }
}
