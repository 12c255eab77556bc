use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies which side of the conversation produced a turn.
///
/// A closed enumeration rather than a free-form role string: the history
/// handler formats transcripts by speaker, and a typo'd role must not be
/// representable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speaker {
    User,
    Assistant,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "User"),
            Self::Assistant => write!(f, "Assistant"),
        }
    }
}

/// One message in the conversation log.
///
/// Turns are immutable once created and owned exclusively by
/// [`ConversationMemory`](crate::memory::ConversationMemory); they live for
/// the duration of a session.
///
/// # Examples
///
/// ```
/// use chatloom::message::{Speaker, Turn};
///
/// let turn = Turn::user("What can you do?");
/// assert_eq!(turn.speaker, Speaker::User);
/// assert_eq!(turn.content, "What can you do?");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub content: String,
}

impl Turn {
    #[must_use]
    pub fn new(speaker: Speaker, content: impl Into<String>) -> Self {
        Self {
            speaker,
            content: content.into(),
        }
    }

    /// Creates a user turn with the given content.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Speaker::User, content)
    }

    /// Creates an assistant turn with the given content.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Speaker::Assistant, content)
    }

    /// Returns true if this turn was produced by the user.
    #[must_use]
    pub fn is_user(&self) -> bool {
        self.speaker == Speaker::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convenience_constructors_set_speaker() {
        let user = Turn::user("hello");
        assert_eq!(user.speaker, Speaker::User);
        assert!(user.is_user());

        let assistant = Turn::assistant("hi there");
        assert_eq!(assistant.speaker, Speaker::Assistant);
        assert!(!assistant.is_user());
    }

    #[test]
    fn speaker_display_matches_transcript_labels() {
        assert_eq!(Speaker::User.to_string(), "User");
        assert_eq!(Speaker::Assistant.to_string(), "Assistant");
    }

    #[test]
    fn turn_serialization_round_trips() {
        let original = Turn::user("serialize me");
        let json = serde_json::to_string(&original).expect("serialization failed");
        let parsed: Turn = serde_json::from_str(&json).expect("deserialization failed");
        assert_eq!(original, parsed);
    }
}
