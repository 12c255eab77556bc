//! Session-scoped conversation memory.
//!
//! An append-only, ordered log of [`Turn`]s. Turns are never reordered or
//! deleted within a session; the log is dropped with the session. Accessors
//! expose exactly what the history flow needs (`first`, `last`, `all`)
//! instead of handing out the raw buffer for ad hoc filtering.

use crate::message::Turn;

/// Append-only ordered log of conversation turns.
///
/// # Examples
///
/// ```
/// use chatloom::memory::ConversationMemory;
/// use chatloom::message::Turn;
///
/// let mut memory = ConversationMemory::new();
/// memory.append(Turn::user("oi"));
/// memory.append(Turn::assistant("olá"));
///
/// assert_eq!(memory.first().map(|t| t.content.as_str()), Some("oi"));
/// assert_eq!(memory.last().map(|t| t.content.as_str()), Some("olá"));
/// assert_eq!(memory.all().len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConversationMemory {
    turns: Vec<Turn>,
}

impl ConversationMemory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn to the end of the log. Insertion order is significant.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// All turns in insertion order.
    #[must_use]
    pub fn all(&self) -> &[Turn] {
        &self.turns
    }

    /// The earliest turn, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Turn> {
        self.turns.first()
    }

    /// The most recent turn, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
