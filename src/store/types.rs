use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Full contents of the session store, keyed by session identifier
///
/// The identifier is a human-chosen string that doubles as the display
/// name; renaming a session moves the record to a new key. A BTreeMap
/// keeps iteration and serialization order deterministic.
pub type SessionMap = BTreeMap<String, Session>;

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single message in a conversation
///
/// Messages are immutable once appended; there is no edit or delete of
/// individual messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who sent the message
    pub role: Role,
    /// The message text
    pub content: String,
}

impl Message {
    /// Creates a new user message
    ///
    /// # Examples
    ///
    /// ```
    /// use infoflow::store::{Message, Role};
    ///
    /// let msg = Message::user("Hello, assistant!");
    /// assert_eq!(msg.role, Role::User);
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates a new assistant message
    ///
    /// # Examples
    ///
    /// ```
    /// use infoflow::store::{Message, Role};
    ///
    /// let msg = Message::assistant("Hello, user!");
    /// assert_eq!(msg.role, Role::Assistant);
    /// ```
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// One named conversation thread
///
/// The identifier lives in the surrounding [`SessionMap`] key, not in the
/// record itself. `messages` is chronological and append-only during a
/// turn. Archiving only sets a flag; archived sessions still appear in
/// the recency buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Calendar date the session was created or last active (ISO date)
    pub date: NaiveDate,
    /// Conversation history in chronological order
    pub messages: Vec<Message>,
    /// Whether the user archived this session
    #[serde(default)]
    pub archived: bool,
}

impl Session {
    /// Create an empty session dated `date`
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            messages: Vec::new(),
            archived: false,
        }
    }

    /// Append a message to the conversation
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Number of messages in the conversation
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the conversation has no messages yet
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
