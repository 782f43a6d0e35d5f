//! Message types for a community chat session

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Text shown in place of the body once a message is soft-deleted.
pub const DELETED_PLACEHOLDER: &str = "This message was deleted";

/// Fixed URL used for image attachments. No upload happens; the host view
/// renders whatever this points at.
pub const ATTACHMENT_URL: &str = "https://placehold.co/600x400";

/// Unique identifier for a message within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(u64);

impl MessageId {
    /// Create a message ID from a raw sequence number
    pub fn new(sequence: u64) -> Self {
        Self(sequence)
    }

    /// The raw sequence number
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Display identity of a chat participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    /// Display name
    pub name: String,
    /// Short initials derived from the name, for avatar badges
    pub initials: String,
}

impl Persona {
    /// Create a persona, deriving initials from the first letters of up to
    /// two words of the name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let initials: String = name
            .split_whitespace()
            .take(2)
            .filter_map(|word| word.chars().next())
            .collect::<String>()
            .to_uppercase();
        Self { name, initials }
    }

    /// The local user's persona
    pub fn you() -> Self {
        Self::new("You")
    }
}

/// Payload of a message. Exactly one case at a time; a message is a plain
/// text, a credit-transfer notice, or an image attachment, never a mix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageBody {
    /// Plain text message
    Text(String),

    /// Credit-transfer notice
    CreditTransfer {
        /// Number of Pulse Credits transferred
        amount: u32,
    },

    /// Image attachment
    Image {
        /// Attachment URL
        url: String,
    },
}

impl MessageBody {
    /// Create a text body
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a credit-transfer body
    pub fn credits(amount: u32) -> Self {
        Self::CreditTransfer { amount }
    }

    /// Create an image body with the fixed attachment URL
    pub fn image() -> Self {
        Self::Image {
            url: ATTACHMENT_URL.to_string(),
        }
    }

    /// Check if this is a text body
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Get the text if this is a text body
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the credit amount if this is a credit-transfer body
    pub fn credit_amount(&self) -> Option<u32> {
        match self {
            Self::CreditTransfer { amount } => Some(*amount),
            _ => None,
        }
    }
}

/// One entry in the session's message log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier
    pub id: MessageId,
    /// Who sent the message
    pub sender: Persona,
    /// Message payload
    pub body: MessageBody,
    /// When the message was created
    pub sent_at: DateTime<Utc>,
    /// Whether the local user authored the message
    pub own: bool,
    /// Pinned flag, toggled in place
    pub pinned: bool,
    /// Soft-delete flag. The body is retained but no longer displayed.
    pub deleted: bool,
}

impl Message {
    /// Create a new message
    pub fn new(id: MessageId, sender: Persona, body: MessageBody, own: bool) -> Self {
        Self {
            id,
            sender,
            body,
            sent_at: Utc::now(),
            own,
            pinned: false,
            deleted: false,
        }
    }

    /// Create a message with an explicit timestamp (seed transcripts)
    pub fn at(
        id: MessageId,
        sender: Persona,
        body: MessageBody,
        own: bool,
        sent_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            sender,
            body,
            sent_at,
            own,
            pinned: false,
            deleted: false,
        }
    }

    /// The text the host should display for this message. Deleted messages
    /// always display the fixed placeholder.
    pub fn display_text(&self) -> Cow<'_, str> {
        if self.deleted {
            return Cow::Borrowed(DELETED_PLACEHOLDER);
        }
        match &self.body {
            MessageBody::Text(text) => Cow::Borrowed(text.as_str()),
            MessageBody::CreditTransfer { amount } => Cow::Owned(format!(
                "Sent {} Pulse Credit{} to the community",
                amount,
                if *amount == 1 { "" } else { "s" }
            )),
            MessageBody::Image { url } => Cow::Borrowed(url.as_str()),
        }
    }
}
