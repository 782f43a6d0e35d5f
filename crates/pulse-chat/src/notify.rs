//! Transient user notices
//!
//! A notice is a short-lived title + description pair. The session hands it
//! to the host through [`SessionHooks::notify`](crate::SessionHooks::notify);
//! rendering and auto-dismissal are the host's concern.

use serde::{Deserialize, Serialize};

use crate::message::Message;

/// A short-lived, auto-dismissing user notice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Short title
    pub title: String,
    /// One-line description
    pub body: String,
}

impl Notice {
    /// Create a notice
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Notice for a delivered incoming message
    pub fn delivery(message: &Message) -> Self {
        Self::new(
            "New Message",
            format!("{}: {}", message.sender.name, message.display_text()),
        )
    }

    /// Notice for a sent credit transfer
    pub fn credits_sent(amount: u32) -> Self {
        Self::new(
            "Credits Sent",
            format!(
                "You've sent {} Pulse Credit{} to the community",
                amount,
                if amount == 1 { "" } else { "s" }
            ),
        )
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.body)
    }
}
