//! Scripted other-party presence
//!
//! The simulation has no network behind it. The personas and lines that the
//! timer cycles inject come from a fixed script: a seed transcript shown on
//! open, a greeting delivered shortly after, and a deterministic rotation of
//! replies to the user's messages.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::message::{MessageBody, Persona};

/// A scripted line: who says it and what they say
#[derive(Debug, Clone)]
pub struct ScriptLine {
    /// Speaking persona
    pub sender: Persona,
    /// Line text
    pub text: String,
}

impl ScriptLine {
    fn new(sender: &str, text: &str) -> Self {
        Self {
            sender: Persona::new(sender),
            text: text.to_string(),
        }
    }

    /// The line as a message body
    pub fn body(&self) -> MessageBody {
        MessageBody::text(self.text.clone())
    }
}

/// Fixed script driving the simulated other party
pub struct ReplyScript {
    greeting: ScriptLine,
    replies: Vec<ScriptLine>,
    next_reply: AtomicUsize,
}

impl ReplyScript {
    /// The default community script
    pub fn community() -> Self {
        Self {
            greeting: ScriptLine::new(
                "Community Bot",
                "Welcome! This community responds quickly to urgent requests.",
            ),
            replies: vec![
                ScriptLine::new("James", "Thanks for the update. I'll check my schedule."),
                ScriptLine::new("Dr. Sarah", "Appreciate it. Every donor makes a difference."),
                ScriptLine::new(
                    "Community Bot",
                    "Your message has been shared with the community coordinators.",
                ),
            ],
            next_reply: AtomicUsize::new(0),
        }
    }

    /// The transcript a session is seeded with on open
    pub fn seed_transcript() -> Vec<ScriptLine> {
        vec![
            ScriptLine::new(
                "Dr. Sarah",
                "Hello everyone! We have an urgent need for O- blood at Central Hospital.",
            ),
            ScriptLine::new("James", "I can donate. I'm available after 2pm today."),
            ScriptLine::new(
                "Community Bot",
                "Thank you for responding, James! Your information has been shared with Dr. Sarah.",
            ),
        ]
    }

    /// The greeting line delivered by the mount-triggered cycle
    pub fn greeting(&self) -> ScriptLine {
        self.greeting.clone()
    }

    /// The next reply in rotation, advancing the cursor
    pub fn next_reply(&self) -> ScriptLine {
        let index = self.next_reply.fetch_add(1, Ordering::Relaxed);
        self.replies[index % self.replies.len()].clone()
    }
}

impl Default for ReplyScript {
    fn default() -> Self {
        Self::community()
    }
}
