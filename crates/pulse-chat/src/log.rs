//! Append-only message log with mutable flags
//!
//! Messages are never physically removed. Delete is a soft flag that fixes
//! the displayed text to a placeholder; pinning toggles in place. The log
//! also tracks which message the host should surface as the pinned banner.

use std::sync::RwLock;

use crate::error::{ChatError, ChatResult};
use crate::message::{Message, MessageId};

/// In-memory message log for one chat session
///
/// Ordering is defined purely by append order; no reordering or
/// deduplication is performed.
pub struct MessageLog {
    /// Messages in append order
    entries: RwLock<Vec<Message>>,
    /// The most recently pinned message, surfaced as "the" pinned banner
    banner: RwLock<Option<MessageId>>,
}

impl MessageLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            banner: RwLock::new(None),
        }
    }

    /// Append a message to the log
    pub fn append(&self, message: Message) -> ChatResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| ChatError::Log("failed to acquire write lock".to_string()))?;
        entries.push(message);
        Ok(())
    }

    /// Get a message by ID
    pub fn get(&self, id: MessageId) -> ChatResult<Option<Message>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| ChatError::Log("failed to acquire read lock".to_string()))?;
        Ok(entries.iter().find(|m| m.id == id).cloned())
    }

    /// Number of messages in the log
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the full log in append order
    pub fn snapshot(&self) -> ChatResult<Vec<Message>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| ChatError::Log("failed to acquire read lock".to_string()))?;
        Ok(entries.clone())
    }

    /// Soft-delete a message. Returns the updated message, or `None` if the
    /// ID is unknown. Idempotent: deleting an already-deleted message
    /// changes nothing.
    pub fn mark_deleted(&self, id: MessageId) -> ChatResult<Option<Message>> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| ChatError::Log("failed to acquire write lock".to_string()))?;

        let Some(message) = entries.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };

        message.deleted = true;
        Ok(Some(message.clone()))
    }

    /// Toggle the pinned flag on a message. Returns the updated message, or
    /// `None` if the ID is unknown. The banner follows: pinning a message
    /// makes it the banner; unpinning the banner message falls back to the
    /// latest message still pinned, if any.
    pub fn toggle_pinned(&self, id: MessageId) -> ChatResult<Option<Message>> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| ChatError::Log("failed to acquire write lock".to_string()))?;

        let Some(message) = entries.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };

        message.pinned = !message.pinned;
        let updated = message.clone();

        let mut banner = self
            .banner
            .write()
            .map_err(|_| ChatError::Log("failed to acquire write lock".to_string()))?;

        if updated.pinned {
            *banner = Some(id);
        } else if *banner == Some(id) {
            *banner = entries.iter().rev().find(|m| m.pinned).map(|m| m.id);
        }

        Ok(Some(updated))
    }

    /// The message currently surfaced as the pinned banner
    pub fn pinned_banner(&self) -> ChatResult<Option<Message>> {
        let banner = self
            .banner
            .read()
            .map_err(|_| ChatError::Log("failed to acquire read lock".to_string()))?;

        match *banner {
            Some(id) => self.get(id),
            None => Ok(None),
        }
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{DELETED_PLACEHOLDER, MessageBody, Persona};

    fn text_message(seq: u64, text: &str) -> Message {
        Message::new(
            MessageId::new(seq),
            Persona::new("James"),
            MessageBody::text(text),
            false,
        )
    }

    #[test]
    fn test_append_and_get() {
        let log = MessageLog::new();
        log.append(text_message(1, "Hello")).unwrap();

        let msg = log.get(MessageId::new(1)).unwrap().unwrap();
        assert_eq!(msg.body.as_text(), Some("Hello"));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_get_unknown_id() {
        let log = MessageLog::new();
        log.append(text_message(1, "Hello")).unwrap();
        assert!(log.get(MessageId::new(99)).unwrap().is_none());
    }

    #[test]
    fn test_mark_deleted_fixes_display() {
        let log = MessageLog::new();
        log.append(text_message(1, "Hello")).unwrap();
        log.append(text_message(2, "World")).unwrap();

        let deleted = log.mark_deleted(MessageId::new(1)).unwrap().unwrap();
        assert!(deleted.deleted);
        assert_eq!(deleted.display_text(), DELETED_PLACEHOLDER);

        // Other entries untouched
        let other = log.get(MessageId::new(2)).unwrap().unwrap();
        assert!(!other.deleted);
        assert_eq!(other.display_text(), "World");
    }

    #[test]
    fn test_mark_deleted_unknown_id_is_noop() {
        let log = MessageLog::new();
        log.append(text_message(1, "Hello")).unwrap();

        let before = log.snapshot().unwrap();
        assert!(log.mark_deleted(MessageId::new(42)).unwrap().is_none());
        assert_eq!(log.snapshot().unwrap(), before);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let log = MessageLog::new();
        log.append(text_message(1, "Hello")).unwrap();

        log.mark_deleted(MessageId::new(1)).unwrap();
        let again = log.mark_deleted(MessageId::new(1)).unwrap().unwrap();
        assert!(again.deleted);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_pin_toggles() {
        let log = MessageLog::new();
        log.append(text_message(1, "Hello")).unwrap();

        let pinned = log.toggle_pinned(MessageId::new(1)).unwrap().unwrap();
        assert!(pinned.pinned);

        let unpinned = log.toggle_pinned(MessageId::new(1)).unwrap().unwrap();
        assert!(!unpinned.pinned);
    }

    #[test]
    fn test_banner_tracks_most_recent_pin() {
        let log = MessageLog::new();
        log.append(text_message(1, "first")).unwrap();
        log.append(text_message(2, "second")).unwrap();

        log.toggle_pinned(MessageId::new(1)).unwrap();
        log.toggle_pinned(MessageId::new(2)).unwrap();

        let banner = log.pinned_banner().unwrap().unwrap();
        assert_eq!(banner.id, MessageId::new(2));

        // Unpinning the banner falls back to the remaining pinned message
        log.toggle_pinned(MessageId::new(2)).unwrap();
        let banner = log.pinned_banner().unwrap().unwrap();
        assert_eq!(banner.id, MessageId::new(1));

        // Unpinning everything clears the banner
        log.toggle_pinned(MessageId::new(1)).unwrap();
        assert!(log.pinned_banner().unwrap().is_none());
    }

    #[test]
    fn test_deleted_message_can_still_be_pinned() {
        let log = MessageLog::new();
        log.append(text_message(1, "Hello")).unwrap();
        log.mark_deleted(MessageId::new(1)).unwrap();

        let pinned = log.toggle_pinned(MessageId::new(1)).unwrap().unwrap();
        assert!(pinned.pinned);
        assert!(pinned.deleted);
    }
}
