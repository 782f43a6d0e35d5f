//! Error types for pulse-chat

use thiserror::Error;

/// Errors that can occur in the chat session layer
///
/// Domain-level misuse (empty input, unknown message id) is absorbed as a
/// silent no-op rather than surfaced here; the only runtime failure is
/// losing access to the in-memory log.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Log access failed
    #[error("log access failed: {0}")]
    Log(String),
}

/// Result type for chat operations
pub type ChatResult<T> = Result<T, ChatError>;
