//! Error types for pulse-credits

use thiserror::Error;

/// Errors surfaced at the wallet boundary
///
/// These are advisory checks the host shows as a transient notice; nothing
/// escalates past the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CreditsError {
    /// Requested more credits than the wallet holds
    #[error("insufficient credits: have {available}, tried to send {requested}")]
    Insufficient {
        /// Current balance
        available: u32,
        /// Amount the caller tried to send
        requested: u32,
    },

    /// Zero-credit operations are rejected
    #[error("invalid amount: must send at least one credit")]
    InvalidAmount,
}

/// Result type for wallet operations
pub type CreditsResult<T> = Result<T, CreditsError>;
