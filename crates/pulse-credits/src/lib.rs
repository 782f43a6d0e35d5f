//! # Pulse Credits
//!
//! In-memory wallet for Pulse Credits, the reward unit donors exchange on
//! the platform. The wallet is owned by the host application scope; chat
//! sessions and other views request debits through callbacks and never
//! touch the balance directly.
//!
//! Validation here is advisory bookkeeping, not ledger correctness: there
//! is no server, no persistence, and no settlement.

pub mod error;
pub mod transaction;
pub mod wallet;

// Re-exports
pub use error::{CreditsError, CreditsResult};
pub use transaction::{CreditTransaction, TransactionKind};
pub use wallet::{STARTING_BALANCE, Wallet};
