//! Credit transaction records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a credit transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Credits sent to another member or a community
    Sent,
    /// Credits received from another member
    Received,
    /// Credits earned through platform activity (donations, drives)
    Earned,
}

/// One entry in the wallet's ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditTransaction {
    /// Unique transaction identifier within the wallet
    pub id: u64,
    /// Number of credits moved
    pub amount: u32,
    /// Direction of the transaction
    pub kind: TransactionKind,
    /// Who the credits went to or came from, when known
    pub counterparty: Option<String>,
    /// When the transaction happened
    pub occurred_at: DateTime<Utc>,
    /// Free-text note attached to the transaction
    pub note: Option<String>,
}

impl CreditTransaction {
    /// Create a transaction stamped with the current time
    pub fn new(
        id: u64,
        amount: u32,
        kind: TransactionKind,
        counterparty: Option<String>,
        note: Option<String>,
    ) -> Self {
        Self {
            id,
            amount,
            kind,
            counterparty,
            occurred_at: Utc::now(),
            note,
        }
    }

    /// The signed effect of this transaction on the balance
    pub fn signed_amount(&self) -> i64 {
        match self.kind {
            TransactionKind::Sent => -i64::from(self.amount),
            TransactionKind::Received | TransactionKind::Earned => i64::from(self.amount),
        }
    }
}
