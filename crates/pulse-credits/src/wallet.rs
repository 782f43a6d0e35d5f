//! The Pulse Credit wallet

use tracing::info;

use crate::error::{CreditsError, CreditsResult};
use crate::transaction::{CreditTransaction, TransactionKind};

/// Balance a fresh account starts with.
pub const STARTING_BALANCE: u32 = 12;

/// Host-owned credit balance with an append-only transaction ledger
#[derive(Debug, Clone)]
pub struct Wallet {
    balance: u32,
    ledger: Vec<CreditTransaction>,
    next_id: u64,
}

impl Wallet {
    /// Create a wallet with an explicit starting balance
    pub fn with_balance(balance: u32) -> Self {
        Self {
            balance,
            ledger: Vec::new(),
            next_id: 1,
        }
    }

    /// Current balance
    pub fn balance(&self) -> u32 {
        self.balance
    }

    /// The transaction ledger, oldest first
    pub fn ledger(&self) -> &[CreditTransaction] {
        &self.ledger
    }

    /// Send credits to a counterparty
    ///
    /// Checks the balance first, then rejects zero amounts, mirroring the
    /// order the send form validates in. Returns the new balance.
    pub fn send(&mut self, amount: u32, to: impl Into<String>) -> CreditsResult<u32> {
        if amount > self.balance {
            return Err(CreditsError::Insufficient {
                available: self.balance,
                requested: amount,
            });
        }
        if amount == 0 {
            return Err(CreditsError::InvalidAmount);
        }

        let to = to.into();
        self.balance -= amount;
        self.record(amount, TransactionKind::Sent, Some(to.clone()), None);
        info!(amount, to = %to, balance = self.balance, "Credits sent");

        Ok(self.balance)
    }

    /// Receive credits from a counterparty. Returns the new balance.
    pub fn receive(&mut self, amount: u32, from: impl Into<String>) -> u32 {
        let from = from.into();
        self.balance = self.balance.saturating_add(amount);
        self.record(amount, TransactionKind::Received, Some(from.clone()), None);
        info!(amount, from = %from, balance = self.balance, "Credits received");

        self.balance
    }

    /// Earn credits through platform activity. Returns the new balance.
    pub fn earn(&mut self, amount: u32, note: impl Into<String>) -> u32 {
        self.balance = self.balance.saturating_add(amount);
        self.record(amount, TransactionKind::Earned, None, Some(note.into()));
        info!(amount, balance = self.balance, "Credits earned");

        self.balance
    }

    fn record(
        &mut self,
        amount: u32,
        kind: TransactionKind,
        counterparty: Option<String>,
        note: Option<String>,
    ) {
        let id = self.next_id;
        self.next_id += 1;
        self.ledger
            .push(CreditTransaction::new(id, amount, kind, counterparty, note));
    }
}

impl Default for Wallet {
    fn default() -> Self {
        Self::with_balance(STARTING_BALANCE)
    }
}
