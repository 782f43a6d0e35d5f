//! Terminal host for a chat session
//!
//! Plays the role the app shell plays in the real product: owns the wallet,
//! renders notices, and prints session events as a running transcript.

use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tracing::warn;

use pulse_chat::{Notice, SessionEvent, SessionHooks};
use pulse_credits::Wallet;

/// Host wiring a wallet and a terminal renderer into session hooks
pub struct TerminalHost {
    wallet: Mutex<Wallet>,
    channel: String,
}

impl TerminalHost {
    /// Create a host for a channel with the default wallet
    pub fn new(channel: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            wallet: Mutex::new(Wallet::default()),
            channel: channel.into(),
        })
    }

    /// Current wallet balance
    pub fn balance(&self) -> u32 {
        self.wallet.lock().unwrap().balance()
    }

    /// Whether the wallet can cover sending `amount` credits
    ///
    /// The advisory check the send form runs; shown as a notice on failure.
    pub fn can_send(&self, amount: u32) -> Result<(), pulse_credits::CreditsError> {
        let balance = self.balance();
        if amount > balance {
            return Err(pulse_credits::CreditsError::Insufficient {
                available: balance,
                requested: amount,
            });
        }
        if amount == 0 {
            return Err(pulse_credits::CreditsError::InvalidAmount);
        }
        Ok(())
    }

    /// Print the wallet's final state
    pub fn print_summary(&self) {
        let wallet = self.wallet.lock().unwrap();
        println!();
        println!("Wallet: {} Pulse Credits", wallet.balance());
        for tx in wallet.ledger() {
            let counterparty = tx.counterparty.as_deref().unwrap_or("-");
            println!(
                "  {} {:>3}  {:?}  {}",
                tx.occurred_at.format("%H:%M:%S"),
                tx.signed_amount(),
                tx.kind,
                counterparty,
            );
        }
    }
}

impl SessionHooks for TerminalHost {
    fn credits_changed(&self, delta: i64) {
        let mut wallet = self.wallet.lock().unwrap();
        let outcome = if delta < 0 {
            wallet
                .send(delta.unsigned_abs() as u32, self.channel.clone())
                .map(|_| ())
        } else {
            wallet.receive(delta as u32, self.channel.clone());
            Ok(())
        };

        if let Err(e) = outcome {
            warn!(delta, error = %e, "Wallet rejected credit change");
        }
    }

    fn notify(&self, notice: Notice) {
        println!("  ── {notice}");
    }
}

/// Print session events as a transcript until the channel closes
pub async fn print_events(mut events: broadcast::Receiver<SessionEvent>) {
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(broadcast::error::RecvError::Lagged(_)) => continue,
            Err(broadcast::error::RecvError::Closed) => break,
        };
        match event {
            SessionEvent::Typing(true) => println!("  · typing…"),
            SessionEvent::Typing(false) => {}
            SessionEvent::MessageAppended(msg) => {
                let marker = if msg.own { "(you) " } else { "" };
                println!(
                    "  [{}] {} {}{}: {}",
                    msg.sent_at.format("%H:%M"),
                    msg.sender.initials,
                    marker,
                    msg.sender.name,
                    msg.display_text(),
                );
            }
            SessionEvent::MessageUpdated(msg) => {
                let state = if msg.deleted {
                    "deleted"
                } else if msg.pinned {
                    "pinned"
                } else {
                    "unpinned"
                };
                println!("  ~ message {} {}", msg.id, state);
            }
            SessionEvent::BannerChanged(Some(id)) => println!("  * banner is now {id}"),
            SessionEvent::BannerChanged(None) => println!("  * banner cleared"),
        }
    }
}
