//! # Pulse Chat
//!
//! Simulated community chat session engine for the Pulse donor platform.
//!
//! A session owns an append-only message log, a typing indicator, and a
//! scripted simulation of the other party's presence. There is no network:
//! incoming messages are injected by cancellable delayed tasks, so a host
//! view gets the same surface it would have against a real backend.
//!
//! ## Features
//!
//! - Append-only message log with soft delete and pinning
//! - Tagged message bodies (text, credit transfer, image attachment)
//! - Timer-driven typing/reply cycles, cancelled on session close
//! - Broadcast event stream for observers
//! - Host hooks for credit-balance deltas and transient notices
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pulse_chat::{ChatSession, NoopHooks, SessionEvent, SessionTimings};
//!
//! let session = ChatSession::open(
//!     "Downtown O+ Donors",
//!     SessionTimings::default(),
//!     Arc::new(NoopHooks),
//! );
//!
//! let mut events = session.subscribe();
//! session.send_message("I can donate. I'm available after 2pm today.")?;
//!
//! while let Ok(event) = events.recv().await {
//!     if let SessionEvent::MessageAppended(msg) = event {
//!         println!("{}: {}", msg.sender.name, msg.display_text());
//!     }
//! }
//!
//! session.close();
//! ```

pub mod error;
pub mod log;
pub mod message;
pub mod notify;
pub mod script;
pub mod session;

// Re-exports
pub use error::{ChatError, ChatResult};
pub use log::MessageLog;
pub use message::{ATTACHMENT_URL, DELETED_PLACEHOLDER, Message, MessageBody, MessageId, Persona};
pub use notify::Notice;
pub use script::ReplyScript;
pub use session::{ChatSession, NoopHooks, SessionEvent, SessionHooks, SessionTimings};
