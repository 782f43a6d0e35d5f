//! Simulated chat session
//!
//! Owns the message log, the typing indicator, and the timer cycles that
//! stand in for the other party. Handles:
//! - User operations (send, credits, attachments, pin/delete/report)
//! - The mount-triggered greeting cycle and per-send response cycles
//! - Cancellation of every pending cycle on close
//!
//! All scheduling goes through stored [`JoinHandle`]s so teardown can abort
//! anything still pending; a closed session never appends a message or
//! fires a notification.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::ChatResult;
use crate::log::MessageLog;
use crate::message::{Message, MessageBody, MessageId, Persona};
use crate::notify::Notice;
use crate::script::{ReplyScript, ScriptLine};

/// Capacity of the session event channel.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Callback contract between a session and its host view
///
/// The session never owns the credit balance and never renders notices; it
/// requests both through these hooks.
pub trait SessionHooks: Send + Sync {
    /// Apply a signed delta to the host-owned credit balance
    fn credits_changed(&self, delta: i64);

    /// Render a transient, auto-dismissing notice
    fn notify(&self, notice: Notice);
}

/// Hooks implementation that ignores everything
pub struct NoopHooks;

impl SessionHooks for NoopHooks {
    fn credits_changed(&self, _delta: i64) {}
    fn notify(&self, _notice: Notice) {}
}

/// State transitions observable on a session
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The typing indicator changed
    Typing(bool),
    /// A message was appended to the log
    MessageAppended(Message),
    /// An existing message was mutated in place (pin or delete)
    MessageUpdated(Message),
    /// The pinned banner changed
    BannerChanged(Option<MessageId>),
}

/// Delays driving the simulated cycles
///
/// Tests run with [`SessionTimings::fast`]; the defaults match the pacing a
/// user sees in the app.
#[derive(Debug, Clone, Copy)]
pub struct SessionTimings {
    /// Delay from session open to the greeting cycle starting to type
    pub greeting_delay: Duration,
    /// Delay from a user send to the response cycle starting to type
    pub response_delay: Duration,
    /// How long the typing indicator stays on before the message lands
    pub typing_delay: Duration,
}

impl Default for SessionTimings {
    fn default() -> Self {
        Self {
            greeting_delay: Duration::from_secs(5),
            response_delay: Duration::from_secs(2),
            typing_delay: Duration::from_secs(3),
        }
    }
}

impl SessionTimings {
    /// Millisecond-scale timings for tests and fast scenario runs
    pub fn fast() -> Self {
        Self {
            greeting_delay: Duration::from_millis(30),
            response_delay: Duration::from_millis(20),
            typing_delay: Duration::from_millis(20),
        }
    }
}

/// State shared between the session handle and its spawned cycles
struct SessionShared {
    channel: String,
    log: MessageLog,
    script: ReplyScript,
    typing: AtomicBool,
    notifications_enabled: AtomicBool,
    next_sequence: AtomicU64,
    timings: SessionTimings,
    hooks: Arc<dyn SessionHooks>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionShared {
    fn allocate_id(&self) -> MessageId {
        MessageId::new(self.next_sequence.fetch_add(1, Ordering::SeqCst))
    }

    fn emit(&self, event: SessionEvent) {
        // No receivers is fine; observers are optional
        let _ = self.events.send(event);
    }

    fn set_typing(&self, typing: bool) {
        self.typing.store(typing, Ordering::SeqCst);
        self.emit(SessionEvent::Typing(typing));
    }

    fn append(&self, sender: Persona, body: MessageBody, own: bool) -> ChatResult<Message> {
        let message = Message::new(self.allocate_id(), sender, body, own);
        self.log.append(message.clone())?;
        self.emit(SessionEvent::MessageAppended(message.clone()));
        Ok(message)
    }

    /// One simulated cycle: wait, type, wait, deliver the scripted line
    async fn run_cycle(&self, lead_delay: Duration, line: ScriptLine) {
        tokio::time::sleep(lead_delay).await;
        self.set_typing(true);
        tokio::time::sleep(self.timings.typing_delay).await;
        self.set_typing(false);

        match self.append(line.sender.clone(), line.body(), false) {
            Ok(message) => {
                debug!(channel = %self.channel, id = %message.id, "Simulated message delivered");
                if self.notifications_enabled.load(Ordering::SeqCst) {
                    self.hooks.notify(Notice::delivery(&message));
                }
            }
            Err(e) => {
                warn!(channel = %self.channel, error = %e, "Failed to deliver simulated message");
            }
        }
    }
}

/// One open chat view: the message log, typing flag, and pending cycles
///
/// Must be created inside a Tokio runtime; cycles are spawned tasks. Call
/// [`ChatSession::close`] (or drop the session) to cancel everything still
/// pending.
pub struct ChatSession {
    shared: Arc<SessionShared>,
    cycles: Mutex<Vec<JoinHandle<()>>>,
    closed: AtomicBool,
}

impl ChatSession {
    /// Open a session for a community channel
    ///
    /// Seeds the log with the channel's recent transcript and schedules the
    /// greeting cycle.
    pub fn open(
        channel: impl Into<String>,
        timings: SessionTimings,
        hooks: Arc<dyn SessionHooks>,
    ) -> Self {
        let channel = channel.into();
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let shared = Arc::new(SessionShared {
            channel: channel.clone(),
            log: MessageLog::new(),
            script: ReplyScript::community(),
            typing: AtomicBool::new(false),
            notifications_enabled: AtomicBool::new(true),
            next_sequence: AtomicU64::new(1),
            timings,
            hooks,
            events,
        });

        // Back-date the seed transcript so it reads as recent history
        let seed_offsets_mins = [120i64, 60, 30];
        for (line, offset) in ReplyScript::seed_transcript().iter().zip(seed_offsets_mins) {
            let message = Message::at(
                shared.allocate_id(),
                line.sender.clone(),
                line.body(),
                false,
                Utc::now() - chrono::Duration::minutes(offset),
            );
            if let Err(e) = shared.log.append(message) {
                warn!(channel = %channel, error = %e, "Failed to seed transcript");
            }
        }

        let session = Self {
            shared,
            cycles: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        };

        let greeting = session.shared.script.greeting();
        session.spawn_cycle(session.shared.timings.greeting_delay, greeting);
        info!(channel = %session.shared.channel, "Chat session opened");

        session
    }

    /// The channel display name
    pub fn channel(&self) -> &str {
        &self.shared.channel
    }

    /// Whether the other party is currently shown as typing
    pub fn is_typing(&self) -> bool {
        self.shared.typing.load(Ordering::SeqCst)
    }

    /// Whether delivery notifications are enabled
    pub fn notifications_enabled(&self) -> bool {
        self.shared.notifications_enabled.load(Ordering::SeqCst)
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.shared.events.subscribe()
    }

    /// Snapshot of the message log in append order
    pub fn messages(&self) -> ChatResult<Vec<Message>> {
        self.shared.log.snapshot()
    }

    /// Number of messages in the log
    pub fn message_count(&self) -> usize {
        self.shared.log.len()
    }

    /// The message surfaced as the pinned banner, if any
    pub fn pinned_banner(&self) -> ChatResult<Option<Message>> {
        self.shared.log.pinned_banner()
    }

    /// Send a text message
    ///
    /// Empty or whitespace-only input is a silent no-op. Otherwise the
    /// message is appended immediately and a response cycle is scheduled.
    pub fn send_message(&self, text: &str) -> ChatResult<Option<MessageId>> {
        let text = text.trim();
        if text.is_empty() {
            debug!(channel = %self.shared.channel, "Ignoring empty message");
            return Ok(None);
        }

        let message = self
            .shared
            .append(Persona::you(), MessageBody::text(text), true)?;
        info!(channel = %self.shared.channel, id = %message.id, "Message sent");

        self.shared.hooks.notify(Notice::new(
            "Message Sent",
            "Your message was shared with the community",
        ));

        let reply = self.shared.script.next_reply();
        self.spawn_cycle(self.shared.timings.response_delay, reply);

        Ok(Some(message.id))
    }

    /// Send Pulse Credits to the community
    ///
    /// Appends the credit-transfer notice and asks the host to debit the
    /// balance. Balance validation is the host's concern; the log-level
    /// operation always succeeds.
    pub fn send_credits(&self, amount: u32) -> ChatResult<MessageId> {
        let message = self
            .shared
            .append(Persona::you(), MessageBody::credits(amount), true)?;
        info!(channel = %self.shared.channel, id = %message.id, amount, "Credits sent");

        self.shared.hooks.credits_changed(-i64::from(amount));
        self.shared.hooks.notify(Notice::credits_sent(amount));

        Ok(message.id)
    }

    /// Share an image attachment
    ///
    /// No upload happens; the message carries the fixed attachment URL.
    pub fn attach_image(&self) -> ChatResult<MessageId> {
        let message = self
            .shared
            .append(Persona::you(), MessageBody::image(), true)?;
        info!(channel = %self.shared.channel, id = %message.id, "Attachment shared");

        self.shared.hooks.notify(Notice::new(
            "Attachment Shared",
            "Your image was shared with the community",
        ));

        Ok(message.id)
    }

    /// Soft-delete a message. Unknown IDs are a silent no-op.
    pub fn delete_message(&self, id: MessageId) -> ChatResult<()> {
        let Some(updated) = self.shared.log.mark_deleted(id)? else {
            debug!(channel = %self.shared.channel, %id, "Delete on unknown message ignored");
            return Ok(());
        };

        info!(channel = %self.shared.channel, %id, "Message deleted");
        self.shared.emit(SessionEvent::MessageUpdated(updated));
        self.shared.hooks.notify(Notice::new(
            "Message Deleted",
            "The message was removed from the conversation",
        ));

        Ok(())
    }

    /// Toggle the pinned flag on a message. Unknown IDs are a silent no-op.
    pub fn pin_message(&self, id: MessageId) -> ChatResult<()> {
        let Some(updated) = self.shared.log.toggle_pinned(id)? else {
            debug!(channel = %self.shared.channel, %id, "Pin on unknown message ignored");
            return Ok(());
        };

        let pinned = updated.pinned;
        info!(channel = %self.shared.channel, %id, pinned, "Pin toggled");

        self.shared.emit(SessionEvent::MessageUpdated(updated));
        let banner = self.shared.log.pinned_banner()?.map(|m| m.id);
        self.shared.emit(SessionEvent::BannerChanged(banner));

        let notice = if pinned {
            Notice::new("Message Pinned", "The message was pinned to the top of the chat")
        } else {
            Notice::new("Message Unpinned", "The message is no longer pinned")
        };
        self.shared.hooks.notify(notice);

        Ok(())
    }

    /// Report a message to the moderators
    ///
    /// Pure side effect: no state changes, only a notice. Unknown IDs are a
    /// silent no-op.
    pub fn report_message(&self, id: MessageId) -> ChatResult<()> {
        if self.shared.log.get(id)?.is_none() {
            debug!(channel = %self.shared.channel, %id, "Report on unknown message ignored");
            return Ok(());
        }

        info!(channel = %self.shared.channel, %id, "Message reported");
        self.shared.hooks.notify(Notice::new(
            "Message Reported",
            "Thanks for flagging this. Moderators will take a look.",
        ));

        Ok(())
    }

    /// Flip the delivery-notification gate, returning the new state
    ///
    /// Cycles keep firing and messages keep appending either way; only the
    /// delivery notices are gated.
    pub fn toggle_notifications(&self) -> bool {
        let enabled = !self
            .shared
            .notifications_enabled
            .fetch_xor(true, Ordering::SeqCst);
        info!(channel = %self.shared.channel, enabled, "Notifications toggled");

        let notice = if enabled {
            Notice::new("Notifications On", "You'll be notified about new messages")
        } else {
            Notice::new("Notifications Off", "New messages will arrive silently")
        };
        self.shared.hooks.notify(notice);

        enabled
    }

    /// Close the session, cancelling every pending cycle
    ///
    /// After this returns no message is appended and no notification fires.
    /// Idempotent.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }

        let mut cycles = self
            .cycles
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        for handle in cycles.drain(..) {
            handle.abort();
        }

        info!(channel = %self.shared.channel, "Chat session closed");
    }

    /// Spawn a delivery cycle and keep its handle for teardown
    fn spawn_cycle(&self, lead_delay: Duration, line: ScriptLine) {
        if self.closed.load(Ordering::SeqCst) {
            return;
        }

        let shared = Arc::clone(&self.shared);
        let handle = tokio::spawn(async move {
            shared.run_cycle(lead_delay, line).await;
        });

        let mut cycles = self
            .cycles
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        cycles.retain(|h| !h.is_finished());
        cycles.push(handle);
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.close();
    }
}
