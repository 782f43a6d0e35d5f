//! Integration tests for the simulated chat session
//!
//! All sessions run with fast timings so the timer cycles complete within
//! milliseconds; event assertions wait on the broadcast stream rather than
//! sleeping blind.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::timeout;

use pulse_chat::{
    ChatSession, DELETED_PLACEHOLDER, Message, MessageId, Notice, SessionEvent, SessionHooks,
    SessionTimings,
};

/// Hooks that record every callback for assertions
#[derive(Default)]
struct RecordingHooks {
    deltas: Mutex<Vec<i64>>,
    notices: Mutex<Vec<Notice>>,
}

impl RecordingHooks {
    fn deltas(&self) -> Vec<i64> {
        self.deltas.lock().unwrap().clone()
    }

    fn notice_titles(&self) -> Vec<String> {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.title.clone())
            .collect()
    }

    fn count_titled(&self, title: &str) -> usize {
        self.notice_titles().iter().filter(|t| *t == title).count()
    }
}

impl SessionHooks for RecordingHooks {
    fn credits_changed(&self, delta: i64) {
        self.deltas.lock().unwrap().push(delta);
    }

    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

fn open_session(hooks: &Arc<RecordingHooks>) -> ChatSession {
    let hooks: Arc<dyn SessionHooks> = hooks.clone();
    ChatSession::open("Downtown O+ Donors", SessionTimings::fast(), hooks)
}

async fn next_event(events: &mut broadcast::Receiver<SessionEvent>) -> SessionEvent {
    timeout(Duration::from_secs(2), events.recv())
        .await
        .expect("timed out waiting for session event")
        .expect("event channel closed")
}

/// Drain events until a simulated (non-own) message lands
async fn wait_for_delivery(events: &mut broadcast::Receiver<SessionEvent>) -> Message {
    loop {
        if let SessionEvent::MessageAppended(msg) = next_event(events).await
            && !msg.own
        {
            return msg;
        }
    }
}

#[tokio::test]
async fn send_appends_exactly_one_own_message() {
    let hooks = Arc::new(RecordingHooks::default());
    let session = open_session(&hooks);
    let before = session.message_count();

    let id = session.send_message("I can donate today").unwrap().unwrap();

    let messages = session.messages().unwrap();
    assert_eq!(messages.len(), before + 1);

    let sent = messages.last().unwrap();
    assert_eq!(sent.id, id);
    assert!(sent.own);
    assert_eq!(sent.body.as_text(), Some("I can donate today"));

    session.close();
}

#[tokio::test]
async fn empty_and_whitespace_sends_are_noops() {
    let hooks = Arc::new(RecordingHooks::default());
    let session = open_session(&hooks);
    let before = session.messages().unwrap();

    assert!(session.send_message("").unwrap().is_none());
    assert!(session.send_message("   \t\n").unwrap().is_none());

    assert_eq!(session.messages().unwrap(), before);
    assert_eq!(hooks.count_titled("Message Sent"), 0);

    session.close();
}

#[tokio::test]
async fn response_cycle_types_then_replies_in_order() {
    let hooks = Arc::new(RecordingHooks::default());
    let session = open_session(&hooks);
    let mut events = session.subscribe();

    // Let the greeting cycle finish so it cannot interleave with the
    // response cycle under test
    wait_for_delivery(&mut events).await;

    session.send_message("hello").unwrap();

    match next_event(&mut events).await {
        SessionEvent::MessageAppended(msg) => assert!(msg.own),
        other => panic!("expected own message first, got {other:?}"),
    }
    match next_event(&mut events).await {
        SessionEvent::Typing(true) => {}
        other => panic!("expected typing on, got {other:?}"),
    }
    match next_event(&mut events).await {
        SessionEvent::Typing(false) => {}
        other => panic!("expected typing off, got {other:?}"),
    }
    match next_event(&mut events).await {
        SessionEvent::MessageAppended(msg) => {
            assert!(!msg.own);
            assert!(msg.body.is_text());
        }
        other => panic!("expected simulated reply, got {other:?}"),
    }

    assert!(!session.is_typing());
    session.close();
}

#[tokio::test]
async fn delete_soft_deletes_only_the_target() {
    let hooks = Arc::new(RecordingHooks::default());
    let session = open_session(&hooks);

    let before = session.messages().unwrap();
    let target = before[1].id;

    session.delete_message(target).unwrap();

    let after = session.messages().unwrap();
    assert_eq!(after.len(), before.len());

    for (old, new) in before.iter().zip(&after) {
        if new.id == target {
            assert!(new.deleted);
            assert_eq!(new.display_text(), DELETED_PLACEHOLDER);
            assert_eq!(new.body, old.body);
        } else {
            assert_eq!(new, old);
        }
    }

    assert_eq!(hooks.count_titled("Message Deleted"), 1);
    session.close();
}

#[tokio::test]
async fn delete_unknown_id_leaves_log_unchanged() {
    let hooks = Arc::new(RecordingHooks::default());
    let session = open_session(&hooks);

    let before = session.messages().unwrap();
    session.delete_message(MessageId::new(9999)).unwrap();

    assert_eq!(session.messages().unwrap(), before);
    assert_eq!(hooks.count_titled("Message Deleted"), 0);
    session.close();
}

#[tokio::test]
async fn pin_toggles_idempotently() {
    let hooks = Arc::new(RecordingHooks::default());
    let session = open_session(&hooks);
    let target = session.messages().unwrap()[0].id;

    session.pin_message(target).unwrap();
    let pinned = session.messages().unwrap()[0].pinned;
    assert!(pinned);

    session.pin_message(target).unwrap();
    let unpinned = session.messages().unwrap()[0].pinned;
    assert!(!unpinned);

    assert_eq!(hooks.count_titled("Message Pinned"), 1);
    assert_eq!(hooks.count_titled("Message Unpinned"), 1);
    session.close();
}

#[tokio::test]
async fn banner_follows_most_recent_pin() {
    let hooks = Arc::new(RecordingHooks::default());
    let session = open_session(&hooks);
    let messages = session.messages().unwrap();
    let (first, second) = (messages[0].id, messages[1].id);

    session.pin_message(first).unwrap();
    session.pin_message(second).unwrap();
    assert_eq!(session.pinned_banner().unwrap().unwrap().id, second);

    session.pin_message(second).unwrap();
    assert_eq!(session.pinned_banner().unwrap().unwrap().id, first);

    session.pin_message(first).unwrap();
    assert!(session.pinned_banner().unwrap().is_none());

    session.close();
}

#[tokio::test]
async fn close_cancels_pending_cycles() {
    let hooks = Arc::new(RecordingHooks::default());
    let session = open_session(&hooks);

    // Greeting cycle pending from open, response cycle pending from send
    session.send_message("anyone there?").unwrap();
    session.close();

    let len_at_close = session.message_count();
    let notices_at_close = hooks.notice_titles().len();

    // Well past every configured delay
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(session.message_count(), len_at_close);
    assert_eq!(hooks.notice_titles().len(), notices_at_close);
    assert!(!session.is_typing());
    assert!(hooks.deltas().is_empty());
}

#[tokio::test]
async fn send_credits_appends_notice_and_debits_once() {
    let hooks = Arc::new(RecordingHooks::default());
    let session = open_session(&hooks);

    let id = session.send_credits(3).unwrap();

    let messages = session.messages().unwrap();
    let sent = messages.last().unwrap();
    assert_eq!(sent.id, id);
    assert!(sent.own);
    assert_eq!(sent.body.credit_amount(), Some(3));

    assert_eq!(hooks.deltas(), vec![-3]);
    assert_eq!(hooks.count_titled("Credits Sent"), 1);

    session.close();
}

#[tokio::test]
async fn attach_image_uses_fixed_url() {
    let hooks = Arc::new(RecordingHooks::default());
    let session = open_session(&hooks);

    session.attach_image().unwrap();

    let messages = session.messages().unwrap();
    let sent = messages.last().unwrap();
    assert!(sent.own);
    assert_eq!(sent.display_text(), pulse_chat::ATTACHMENT_URL);
    assert_eq!(hooks.count_titled("Attachment Shared"), 1);

    session.close();
}

#[tokio::test]
async fn report_notifies_without_mutating() {
    let hooks = Arc::new(RecordingHooks::default());
    let session = open_session(&hooks);

    let before = session.messages().unwrap();
    session.report_message(before[0].id).unwrap();

    assert_eq!(session.messages().unwrap(), before);
    assert_eq!(hooks.count_titled("Message Reported"), 1);

    // Unknown ID reports nothing
    session.report_message(MessageId::new(9999)).unwrap();
    assert_eq!(hooks.count_titled("Message Reported"), 1);

    session.close();
}

#[tokio::test]
async fn notification_gate_silences_deliveries_only() {
    let hooks = Arc::new(RecordingHooks::default());
    let session = open_session(&hooks);
    let mut events = session.subscribe();

    assert!(!session.toggle_notifications());

    // Greeting still lands while the gate is off, silently
    wait_for_delivery(&mut events).await;
    assert_eq!(hooks.count_titled("New Message"), 0);

    assert!(session.toggle_notifications());

    // With the gate back on, the reply to a send notifies
    session.send_message("checking in").unwrap();
    wait_for_delivery(&mut events).await;
    assert_eq!(hooks.count_titled("New Message"), 1);

    // Action notices were never gated
    assert_eq!(hooks.count_titled("Message Sent"), 1);

    session.close();
}
