//! Scripted scenario runs
//!
//! Each scenario opens a session against a [`TerminalHost`], drives it the
//! way a user would, and closes it before returning so pending cycles are
//! cancelled on the way out.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::broadcast;
use tokio::time::timeout;

use pulse_chat::{ChatSession, SessionEvent, SessionHooks, SessionTimings};

use crate::host::{TerminalHost, print_events};

/// How long a scenario waits for a simulated delivery before giving up.
const DELIVERY_TIMEOUT: Duration = Duration::from_secs(15);

const CHANNEL: &str = "Downtown O+ Donors";

struct Run {
    session: ChatSession,
    host: Arc<TerminalHost>,
    deliveries: broadcast::Receiver<SessionEvent>,
    printer: tokio::task::JoinHandle<()>,
}

impl Run {
    fn start(timings: SessionTimings) -> Self {
        let host = TerminalHost::new(CHANNEL);
        let hooks: Arc<dyn SessionHooks> = host.clone();
        let session = ChatSession::open(CHANNEL, timings, hooks);

        println!("── {CHANNEL} ──");
        for msg in session.messages().unwrap_or_default() {
            println!(
                "  [{}] {} {}: {}",
                msg.sent_at.format("%H:%M"),
                msg.sender.initials,
                msg.sender.name,
                msg.display_text(),
            );
        }

        let deliveries = session.subscribe();
        let printer = tokio::spawn(print_events(session.subscribe()));

        Self {
            session,
            host,
            deliveries,
            printer,
        }
    }

    /// Wait until the next simulated (non-own) message lands
    async fn wait_for_delivery(&mut self) -> anyhow::Result<()> {
        loop {
            let event = timeout(DELIVERY_TIMEOUT, self.deliveries.recv())
                .await
                .context("timed out waiting for a simulated delivery")??;

            if let SessionEvent::MessageAppended(msg) = event
                && !msg.own
            {
                return Ok(());
            }
        }
    }

    async fn finish(self) {
        self.session.close();
        // Give the printer a beat to drain, then stop it
        tokio::time::sleep(Duration::from_millis(50)).await;
        self.printer.abort();
        self.host.print_summary();
    }
}

/// A back-and-forth conversation with the simulated community
pub async fn conversation(timings: SessionTimings) -> anyhow::Result<()> {
    let mut run = Run::start(timings);

    run.wait_for_delivery().await?;

    run.session
        .send_message("I can donate. When is the next drive?")?;
    run.wait_for_delivery().await?;

    run.session.send_message("Great, count me in.")?;
    run.wait_for_delivery().await?;

    run.finish().await;
    Ok(())
}

/// Credit transfers, including the advisory over-balance rejection
pub async fn credits(timings: SessionTimings, amount: u32) -> anyhow::Result<()> {
    let mut run = Run::start(timings);

    match run.host.can_send(amount) {
        Ok(()) => {
            run.session.send_credits(amount)?;
        }
        Err(e) => println!("  ── Cannot Send Credits: {e}"),
    }

    // An over-balance attempt never reaches the session
    let over = run.host.balance() + 1;
    if let Err(e) = run.host.can_send(over) {
        println!("  ── Cannot Send Credits: {e}");
    }

    run.session.send_message("Sent some credits your way!")?;
    run.wait_for_delivery().await?;

    run.finish().await;
    Ok(())
}

/// Pinning, reporting, and deleting messages
pub async fn moderation(timings: SessionTimings) -> anyhow::Result<()> {
    let mut run = Run::start(timings);

    let seed = run.session.messages()?;
    run.session.pin_message(seed[0].id)?;
    run.session.pin_message(seed[1].id)?;
    run.session.report_message(seed[2].id)?;

    let own = run
        .session
        .send_message("Oops, wrong channel")?
        .context("non-empty message was dropped")?;
    run.session.delete_message(own)?;

    run.wait_for_delivery().await?;

    if let Some(banner) = run.session.pinned_banner()? {
        println!("  * pinned banner: {}", banner.display_text());
    }

    run.finish().await;
    Ok(())
}
