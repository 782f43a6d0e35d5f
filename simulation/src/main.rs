//! Pulse - Community Chat Simulation
//!
//! Terminal driver for the simulated community chat session: scripted
//! scenarios exercising the conversation cycles, credit transfers, and
//! moderation actions against an in-memory wallet.

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use pulse_chat::SessionTimings;

mod host;
mod scenarios;

#[derive(Parser)]
#[command(
    name = "pulse-simulation",
    about = "Scenario driver for the Pulse community chat simulation",
    version
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Run with millisecond-scale delays instead of the app's pacing
    #[arg(short, long, global = true)]
    fast: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a back-and-forth conversation with the simulated community
    Conversation,

    /// Send Pulse Credits into the chat, including the rejection path
    Credits {
        /// Number of credits to send
        #[arg(short, long, default_value = "3")]
        amount: u32,
    },

    /// Exercise pinning, reporting, and deleting messages
    Moderation,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact())
        .with(filter)
        .init();

    let timings = if cli.fast {
        SessionTimings::fast()
    } else {
        SessionTimings::default()
    };

    match cli.command {
        Commands::Conversation => scenarios::conversation(timings).await,
        Commands::Credits { amount } => scenarios::credits(timings, amount).await,
        Commands::Moderation => scenarios::moderation(timings).await,
    }
}
