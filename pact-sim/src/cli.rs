//! `pact-sim` command line.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Pact contract simulator.
#[derive(Parser, Debug, Clone)]
#[command(name = "pact-sim")]
#[command(about = "Replay pact contract scenarios against an in-memory ledger")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Players a new game waits for (minimum 2).
    #[arg(long, global = true)]
    pub players_per_game: Option<u8>,

    /// Seconds before a stalled game may be abandoned.
    #[arg(long, global = true)]
    pub stall_window: Option<u64>,

    /// Enable devnet mode (10 second stall window).
    #[arg(long, global = true)]
    pub devnet: bool,

    /// Print results as JSON instead of coloured text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Default tracing filter when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Replay a JSON scenario file.
    Run {
        /// Path to the scenario.
        scenario: PathBuf,
    },

    /// Hash an HTLA secret.
    Hash {
        /// Secret preimage.
        input: String,

        /// SHA256, SHA384 or SHA512.
        #[arg(long, short, default_value = "SHA256")]
        algorithm: String,
    },

    /// Seal a game move into a commitment.
    Commit {
        /// 0 (rock), 1 (paper) or 2 (scissors).
        choice: u8,

        /// Nonce to seal with; random when omitted.
        #[arg(long)]
        nonce: Option<String>,
    },
}

impl Cli {
    /// Parse `std::env::args`, exiting on usage errors.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
