//! Pact simulator binary.
//!
//! Replays contract scenarios against an in-memory ledger, and computes
//! HTLA hashes and game commitments offline.

use anyhow::{bail, Context};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use pact_core::{HashAlgorithm, Move};
use pact_sdk::{preimage_hash, SealedChoice};
use pact_sim::cli::{Cli, Command};
use pact_sim::config::SimConfig;
use pact_sim::report::print_report;
use pact_sim::scenario::{run_scenario, Scenario};

/// JSON output of the `hash` command.
#[derive(Serialize)]
struct HashJson {
    algorithm: String,
    hash: String,
}

/// JSON output of the `commit` command.
#[derive(Serialize)]
struct CommitJson {
    choice: u8,
    nonce: String,
    commitment: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();

    // Set up logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("pact-sim v{}", env!("CARGO_PKG_VERSION"));

    let config = SimConfig::from_cli(&cli);

    match &cli.command {
        Command::Run { scenario } => {
            let loaded = Scenario::load(scenario)
                .with_context(|| format!("loading {}", scenario.display()))?;
            let params = config.params_for(&loaded);
            let report = run_scenario(&loaded, params)?;

            if config.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }

            if !report.passed() {
                bail!(
                    "{} of {} steps missed their expectation",
                    report.failures().len(),
                    report.steps.len()
                );
            }
        }

        Command::Hash { input, algorithm } => {
            let algorithm: HashAlgorithm = algorithm.parse()?;
            let hash = preimage_hash(input, algorithm);
            if config.json {
                let output = HashJson {
                    algorithm: algorithm.to_string(),
                    hash,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("{} {}", algorithm, hash);
            }
        }

        Command::Commit { choice, nonce } => {
            let choice = Move::try_from(*choice).map_err(anyhow::Error::msg)?;
            let sealed = match nonce {
                Some(nonce) => SealedChoice::with_nonce(choice, nonce.as_str()),
                None => SealedChoice::new(choice),
            };
            if config.json {
                let output = CommitJson {
                    choice: sealed.choice.as_u8(),
                    nonce: sealed.nonce,
                    commitment: sealed.commitment,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("Choice:     {} ({})", sealed.choice.as_u8(), sealed.choice);
                println!("Nonce:      {}", sealed.nonce);
                println!("Commitment: {}", sealed.commitment);
                println!();
                println!("Keep the nonce until the reveal phase.");
            }
        }
    }

    Ok(())
}
