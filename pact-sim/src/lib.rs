//! Pact scenario simulator library.
//!
//! Replays scripted transactions against an in-memory ledger with logical
//! timestamps. Used by the `pact-sim` binary and its tests.

pub mod cli;
pub mod config;
pub mod report;
pub mod scenario;
