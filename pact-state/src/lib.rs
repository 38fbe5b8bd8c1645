//! State machines for the pact ledger contracts.
//!
//! This crate implements the transition functions of the three contracts.
//! Given a ledger, a transaction context and an invocation, it validates the
//! call, produces the next ledger state or an error, and publishes the
//! transaction's notifications. No networking, no clocks, no randomness.
//!
//! # Key Components
//!
//! - [`LedgerStore`]: keyed byte store the contracts run against
//! - [`MemoryLedger`]: versioned in-memory store
//! - [`TxOverlay`]: per-transaction write buffer, committed only on success
//! - [`TxContext`]: replica-agreed timestamp, caller and transaction id
//! - [`apply_invocation`]: main entry point for executing a call
//! - [`ContractError`]: every rejection, categorised by [`ErrorKind`]
//!
//! # Example
//!
//! ```ignore
//! use pact_state::{apply_raw, EventLog, MemoryLedger, TxContext};
//!
//! let mut ledger = MemoryLedger::new();
//! let mut events = EventLog::new();
//! let ctx = TxContext::with_timestamp(1_700_000_000, seller);
//! let id = apply_raw(&mut ledger, &mut events, &ctx, "auction", "InitLedger", &["60".into()])?;
//! ```

// Contract handlers take the ledger, the context and every decoded argument
#![allow(clippy::too_many_arguments)]

mod error;
mod events;
mod execute;
mod keys;
mod ledger;

pub use error::{ContractError, ContractResult, ErrorKind, StoreError};
pub use events::{
    handler_topic, Event, EventLog, EventSink, NotifyError, ProposalConfirmed, ProposalNotice,
    TOPIC_PROPOSAL_CONFIRMED, TOPIC_PROPOSAL_CREATED, TOPIC_PROPOSAL_EXPIRED,
};
pub use execute::{
    apply_envelope, apply_invocation, apply_raw, ContractParams, Response, TxContext,
    DEFAULT_GAME_STALL_WINDOW, DEFAULT_PLAYERS_PER_GAME, DEVNET_GAME_STALL_WINDOW,
    MIN_PLAYERS_PER_GAME,
};
pub use keys::RecordKey;
pub use ledger::{BatchOp, LedgerStore, MemoryLedger, TxOverlay, WriteBatch};
