//! # Pact Core
//!
//! Core types, commitment verification, and serialization for pact ledger
//! contracts.
//!
//! This crate is the I/O-free foundation shared by every other pact crate:
//! - Caller identities ([`Identity`]) as canonical byte strings
//! - Ledger records for the auction, the commit-reveal game and HTLA proposals
//! - Hash algorithms and the commitment verifier (SHA-256/384/512)
//! - Invocation decoding from raw transaction arguments
//! - Field-named record encoding and deterministic envelope hashing

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod crypto;
pub mod error;
pub mod identity;
pub mod invocation;
pub mod serialization;
pub mod types;

// Re-export commonly used types at crate root
pub use crypto::{verify_commitment, HashAlgorithm};
pub use error::{CoreError, DecodeError, SerializationError};
pub use identity::Identity;
pub use invocation::{
    AuctionCall, ContractKind, GameCall, HtlaCall, Invocation, TxEnvelope,
};
pub use types::{
    AuctionRecord,
    GameOutcome, GamePhase, GameRecord, Move, PlayerMove, PlayerSlot,
    ProposalRecord, ProposalStatus,
};
