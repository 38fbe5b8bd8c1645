//! Ledger record types.
//!
//! One record type per contract:
//!
//! - [`AuctionRecord`] for the sealed single-round auction
//! - [`GameRecord`] (with [`GamePhase`], [`PlayerSlot`], [`PlayerMove`], [`Move`])
//!   for the commit-reveal rock-paper-scissors game
//! - [`ProposalRecord`] and [`ProposalStatus`] for hashed time-locked agreements
//!
//! Every record is owned by the ledger under its key. Contracts re-read it at
//! the start of each transaction and write back a whole new value.

mod auction;
mod game;
mod proposal;

pub use auction::AuctionRecord;
pub use game::{resolve_moves, GameOutcome, GamePhase, GameRecord, Move, PlayerMove, PlayerSlot};
pub use proposal::{ProposalRecord, ProposalStatus};
