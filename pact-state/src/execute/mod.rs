//! Contract execution module.
//!
//! This module contains the invocation executor and the handlers of the
//! three contracts.

mod auction;
mod context;
mod executor;
mod game;
mod htla;

pub use context::{
    ContractParams, TxContext, DEFAULT_GAME_STALL_WINDOW, DEFAULT_PLAYERS_PER_GAME,
    DEVNET_GAME_STALL_WINDOW, MIN_PLAYERS_PER_GAME,
};
pub use executor::{apply_envelope, apply_invocation, apply_raw, Response};
