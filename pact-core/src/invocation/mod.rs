//! Contract invocations and the transaction envelope that carries them.

mod calls;
mod envelope;

pub use calls::{AuctionCall, ContractKind, GameCall, HtlaCall, Invocation};
pub use envelope::TxEnvelope;
