//! Ledger state store.
//!
//! Contracts see the ledger as a keyed byte store. This module provides:
//! - `LedgerStore`: the store interface supplied by the platform
//! - `MemoryLedger`: versioned in-memory store for tests and simulation
//! - `TxOverlay`: per-transaction write buffer over any store
//! - typed record helpers encoding records as field-named JSON

mod memory;
mod overlay;
mod records;
mod store;

pub use memory::MemoryLedger;
pub use overlay::TxOverlay;
pub use store::{BatchOp, LedgerStore, WriteBatch};

pub(crate) use records::{load_record, record_exists, save_record};
