//! Serialization for ledger records and transaction envelopes.
//!
//! Two encodings are used, for two different jobs:
//! - Records are stored as field-named JSON so ledger state stays
//!   self-describing and readable by external tooling.
//! - Transaction envelopes are hashed over a deterministic bincode encoding,
//!   so every replica derives the same transaction id.

mod bincode_config;
mod record;

pub use bincode_config::{deserialize, serialize};
pub use record::{decode_record, encode_record};
