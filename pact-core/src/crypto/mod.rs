//! Cryptographic primitives for pact contracts.
//!
//! This module provides:
//! - SHA-256/384/512 hashing behind a validated [`HashAlgorithm`] tag
//! - The commitment verifier used by HTLA proposals and the commit-reveal game
//! - Digest shape validation for commitments published on the ledger

mod commitment;
mod hashing;

pub use commitment::{choice_preimage, validate_digest, verify_commitment};
pub use hashing::{digest, digest_hex, sha256, sha256_concat, HashAlgorithm};
