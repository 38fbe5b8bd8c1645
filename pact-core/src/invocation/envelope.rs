//! Transaction envelope.

use serde::{Deserialize, Serialize};

use crate::crypto::sha256;
use crate::error::SerializationError;
use crate::identity::Identity;
use crate::invocation::Invocation;
use crate::serialization::serialize;

/// A contract invocation as submitted by an authenticated caller.
///
/// The platform fixes `caller` and `timestamp` before the contract runs.
/// Replicas executing the same envelope see the same values and derive the
/// same transaction id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxEnvelope {
    /// Authenticated caller identity.
    pub caller: Identity,

    /// Transaction timestamp in seconds.
    pub timestamp: u64,

    /// Client-chosen value that distinguishes otherwise identical submissions.
    pub nonce: u64,

    /// The decoded call.
    pub invocation: Invocation,
}

impl TxEnvelope {
    /// Create an envelope with a zero nonce.
    pub fn new(caller: Identity, timestamp: u64, invocation: Invocation) -> Self {
        Self {
            caller,
            timestamp,
            nonce: 0,
            invocation,
        }
    }

    /// Set the nonce.
    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }

    /// Compute the transaction ID.
    ///
    /// The ID is the SHA-256 hash of the deterministic bincode encoding of
    /// the whole envelope.
    pub fn id(&self) -> Result<[u8; 32], SerializationError> {
        let bytes = serialize(self)?;
        Ok(sha256(&bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invocation::{AuctionCall, GameCall};

    fn envelope(timestamp: u64) -> TxEnvelope {
        TxEnvelope::new(
            Identity::from_bytes(b"alice".to_vec()),
            timestamp,
            Invocation::Auction(AuctionCall::InitLedger {
                duration_seconds: 20,
            }),
        )
    }

    #[test]
    fn test_id_deterministic() {
        assert_eq!(envelope(1000).id().unwrap(), envelope(1000).id().unwrap());
    }

    #[test]
    fn test_id_covers_every_field() {
        let base = envelope(1000).id().unwrap();

        assert_ne!(envelope(1001).id().unwrap(), base);
        assert_ne!(envelope(1000).with_nonce(1).id().unwrap(), base);

        let mut other_caller = envelope(1000);
        other_caller.caller = Identity::from_bytes(b"bob".to_vec());
        assert_ne!(other_caller.id().unwrap(), base);

        let mut other_call = envelope(1000);
        other_call.invocation = Invocation::Game(GameCall::CreateGame);
        assert_ne!(other_call.id().unwrap(), base);
    }
}
