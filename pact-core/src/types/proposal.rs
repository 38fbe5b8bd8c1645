//! Hashed time-locked agreement (HTLA) proposals.
//!
//! A proposal locks `amount` behind a hash. It is confirmed by revealing a
//! preimage strictly before `timelock`, or expired by anyone from `timelock`
//! onwards. The two terminal states exclude each other.

use serde::{Deserialize, Serialize};

use crate::crypto::HashAlgorithm;
use crate::identity::Identity;

/// The status of a proposal in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProposalStatus {
    /// Waiting for a preimage or for the timelock to pass.
    Pending,
    /// Preimage revealed in time.
    Confirmed,
    /// Timelock passed without confirmation.
    Expired,
}

/// A hashed time-locked proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalRecord {
    /// Identifier derived from the creating transaction.
    pub proposal_id: String,

    /// Identity that created the proposal.
    pub creator: Identity,

    /// Notification topic prefix chosen by the creator.
    pub handler: String,

    /// Locked amount (> 0).
    pub amount: u64,

    /// Lower-case hex digest the preimage must hash to.
    pub hash: String,

    /// Algorithm `hash` was produced with.
    pub hash_algorithm: HashAlgorithm,

    /// Transaction timestamp at creation.
    pub created_at: u64,

    /// Absolute deadline. Confirmation needs `now < timelock`.
    pub timelock: u64,

    /// Current status.
    pub status: ProposalStatus,

    /// Timestamp of the terminal transition (None while pending).
    pub resolved_at: Option<u64>,
}

impl ProposalRecord {
    /// Check if this proposal is in a terminal state (Confirmed or Expired).
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            ProposalStatus::Confirmed | ProposalStatus::Expired
        )
    }

    /// Check if the timelock has passed.
    ///
    /// Returns true if `now >= timelock`.
    #[inline]
    pub fn timelock_expired(&self, now: u64) -> bool {
        now >= self.timelock
    }
}
