//! Auction records.

use serde::{Deserialize, Serialize};

use crate::identity::Identity;

/// A single-round ascending auction.
///
/// `deadline` is fixed at creation. `highest_bid` starts at zero and only
/// grows, through bids strictly above it placed no later than `deadline`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionRecord {
    /// Identifier derived from the creating transaction.
    pub auction_id: String,

    /// Identity that opened the auction.
    pub seller: Identity,

    /// Transaction timestamp at creation.
    pub created_at: u64,

    /// Last timestamp at which bids are still accepted.
    pub deadline: u64,

    /// Highest accepted bid (0 until the first bid).
    pub highest_bid: u64,

    /// Identity holding `highest_bid`. Starts as the seller.
    pub highest_bidder: Identity,
}

impl AuctionRecord {
    /// Open a new auction. The seller is the initial highest bidder.
    pub fn open(auction_id: String, seller: Identity, created_at: u64, deadline: u64) -> Self {
        Self {
            auction_id,
            highest_bidder: seller.clone(),
            seller,
            created_at,
            deadline,
            highest_bid: 0,
        }
    }

    /// Bids are accepted up to and including the deadline.
    #[inline]
    pub fn accepts_bids_at(&self, now: u64) -> bool {
        now <= self.deadline
    }

    /// The auction may be closed from the deadline onwards.
    #[inline]
    pub fn can_close_at(&self, now: u64) -> bool {
        now >= self.deadline
    }

    /// Whether anyone other than the seller has bid.
    pub fn has_bids(&self) -> bool {
        self.highest_bid > 0
    }
}
