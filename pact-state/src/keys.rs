//! Key schema for ledger records.
//!
//! Every record lives under a prefixed string key so each contract owns a
//! disjoint part of the key space.

use std::fmt;

/// Key prefixes for the record types.
const AUCTION_PREFIX: &str = "auction:";
const GAME_PREFIX: &str = "game:";
const PROPOSAL_PREFIX: &str = "proposal:";

/// Address of a record in the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKey {
    /// Auction by id: `auction:<id>`
    Auction(String),
    /// Game by id: `game:<id>`
    Game(String),
    /// Proposal by id: `proposal:<id>`
    Proposal(String),
}

impl RecordKey {
    /// Encode as a ledger key.
    pub fn to_key(&self) -> String {
        match self {
            RecordKey::Auction(id) => format!("{}{}", AUCTION_PREFIX, id),
            RecordKey::Game(id) => format!("{}{}", GAME_PREFIX, id),
            RecordKey::Proposal(id) => format!("{}{}", PROPOSAL_PREFIX, id),
        }
    }

    /// Decode a ledger key. Returns `None` for keys outside the schema.
    pub fn parse(key: &str) -> Option<Self> {
        let (ctor, id): (fn(String) -> RecordKey, &str) =
            if let Some(id) = key.strip_prefix(AUCTION_PREFIX) {
                (RecordKey::Auction, id)
            } else if let Some(id) = key.strip_prefix(GAME_PREFIX) {
                (RecordKey::Game, id)
            } else if let Some(id) = key.strip_prefix(PROPOSAL_PREFIX) {
                (RecordKey::Proposal, id)
            } else {
                return None;
            };

        if id.is_empty() {
            return None;
        }
        Some(ctor(id.to_string()))
    }

    /// The record id without prefix.
    pub fn id(&self) -> &str {
        match self {
            RecordKey::Auction(id) | RecordKey::Game(id) | RecordKey::Proposal(id) => id,
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_key())
    }
}
