//! Auction handlers.
//!
//! Handles InitLedger, SubmitBid, CloseBid and GetAuction. Settlement of the
//! winning bid is not performed here.

use pact_core::AuctionRecord;
use tracing::{debug, info};

use crate::error::{ContractError, ContractResult};
use crate::keys::RecordKey;
use crate::ledger::{load_record, record_exists, save_record, LedgerStore};

use super::context::TxContext;

/// Domain tag for auction ids.
const AUCTION_DOMAIN: &str = "auction";

fn load_auction<S: LedgerStore>(ledger: &mut S, auction_id: &str) -> ContractResult<AuctionRecord> {
    load_record(ledger, &RecordKey::Auction(auction_id.to_string()))?
        .ok_or_else(|| ContractError::AuctionNotFound(auction_id.to_string()))
}

/// Execute an auction InitLedger.
///
/// # Validation
/// - `duration_seconds` > 0
/// - Deadline must not overflow
///
/// The caller becomes the seller and the initial highest bidder.
pub fn execute_init_auction<S: LedgerStore>(
    ledger: &mut S,
    ctx: &TxContext,
    duration_seconds: i64,
) -> ContractResult<String> {
    if duration_seconds <= 0 {
        return Err(ContractError::InvalidDuration(duration_seconds));
    }

    let deadline = ctx
        .timestamp
        .checked_add(duration_seconds as u64)
        .ok_or(ContractError::ArithmeticOverflow)?;

    let auction_id = ctx.derive_id(AUCTION_DOMAIN);
    let key = RecordKey::Auction(auction_id.clone());
    if record_exists(ledger, &key)? {
        return Err(ContractError::RecordAlreadyExists(key.to_key()));
    }

    let record = AuctionRecord::open(auction_id.clone(), ctx.caller.clone(), ctx.timestamp, deadline);
    save_record(ledger, &key, &record)?;

    info!(auction = %auction_id, seller = %ctx.caller, deadline, "auction opened");
    Ok(auction_id)
}

/// Execute a SubmitBid.
///
/// # Validation
/// - Auction must exist
/// - `now <= deadline`
/// - `bid > highest_bid` (equal bids never replace the incumbent)
pub fn execute_submit_bid<S: LedgerStore>(
    ledger: &mut S,
    ctx: &TxContext,
    auction_id: &str,
    bid: i64,
) -> ContractResult<()> {
    let mut record = load_auction(ledger, auction_id)?;

    if !record.accepts_bids_at(ctx.timestamp) {
        return Err(ContractError::AuctionExpired {
            auction_id: auction_id.to_string(),
            deadline: record.deadline,
            now: ctx.timestamp,
        });
    }

    // Negative bids fail the same comparison as any other low bid
    let amount = u64::try_from(bid)
        .ok()
        .filter(|amount| *amount > record.highest_bid)
        .ok_or(ContractError::BidTooLow {
            bid,
            highest: record.highest_bid,
        })?;

    record.highest_bid = amount;
    record.highest_bidder = ctx.caller.clone();
    save_record(ledger, &RecordKey::Auction(auction_id.to_string()), &record)?;

    debug!(auction = %auction_id, bidder = %ctx.caller, bid = amount, "bid accepted");
    Ok(())
}

/// Execute a CloseBid.
///
/// # Validation
/// - Auction must exist
/// - `now >= deadline`
///
/// Read-only: returns the final record.
pub fn execute_close_bid<S: LedgerStore>(
    ledger: &mut S,
    ctx: &TxContext,
    auction_id: &str,
) -> ContractResult<AuctionRecord> {
    let record = load_auction(ledger, auction_id)?;

    if !record.can_close_at(ctx.timestamp) {
        return Err(ContractError::AuctionStillOpen {
            auction_id: auction_id.to_string(),
            deadline: record.deadline,
            now: ctx.timestamp,
        });
    }

    if record.has_bids() {
        info!(
            auction = %auction_id,
            winner = %record.highest_bidder,
            bid = record.highest_bid,
            "auction closed"
        );
    } else {
        info!(auction = %auction_id, seller = %record.seller, "auction closed without bids");
    }
    Ok(record)
}

/// Read an auction.
pub fn execute_get_auction<S: LedgerStore>(
    ledger: &mut S,
    auction_id: &str,
) -> ContractResult<AuctionRecord> {
    load_auction(ledger, auction_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MemoryLedger;
    use pact_core::Identity;

    fn at(timestamp: u64, who: &str) -> TxContext {
        TxContext::with_timestamp(timestamp, Identity::from_bytes(who.as_bytes().to_vec()))
    }

    fn open_auction(ledger: &mut MemoryLedger) -> String {
        execute_init_auction(ledger, &at(1000, "seller"), 20).unwrap()
    }

    #[test]
    fn test_init_auction() {
        let mut ledger = MemoryLedger::new();
        let id = open_auction(&mut ledger);

        let record = execute_get_auction(&mut ledger, &id).unwrap();
        assert_eq!(record.deadline, 1020);
        assert_eq!(record.highest_bid, 0);
        assert_eq!(record.seller, Identity::from_bytes(b"seller".to_vec()));
        assert_eq!(record.highest_bidder, record.seller);
    }

    #[test]
    fn test_init_rejects_non_positive_duration() {
        let mut ledger = MemoryLedger::new();
        assert_eq!(
            execute_init_auction(&mut ledger, &at(1000, "s"), 0),
            Err(ContractError::InvalidDuration(0))
        );
        assert_eq!(
            execute_init_auction(&mut ledger, &at(1000, "s"), -5),
            Err(ContractError::InvalidDuration(-5))
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_init_deadline_overflow() {
        let mut ledger = MemoryLedger::new();
        assert_eq!(
            execute_init_auction(&mut ledger, &at(u64::MAX - 1, "s"), 10),
            Err(ContractError::ArithmeticOverflow)
        );
    }

    #[test]
    fn test_bids_strictly_increase() {
        let mut ledger = MemoryLedger::new();
        let id = open_auction(&mut ledger);

        execute_submit_bid(&mut ledger, &at(1001, "alice"), &id, 100).unwrap();

        // Equal bid keeps the incumbent
        let err = execute_submit_bid(&mut ledger, &at(1002, "bob"), &id, 100).unwrap_err();
        assert_eq!(
            err,
            ContractError::BidTooLow {
                bid: 100,
                highest: 100
            }
        );

        execute_submit_bid(&mut ledger, &at(1003, "bob"), &id, 150).unwrap();
        let record = execute_get_auction(&mut ledger, &id).unwrap();
        assert_eq!(record.highest_bid, 150);
        assert_eq!(record.highest_bidder, Identity::from_bytes(b"bob".to_vec()));
    }

    #[test]
    fn test_non_positive_bid_too_low() {
        let mut ledger = MemoryLedger::new();
        let id = open_auction(&mut ledger);

        for bid in [0, -1, i64::MIN] {
            assert!(matches!(
                execute_submit_bid(&mut ledger, &at(1001, "alice"), &id, bid),
                Err(ContractError::BidTooLow { .. })
            ));
        }
    }

    #[test]
    fn test_bid_deadline_inclusive() {
        let mut ledger = MemoryLedger::new();
        let id = open_auction(&mut ledger);

        execute_submit_bid(&mut ledger, &at(1020, "alice"), &id, 10).unwrap();
        assert!(matches!(
            execute_submit_bid(&mut ledger, &at(1021, "bob"), &id, 20),
            Err(ContractError::AuctionExpired { deadline: 1020, now: 1021, .. })
        ));
    }

    #[test]
    fn test_close_gated_on_deadline() {
        let mut ledger = MemoryLedger::new();
        let id = open_auction(&mut ledger);
        execute_submit_bid(&mut ledger, &at(1005, "alice"), &id, 10).unwrap();

        assert!(matches!(
            execute_close_bid(&mut ledger, &at(1019, "seller"), &id),
            Err(ContractError::AuctionStillOpen { .. })
        ));

        let closed = execute_close_bid(&mut ledger, &at(1020, "anyone"), &id).unwrap();
        assert_eq!(closed.highest_bid, 10);
    }

    #[test]
    fn test_unknown_auction() {
        let mut ledger = MemoryLedger::new();
        assert_eq!(
            execute_submit_bid(&mut ledger, &at(1, "a"), "missing", 5),
            Err(ContractError::AuctionNotFound("missing".into()))
        );
    }
}
