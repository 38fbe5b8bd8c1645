//! HTLA proposal handlers.
//!
//! Handles CreateProposal, ConfirmProposal, InvalidateProposal, GetProposal
//! and GenerateHash.

use pact_core::crypto::{digest_hex, validate_digest, verify_commitment};
use pact_core::{HashAlgorithm, ProposalRecord, ProposalStatus};
use tracing::{debug, info};

use crate::error::{ContractError, ContractResult};
use crate::events::{
    handler_topic, Event, ProposalConfirmed, ProposalNotice, TOPIC_PROPOSAL_CONFIRMED,
    TOPIC_PROPOSAL_CREATED, TOPIC_PROPOSAL_EXPIRED,
};
use crate::keys::RecordKey;
use crate::ledger::{load_record, record_exists, save_record, LedgerStore};

use super::context::TxContext;

/// Domain tag for proposal ids.
const PROPOSAL_DOMAIN: &str = "htla";

fn load_proposal<S: LedgerStore>(ledger: &mut S, proposal_id: &str) -> ContractResult<ProposalRecord> {
    load_record(ledger, &RecordKey::Proposal(proposal_id.to_string()))?
        .ok_or_else(|| ContractError::ProposalNotFound(proposal_id.to_string()))
}

fn require_pending(proposal: &ProposalRecord) -> ContractResult<()> {
    if proposal.is_terminal() {
        return Err(ContractError::AlreadyResolved {
            proposal_id: proposal.proposal_id.clone(),
            status: proposal.status,
        });
    }
    Ok(())
}

/// Execute a CreateProposal.
///
/// # Validation
/// - `algorithm` is SHA256, SHA384 or SHA512
/// - `amount` > 0 and `timelock_seconds` > 0
/// - `hash` is hex of the algorithm's digest length
/// - `handler` is not blank
///
/// Emits `<handler>_PROPOSAL_CREATED` and `PROPOSAL_CREATED`.
pub fn execute_create_proposal<S: LedgerStore>(
    ledger: &mut S,
    ctx: &TxContext,
    events: &mut Vec<Event>,
    amount: i64,
    timelock_seconds: i64,
    hash: &str,
    algorithm: &str,
    handler: &str,
) -> ContractResult<String> {
    let algorithm: HashAlgorithm = algorithm.parse()?;

    if amount <= 0 {
        return Err(ContractError::InvalidAmount(amount));
    }
    if timelock_seconds <= 0 {
        return Err(ContractError::InvalidDuration(timelock_seconds));
    }
    let hash = validate_digest(hash, algorithm)?;
    let handler = handler.trim();
    if handler.is_empty() {
        return Err(ContractError::InvalidHandler);
    }

    let timelock = ctx
        .timestamp
        .checked_add(timelock_seconds as u64)
        .ok_or(ContractError::ArithmeticOverflow)?;

    let proposal_id = ctx.derive_id(PROPOSAL_DOMAIN);
    let key = RecordKey::Proposal(proposal_id.clone());
    if record_exists(ledger, &key)? {
        return Err(ContractError::RecordAlreadyExists(key.to_key()));
    }

    let proposal = ProposalRecord {
        proposal_id: proposal_id.clone(),
        creator: ctx.caller.clone(),
        handler: handler.to_string(),
        amount: amount as u64,
        hash,
        hash_algorithm: algorithm,
        created_at: ctx.timestamp,
        timelock,
        status: ProposalStatus::Pending,
        resolved_at: None,
    };
    save_record(ledger, &key, &proposal)?;

    let notice = ProposalNotice {
        proposal_id: proposal_id.clone(),
    };
    events.push(Event::json(handler_topic(handler), &notice)?);
    events.push(Event::json(TOPIC_PROPOSAL_CREATED, &notice)?);

    info!(
        proposal = %proposal_id,
        creator = %ctx.caller,
        amount = proposal.amount,
        %algorithm,
        timelock,
        "proposal created"
    );
    Ok(proposal_id)
}

/// Execute a ConfirmProposal.
///
/// # Validation
/// - Proposal must exist and be `Pending`
/// - `now < timelock`
/// - `preimage` hashes to the proposal's hash
///
/// Emits `PROPOSAL_CONFIRMED` carrying the preimage.
pub fn execute_confirm_proposal<S: LedgerStore>(
    ledger: &mut S,
    ctx: &TxContext,
    events: &mut Vec<Event>,
    proposal_id: &str,
    preimage: &str,
) -> ContractResult<()> {
    let mut proposal = load_proposal(ledger, proposal_id)?;
    require_pending(&proposal)?;

    if proposal.timelock_expired(ctx.timestamp) {
        return Err(ContractError::TimelockExpired {
            proposal_id: proposal_id.to_string(),
            timelock: proposal.timelock,
            now: ctx.timestamp,
        });
    }
    if !verify_commitment(preimage.as_bytes(), &proposal.hash, proposal.hash_algorithm) {
        return Err(ContractError::PreimageMismatch(proposal_id.to_string()));
    }

    proposal.status = ProposalStatus::Confirmed;
    proposal.resolved_at = Some(ctx.timestamp);
    save_record(ledger, &RecordKey::Proposal(proposal_id.to_string()), &proposal)?;

    events.push(Event::json(
        TOPIC_PROPOSAL_CONFIRMED,
        &ProposalConfirmed {
            proposal_id: proposal_id.to_string(),
            pre_image: preimage.to_string(),
        },
    )?);

    info!(proposal = %proposal_id, by = %ctx.caller, "proposal confirmed");
    Ok(())
}

/// Execute an InvalidateProposal.
///
/// Anyone may expire a proposal once its timelock has passed.
///
/// # Validation
/// - Proposal must exist and be `Pending`
/// - `now >= timelock`
///
/// Emits `PROPOSAL_EXPIRED`.
pub fn execute_invalidate_proposal<S: LedgerStore>(
    ledger: &mut S,
    ctx: &TxContext,
    events: &mut Vec<Event>,
    proposal_id: &str,
) -> ContractResult<()> {
    let mut proposal = load_proposal(ledger, proposal_id)?;
    require_pending(&proposal)?;

    if !proposal.timelock_expired(ctx.timestamp) {
        return Err(ContractError::TimelockNotExpired {
            proposal_id: proposal_id.to_string(),
            timelock: proposal.timelock,
            now: ctx.timestamp,
        });
    }

    proposal.status = ProposalStatus::Expired;
    proposal.resolved_at = Some(ctx.timestamp);
    save_record(ledger, &RecordKey::Proposal(proposal_id.to_string()), &proposal)?;

    events.push(Event::json(
        TOPIC_PROPOSAL_EXPIRED,
        &ProposalNotice {
            proposal_id: proposal_id.to_string(),
        },
    )?);

    info!(proposal = %proposal_id, by = %ctx.caller, "proposal expired");
    Ok(())
}

/// Read a proposal.
pub fn execute_get_proposal<S: LedgerStore>(
    ledger: &mut S,
    proposal_id: &str,
) -> ContractResult<ProposalRecord> {
    load_proposal(ledger, proposal_id)
}

/// Hash `input` under `algorithm`, returning lower-case hex.
pub fn execute_generate_hash(input: &str, algorithm: &str) -> ContractResult<String> {
    let algorithm: HashAlgorithm = algorithm.parse()?;
    let hash = digest_hex(algorithm, input.as_bytes());
    debug!(%algorithm, "hash generated");
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MemoryLedger;
    use pact_core::Identity;

    const SECRET: &str = "HTLA-SDK-DEMO";
    const SECRET_SHA256: &str = "7e95e9408bf4179ca21d79ba2361078302273095d399a51d26abd2e4243ee65f";

    fn at(timestamp: u64, who: &str) -> TxContext {
        TxContext::with_timestamp(timestamp, Identity::from_bytes(who.as_bytes().to_vec()))
    }

    fn create(ledger: &mut MemoryLedger, events: &mut Vec<Event>) -> String {
        execute_create_proposal(
            ledger,
            &at(1000, "creator"),
            events,
            10,
            60,
            SECRET_SHA256,
            "SHA256",
            "relay",
        )
        .unwrap()
    }

    #[test]
    fn test_create_proposal() {
        let mut ledger = MemoryLedger::new();
        let mut events = Vec::new();
        let id = create(&mut ledger, &mut events);

        let proposal = execute_get_proposal(&mut ledger, &id).unwrap();
        assert_eq!(proposal.status, ProposalStatus::Pending);
        assert_eq!(proposal.amount, 10);
        assert_eq!(proposal.timelock, 1060);
        assert_eq!(proposal.handler, "relay");

        let topics: Vec<_> = events.iter().map(|e| e.topic.as_str()).collect();
        assert_eq!(topics, vec!["relay_PROPOSAL_CREATED", "PROPOSAL_CREATED"]);
        assert_eq!(events[1].payload_str(), format!(r#"{{"proposalId":"{}"}}"#, id));
    }

    #[test]
    fn test_create_validation() {
        let mut ledger = MemoryLedger::new();
        let mut events = Vec::new();
        let ctx = at(1000, "creator");

        let mut try_create = |amount, secs, hash: &str, alg: &str, handler: &str| {
            execute_create_proposal(&mut ledger, &ctx, &mut events, amount, secs, hash, alg, handler)
        };

        assert_eq!(
            try_create(10, 60, SECRET_SHA256, "MD5", "relay"),
            Err(ContractError::UnsupportedAlgorithm("MD5".into()))
        );
        assert_eq!(
            try_create(0, 60, SECRET_SHA256, "SHA256", "relay"),
            Err(ContractError::InvalidAmount(0))
        );
        assert_eq!(
            try_create(10, -1, SECRET_SHA256, "SHA256", "relay"),
            Err(ContractError::InvalidDuration(-1))
        );
        assert!(matches!(
            try_create(10, 60, SECRET_SHA256, "SHA512", "relay"),
            Err(ContractError::InvalidDigest { .. })
        ));
        assert_eq!(
            try_create(10, 60, SECRET_SHA256, "SHA256", "  "),
            Err(ContractError::InvalidHandler)
        );

        assert!(events.is_empty());
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_confirm_then_repeat() {
        let mut ledger = MemoryLedger::new();
        let mut events = Vec::new();
        let id = create(&mut ledger, &mut events);
        events.clear();

        execute_confirm_proposal(&mut ledger, &at(1030, "counterparty"), &mut events, &id, SECRET)
            .unwrap();
        let proposal = execute_get_proposal(&mut ledger, &id).unwrap();
        assert_eq!(proposal.status, ProposalStatus::Confirmed);
        assert_eq!(proposal.resolved_at, Some(1030));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].topic, TOPIC_PROPOSAL_CONFIRMED);

        assert_eq!(
            execute_confirm_proposal(&mut ledger, &at(1031, "counterparty"), &mut events, &id, SECRET),
            Err(ContractError::AlreadyResolved {
                proposal_id: id.clone(),
                status: ProposalStatus::Confirmed
            })
        );
        // Confirmed proposals never expire
        assert!(matches!(
            execute_invalidate_proposal(&mut ledger, &at(5000, "anyone"), &mut events, &id),
            Err(ContractError::AlreadyResolved { .. })
        ));
    }

    #[test]
    fn test_confirm_timelock_boundary() {
        let mut ledger = MemoryLedger::new();
        let mut events = Vec::new();
        let id = create(&mut ledger, &mut events);

        assert!(matches!(
            execute_confirm_proposal(&mut ledger, &at(1060, "c"), &mut events, &id, SECRET),
            Err(ContractError::TimelockExpired { timelock: 1060, now: 1060, .. })
        ));
        execute_confirm_proposal(&mut ledger, &at(1059, "c"), &mut events, &id, SECRET).unwrap();
    }

    #[test]
    fn test_wrong_preimage() {
        let mut ledger = MemoryLedger::new();
        let mut events = Vec::new();
        let id = create(&mut ledger, &mut events);

        assert_eq!(
            execute_confirm_proposal(&mut ledger, &at(1001, "c"), &mut events, &id, "guess"),
            Err(ContractError::PreimageMismatch(id.clone()))
        );
        assert_eq!(
            execute_get_proposal(&mut ledger, &id).unwrap().status,
            ProposalStatus::Pending
        );
    }

    #[test]
    fn test_invalidate_timelock_boundary() {
        let mut ledger = MemoryLedger::new();
        let mut events = Vec::new();
        let id = create(&mut ledger, &mut events);
        events.clear();

        assert!(matches!(
            execute_invalidate_proposal(&mut ledger, &at(1059, "anyone"), &mut events, &id),
            Err(ContractError::TimelockNotExpired { .. })
        ));
        execute_invalidate_proposal(&mut ledger, &at(1060, "anyone"), &mut events, &id).unwrap();
        assert_eq!(
            execute_get_proposal(&mut ledger, &id).unwrap().status,
            ProposalStatus::Expired
        );
        assert_eq!(events[0].topic, TOPIC_PROPOSAL_EXPIRED);

        // Expired proposals never confirm
        assert!(matches!(
            execute_confirm_proposal(&mut ledger, &at(1000, "c"), &mut events, &id, SECRET),
            Err(ContractError::AlreadyResolved { status: ProposalStatus::Expired, .. })
        ));
    }

    #[test]
    fn test_sha512_proposal() {
        let mut ledger = MemoryLedger::new();
        let mut events = Vec::new();
        let hash = execute_generate_hash(SECRET, "sha-512").unwrap();
        let id = execute_create_proposal(
            &mut ledger,
            &at(1000, "creator"),
            &mut events,
            5,
            30,
            &hash.to_ascii_uppercase(),
            "SHA512",
            "relay",
        )
        .unwrap();

        execute_confirm_proposal(&mut ledger, &at(1010, "c"), &mut events, &id, SECRET).unwrap();
    }

    #[test]
    fn test_generate_hash() {
        assert_eq!(execute_generate_hash(SECRET, "SHA256").unwrap(), SECRET_SHA256);
        assert_eq!(
            execute_generate_hash(SECRET, "SHA384").unwrap(),
            "39a8405563a30a1abff70134173682ef6706827eb15d7116f6ae6f051d95c04562ef3b157b2374881f8df1d9c5eac1da"
        );
        assert_eq!(
            execute_generate_hash(SECRET, "SHA1"),
            Err(ContractError::UnsupportedAlgorithm("SHA1".into()))
        );
    }

    #[test]
    fn test_missing_proposal() {
        let mut ledger = MemoryLedger::new();
        let mut events = Vec::new();
        assert_eq!(
            execute_invalidate_proposal(&mut ledger, &at(1, "a"), &mut events, "nope"),
            Err(ContractError::ProposalNotFound("nope".into()))
        );
    }
}
