//! Invocation executor - main entry point for contract calls.
//!
//! Every call runs against a [`TxOverlay`]. When the handler succeeds its
//! buffered notifications are handed to the sink, and only then are its
//! writes committed. A handler or sink failure drops the overlay, so a
//! rejected call never changes the ledger.

use pact_core::{
    AuctionCall, AuctionRecord, GameCall, GameOutcome, GameRecord, HtlaCall, Invocation,
    ProposalRecord, TxEnvelope,
};
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::error::ContractResult;
use crate::events::{Event, EventSink};
use crate::ledger::{LedgerStore, TxOverlay};

use super::auction::{
    execute_close_bid, execute_get_auction, execute_init_auction, execute_submit_bid,
};
use super::context::{ContractParams, TxContext};
use super::game::{
    execute_abandon_game, execute_create_game, execute_determine_winner, execute_get_game,
    execute_join_game, execute_make_choice, execute_resolve_game, execute_reveal_choice,
};
use super::htla::{
    execute_confirm_proposal, execute_create_proposal, execute_generate_hash,
    execute_get_proposal, execute_invalidate_proposal,
};

/// Value returned by a successful invocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Response {
    /// Nothing to return.
    Unit,
    /// Id of a newly created record.
    Id(String),
    /// Game outcome.
    Outcome(GameOutcome),
    /// Auction record.
    Auction(AuctionRecord),
    /// Game record.
    Game(GameRecord),
    /// Proposal record.
    Proposal(ProposalRecord),
    /// Hex digest.
    Hash(String),
}

impl Response {
    /// The created record id, if this response carries one.
    pub fn id(&self) -> Option<&str> {
        match self {
            Response::Id(id) => Some(id),
            _ => None,
        }
    }
}

/// Execute a decoded invocation.
///
/// # Arguments
/// - `ledger`: Ledger state store
/// - `sink`: Destination for notifications
/// - `ctx`: Transaction context
/// - `invocation`: The call to execute
///
/// # Returns
/// - `Ok(Response)` if the call was applied and its writes committed
/// - `Err(ContractError)` if validation failed or a collaborator failed; the
///   ledger is unchanged
pub fn apply_invocation<S, E>(
    ledger: &mut S,
    sink: &mut E,
    ctx: &TxContext,
    invocation: &Invocation,
) -> ContractResult<Response>
where
    S: LedgerStore,
    E: EventSink,
{
    let contract = invocation.contract();
    let function = invocation.function_name();

    let mut overlay = TxOverlay::new(ledger);
    let mut events = Vec::new();

    let response = match dispatch(&mut overlay, ctx, &mut events, invocation) {
        Ok(response) => response,
        Err(e) => {
            // Overlay dropped: nothing reaches the ledger
            warn!(%contract, function, caller = %ctx.caller, kind = %e.kind(), error = %e, "transaction rejected");
            return Err(e);
        }
    };

    if invocation.is_query() {
        // Queries answer from the overlay and never write.
        debug_assert!(!overlay.is_dirty());
        debug!(%contract, function, "query answered");
        return Ok(response);
    }

    if let Err(e) = publish(sink, events) {
        warn!(%contract, function, caller = %ctx.caller, error = %e, "transaction rejected");
        return Err(e);
    }

    let read_keys = overlay.read_set().count();
    let keys: Vec<&str> = overlay.write_set().collect();
    trace!(%contract, function, ?keys, "committing");
    let written = overlay.commit()?;
    debug!(%contract, function, read_keys, written, "transaction committed");
    Ok(response)
}

/// Decode raw arguments and execute the resulting invocation.
///
/// Decode failures are reported as `MalformedArguments` before any state
/// is read.
pub fn apply_raw<S, E>(
    ledger: &mut S,
    sink: &mut E,
    ctx: &TxContext,
    contract: &str,
    function: &str,
    args: &[String],
) -> ContractResult<Response>
where
    S: LedgerStore,
    E: EventSink,
{
    let invocation = Invocation::decode(contract, function, args).map_err(|e| {
        warn!(contract, function, error = %e, "malformed invocation");
        e
    })?;
    apply_invocation(ledger, sink, ctx, &invocation)
}

/// Execute a submitted transaction envelope.
pub fn apply_envelope<S, E>(
    ledger: &mut S,
    sink: &mut E,
    envelope: &TxEnvelope,
    params: ContractParams,
) -> ContractResult<Response>
where
    S: LedgerStore,
    E: EventSink,
{
    let ctx = TxContext::from_envelope(envelope, params)?;
    apply_invocation(ledger, sink, &ctx, &envelope.invocation)
}

/// Publish buffered events in order, stopping at the first failure.
fn publish<E: EventSink>(sink: &mut E, events: Vec<Event>) -> ContractResult<()> {
    for event in events {
        let topic = event.topic.clone();
        sink.emit(event).map_err(|e| {
            warn!(%topic, error = %e, "notification not delivered");
            e
        })?;
    }
    Ok(())
}

fn dispatch<S: LedgerStore>(
    ledger: &mut S,
    ctx: &TxContext,
    events: &mut Vec<Event>,
    invocation: &Invocation,
) -> ContractResult<Response> {
    let response = match invocation {
        Invocation::Auction(call) => match call {
            AuctionCall::InitLedger { duration_seconds } => {
                Response::Id(execute_init_auction(ledger, ctx, *duration_seconds)?)
            }
            AuctionCall::SubmitBid { auction_id, bid } => {
                execute_submit_bid(ledger, ctx, auction_id, *bid)?;
                Response::Unit
            }
            AuctionCall::CloseBid { auction_id } => {
                Response::Auction(execute_close_bid(ledger, ctx, auction_id)?)
            }
            AuctionCall::GetAuction { auction_id } => {
                Response::Auction(execute_get_auction(ledger, auction_id)?)
            }
        },

        Invocation::Game(call) => match call {
            GameCall::CreateGame => Response::Id(execute_create_game(ledger, ctx)?),
            GameCall::JoinGame { game_id } => {
                execute_join_game(ledger, ctx, game_id)?;
                Response::Unit
            }
            GameCall::MakeChoice {
                game_id,
                choice,
                commitment,
            } => {
                execute_make_choice(ledger, ctx, game_id, *choice, commitment)?;
                Response::Unit
            }
            GameCall::RevealChoice {
                game_id,
                choice,
                nonce,
            } => {
                execute_reveal_choice(ledger, ctx, game_id, *choice, nonce)?;
                Response::Unit
            }
            GameCall::DetermineWinner { game_id } => {
                Response::Outcome(execute_determine_winner(ledger, game_id)?)
            }
            GameCall::ResolveGame { game_id } => {
                Response::Outcome(execute_resolve_game(ledger, ctx, game_id)?)
            }
            GameCall::AbandonGame { game_id } => {
                execute_abandon_game(ledger, ctx, game_id)?;
                Response::Unit
            }
            GameCall::GetGame { game_id } => Response::Game(execute_get_game(ledger, game_id)?),
        },

        Invocation::Htla(call) => match call {
            HtlaCall::CreateProposal {
                amount,
                timelock_seconds,
                hash,
                algorithm,
                handler,
            } => Response::Id(execute_create_proposal(
                ledger,
                ctx,
                events,
                *amount,
                *timelock_seconds,
                hash,
                algorithm,
                handler,
            )?),
            HtlaCall::ConfirmProposal {
                proposal_id,
                preimage,
            } => {
                execute_confirm_proposal(ledger, ctx, events, proposal_id, preimage)?;
                Response::Unit
            }
            HtlaCall::InvalidateProposal { proposal_id } => {
                execute_invalidate_proposal(ledger, ctx, events, proposal_id)?;
                Response::Unit
            }
            HtlaCall::GetProposal { proposal_id } => {
                Response::Proposal(execute_get_proposal(ledger, proposal_id)?)
            }
            HtlaCall::GenerateHash { input, algorithm } => {
                Response::Hash(execute_generate_hash(input, algorithm)?)
            }
        },
    };
    Ok(response)
}
