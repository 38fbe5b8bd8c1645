//! Commit-reveal game handlers.
//!
//! Handles game creation, JoinGame, MakeChoice, RevealChoice,
//! DetermineWinner, ResolveGame, AbandonGame and GetGame.

use pact_core::crypto::{choice_preimage, validate_digest, verify_commitment};
use pact_core::{GameOutcome, GamePhase, GameRecord, HashAlgorithm, Move, PlayerMove, PlayerSlot};
use tracing::{debug, info};

use crate::error::{ContractError, ContractResult};
use crate::keys::RecordKey;
use crate::ledger::{load_record, record_exists, save_record, LedgerStore};

use super::context::TxContext;

/// Domain tag for game ids.
const GAME_DOMAIN: &str = "rps";

fn load_game<S: LedgerStore>(ledger: &mut S, game_id: &str) -> ContractResult<GameRecord> {
    load_record(ledger, &RecordKey::Game(game_id.to_string()))?
        .ok_or_else(|| ContractError::GameNotFound(game_id.to_string()))
}

fn save_game<S: LedgerStore>(ledger: &mut S, game: &GameRecord) -> ContractResult<()> {
    save_record(ledger, &RecordKey::Game(game.game_id.clone()), game)
}

fn require_phase(game: &GameRecord, phase: GamePhase, operation: &'static str) -> ContractResult<()> {
    if game.phase != phase {
        return Err(ContractError::WrongPhase {
            game_id: game.game_id.clone(),
            operation,
            phase: game.phase,
        });
    }
    Ok(())
}

fn parse_move(choice: i64) -> ContractResult<Move> {
    Move::from_value(choice).ok_or(ContractError::InvalidChoice(choice))
}

/// Execute a game InitLedger (CreateGame).
///
/// The new game waits for `ctx.params.players_per_game` players.
pub fn execute_create_game<S: LedgerStore>(ledger: &mut S, ctx: &TxContext) -> ContractResult<String> {
    let game_id = ctx.derive_id(GAME_DOMAIN);
    let key = RecordKey::Game(game_id.clone());
    if record_exists(ledger, &key)? {
        return Err(ContractError::RecordAlreadyExists(key.to_key()));
    }

    let game = GameRecord::new(
        game_id.clone(),
        ctx.caller.clone(),
        ctx.params.players_per_game,
        ctx.timestamp,
    );
    save_game(ledger, &game)?;

    info!(game = %game_id, creator = %ctx.caller, players = game.required_players, "game created");
    Ok(game_id)
}

/// Execute a JoinGame.
///
/// # Validation
/// - Game must exist and be `Open`
/// - Caller must not already be registered
///
/// Moves the game to `ChoosePlay` once it is full.
pub fn execute_join_game<S: LedgerStore>(
    ledger: &mut S,
    ctx: &TxContext,
    game_id: &str,
) -> ContractResult<()> {
    let mut game = load_game(ledger, game_id)?;

    if game.phase != GamePhase::Open {
        return Err(ContractError::GameAlreadyStarted(game_id.to_string()));
    }
    if game.is_player(&ctx.caller) {
        return Err(ContractError::AlreadyJoined {
            game_id: game_id.to_string(),
            player: ctx.caller.clone(),
        });
    }

    game.players.push(PlayerSlot {
        player: ctx.caller.clone(),
        play: PlayerMove::Unset,
    });
    debug!(game = %game_id, player = %ctx.caller, joined = game.players.len(), "player joined");

    if game.is_full() && game.advance(GamePhase::ChoosePlay, ctx.timestamp) {
        info!(game = %game_id, "game full, choose phase started");
    }

    save_game(ledger, &game)
}

/// Execute a MakeChoice.
///
/// # Validation
/// - Game must be in `ChoosePlay`
/// - Caller must be registered
/// - `choice` in 0..=2 (checked, then discarded)
/// - `commitment` is a SHA-256 hex digest
///
/// A player may replace their commitment until the phase ends. Moves the
/// game to `RevealPlay` once every player has committed.
pub fn execute_make_choice<S: LedgerStore>(
    ledger: &mut S,
    ctx: &TxContext,
    game_id: &str,
    choice: i64,
    commitment: &str,
) -> ContractResult<()> {
    let mut game = load_game(ledger, game_id)?;
    require_phase(&game, GamePhase::ChoosePlay, "MakeChoice")?;

    let slot = game
        .slot_mut(&ctx.caller)
        .ok_or_else(|| ContractError::NotAPlayer {
            game_id: game_id.to_string(),
            caller: ctx.caller.clone(),
        })?;

    parse_move(choice)?;
    let commitment = validate_digest(commitment, HashAlgorithm::Sha256)?;
    slot.play = PlayerMove::Committed(commitment);
    debug!(game = %game_id, player = %ctx.caller, "commitment stored");

    if game.all_committed() && game.advance(GamePhase::RevealPlay, ctx.timestamp) {
        info!(game = %game_id, "all players committed, reveal phase started");
    }

    save_game(ledger, &game)
}

/// Execute a RevealChoice.
///
/// # Validation
/// - Game must be in `RevealPlay`
/// - Caller must be registered and not yet revealed
/// - `choice` in 0..=2
/// - `SHA-256(choice || nonce)` equals the stored commitment
///
/// Moves the game to `GameOver` once every player has revealed.
pub fn execute_reveal_choice<S: LedgerStore>(
    ledger: &mut S,
    ctx: &TxContext,
    game_id: &str,
    choice: i64,
    nonce: &str,
) -> ContractResult<()> {
    let mut game = load_game(ledger, game_id)?;
    require_phase(&game, GamePhase::RevealPlay, "RevealChoice")?;

    let slot = game
        .slot_mut(&ctx.caller)
        .ok_or_else(|| ContractError::NotAPlayer {
            game_id: game_id.to_string(),
            caller: ctx.caller.clone(),
        })?;

    let revealed = parse_move(choice)?;
    let opened = match &slot.play {
        PlayerMove::Revealed(_) => {
            return Err(ContractError::AlreadyRevealed {
                game_id: game_id.to_string(),
                caller: ctx.caller.clone(),
            });
        }
        PlayerMove::Committed(hash) => verify_commitment(
            &choice_preimage(revealed.as_u8(), nonce),
            hash,
            HashAlgorithm::Sha256,
        ),
        PlayerMove::Unset => false,
    };
    if !opened {
        return Err(ContractError::CommitmentMismatch {
            game_id: game_id.to_string(),
            caller: ctx.caller.clone(),
        });
    }

    slot.play = PlayerMove::Revealed(revealed);
    debug!(game = %game_id, player = %ctx.caller, choice = %revealed, "move revealed");

    if game.all_revealed() && game.advance(GamePhase::GameOver, ctx.timestamp) {
        info!(game = %game_id, "all moves revealed, game over");
    }

    save_game(ledger, &game)
}

fn outcome_of(game: &GameRecord) -> ContractResult<GameOutcome> {
    require_phase(game, GamePhase::GameOver, "DetermineWinner")?;
    if let Some(outcome) = &game.outcome {
        return Ok(outcome.clone());
    }
    game.compute_outcome()
        .ok_or_else(|| ContractError::CorruptRecord {
            key: RecordKey::Game(game.game_id.clone()).to_key(),
            reason: "game over with unrevealed moves".to_string(),
        })
}

/// Execute a DetermineWinner query.
///
/// Valid only in `GameOver`. Never writes.
pub fn execute_determine_winner<S: LedgerStore>(
    ledger: &mut S,
    game_id: &str,
) -> ContractResult<GameOutcome> {
    let game = load_game(ledger, game_id)?;
    outcome_of(&game)
}

/// Execute a ResolveGame.
///
/// Records the outcome of a `GameOver` game. The outcome is written once;
/// resolving again fails with `GameAlreadyResolved`.
pub fn execute_resolve_game<S: LedgerStore>(
    ledger: &mut S,
    ctx: &TxContext,
    game_id: &str,
) -> ContractResult<GameOutcome> {
    let mut game = load_game(ledger, game_id)?;
    require_phase(&game, GamePhase::GameOver, "ResolveGame")?;
    if game.outcome.is_some() {
        return Err(ContractError::GameAlreadyResolved(game_id.to_string()));
    }

    let outcome = outcome_of(&game)?;
    game.outcome = Some(outcome.clone());
    game.resolved_at = Some(ctx.timestamp);
    save_game(ledger, &game)?;

    match outcome.winner() {
        Some(winner) => info!(game = %game_id, resolver = %ctx.caller, winner = %winner, "game resolved"),
        None => info!(game = %game_id, resolver = %ctx.caller, "game resolved without a winner"),
    }
    Ok(outcome)
}

/// Execute an AbandonGame.
///
/// # Validation
/// - Game must not be terminal
/// - Caller must be a player or the creator
/// - `now >= phase_started_at + game_stall_window`
pub fn execute_abandon_game<S: LedgerStore>(
    ledger: &mut S,
    ctx: &TxContext,
    game_id: &str,
) -> ContractResult<()> {
    let mut game = load_game(ledger, game_id)?;

    if game.phase.is_terminal() {
        return Err(ContractError::WrongPhase {
            game_id: game_id.to_string(),
            operation: "AbandonGame",
            phase: game.phase,
        });
    }
    if game.creator != ctx.caller && !game.is_player(&ctx.caller) {
        return Err(ContractError::NotAPlayer {
            game_id: game_id.to_string(),
            caller: ctx.caller.clone(),
        });
    }

    let stalled_at = game.stalled_at(ctx.params.game_stall_window);
    if ctx.timestamp < stalled_at {
        return Err(ContractError::GameNotStalled {
            game_id: game_id.to_string(),
            stalled_at,
            now: ctx.timestamp,
        });
    }

    let phase = game.phase;
    game.advance(GamePhase::Abandoned, ctx.timestamp);
    save_game(ledger, &game)?;

    info!(game = %game_id, by = %ctx.caller, ?phase, "game abandoned");
    Ok(())
}

/// Read a game.
pub fn execute_get_game<S: LedgerStore>(ledger: &mut S, game_id: &str) -> ContractResult<GameRecord> {
    load_game(ledger, game_id)
}
