//! Pact SDK - caller-side helpers for the pact contracts.
//!
//! The contracts never see a caller's secrets until they are revealed. This
//! crate produces them on the caller's side:
//! - game commitments (`SHA-256(choice || nonce)`) with random nonces
//! - HTLA secrets and their digests
//! - typed [`Invocation`]s for every contract function
//!
//! # Usage
//!
//! ```rust
//! use pact_core::Move;
//! use pact_sdk::SealedChoice;
//!
//! let sealed = SealedChoice::new(Move::Rock);
//! let commit = sealed.make_choice("game-id");
//! // ... later, once every player has committed
//! let reveal = sealed.reveal("game-id");
//! assert_ne!(commit, reveal);
//! ```

#![deny(unsafe_code)]

use pact_core::crypto::{choice_preimage, digest_hex, verify_commitment};
use pact_core::{
    AuctionCall, CoreError, GameCall, HashAlgorithm, HtlaCall, Invocation, Move,
};
use rand::RngCore;

/// SDK error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkError {
    /// Core validation failed.
    Core(CoreError),
    /// Value does not fit the contract's signed integer arguments.
    OutOfRange(u64),
}

impl std::fmt::Display for SdkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SdkError::Core(e) => write!(f, "{}", e),
            SdkError::OutOfRange(v) => write!(f, "value {} exceeds the argument range", v),
        }
    }
}

impl std::error::Error for SdkError {}

impl From<CoreError> for SdkError {
    fn from(e: CoreError) -> Self {
        SdkError::Core(e)
    }
}

fn signed(value: u64) -> Result<i64, SdkError> {
    i64::try_from(value).map_err(|_| SdkError::OutOfRange(value))
}

// ============================================================================
// Game commitments
// ============================================================================

/// Number of random bytes in a generated nonce.
pub const NONCE_LEN: usize = 16;

/// Generate a random hex nonce.
pub fn generate_nonce() -> String {
    let mut bytes = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Commitment to `choice` under `nonce`: lower-case hex `SHA-256(choice || nonce)`.
pub fn choice_commitment(choice: Move, nonce: &str) -> String {
    digest_hex(HashAlgorithm::Sha256, &choice_preimage(choice.as_u8(), nonce))
}

/// A move together with the nonce that hides it.
///
/// Keep it private until the reveal phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SealedChoice {
    /// The hidden move.
    pub choice: Move,
    /// The nonce.
    pub nonce: String,
    /// Commitment submitted with MakeChoice.
    pub commitment: String,
}

impl SealedChoice {
    /// Seal `choice` under a fresh random nonce.
    pub fn new(choice: Move) -> Self {
        Self::with_nonce(choice, generate_nonce())
    }

    /// Seal `choice` under a given nonce.
    pub fn with_nonce(choice: Move, nonce: impl Into<String>) -> Self {
        let nonce = nonce.into();
        let commitment = choice_commitment(choice, &nonce);
        Self {
            choice,
            nonce,
            commitment,
        }
    }

    /// MakeChoice invocation for this seal.
    pub fn make_choice(&self, game_id: &str) -> Invocation {
        Invocation::Game(GameCall::MakeChoice {
            game_id: game_id.to_string(),
            choice: self.choice.as_u8() as i64,
            commitment: self.commitment.clone(),
        })
    }

    /// RevealChoice invocation opening this seal.
    pub fn reveal(&self, game_id: &str) -> Invocation {
        Invocation::Game(GameCall::RevealChoice {
            game_id: game_id.to_string(),
            choice: self.choice.as_u8() as i64,
            nonce: self.nonce.clone(),
        })
    }
}

// ============================================================================
// HTLA secrets
// ============================================================================

/// Hex digest of `secret` under `algorithm`.
pub fn preimage_hash(secret: &str, algorithm: HashAlgorithm) -> String {
    digest_hex(algorithm, secret.as_bytes())
}

/// Secret preimage locking an HTLA proposal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HtlaSecret {
    secret: String,
    algorithm: HashAlgorithm,
}

impl HtlaSecret {
    /// Wrap a known secret.
    pub fn new(secret: impl Into<String>, algorithm: HashAlgorithm) -> Self {
        Self {
            secret: secret.into(),
            algorithm,
        }
    }

    /// Generate a random secret.
    pub fn generate(algorithm: HashAlgorithm) -> Self {
        Self::new(generate_nonce(), algorithm)
    }

    /// The secret itself.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Algorithm the proposal is locked with.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Digest published in the proposal.
    pub fn hash(&self) -> String {
        preimage_hash(&self.secret, self.algorithm)
    }

    /// Check that this secret opens `hash`.
    pub fn opens(&self, hash: &str) -> bool {
        verify_commitment(self.secret.as_bytes(), hash, self.algorithm)
    }

    /// CreateProposal invocation locking `amount` behind this secret.
    pub fn create_proposal(
        &self,
        amount: u64,
        timelock_seconds: u64,
        handler: &str,
    ) -> Result<Invocation, SdkError> {
        Ok(Invocation::Htla(HtlaCall::CreateProposal {
            amount: signed(amount)?,
            timelock_seconds: signed(timelock_seconds)?,
            hash: self.hash(),
            algorithm: self.algorithm.to_string(),
            handler: handler.to_string(),
        }))
    }

    /// ConfirmProposal invocation revealing this secret.
    pub fn confirm(&self, proposal_id: &str) -> Invocation {
        Invocation::Htla(HtlaCall::ConfirmProposal {
            proposal_id: proposal_id.to_string(),
            preimage: self.secret.clone(),
        })
    }
}

// ============================================================================
// Invocation builders
// ============================================================================

/// Auction InitLedger.
pub fn init_auction(duration_seconds: u64) -> Result<Invocation, SdkError> {
    Ok(Invocation::Auction(AuctionCall::InitLedger {
        duration_seconds: signed(duration_seconds)?,
    }))
}

/// Auction SubmitBid.
pub fn submit_bid(auction_id: &str, bid: u64) -> Result<Invocation, SdkError> {
    Ok(Invocation::Auction(AuctionCall::SubmitBid {
        auction_id: auction_id.to_string(),
        bid: signed(bid)?,
    }))
}

/// Auction CloseBid.
pub fn close_bid(auction_id: &str) -> Invocation {
    Invocation::Auction(AuctionCall::CloseBid {
        auction_id: auction_id.to_string(),
    })
}

/// Game InitLedger.
pub fn create_game() -> Invocation {
    Invocation::Game(GameCall::CreateGame)
}

/// Game JoinGame.
pub fn join_game(game_id: &str) -> Invocation {
    Invocation::Game(GameCall::JoinGame {
        game_id: game_id.to_string(),
    })
}

/// Game DetermineWinner.
pub fn determine_winner(game_id: &str) -> Invocation {
    Invocation::Game(GameCall::DetermineWinner {
        game_id: game_id.to_string(),
    })
}

/// Game ResolveGame.
pub fn resolve_game(game_id: &str) -> Invocation {
    Invocation::Game(GameCall::ResolveGame {
        game_id: game_id.to_string(),
    })
}

/// Game AbandonGame.
pub fn abandon_game(game_id: &str) -> Invocation {
    Invocation::Game(GameCall::AbandonGame {
        game_id: game_id.to_string(),
    })
}

/// HTLA InvalidateProposal.
pub fn invalidate_proposal(proposal_id: &str) -> Invocation {
    Invocation::Htla(HtlaCall::InvalidateProposal {
        proposal_id: proposal_id.to_string(),
    })
}

/// HTLA GetProposal.
pub fn get_proposal(proposal_id: &str) -> Invocation {
    Invocation::Htla(HtlaCall::GetProposal {
        proposal_id: proposal_id.to_string(),
    })
}

/// HTLA GenerateHash.
pub fn generate_hash(input: &str, algorithm: HashAlgorithm) -> Invocation {
    Invocation::Htla(HtlaCall::GenerateHash {
        input: input.to_string(),
        algorithm: algorithm.to_string(),
    })
}
