//! Error types for contract execution.

use std::fmt;

use pact_core::{CoreError, DecodeError, GamePhase, Identity, ProposalStatus, SerializationError};
use thiserror::Error;

use crate::events::NotifyError;

/// Result type for contract operations.
pub type ContractResult<T> = Result<T, ContractError>;

/// Broad category of a [`ContractError`].
///
/// Callers use this to tell "never existed" apart from "exists but not now",
/// and business rejections apart from failures of the surrounding platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A business rule rejected the call.
    Validation,
    /// The addressed record does not exist.
    NotFound,
    /// An input names something the contracts do not support.
    UnsupportedInput,
    /// Transaction arguments could not be decoded.
    MalformedArguments,
    /// The ledger store or notification channel failed, or stored data is unreadable.
    Infrastructure,
}

impl ErrorKind {
    /// Stable name, as used in scenario expectations.
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::UnsupportedInput => "unsupported_input",
            ErrorKind::MalformedArguments => "malformed_arguments",
            ErrorKind::Infrastructure => "infrastructure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures of the ledger state store.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not serve the request.
    #[error("ledger store unavailable: {0}")]
    Unavailable(String),

    /// Key rejected by the store.
    #[error("invalid key: {0:?}")]
    InvalidKey(String),
}

/// All rejections and failures of a contract invocation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ContractError {
    // === Auction ===
    /// Auction not found.
    #[error("auction not found: {0}")]
    AuctionNotFound(String),

    /// Duration or timelock must be positive.
    #[error("duration must be positive, got {0}")]
    InvalidDuration(i64),

    /// Bid arrived after the deadline.
    #[error("auction {auction_id} closed at {deadline}, transaction time {now}")]
    AuctionExpired {
        auction_id: String,
        deadline: u64,
        now: u64,
    },

    /// Bid does not exceed the current highest bid.
    #[error("bid {bid} does not exceed highest bid {highest}")]
    BidTooLow { bid: i64, highest: u64 },

    /// Close attempted before the deadline.
    #[error("auction {auction_id} open until {deadline}, transaction time {now}")]
    AuctionStillOpen {
        auction_id: String,
        deadline: u64,
        now: u64,
    },

    // === Game ===
    /// Game not found.
    #[error("game not found: {0}")]
    GameNotFound(String),

    /// Join attempted after the game left `Open`.
    #[error("game {0} has already started")]
    GameAlreadyStarted(String),

    /// Caller is already registered in the game.
    #[error("{player} already joined game {game_id}")]
    AlreadyJoined { game_id: String, player: Identity },

    /// Caller is not registered in the game.
    #[error("{caller} is not a player in game {game_id}")]
    NotAPlayer { game_id: String, caller: Identity },

    /// Operation not accepted in the game's current phase.
    #[error("{operation} not allowed in game {game_id} during {phase:?}")]
    WrongPhase {
        game_id: String,
        operation: &'static str,
        phase: GamePhase,
    },

    /// Move value outside 0..=2.
    #[error("choice {0} is not a move (expected 0, 1 or 2)")]
    InvalidChoice(i64),

    /// Revealed move and nonce do not open the stored commitment.
    #[error("reveal does not match the commitment of {caller} in game {game_id}")]
    CommitmentMismatch { game_id: String, caller: Identity },

    /// Caller has already revealed.
    #[error("{caller} already revealed in game {game_id}")]
    AlreadyRevealed { game_id: String, caller: Identity },

    /// Outcome already recorded.
    #[error("game {0} is already resolved")]
    GameAlreadyResolved(String),

    /// Abandonment attempted before the stall window elapsed.
    #[error("game {game_id} is not stalled until {stalled_at}, transaction time {now}")]
    GameNotStalled {
        game_id: String,
        stalled_at: u64,
        now: u64,
    },

    // === HTLA ===
    /// Proposal not found.
    #[error("proposal not found: {0}")]
    ProposalNotFound(String),

    /// Amount must be positive.
    #[error("amount must be positive, got {0}")]
    InvalidAmount(i64),

    /// Handler topic must not be empty.
    #[error("proposal handler must not be empty")]
    InvalidHandler,

    /// Proposal is no longer pending.
    #[error("proposal {proposal_id} already resolved as {status:?}")]
    AlreadyResolved {
        proposal_id: String,
        status: ProposalStatus,
    },

    /// Confirmation attempted at or after the timelock.
    #[error("proposal {proposal_id} timelock passed at {timelock}, transaction time {now}")]
    TimelockExpired {
        proposal_id: String,
        timelock: u64,
        now: u64,
    },

    /// Invalidation attempted before the timelock.
    #[error("proposal {proposal_id} locked until {timelock}, transaction time {now}")]
    TimelockNotExpired {
        proposal_id: String,
        timelock: u64,
        now: u64,
    },

    /// Preimage does not hash to the proposal's hash.
    #[error("preimage does not match proposal {0}")]
    PreimageMismatch(String),

    // === Shared ===
    /// Hash algorithm tag not recognised.
    #[error("unsupported hash algorithm {0:?}")]
    UnsupportedAlgorithm(String),

    /// Claimed digest is not hex of the algorithm's length.
    #[error("invalid {algorithm} digest: {reason}")]
    InvalidDigest { algorithm: String, reason: String },

    /// A record with the derived id already exists.
    #[error("record already exists: {0}")]
    RecordAlreadyExists(String),

    /// Arithmetic overflow computing a deadline.
    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    /// Transaction arguments could not be decoded.
    #[error("malformed arguments: {0}")]
    MalformedArguments(#[from] DecodeError),

    /// A stored record does not match its schema.
    #[error("corrupt record at {key}: {reason}")]
    CorruptRecord { key: String, reason: String },

    /// Encoding a record or envelope failed.
    #[error("serialization error: {0}")]
    Serialization(SerializationError),

    /// Ledger store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Notification channel failure.
    #[error(transparent)]
    Notification(#[from] NotifyError),
}

impl ContractError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        use ContractError::*;

        match self {
            AuctionNotFound(_) | GameNotFound(_) | ProposalNotFound(_) => ErrorKind::NotFound,
            UnsupportedAlgorithm(_) => ErrorKind::UnsupportedInput,
            MalformedArguments(_) => ErrorKind::MalformedArguments,
            CorruptRecord { .. } | Serialization(_) | Store(_) | Notification(_) => {
                ErrorKind::Infrastructure
            }
            InvalidDuration(_)
            | AuctionExpired { .. }
            | BidTooLow { .. }
            | AuctionStillOpen { .. }
            | GameAlreadyStarted(_)
            | AlreadyJoined { .. }
            | NotAPlayer { .. }
            | WrongPhase { .. }
            | InvalidChoice(_)
            | CommitmentMismatch { .. }
            | AlreadyRevealed { .. }
            | GameAlreadyResolved(_)
            | GameNotStalled { .. }
            | InvalidAmount(_)
            | InvalidHandler
            | AlreadyResolved { .. }
            | TimelockExpired { .. }
            | TimelockNotExpired { .. }
            | PreimageMismatch(_)
            | InvalidDigest { .. }
            | RecordAlreadyExists(_)
            | ArithmeticOverflow => ErrorKind::Validation,
        }
    }

    /// Variant name, as used in scenario expectations.
    pub fn name(&self) -> &'static str {
        use ContractError::*;

        match self {
            AuctionNotFound(_) => "AuctionNotFound",
            InvalidDuration(_) => "InvalidDuration",
            AuctionExpired { .. } => "AuctionExpired",
            BidTooLow { .. } => "BidTooLow",
            AuctionStillOpen { .. } => "AuctionStillOpen",
            GameNotFound(_) => "GameNotFound",
            GameAlreadyStarted(_) => "GameAlreadyStarted",
            AlreadyJoined { .. } => "AlreadyJoined",
            NotAPlayer { .. } => "NotAPlayer",
            WrongPhase { .. } => "WrongPhase",
            InvalidChoice(_) => "InvalidChoice",
            CommitmentMismatch { .. } => "CommitmentMismatch",
            AlreadyRevealed { .. } => "AlreadyRevealed",
            GameAlreadyResolved(_) => "GameAlreadyResolved",
            GameNotStalled { .. } => "GameNotStalled",
            ProposalNotFound(_) => "ProposalNotFound",
            InvalidAmount(_) => "InvalidAmount",
            InvalidHandler => "InvalidHandler",
            AlreadyResolved { .. } => "AlreadyResolved",
            TimelockExpired { .. } => "TimelockExpired",
            TimelockNotExpired { .. } => "TimelockNotExpired",
            PreimageMismatch(_) => "PreimageMismatch",
            UnsupportedAlgorithm(_) => "UnsupportedAlgorithm",
            InvalidDigest { .. } => "InvalidDigest",
            RecordAlreadyExists(_) => "RecordAlreadyExists",
            ArithmeticOverflow => "ArithmeticOverflow",
            MalformedArguments(_) => "MalformedArguments",
            CorruptRecord { .. } => "CorruptRecord",
            Serialization(_) => "Serialization",
            Store(_) => "Store",
            Notification(_) => "Notification",
        }
    }
}

impl From<CoreError> for ContractError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::UnsupportedAlgorithm(name) => ContractError::UnsupportedAlgorithm(name),
            CoreError::InvalidDigest { algorithm, reason } => {
                ContractError::InvalidDigest { algorithm, reason }
            }
            CoreError::Serialization(e) => ContractError::Serialization(e),
            CoreError::Decode(e) => ContractError::MalformedArguments(e),
        }
    }
}

impl From<SerializationError> for ContractError {
    fn from(e: SerializationError) -> Self {
        ContractError::Serialization(e)
    }
}
