//! Execution context for contract invocations.

use pact_core::crypto::sha256_concat;
use pact_core::{Identity, SerializationError, TxEnvelope};

/// Default number of players a game waits for.
pub const DEFAULT_PLAYERS_PER_GAME: u8 = 2;

/// Smallest game that can produce a winner.
pub const MIN_PLAYERS_PER_GAME: u8 = 2;

/// Default time a game may sit in one phase before it can be abandoned (24 hours in seconds).
pub const DEFAULT_GAME_STALL_WINDOW: u64 = 86_400;

/// Devnet stall window (10 seconds).
pub const DEVNET_GAME_STALL_WINDOW: u64 = 10;

/// Contract-level tunables shared by every replica.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContractParams {
    /// Number of players a new game waits for before play starts.
    pub players_per_game: u8,

    /// Seconds a game may stay in one non-terminal phase before anyone
    /// involved can abandon it. In devnet mode, this is 10 seconds.
    pub game_stall_window: u64,
}

impl ContractParams {
    /// Relaxed parameters for local networks.
    pub fn devnet() -> Self {
        Self {
            players_per_game: DEFAULT_PLAYERS_PER_GAME,
            game_stall_window: DEVNET_GAME_STALL_WINDOW,
        }
    }

    /// Set the player count, raised to [`MIN_PLAYERS_PER_GAME`] if lower.
    pub fn with_players_per_game(mut self, players: u8) -> Self {
        self.players_per_game = players.max(MIN_PLAYERS_PER_GAME);
        self
    }

    /// Set the stall window.
    pub fn with_stall_window(mut self, seconds: u64) -> Self {
        self.game_stall_window = seconds;
        self
    }
}

impl Default for ContractParams {
    fn default() -> Self {
        Self {
            players_per_game: DEFAULT_PLAYERS_PER_GAME,
            game_stall_window: DEFAULT_GAME_STALL_WINDOW,
        }
    }
}

/// Execution context carrying transaction-level information.
///
/// This context is passed to all contract handlers. Every value in it is
/// agreed by all replicas: handlers must use it instead of a local clock,
/// credential store or random source.
#[derive(Clone, Debug)]
pub struct TxContext {
    /// Transaction timestamp (unix seconds).
    pub timestamp: u64,

    /// Authenticated caller.
    pub caller: Identity,

    /// Transaction id.
    pub tx_id: [u8; 32],

    /// Contract parameters.
    pub params: ContractParams,
}

impl TxContext {
    /// Create a new execution context.
    pub fn new(timestamp: u64, caller: Identity, tx_id: [u8; 32]) -> Self {
        Self {
            timestamp,
            caller,
            tx_id,
            params: ContractParams::default(),
        }
    }

    /// Create the context for a submitted envelope.
    pub fn from_envelope(
        envelope: &TxEnvelope,
        params: ContractParams,
    ) -> Result<Self, SerializationError> {
        Ok(Self {
            timestamp: envelope.timestamp,
            caller: envelope.caller.clone(),
            tx_id: envelope.id()?,
            params,
        })
    }

    /// Create an execution context with a specific timestamp and caller.
    ///
    /// The transaction id is derived from the two, so ids stay unique as
    /// long as one caller sends at most one transaction per second.
    pub fn with_timestamp(timestamp: u64, caller: Identity) -> Self {
        let tx_id = sha256_concat(&[caller.as_bytes(), &timestamp.to_le_bytes()]);
        Self::new(timestamp, caller, tx_id)
    }

    /// Create the context of the `sequence`-th transaction in a scripted run.
    ///
    /// The sequence number goes into the transaction id, so one caller may
    /// submit several transactions within the same second.
    pub fn sequenced(timestamp: u64, caller: Identity, sequence: u64) -> Self {
        let tx_id = sha256_concat(&[
            caller.as_bytes(),
            &timestamp.to_le_bytes(),
            &sequence.to_le_bytes(),
        ]);
        Self::new(timestamp, caller, tx_id)
    }

    /// Create a devnet execution context with relaxed parameters.
    pub fn devnet(timestamp: u64, caller: Identity, tx_id: [u8; 32]) -> Self {
        Self {
            timestamp,
            caller,
            tx_id,
            params: ContractParams::devnet(),
        }
    }

    /// Replace the contract parameters.
    pub fn with_params(mut self, params: ContractParams) -> Self {
        self.params = params;
        self
    }

    /// Identifier for a record created by this transaction.
    ///
    /// The first 16 bytes of `SHA-256(domain || tx_id)`, hex-encoded. Every
    /// replica derives the same id; different record types created from one
    /// transaction get different ids.
    pub fn derive_id(&self, domain: &str) -> String {
        let hash = sha256_concat(&[domain.as_bytes(), &self.tx_id]);
        hex::encode(&hash[..16])
    }

    /// Create an execution context for testing with minimal values.
    #[cfg(test)]
    pub fn test_context() -> Self {
        Self {
            timestamp: 1_700_000_000,
            caller: Identity::from_bytes(b"test-caller".to_vec()),
            tx_id: pact_core::crypto::sha256(b"test-tx"),
            params: ContractParams::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pact_core::crypto::sha256;
    use pact_core::{AuctionCall, Invocation};

    #[test]
    fn test_from_envelope() {
        let caller = Identity::from_bytes(b"alice".to_vec());
        let envelope = TxEnvelope::new(
            caller.clone(),
            1_700_000_000,
            Invocation::Auction(AuctionCall::InitLedger {
                duration_seconds: 60,
            }),
        );

        let ctx = TxContext::from_envelope(&envelope, ContractParams::devnet()).unwrap();
        assert_eq!(ctx.timestamp, 1_700_000_000);
        assert_eq!(ctx.caller, caller);
        assert_eq!(ctx.tx_id, envelope.id().unwrap());
        assert_eq!(ctx.params.game_stall_window, DEVNET_GAME_STALL_WINDOW);
    }

    #[test]
    fn test_derive_id() {
        let ctx = TxContext::test_context();
        let id = ctx.derive_id("htla");

        assert_eq!(id.len(), 32);
        assert_eq!(id, ctx.derive_id("htla"));
        assert_ne!(id, ctx.derive_id("rps"));

        let other = TxContext::new(ctx.timestamp, ctx.caller.clone(), sha256(b"other-tx"));
        assert_ne!(id, other.derive_id("htla"));
    }

    #[test]
    fn test_players_per_game_floor() {
        let params = ContractParams::default().with_players_per_game(1);
        assert_eq!(params.players_per_game, MIN_PLAYERS_PER_GAME);

        let params = ContractParams::default().with_players_per_game(4);
        assert_eq!(params.players_per_game, 4);
    }

    #[test]
    fn test_with_timestamp_ids_differ() {
        let alice = Identity::from_bytes(b"alice".to_vec());
        let a = TxContext::with_timestamp(100, alice.clone());
        let b = TxContext::with_timestamp(101, alice);
        assert_ne!(a.tx_id, b.tx_id);
        assert_eq!(a.params, ContractParams::default());
    }

    #[test]
    fn test_sequenced_same_second() {
        let seller = Identity::from_bytes(b"seller".to_vec());
        let first = TxContext::sequenced(1000, seller.clone(), 1);
        let second = TxContext::sequenced(1000, seller, 2);
        assert_ne!(first.tx_id, second.tx_id);
        assert_ne!(first.derive_id("auction"), second.derive_id("auction"));
    }
}
