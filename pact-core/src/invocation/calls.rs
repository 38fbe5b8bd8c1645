//! Typed contract calls and their decoding from raw transaction arguments.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// The contract an invocation is addressed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractKind {
    /// Sealed single-round auction.
    Auction,
    /// Commit-reveal rock-paper-scissors.
    Game,
    /// Hashed time-locked agreements.
    Htla,
}

impl ContractKind {
    /// Canonical contract name.
    pub const fn as_str(self) -> &'static str {
        match self {
            ContractKind::Auction => "auction",
            ContractKind::Game => "rps",
            ContractKind::Htla => "htla",
        }
    }
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractKind {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auction" => Ok(ContractKind::Auction),
            "rps" | "game" => Ok(ContractKind::Game),
            "htla" => Ok(ContractKind::Htla),
            _ => Err(DecodeError::UnknownContract(s.to_string())),
        }
    }
}

/// Auction operations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuctionCall {
    /// Open an auction closing `duration_seconds` after this transaction.
    InitLedger {
        /// Bidding period in seconds (must be > 0).
        duration_seconds: i64,
    },
    /// Place a bid.
    SubmitBid {
        /// Target auction.
        auction_id: String,
        /// Offered amount.
        bid: i64,
    },
    /// Close bidding once the deadline has passed.
    CloseBid {
        /// Target auction.
        auction_id: String,
    },
    /// Read an auction.
    GetAuction {
        /// Target auction.
        auction_id: String,
    },
}

/// Commit-reveal game operations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameCall {
    /// Create a new game in the `Open` phase.
    CreateGame,
    /// Register the caller as a player.
    JoinGame {
        /// Target game.
        game_id: String,
    },
    /// Submit a commitment to a move.
    MakeChoice {
        /// Target game.
        game_id: String,
        /// Declared move, range-checked only.
        choice: i64,
        /// Hex SHA-256 of `choice ++ nonce`.
        commitment: String,
    },
    /// Open a previously submitted commitment.
    RevealChoice {
        /// Target game.
        game_id: String,
        /// The committed move.
        choice: i64,
        /// The nonce used in the commitment.
        nonce: String,
    },
    /// Compute the outcome of a finished game without writing.
    DetermineWinner {
        /// Target game.
        game_id: String,
    },
    /// Record the outcome of a finished game.
    ResolveGame {
        /// Target game.
        game_id: String,
    },
    /// Close a stalled game.
    AbandonGame {
        /// Target game.
        game_id: String,
    },
    /// Read a game.
    GetGame {
        /// Target game.
        game_id: String,
    },
}

/// HTLA operations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HtlaCall {
    /// Lock `amount` behind `hash` until `timelock_seconds` from now.
    CreateProposal {
        /// Locked amount (must be > 0).
        amount: i64,
        /// Seconds until the timelock (must be > 0).
        timelock_seconds: i64,
        /// Hex digest of the secret preimage.
        hash: String,
        /// Algorithm tag, validated by the contract.
        algorithm: String,
        /// Notification topic prefix for the creator's handler.
        handler: String,
    },
    /// Confirm a pending proposal by revealing the preimage.
    ConfirmProposal {
        /// Target proposal.
        proposal_id: String,
        /// Secret whose digest matches the proposal hash.
        preimage: String,
    },
    /// Expire a pending proposal after its timelock.
    InvalidateProposal {
        /// Target proposal.
        proposal_id: String,
    },
    /// Read a proposal.
    GetProposal {
        /// Target proposal.
        proposal_id: String,
    },
    /// Hash `input` under `algorithm`.
    GenerateHash {
        /// Data to hash.
        input: String,
        /// Algorithm tag.
        algorithm: String,
    },
}

/// A decoded contract invocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Invocation {
    /// Auction contract call.
    Auction(AuctionCall),
    /// Game contract call.
    Game(GameCall),
    /// HTLA contract call.
    Htla(HtlaCall),
}

impl Invocation {
    /// Decode an invocation from a contract name, a function name and raw
    /// string arguments. Function names match case-insensitively.
    pub fn decode(contract: &str, function: &str, args: &[String]) -> Result<Self, DecodeError> {
        match contract.parse::<ContractKind>()? {
            ContractKind::Auction => decode_auction(function, args).map(Invocation::Auction),
            ContractKind::Game => decode_game(function, args).map(Invocation::Game),
            ContractKind::Htla => decode_htla(function, args).map(Invocation::Htla),
        }
    }

    /// Contract this invocation is addressed to.
    pub fn contract(&self) -> ContractKind {
        match self {
            Invocation::Auction(_) => ContractKind::Auction,
            Invocation::Game(_) => ContractKind::Game,
            Invocation::Htla(_) => ContractKind::Htla,
        }
    }

    /// Canonical function name.
    pub fn function_name(&self) -> &'static str {
        match self {
            Invocation::Auction(call) => match call {
                AuctionCall::InitLedger { .. } => "InitLedger",
                AuctionCall::SubmitBid { .. } => "SubmitBid",
                AuctionCall::CloseBid { .. } => "CloseBid",
                AuctionCall::GetAuction { .. } => "GetAuction",
            },
            Invocation::Game(call) => match call {
                GameCall::CreateGame => "InitLedger",
                GameCall::JoinGame { .. } => "JoinGame",
                GameCall::MakeChoice { .. } => "MakeChoice",
                GameCall::RevealChoice { .. } => "RevealChoice",
                GameCall::DetermineWinner { .. } => "DetermineWinner",
                GameCall::ResolveGame { .. } => "ResolveGame",
                GameCall::AbandonGame { .. } => "AbandonGame",
                GameCall::GetGame { .. } => "GetGame",
            },
            Invocation::Htla(call) => match call {
                HtlaCall::CreateProposal { .. } => "CreateProposal",
                HtlaCall::ConfirmProposal { .. } => "ConfirmProposal",
                HtlaCall::InvalidateProposal { .. } => "InvalidateProposal",
                HtlaCall::GetProposal { .. } => "GetProposal",
                HtlaCall::GenerateHash { .. } => "GenerateHash",
            },
        }
    }

    /// Whether this invocation only reads ledger state.
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            Invocation::Auction(AuctionCall::GetAuction { .. })
                | Invocation::Auction(AuctionCall::CloseBid { .. })
                | Invocation::Game(GameCall::DetermineWinner { .. })
                | Invocation::Game(GameCall::GetGame { .. })
                | Invocation::Htla(HtlaCall::GetProposal { .. })
                | Invocation::Htla(HtlaCall::GenerateHash { .. })
        )
    }

    /// Encode back into raw string arguments, the inverse of [`decode`](Self::decode).
    pub fn to_args(&self) -> Vec<String> {
        match self {
            Invocation::Auction(call) => match call {
                AuctionCall::InitLedger { duration_seconds } => vec![duration_seconds.to_string()],
                AuctionCall::SubmitBid { auction_id, bid } => {
                    vec![auction_id.clone(), bid.to_string()]
                }
                AuctionCall::CloseBid { auction_id } | AuctionCall::GetAuction { auction_id } => {
                    vec![auction_id.clone()]
                }
            },
            Invocation::Game(call) => match call {
                GameCall::CreateGame => Vec::new(),
                GameCall::MakeChoice {
                    game_id,
                    choice,
                    commitment,
                } => vec![game_id.clone(), choice.to_string(), commitment.clone()],
                GameCall::RevealChoice {
                    game_id,
                    choice,
                    nonce,
                } => vec![game_id.clone(), choice.to_string(), nonce.clone()],
                GameCall::JoinGame { game_id }
                | GameCall::DetermineWinner { game_id }
                | GameCall::ResolveGame { game_id }
                | GameCall::AbandonGame { game_id }
                | GameCall::GetGame { game_id } => vec![game_id.clone()],
            },
            Invocation::Htla(call) => match call {
                HtlaCall::CreateProposal {
                    amount,
                    timelock_seconds,
                    hash,
                    algorithm,
                    handler,
                } => vec![
                    amount.to_string(),
                    timelock_seconds.to_string(),
                    hash.clone(),
                    algorithm.clone(),
                    handler.clone(),
                ],
                HtlaCall::ConfirmProposal {
                    proposal_id,
                    preimage,
                } => vec![proposal_id.clone(), preimage.clone()],
                HtlaCall::InvalidateProposal { proposal_id }
                | HtlaCall::GetProposal { proposal_id } => vec![proposal_id.clone()],
                HtlaCall::GenerateHash { input, algorithm } => {
                    vec![input.clone(), algorithm.clone()]
                }
            },
        }
    }
}

/// Positional argument reader for one function.
struct Args<'a> {
    function: &'static str,
    args: &'a [String],
}

impl<'a> Args<'a> {
    fn expect(function: &'static str, args: &'a [String], count: usize) -> Result<Self, DecodeError> {
        if args.len() != count {
            return Err(DecodeError::WrongArity {
                function,
                expected: count,
                actual: args.len(),
            });
        }
        Ok(Self { function, args })
    }

    fn string(&self, index: usize) -> String {
        self.args[index].clone()
    }

    fn int(&self, index: usize) -> Result<i64, DecodeError> {
        self.args[index]
            .trim()
            .parse::<i64>()
            .map_err(|e| DecodeError::InvalidArgument {
                function: self.function,
                index,
                reason: format!("{:?} is not an integer: {}", self.args[index], e),
            })
    }
}

fn unknown(contract: ContractKind, function: &str) -> DecodeError {
    DecodeError::UnknownFunction {
        contract: contract.to_string(),
        function: function.to_string(),
    }
}

fn decode_auction(function: &str, args: &[String]) -> Result<AuctionCall, DecodeError> {
    let call = match function.to_ascii_lowercase().as_str() {
        "initledger" => {
            let a = Args::expect("InitLedger", args, 1)?;
            AuctionCall::InitLedger {
                duration_seconds: a.int(0)?,
            }
        }
        "submitbid" => {
            let a = Args::expect("SubmitBid", args, 2)?;
            AuctionCall::SubmitBid {
                auction_id: a.string(0),
                bid: a.int(1)?,
            }
        }
        "closebid" => {
            let a = Args::expect("CloseBid", args, 1)?;
            AuctionCall::CloseBid {
                auction_id: a.string(0),
            }
        }
        "getauction" => {
            let a = Args::expect("GetAuction", args, 1)?;
            AuctionCall::GetAuction {
                auction_id: a.string(0),
            }
        }
        _ => return Err(unknown(ContractKind::Auction, function)),
    };
    Ok(call)
}

fn decode_game(function: &str, args: &[String]) -> Result<GameCall, DecodeError> {
    let game_only = |name: &'static str| -> Result<String, DecodeError> {
        Ok(Args::expect(name, args, 1)?.string(0))
    };

    let call = match function.to_ascii_lowercase().as_str() {
        "initledger" | "creategame" => {
            Args::expect("InitLedger", args, 0)?;
            GameCall::CreateGame
        }
        "joingame" => GameCall::JoinGame {
            game_id: game_only("JoinGame")?,
        },
        "makechoice" => {
            let a = Args::expect("MakeChoice", args, 3)?;
            GameCall::MakeChoice {
                game_id: a.string(0),
                choice: a.int(1)?,
                commitment: a.string(2),
            }
        }
        "revealchoice" => {
            let a = Args::expect("RevealChoice", args, 3)?;
            GameCall::RevealChoice {
                game_id: a.string(0),
                choice: a.int(1)?,
                nonce: a.string(2),
            }
        }
        "determinewinner" => GameCall::DetermineWinner {
            game_id: game_only("DetermineWinner")?,
        },
        "resolvegame" => GameCall::ResolveGame {
            game_id: game_only("ResolveGame")?,
        },
        "abandongame" => GameCall::AbandonGame {
            game_id: game_only("AbandonGame")?,
        },
        "getgame" => GameCall::GetGame {
            game_id: game_only("GetGame")?,
        },
        _ => return Err(unknown(ContractKind::Game, function)),
    };
    Ok(call)
}

fn decode_htla(function: &str, args: &[String]) -> Result<HtlaCall, DecodeError> {
    let call = match function.to_ascii_lowercase().as_str() {
        "createproposal" => {
            let a = Args::expect("CreateProposal", args, 5)?;
            HtlaCall::CreateProposal {
                amount: a.int(0)?,
                timelock_seconds: a.int(1)?,
                hash: a.string(2),
                algorithm: a.string(3),
                handler: a.string(4),
            }
        }
        "confirmproposal" => {
            let a = Args::expect("ConfirmProposal", args, 2)?;
            HtlaCall::ConfirmProposal {
                proposal_id: a.string(0),
                preimage: a.string(1),
            }
        }
        "invalidateproposal" => {
            let a = Args::expect("InvalidateProposal", args, 1)?;
            HtlaCall::InvalidateProposal {
                proposal_id: a.string(0),
            }
        }
        "getproposal" => {
            let a = Args::expect("GetProposal", args, 1)?;
            HtlaCall::GetProposal {
                proposal_id: a.string(0),
            }
        }
        "generatehash" => {
            let a = Args::expect("GenerateHash", args, 2)?;
            HtlaCall::GenerateHash {
                input: a.string(0),
                algorithm: a.string(1),
            }
        }
        _ => return Err(unknown(ContractKind::Htla, function)),
    };
    Ok(call)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_decode_auction() {
        let inv = Invocation::decode("auction", "InitLedger", &args(&["20"])).unwrap();
        assert_eq!(
            inv,
            Invocation::Auction(AuctionCall::InitLedger {
                duration_seconds: 20
            })
        );

        let inv = Invocation::decode("auction", "submitBid", &args(&["a1", "100"])).unwrap();
        assert_eq!(
            inv,
            Invocation::Auction(AuctionCall::SubmitBid {
                auction_id: "a1".into(),
                bid: 100
            })
        );
    }

    #[test]
    fn test_negative_integers_decode() {
        // Range checks belong to the contract, not the decoder
        let inv = Invocation::decode("auction", "InitLedger", &args(&["-5"])).unwrap();
        assert_eq!(
            inv,
            Invocation::Auction(AuctionCall::InitLedger {
                duration_seconds: -5
            })
        );
    }

    #[test]
    fn test_decode_game_aliases() {
        let a = Invocation::decode("rps", "InitLedger", &[]).unwrap();
        let b = Invocation::decode("game", "CreateGame", &[]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.function_name(), "InitLedger");
    }

    #[test]
    fn test_decode_htla_create() {
        let inv = Invocation::decode(
            "htla",
            "CreateProposal",
            &args(&["10", "60", "7E95", "SHA256", "relay"]),
        )
        .unwrap();
        assert_eq!(inv.contract(), ContractKind::Htla);
        assert!(!inv.is_query());
        assert_eq!(inv.to_args(), args(&["10", "60", "7E95", "SHA256", "relay"]));
    }

    #[test]
    fn test_wrong_arity() {
        let err = Invocation::decode("htla", "ConfirmProposal", &args(&["p1"])).unwrap_err();
        assert_eq!(
            err,
            DecodeError::WrongArity {
                function: "ConfirmProposal",
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_non_integer_argument() {
        let err = Invocation::decode("auction", "SubmitBid", &args(&["a1", "lots"])).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::InvalidArgument {
                function: "SubmitBid",
                index: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_names() {
        assert!(matches!(
            Invocation::decode("htla", "Transfer", &[]),
            Err(DecodeError::UnknownFunction { .. })
        ));
        assert!(matches!(
            Invocation::decode("claims", "SetClaim", &[]),
            Err(DecodeError::UnknownContract(_))
        ));
    }

    #[test]
    fn test_query_classification() {
        let query = Invocation::Game(GameCall::DetermineWinner {
            game_id: "g".into(),
        });
        let transition = Invocation::Game(GameCall::ResolveGame {
            game_id: "g".into(),
        });
        assert!(query.is_query());
        assert!(!transition.is_query());
    }

    #[test]
    fn test_to_args_inverts_decode() {
        let original = Invocation::Game(GameCall::RevealChoice {
            game_id: "g1".into(),
            choice: 2,
            nonce: "John".into(),
        });
        let decoded = Invocation::decode(
            original.contract().as_str(),
            original.function_name(),
            &original.to_args(),
        )
        .unwrap();
        assert_eq!(decoded, original);
    }
}
