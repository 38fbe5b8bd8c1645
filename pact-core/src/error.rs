//! Failures raised while hashing, encoding or decoding contract inputs.

use std::fmt;

/// Any failure surfaced by `pact-core`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CoreError {
    /// Hash algorithm tag is not one of SHA256, SHA384 or SHA512.
    UnsupportedAlgorithm(String),
    /// A claimed digest is not hex of the algorithm's output length.
    InvalidDigest {
        /// Algorithm the digest was checked against.
        algorithm: String,
        /// What was wrong with it.
        reason: String,
    },
    /// Canonical encoding or decoding failed.
    Serialization(SerializationError),
    /// Transaction arguments could not be decoded.
    Decode(DecodeError),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::UnsupportedAlgorithm(name) => {
                write!(
                    f,
                    "unsupported hash algorithm {:?}: only SHA256, SHA384, SHA512 are supported",
                    name
                )
            }
            CoreError::InvalidDigest { algorithm, reason } => {
                write!(f, "invalid {} digest: {}", algorithm, reason)
            }
            CoreError::Serialization(e) => write!(f, "serialization error: {}", e),
            CoreError::Decode(e) => write!(f, "malformed arguments: {}", e),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<SerializationError> for CoreError {
    fn from(e: SerializationError) -> Self {
        CoreError::Serialization(e)
    }
}

impl From<DecodeError> for CoreError {
    fn from(e: DecodeError) -> Self {
        CoreError::Decode(e)
    }
}

/// Bincode failures, carried as text so the error stays `Clone + Eq`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SerializationError {
    /// A value could not be encoded.
    EncodeFailed(String),
    /// Bytes were not a valid encoding.
    DecodeFailed(String),
}

impl fmt::Display for SerializationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializationError::EncodeFailed(msg) => write!(f, "encode failed: {}", msg),
            SerializationError::DecodeFailed(msg) => write!(f, "decode failed: {}", msg),
        }
    }
}

impl std::error::Error for SerializationError {}

/// Failure to turn raw transaction arguments into an [`Invocation`](crate::Invocation).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// No function with this name exists on the contract.
    UnknownFunction {
        /// Contract the call was addressed to.
        contract: String,
        /// Function name as received.
        function: String,
    },
    /// Wrong number of arguments.
    WrongArity {
        /// Function being decoded.
        function: &'static str,
        /// Number of arguments the function takes.
        expected: usize,
        /// Number of arguments received.
        actual: usize,
    },
    /// An argument could not be parsed.
    InvalidArgument {
        /// Function being decoded.
        function: &'static str,
        /// Zero-based argument position.
        index: usize,
        /// Parser message.
        reason: String,
    },
    /// Contract name is not one of `auction`, `rps`, `htla`.
    UnknownContract(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::UnknownFunction { contract, function } => {
                write!(f, "contract {} has no function {:?}", contract, function)
            }
            DecodeError::WrongArity {
                function,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "{} expects {} argument(s), got {}",
                    function, expected, actual
                )
            }
            DecodeError::InvalidArgument {
                function,
                index,
                reason,
            } => {
                write!(f, "{} argument {}: {}", function, index, reason)
            }
            DecodeError::UnknownContract(name) => write!(f, "unknown contract {:?}", name),
        }
    }
}

impl std::error::Error for DecodeError {}
