//! Caller identities.
//!
//! The ledger platform authenticates every transaction and hands the contract
//! an opaque credential for the caller. Contracts only ever compare identities
//! for equality or use them as keys; they never derive one from data they
//! control.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// A caller's identity as a canonical byte string.
///
/// Two identities are equal exactly when their canonical bytes are equal, so
/// the same credential presented in different transactions compares equal.
/// Serialized as lower-case hex.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Identity(Vec<u8>);

impl Identity {
    /// Wrap the canonical bytes of a credential.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Parse an identity from its hex form.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        hex::decode(s).map(Self)
    }

    /// Canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Full lower-case hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self)
    }
}

impl fmt::Display for Identity {
    /// Short form: the first 8 bytes in hex.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = &self.0[..self.0.len().min(8)];
        write!(f, "{}", hex::encode(prefix))?;
        if self.0.len() > 8 {
            write!(f, "..")?;
        }
        Ok(())
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Identity::from_hex(&s).map_err(de::Error::custom)
    }
}
