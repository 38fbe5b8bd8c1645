//! Field-named JSON encoding for ledger records.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::SerializationError;

/// Encode a record for storage under its ledger key.
pub fn encode_record<T: Serialize>(record: &T) -> Result<Vec<u8>, SerializationError> {
    serde_json::to_vec(record).map_err(|e| SerializationError::EncodeFailed(e.to_string()))
}

/// Decode a record read from the ledger.
///
/// Fails if the stored bytes do not match the record's schema, including
/// enum tags (phase, status, algorithm) that are not recognized.
pub fn decode_record<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DecodeFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Entry {
        status: String,
        amount: u64,
    }

    #[test]
    fn test_encoding_is_field_named() {
        let bytes = encode_record(&Entry {
            status: "PENDING".into(),
            amount: 10,
        })
        .unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, r#"{"status":"PENDING","amount":10}"#);
    }

    #[test]
    fn test_schema_mismatch_fails() {
        let result: Result<Entry, _> = decode_record(br#"{"status":"PENDING"}"#);
        assert!(matches!(result, Err(SerializationError::DecodeFailed(_))));
    }
}
