//! Commitment verification.
//!
//! A commitment is a hex digest published before the value it hides. Opening
//! it means presenting a preimage whose digest matches. The comparison runs
//! over the whole digest without early exit.

use super::hashing::{digest_hex, HashAlgorithm};
use crate::error::CoreError;

/// Check that `preimage` opens `claimed_hash` under `algorithm`.
///
/// The digest is hex-encoded in lower case and compared case-insensitively
/// against `claimed_hash`. Pure; no side effects.
pub fn verify_commitment(preimage: &[u8], claimed_hash: &str, algorithm: HashAlgorithm) -> bool {
    let computed = digest_hex(algorithm, preimage);
    let claimed = claimed_hash.trim().to_ascii_lowercase();
    constant_time_eq(computed.as_bytes(), claimed.as_bytes())
}

/// Validate that `claimed_hash` has the shape of an `algorithm` digest and
/// return its canonical lower-case form.
///
/// Rejects non-hex input and digests of the wrong length, either of which
/// would make the commitment impossible to open.
pub fn validate_digest(claimed_hash: &str, algorithm: HashAlgorithm) -> Result<String, CoreError> {
    let trimmed = claimed_hash.trim();
    let bytes = hex::decode(trimmed).map_err(|e| CoreError::InvalidDigest {
        algorithm: algorithm.to_string(),
        reason: e.to_string(),
    })?;
    if bytes.len() != algorithm.digest_len() {
        return Err(CoreError::InvalidDigest {
            algorithm: algorithm.to_string(),
            reason: format!(
                "expected {} bytes, got {}",
                algorithm.digest_len(),
                bytes.len()
            ),
        });
    }
    Ok(trimmed.to_ascii_lowercase())
}

/// The preimage of a game commitment: the decimal choice followed by the nonce.
pub fn choice_preimage(choice: u8, nonce: &str) -> Vec<u8> {
    let mut preimage = choice.to_string().into_bytes();
    preimage.extend_from_slice(nonce.as_bytes());
    preimage
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }

    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO_HASH: &str = "7E95E9408BF4179CA21D79BA2361078302273095D399A51D26ABD2E4243EE65F";

    #[test]
    fn test_verify_matches_case_insensitively() {
        assert!(verify_commitment(b"HTLA-SDK-DEMO", DEMO_HASH, HashAlgorithm::Sha256));
        assert!(verify_commitment(
            b"HTLA-SDK-DEMO",
            &DEMO_HASH.to_ascii_lowercase(),
            HashAlgorithm::Sha256
        ));
    }

    #[test]
    fn test_verify_rejects_wrong_preimage_or_algorithm() {
        assert!(!verify_commitment(b"HTLA-SDK-DEMO!", DEMO_HASH, HashAlgorithm::Sha256));
        assert!(!verify_commitment(b"HTLA-SDK-DEMO", DEMO_HASH, HashAlgorithm::Sha512));
        assert!(!verify_commitment(b"HTLA-SDK-DEMO", "", HashAlgorithm::Sha256));
    }

    #[test]
    fn test_choice_preimage_matches_sdk_vectors() {
        assert_eq!(choice_preimage(0, "Jack"), b"0Jack".to_vec());
        assert!(verify_commitment(
            &choice_preimage(0, "Jack"),
            "B23DE3EA7971B4490AB8175B23BC37E016C9B190F1FD7CB84C2D07BA05EB3050",
            HashAlgorithm::Sha256
        ));
        assert!(verify_commitment(
            &choice_preimage(2, "John"),
            "86F05364C02B1F989218954443BAD8FEDEE1C65B30B4E14E0241D14E20C85880",
            HashAlgorithm::Sha256
        ));
    }

    #[test]
    fn test_validate_digest() {
        assert_eq!(
            validate_digest(DEMO_HASH, HashAlgorithm::Sha256).unwrap(),
            DEMO_HASH.to_ascii_lowercase()
        );
        assert!(matches!(
            validate_digest(DEMO_HASH, HashAlgorithm::Sha384),
            Err(CoreError::InvalidDigest { .. })
        ));
        assert!(matches!(
            validate_digest("not-hex", HashAlgorithm::Sha256),
            Err(CoreError::InvalidDigest { .. })
        ));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
    }
}
