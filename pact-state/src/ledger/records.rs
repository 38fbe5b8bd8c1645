//! Typed record access.
//!
//! Records are stored as field-named JSON. A stored value that does not
//! decode into its record type is reported as corrupt, never as missing.

use pact_core::serialization::{decode_record, encode_record};
use serde::{de::DeserializeOwned, Serialize};

use super::store::LedgerStore;
use crate::error::{ContractError, ContractResult};
use crate::keys::RecordKey;

/// Load and decode the record at `key`.
pub(crate) fn load_record<T, S>(store: &mut S, key: &RecordKey) -> ContractResult<Option<T>>
where
    T: DeserializeOwned,
    S: LedgerStore,
{
    let key = key.to_key();
    match store.get(&key)? {
        Some(bytes) => decode_record(&bytes)
            .map(Some)
            .map_err(|e| ContractError::CorruptRecord {
                key,
                reason: e.to_string(),
            }),
        None => Ok(None),
    }
}

/// Encode and store `record` at `key`.
pub(crate) fn save_record<T, S>(store: &mut S, key: &RecordKey, record: &T) -> ContractResult<()>
where
    T: Serialize,
    S: LedgerStore,
{
    let bytes = encode_record(record)?;
    store.put(&key.to_key(), bytes)?;
    Ok(())
}

/// Check whether a record exists at `key`.
pub(crate) fn record_exists<S: LedgerStore>(store: &mut S, key: &RecordKey) -> ContractResult<bool> {
    Ok(store.exists(&key.to_key())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MemoryLedger;
    use pact_core::{AuctionRecord, Identity};

    #[test]
    fn test_save_then_load() {
        let mut ledger = MemoryLedger::new();
        let key = RecordKey::Auction("a1".into());
        let seller = Identity::from_bytes(b"seller".to_vec());
        let record = AuctionRecord::open("a1".into(), seller, 100, 160);

        save_record(&mut ledger, &key, &record).unwrap();
        let loaded: Option<AuctionRecord> = load_record(&mut ledger, &key).unwrap();
        assert_eq!(loaded, Some(record));
        assert!(record_exists(&mut ledger, &key).unwrap());
    }

    #[test]
    fn test_missing_record() {
        let mut ledger = MemoryLedger::new();
        let loaded: Option<AuctionRecord> =
            load_record(&mut ledger, &RecordKey::Auction("none".into())).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_corrupt_record() {
        let mut ledger = MemoryLedger::new();
        ledger.put("auction:bad", b"{\"deadline\":".to_vec()).unwrap();

        let err = load_record::<AuctionRecord, _>(&mut ledger, &RecordKey::Auction("bad".into()))
            .unwrap_err();
        assert!(matches!(err, ContractError::CorruptRecord { ref key, .. } if key == "auction:bad"));
    }
}
