//! In-memory versioned ledger.

use std::collections::BTreeMap;

use super::store::{BatchOp, LedgerStore, WriteBatch};
use crate::error::StoreError;

/// In-memory ledger using a BTreeMap.
///
/// Every key carries a version that increases on each put or delete, the way
/// a replicated ledger versions its state for read-set validation. Keys are
/// kept in sorted order so iteration is deterministic.
#[derive(Clone, Debug, Default)]
pub struct MemoryLedger {
    data: BTreeMap<String, Vec<u8>>,
    versions: BTreeMap<String, u64>,
}

impl MemoryLedger {
    /// Create a new empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of live entries.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Version of `key`: 0 if never written.
    pub fn version(&self, key: &str) -> u64 {
        self.versions.get(key).copied().unwrap_or(0)
    }

    /// Read a value without going through the store interface.
    pub fn peek(&self, key: &str) -> Option<&[u8]> {
        self.data.get(key).map(Vec::as_slice)
    }

    /// Iterate over live entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.data.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    fn check_key(key: &str) -> Result<(), StoreError> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(())
    }

    fn bump(&mut self, key: &str) {
        *self.versions.entry(key.to_string()).or_insert(0) += 1;
    }
}

impl LedgerStore for MemoryLedger {
    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.data.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        Self::check_key(key)?;
        self.data.insert(key.to_string(), value);
        self.bump(key);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        Self::check_key(key)?;
        if self.data.remove(key).is_some() {
            self.bump(key);
        }
        Ok(())
    }

    /// Validates every key before applying anything, so a rejected batch
    /// leaves the ledger untouched.
    fn write_batch(&mut self, batch: WriteBatch) -> Result<(), StoreError> {
        for op in &batch.operations {
            Self::check_key(op.key())?;
        }
        for op in batch.operations {
            match op {
                BatchOp::Put { key, value } => {
                    self.bump(&key);
                    self.data.insert(key, value);
                }
                BatchOp::Delete { key } => {
                    if self.data.remove(&key).is_some() {
                        self.bump(&key);
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut ledger = MemoryLedger::new();
        assert!(ledger.is_empty());

        ledger.put("key1", b"value1".to_vec()).unwrap();
        assert_eq!(ledger.get("key1").unwrap(), Some(b"value1".to_vec()));
        assert!(ledger.exists("key1").unwrap());
        assert!(ledger.get("nonexistent").unwrap().is_none());

        ledger.delete("key1").unwrap();
        assert!(!ledger.exists("key1").unwrap());
    }

    #[test]
    fn test_versions() {
        let mut ledger = MemoryLedger::new();
        assert_eq!(ledger.version("k"), 0);

        ledger.put("k", vec![1]).unwrap();
        ledger.put("k", vec![2]).unwrap();
        assert_eq!(ledger.version("k"), 2);

        ledger.delete("k").unwrap();
        assert_eq!(ledger.version("k"), 3);

        // Deleting an absent key is a no-op
        ledger.delete("k").unwrap();
        assert_eq!(ledger.version("k"), 3);
    }

    #[test]
    fn test_empty_key_rejected() {
        let mut ledger = MemoryLedger::new();
        assert_eq!(
            ledger.put("", vec![1]),
            Err(StoreError::InvalidKey(String::new()))
        );
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let mut ledger = MemoryLedger::new();

        let mut batch = WriteBatch::new();
        batch.put("a".into(), vec![1]);
        batch.put("".into(), vec![2]);
        assert!(ledger.write_batch(batch).is_err());
        assert!(ledger.is_empty());

        let mut batch = WriteBatch::new();
        batch.put("a".into(), vec![1]);
        batch.put("b".into(), vec![2]);
        batch.delete("a".into());
        ledger.write_batch(batch).unwrap();

        let keys: Vec<_> = ledger.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b"]);
        assert_eq!(ledger.version("a"), 2);
    }
}
