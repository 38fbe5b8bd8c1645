//! Per-transaction write overlay.
//!
//! A transaction's writes are buffered here and only reach the underlying
//! store on `commit`. Reads see the transaction's own writes first. Dropping
//! the overlay discards everything, which is how a rejected transaction
//! leaves the ledger untouched.

use std::collections::{BTreeMap, BTreeSet};

use super::store::{LedgerStore, WriteBatch};
use crate::error::StoreError;

/// Write buffer over a ledger store for the duration of one transaction.
pub struct TxOverlay<'a, S: LedgerStore> {
    base: &'a mut S,
    /// Pending writes; `None` marks a delete.
    writes: BTreeMap<String, Option<Vec<u8>>>,
    /// Keys read from the base store.
    reads: BTreeSet<String>,
}

impl<'a, S: LedgerStore> TxOverlay<'a, S> {
    /// Start a transaction over `base`.
    pub fn new(base: &'a mut S) -> Self {
        Self {
            base,
            writes: BTreeMap::new(),
            reads: BTreeSet::new(),
        }
    }

    /// Keys the transaction read from the underlying store, for the
    /// platform's conflict detection.
    pub fn read_set(&self) -> impl Iterator<Item = &str> {
        self.reads.iter().map(String::as_str)
    }

    /// Keys the transaction will write.
    pub fn write_set(&self) -> impl Iterator<Item = &str> {
        self.writes.keys().map(String::as_str)
    }

    /// Check if the transaction has pending writes.
    pub fn is_dirty(&self) -> bool {
        !self.writes.is_empty()
    }

    /// Apply all pending writes to the underlying store as one batch.
    ///
    /// Returns the number of keys written.
    pub fn commit(self) -> Result<usize, StoreError> {
        let count = self.writes.len();
        if count == 0 {
            return Ok(0);
        }

        let mut batch = WriteBatch::new();
        for (key, value) in self.writes {
            match value {
                Some(value) => batch.put(key, value),
                None => batch.delete(key),
            }
        }
        self.base.write_batch(batch)?;
        Ok(count)
    }
}

impl<S: LedgerStore> LedgerStore for TxOverlay<'_, S> {
    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        if let Some(pending) = self.writes.get(key) {
            return Ok(pending.clone());
        }
        self.reads.insert(key.to_string());
        self.base.get(key)
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.writes.insert(key.to_string(), Some(value));
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.writes.insert(key.to_string(), None);
        Ok(())
    }
}
