//! Ledger store trait.

use crate::error::StoreError;

/// Keyed byte store underlying all contract records.
///
/// Keyed reads are consistent within one transaction. `get` takes `&mut self`
/// so implementations can record what a transaction read.
pub trait LedgerStore {
    /// Read the value stored under `key`.
    fn get(&mut self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn delete(&mut self, key: &str) -> Result<(), StoreError>;

    /// Whether `key` holds a value.
    fn exists(&mut self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }

    /// Apply a batch of writes.
    ///
    /// The default applies operations one by one. Stores that can apply a
    /// batch atomically should override this.
    fn write_batch(&mut self, batch: WriteBatch) -> Result<(), StoreError> {
        for op in batch.operations {
            match op {
                BatchOp::Put { key, value } => self.put(&key, value)?,
                BatchOp::Delete { key } => self.delete(&key)?,
            }
        }
        Ok(())
    }
}

/// Writes applied together at commit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteBatch {
    /// Operations, applied in order.
    pub operations: Vec<BatchOp>,
}

/// One write in a [`WriteBatch`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchOp {
    /// Store a value.
    Put {
        /// Ledger key.
        key: String,
        /// Encoded record.
        value: Vec<u8>,
    },
    /// Remove a key.
    Delete {
        /// Ledger key.
        key: String,
    },
}

impl BatchOp {
    /// Key the operation targets.
    pub fn key(&self) -> &str {
        match self {
            BatchOp::Put { key, .. } | BatchOp::Delete { key } => key,
        }
    }
}

impl WriteBatch {
    /// Empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a put.
    pub fn put(&mut self, key: String, value: Vec<u8>) {
        self.operations.push(BatchOp::Put { key, value });
    }

    /// Queue a delete.
    pub fn delete(&mut self, key: String) {
        self.operations.push(BatchOp::Delete { key });
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Number of queued operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }
}
