// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Mock store implementation for testing.
//!
//! This module provides `MockStore`, an in-memory store that records all operations
//! and supports failure injection for testing error paths.

use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;

use crate::{Error, KeyValueStore, Partition};

/// Recorded store operation with full context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    /// A get operation was performed.
    Get {
        /// The key that was read.
        key: String,
        /// The partition that was read.
        partition: Partition,
    },
    /// A set operation was performed.
    Set {
        /// The key that was written.
        key: String,
        /// The raw value that was written.
        value: String,
        /// The partition that was written.
        partition: Partition,
    },
    /// A delete operation was performed.
    Del {
        /// The key that was deleted.
        key: String,
        /// The partition the key was deleted from.
        partition: Partition,
    },
    /// A key enumeration was performed on the given partition.
    Keys(Partition),
    /// A clear operation was performed on the given partition.
    Clear(Partition),
}

impl StoreOp {
    /// Returns the partition this operation addressed.
    #[must_use]
    pub fn partition(&self) -> &Partition {
        match self {
            Self::Get { partition, .. } | Self::Set { partition, .. } | Self::Del { partition, .. } => partition,
            Self::Keys(partition) | Self::Clear(partition) => partition,
        }
    }
}

type FailPredicate = Box<dyn Fn(&StoreOp) -> bool + Send + Sync>;
type Partitions = HashMap<Partition, HashMap<String, String>>;

/// A configurable mock store for testing.
///
/// The store keeps values in memory per partition and can be told to fail operations
/// on demand. Every operation is recorded, including the ones that failed.
///
/// Clones share state, so a test can keep one handle for inspection while the
/// code under test owns another.
///
/// # Examples
///
/// ```no_run
/// use moneyclip_store::{KeyValueStore, Partition, testing::{MockStore, StoreOp}};
///
/// # async fn example() {
/// let store = MockStore::new();
/// let partition = Partition::default();
///
/// store.set("key", "value".to_string(), &partition).await.unwrap();
/// assert_eq!(store.get("key", &partition).await.unwrap().as_deref(), Some("value"));
///
/// // Fail every enumeration
/// store.fail_when(|op| matches!(op, StoreOp::Keys(_)));
/// assert!(store.keys(&partition).await.is_err());
/// # }
/// ```
pub struct MockStore {
    data: Arc<Mutex<Partitions>>,
    operations: Arc<Mutex<Vec<StoreOp>>>,
    fail_when: Arc<Mutex<Option<FailPredicate>>>,
}

impl std::fmt::Debug for MockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockStore")
            .field("data", &self.data)
            .field("operations", &self.operations)
            .field("fail_when", &self.fail_when.lock().is_some())
            .finish()
    }
}

impl Clone for MockStore {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            operations: Arc::clone(&self.operations),
            fail_when: Arc::clone(&self.fail_when),
        }
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStore {
    /// Creates a new empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Arc::new(Mutex::new(HashMap::new())),
            operations: Arc::new(Mutex::new(Vec::new())),
            fail_when: Arc::new(Mutex::new(None)),
        }
    }

    /// Writes a raw value directly, bypassing recording and failure injection.
    ///
    /// Useful for seeding corrupt or hand-crafted entries.
    pub fn put_raw(&self, key: impl Into<String>, value: impl Into<String>, partition: &Partition) {
        self.data
            .lock()
            .entry(partition.clone())
            .or_default()
            .insert(key.into(), value.into());
    }

    /// Reads a raw value directly, bypassing recording and failure injection.
    #[must_use]
    pub fn raw(&self, key: &str, partition: &Partition) -> Option<String> {
        self.data.lock().get(partition).and_then(|entries| entries.get(key).cloned())
    }

    /// Returns the number of entries in the given partition.
    #[must_use]
    pub fn entry_count(&self, partition: &Partition) -> usize {
        self.data.lock().get(partition).map_or(0, HashMap::len)
    }

    /// Returns true if the partition contains the given key.
    #[must_use]
    pub fn contains_key(&self, key: &str, partition: &Partition) -> bool {
        self.data.lock().get(partition).is_some_and(|entries| entries.contains_key(key))
    }

    /// Sets a predicate that determines when operations should fail.
    ///
    /// The predicate receives the operation and returns `true` if it should fail.
    /// A failing operation is recorded but does not touch the stored data.
    ///
    /// # Examples
    ///
    /// ```
    /// use moneyclip_store::testing::{MockStore, StoreOp};
    ///
    /// let store = MockStore::new();
    ///
    /// // Fail all operations
    /// store.fail_when(|_| true);
    ///
    /// // Fail only deletes
    /// store.fail_when(|op| matches!(op, StoreOp::Del { .. }));
    ///
    /// // Fail reads of a specific key
    /// store.fail_when(|op| matches!(op, StoreOp::Get { key, .. } if key == "bad_key"));
    /// ```
    pub fn fail_when<F>(&self, predicate: F)
    where
        F: Fn(&StoreOp) -> bool + Send + Sync + 'static,
    {
        *self.fail_when.lock() = Some(Box::new(predicate));
    }

    /// Clears the failure predicate, allowing all operations to succeed.
    pub fn clear_failures(&self) {
        *self.fail_when.lock() = None;
    }

    /// Returns a clone of all recorded operations.
    #[must_use]
    pub fn operations(&self) -> Vec<StoreOp> {
        self.operations.lock().clone()
    }

    /// Clears all recorded operations.
    pub fn clear_operations(&self) {
        self.operations.lock().clear();
    }

    /// Records `op` and returns an error if the failure predicate matches it.
    fn admit(&self, op: StoreOp) -> Result<(), Error> {
        let fail = self.fail_when.lock().as_ref().is_some_and(|predicate| predicate(&op));
        self.operations.lock().push(op);
        if fail { Err(Error::caused_by("mock: operation failed")) } else { Ok(()) }
    }
}

impl KeyValueStore for MockStore {
    async fn get(&self, key: &str, partition: &Partition) -> Result<Option<String>, Error> {
        self.admit(StoreOp::Get {
            key: key.to_owned(),
            partition: partition.clone(),
        })?;
        Ok(self.raw(key, partition))
    }

    async fn set(&self, key: &str, value: String, partition: &Partition) -> Result<(), Error> {
        self.admit(StoreOp::Set {
            key: key.to_owned(),
            value: value.clone(),
            partition: partition.clone(),
        })?;
        self.put_raw(key, value, partition);
        Ok(())
    }

    async fn del(&self, key: &str, partition: &Partition) -> Result<(), Error> {
        self.admit(StoreOp::Del {
            key: key.to_owned(),
            partition: partition.clone(),
        })?;
        if let Some(entries) = self.data.lock().get_mut(partition) {
            entries.remove(key);
        }
        Ok(())
    }

    async fn keys(&self, partition: &Partition) -> Result<Vec<String>, Error> {
        self.admit(StoreOp::Keys(partition.clone()))?;
        Ok(self
            .data
            .lock()
            .get(partition)
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn clear(&self, partition: &Partition) -> Result<(), Error> {
        self.admit(StoreOp::Clear(partition.clone()))?;
        self.data.lock().remove(partition);
        Ok(())
    }
}
