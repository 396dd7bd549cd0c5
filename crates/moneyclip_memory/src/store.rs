// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! In-memory store implementation using moka.

use std::{collections::HashMap, sync::Arc};

use moka::future::Cache;
use moneyclip_store::{Error, KeyValueStore, Partition};
use parking_lot::RwLock;

use crate::builder::InMemoryStoreBuilder;

type PartitionCache = Arc<Cache<String, String>>;

/// An in-memory, partitioned key-value store.
///
/// Each partition is backed by its own moka cache, created on first write. Clones share
/// the same partitions, so one store can be handed to several clients.
///
/// Operations never fail; the `Result` return types come from the store contract. A `set`
/// racing a `clear` of the same partition either lands before the wipe or survives it; it
/// never returns after writing into a cache the wipe already detached.
///
/// # Examples
///
/// ```
/// use moneyclip_memory::InMemoryStore;
/// use moneyclip_store::{KeyValueStore, Partition};
/// # futures::executor::block_on(async {
///
/// let store = InMemoryStore::new();
/// store.set("key", "value".to_string(), &Partition::default()).await?;
/// assert_eq!(store.keys(&Partition::default()).await?, vec!["key".to_string()]);
/// # Ok::<(), moneyclip_store::Error>(())
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    partitions: Arc<RwLock<HashMap<Partition, PartitionCache>>>,
    settings: Arc<InMemoryStoreBuilder>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Creates a new store with unbounded partitions.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a new builder for configuring an in-memory store.
    #[must_use]
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::new()
    }

    pub(crate) fn from_builder(builder: InMemoryStoreBuilder) -> Self {
        Self {
            partitions: Arc::new(RwLock::new(HashMap::new())),
            settings: Arc::new(builder),
        }
    }

    /// Returns the handles of all partitions that currently hold a backing cache.
    #[must_use]
    pub fn partitions(&self) -> Vec<Partition> {
        self.partitions.read().keys().cloned().collect()
    }

    fn existing(&self, partition: &Partition) -> Option<PartitionCache> {
        self.partitions.read().get(partition).cloned()
    }

    fn existing_or_create(&self, partition: &Partition) -> PartitionCache {
        if let Some(cache) = self.existing(partition) {
            return cache;
        }

        self.partitions
            .write()
            .entry(partition.clone())
            .or_insert_with(|| self.new_partition_cache(partition))
            .clone()
    }

    fn new_partition_cache(&self, partition: &Partition) -> PartitionCache {
        let mut builder = Cache::builder();

        if let Some(capacity) = self.settings.max_capacity {
            builder = builder.max_capacity(capacity);
        }

        if let Some(capacity) = self.settings.initial_capacity {
            builder = builder.initial_capacity(capacity);
        }

        if let Some(name) = self.settings.name.as_deref() {
            builder = builder.name(&format!("{name}/{partition}"));
        }

        Arc::new(builder.build())
    }

    fn is_attached(&self, partition: &Partition, cache: &PartitionCache) -> bool {
        self.existing(partition).is_some_and(|current| Arc::ptr_eq(&current, cache))
    }
}

impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str, partition: &Partition) -> Result<Option<String>, Error> {
        match self.existing(partition) {
            Some(cache) => Ok(cache.get(key).await),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: String, partition: &Partition) -> Result<(), Error> {
        loop {
            let cache = self.existing_or_create(partition);
            cache.insert(key.to_owned(), value.clone()).await;

            // A concurrent clear may have detached the cache while the insert ran.
            if self.is_attached(partition, &cache) {
                return Ok(());
            }
        }
    }

    async fn del(&self, key: &str, partition: &Partition) -> Result<(), Error> {
        if let Some(cache) = self.existing(partition) {
            cache.invalidate(key).await;
        }
        Ok(())
    }

    async fn keys(&self, partition: &Partition) -> Result<Vec<String>, Error> {
        Ok(self
            .existing(partition)
            .map(|cache| cache.iter().map(|(key, _)| key.as_ref().clone()).collect())
            .unwrap_or_default())
    }

    async fn clear(&self, partition: &Partition) -> Result<(), Error> {
        // Dropping the backing cache makes the wipe visible to enumeration immediately.
        if let Some(cache) = self.partitions.write().remove(partition) {
            cache.invalidate_all();
        }
        Ok(())
    }
}
