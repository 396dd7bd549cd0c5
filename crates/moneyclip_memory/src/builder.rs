// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builder for configuring in-memory stores.
//!
//! The builder keeps moka's configuration types out of the public API.

use crate::store::InMemoryStore;

/// Builder for configuring an `InMemoryStore`.
///
/// # Examples
///
/// ```
/// use moneyclip_memory::InMemoryStore;
///
/// let store = InMemoryStore::builder()
///     .max_capacity_per_partition(10_000)
///     .initial_capacity(64)
///     .name("app-cache")
///     .build();
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemoryStoreBuilder {
    pub(crate) max_capacity: Option<u64>,
    pub(crate) initial_capacity: Option<usize>,
    pub(crate) name: Option<String>,
}

impl InMemoryStoreBuilder {
    /// Creates a new builder with default settings.
    ///
    /// The default configuration creates unbounded partitions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of entries each partition may hold.
    ///
    /// Once a partition is full, moka evicts entries using its `TinyLFU` policy.
    /// If not set, partitions are limited only by available memory.
    #[must_use]
    pub fn max_capacity_per_partition(mut self, capacity: u64) -> Self {
        self.max_capacity = Some(capacity);
        self
    }

    /// Sets the pre-allocation hint for each partition.
    #[must_use]
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = Some(capacity);
        self
    }

    /// Sets a name for the store, used as a prefix for each partition's moka cache name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builds the store with the configured settings.
    #[must_use]
    pub fn build(self) -> InMemoryStore {
        InMemoryStore::from_builder(self)
    }
}
