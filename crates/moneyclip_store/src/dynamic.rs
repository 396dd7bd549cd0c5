// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Type-erased store wrapper.

use std::{fmt::Debug, sync::Arc};

use crate::{Error, KeyValueStore, Partition, store::DynKeyValueStore};

/// Extension trait for converting any `KeyValueStore` into a `DynamicStore`.
///
/// This trait is automatically implemented for all types that implement `KeyValueStore`.
///
/// # Examples
///
/// ```
/// use moneyclip_store::{DynamicStore, DynamicStoreExt, KeyValueStore};
///
/// fn erase<S>(store: S) -> DynamicStore
/// where
///     S: KeyValueStore + 'static,
/// {
///     store.into_dynamic()
/// }
/// ```
pub trait DynamicStoreExt: Sized {
    /// Converts this store into a `DynamicStore`.
    fn into_dynamic(self) -> DynamicStore;
}

impl<S> DynamicStoreExt for S
where
    S: KeyValueStore + 'static,
{
    fn into_dynamic(self) -> DynamicStore {
        DynamicStore::new(self)
    }
}

/// A clonable store with type erasure.
///
/// `DynamicStore` keeps a trait object behind an `Arc`, so clones share the same
/// underlying engine. Use it when the concrete store type should not leak into
/// the caller's types, for example when the engine is picked from configuration.
pub struct DynamicStore(Arc<DynKeyValueStore<'static>>);

impl DynamicStore {
    pub(crate) fn new<S>(store: S) -> Self
    where
        S: KeyValueStore + Send + Sync + 'static,
    {
        Self(DynKeyValueStore::new_arc(store))
    }
}

impl Debug for DynamicStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicStore").finish()
    }
}

impl Clone for DynamicStore {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl KeyValueStore for DynamicStore {
    async fn get(&self, key: &str, partition: &Partition) -> Result<Option<String>, Error> {
        self.0.get(key, partition).await
    }

    async fn set(&self, key: &str, value: String, partition: &Partition) -> Result<(), Error> {
        self.0.set(key, value, partition).await
    }

    async fn del(&self, key: &str, partition: &Partition) -> Result<(), Error> {
        self.0.del(key, partition).await
    }

    async fn keys(&self, partition: &Partition) -> Result<Vec<String>, Error> {
        self.0.keys(partition).await
    }

    async fn clear(&self, partition: &Partition) -> Result<(), Error> {
        self.0.clear(partition).await
    }

    fn partition(&self, name: &str) -> Partition {
        self.0.partition(name)
    }
}
