// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The core trait for storage engines.
//!
//! [`KeyValueStore`] is the whole surface `moneyclip` needs from a storage engine:
//! string values under string keys, scoped to a [`Partition`].

use crate::{Error, Partition};

/// Trait for asynchronous, partitioned key-value storage engines.
///
/// Values are opaque strings; the caching layer owns their format. Every method other
/// than [`partition`](Self::partition) is asynchronous and fallible. Implementations decide
/// their own durability and isolation guarantees; callers assume none across keys.
///
/// All five data methods are required. [`partition`](Self::partition) has a default
/// implementation that builds a named handle without touching the engine.
#[cfg_attr(
    feature = "dynamic-store",
    dynosaur::dynosaur(pub(crate) DynKeyValueStore = dyn(box) KeyValueStore, bridge(none))
)]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, or `None` if there is none.
    fn get(&self, key: &str, partition: &Partition) -> impl Future<Output = Result<Option<String>, Error>> + Send;

    /// Writes `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: String, partition: &Partition) -> impl Future<Output = Result<(), Error>> + Send;

    /// Removes the value stored under `key`. Removing a missing key succeeds.
    fn del(&self, key: &str, partition: &Partition) -> impl Future<Output = Result<(), Error>> + Send;

    /// Lists every key currently stored in `partition`, in no particular order.
    fn keys(&self, partition: &Partition) -> impl Future<Output = Result<Vec<String>, Error>> + Send;

    /// Removes every entry in `partition`. Other partitions are untouched.
    fn clear(&self, partition: &Partition) -> impl Future<Output = Result<(), Error>> + Send;

    /// Resolves the handle for the partition called `name`, creating it if the engine needs to.
    ///
    /// Repeated calls with the same name must address the same partition.
    fn partition(&self, name: &str) -> Partition {
        Partition::named(name)
    }
}
