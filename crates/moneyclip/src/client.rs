// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::{collections::HashMap, sync::Arc};

use moneyclip_store::KeyValueStore;
use serde::{Serialize, de::DeserializeOwned};
use tick::Clock;

use crate::{Error, MoneyClipBuilder, Options, Overrides, ScopedCache, accessor::Accessor};

/// A cache that invalidates entries by age and by schema version.
///
/// Every read checks the stored entry against the active options: an entry written under
/// a different [`Version`](crate::Version) or older than the maximum age is deleted from
/// the store and reported as a miss. Store failures are never surfaced from reads and
/// writes; they show up as misses and `Ok(false)` respectively.
///
/// Each call takes [`Overrides`] that are merged over the defaults given to the builder.
/// Use [`scoped`](Self::scoped) to fix overrides once for a group of calls.
///
/// Cloning is cheap; clones share the store and defaults.
///
/// # Examples
///
/// ```
/// # futures::executor::block_on(async {
/// use moneyclip::{MoneyClip, Overrides};
/// use std::time::Duration;
/// use tick::ClockControl;
///
/// let control = ClockControl::new();
/// let clip = MoneyClip::builder(control.to_clock()).memory().build();
///
/// let short_lived = Overrides::new().max_age(Duration::from_millis(100));
/// clip.set("thing", "value", &short_lived).await?;
/// assert_eq!(clip.get::<String>("thing", &short_lived).await.as_deref(), Some("value"));
///
/// control.advance(Duration::from_millis(200));
/// assert_eq!(clip.get::<String>("thing", &short_lived).await, None);
/// # Ok::<(), moneyclip::Error>(())
/// # }).unwrap();
/// ```
#[derive(Debug)]
pub struct MoneyClip<S = ()> {
    accessor: Arc<Accessor<S>>,
    defaults: Options,
}

impl<S> Clone for MoneyClip<S> {
    fn clone(&self) -> Self {
        Self {
            accessor: Arc::clone(&self.accessor),
            defaults: self.defaults.clone(),
        }
    }
}

impl MoneyClip<()> {
    /// Starts building a client that reads time from `clock`.
    #[must_use]
    pub fn builder(clock: Clock) -> MoneyClipBuilder {
        MoneyClipBuilder::new(clock)
    }
}

impl<S> MoneyClip<S> {
    pub(crate) fn new(accessor: Arc<Accessor<S>>, defaults: Options) -> Self {
        Self { accessor, defaults }
    }

    /// Returns the defaults fixed at build time.
    #[must_use]
    pub fn defaults(&self) -> &Options {
        &self.defaults
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        self.accessor.store()
    }

    /// Returns the clock entries are stamped and checked with.
    #[must_use]
    pub fn clock(&self) -> &Clock {
        self.accessor.clock()
    }

    /// Returns the defaults with `overrides` applied.
    #[must_use]
    pub fn options(&self, overrides: &Overrides) -> Options {
        self.defaults.merge(overrides)
    }
}

impl<S: KeyValueStore> MoneyClip<S> {
    /// Returns the value stored under `key` if it is present and valid under the merged options.
    ///
    /// Returns `None` for absent, unreadable, expired and version-mismatched entries, and
    /// when the store fails. Expired and mismatched entries are deleted before returning.
    pub async fn get<T: DeserializeOwned>(&self, key: &str, overrides: &Overrides) -> Option<T> {
        let options = self.options(overrides);
        let partition = self.accessor.partition_for(&options);
        self.accessor.get(key, &options, &partition).await
    }

    /// Stores `value` under `key`, stamped with the merged version and the current time.
    ///
    /// Returns `Ok(true)` once written and `Ok(false)` if the store rejected the write.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be represented as JSON, such as a map with
    /// non-string keys.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T, overrides: &Overrides) -> Result<bool, Error> {
        let options = self.options(overrides);
        let partition = self.accessor.partition_for(&options);
        self.accessor.set(key, value, &options, &partition).await
    }

    /// Returns every valid entry of the merged partition, evicting invalid ones.
    ///
    /// Returns an empty map if the store cannot list the partition's keys.
    pub async fn get_all<T: DeserializeOwned>(&self, overrides: &Overrides) -> HashMap<String, T> {
        let options = self.options(overrides);
        let partition = self.accessor.partition_for(&options);
        self.accessor.get_all(&options, &partition).await
    }

    /// Creates a cache bound to the defaults merged with `overrides`.
    ///
    /// The partition is resolved once, here. Scoping twice with the same partition name
    /// addresses the same partition.
    #[must_use]
    pub fn scoped(&self, overrides: &Overrides) -> ScopedCache<S> {
        ScopedCache::new(Arc::clone(&self.accessor), self.options(overrides))
    }
}
