// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Caches bound to one partition and one set of options.

use std::{collections::HashMap, sync::Arc};

use moneyclip_store::{KeyValueStore, Partition, Result};
use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, Options, accessor::Accessor};

/// A cache handle with fixed options and a pre-resolved partition.
///
/// Created by [`MoneyClip::scoped`](crate::MoneyClip::scoped). Reads and writes behave
/// exactly like the unscoped client calls with the same options. [`del`](Self::del),
/// [`clear`](Self::clear) and [`keys`](Self::keys) go straight to the store and return
/// its result unchanged.
///
/// Cloning is cheap; clones share the store.
///
/// # Examples
///
/// ```
/// # #[cfg(feature = "memory")]
/// # futures::executor::block_on(async {
/// use moneyclip::{MoneyClip, Overrides};
/// use std::time::Duration;
/// use tick::Clock;
///
/// let clip = MoneyClip::builder(Clock::new_frozen()).memory().build();
/// let thumbnails = clip.scoped(&Overrides::new().partition("thumbnails").version(2).max_age(Duration::from_secs(60)));
///
/// thumbnails.set("a.png", &vec![0_u8, 1, 2]).await?;
/// assert_eq!(thumbnails.get::<Vec<u8>>("a.png").await, Some(vec![0, 1, 2]));
/// assert_eq!(thumbnails.keys().await?, vec!["a.png".to_string()]);
/// # Ok::<(), moneyclip::Error>(())
/// # }).unwrap();
/// ```
#[derive(Debug)]
pub struct ScopedCache<S> {
    accessor: Arc<Accessor<S>>,
    options: Options,
    partition: Partition,
}

impl<S> Clone for ScopedCache<S> {
    fn clone(&self) -> Self {
        Self {
            accessor: Arc::clone(&self.accessor),
            options: self.options.clone(),
            partition: self.partition.clone(),
        }
    }
}

impl<S: KeyValueStore> ScopedCache<S> {
    pub(crate) fn new(accessor: Arc<Accessor<S>>, options: Options) -> Self {
        let partition = accessor.partition_for(&options);
        Self {
            accessor,
            options,
            partition,
        }
    }

    /// Returns the options every call uses.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Returns the partition every call addresses.
    #[must_use]
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Returns the value stored under `key` if it is present and still valid.
    ///
    /// Expired and version-mismatched entries are evicted and reported as `None`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.accessor.get(key, &self.options, &self.partition).await
    }

    /// Stores `value` under `key`.
    ///
    /// Returns `Ok(false)` if the store rejected the write.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be represented as JSON.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> std::result::Result<bool, Error> {
        self.accessor.set(key, value, &self.options, &self.partition).await
    }

    /// Returns every valid entry of the partition.
    pub async fn get_all<T: DeserializeOwned>(&self) -> HashMap<String, T> {
        self.accessor.get_all(&self.options, &self.partition).await
    }

    /// Removes `key` from the partition.
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged.
    pub async fn del(&self, key: &str) -> Result<()> {
        self.accessor.del(key, &self.partition).await
    }

    /// Removes every entry of the partition.
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged.
    pub async fn clear(&self) -> Result<()> {
        self.accessor.clear(&self.partition).await
    }

    /// Lists every key of the partition, valid or not.
    ///
    /// # Errors
    ///
    /// Returns the store's error unchanged.
    pub async fn keys(&self) -> Result<Vec<String>> {
        self.accessor.keys(&self.partition).await
    }
}
