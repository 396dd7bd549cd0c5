// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Client builder.
//!
//! The builder fixes everything a [`MoneyClip`] needs for its lifetime: the store, the
//! clock, the default [`Options`] and telemetry. Defaults never change after `build`.

use std::sync::Arc;

use moneyclip_store::KeyValueStore;
#[cfg(feature = "memory")]
use moneyclip_memory::InMemoryStore;
use tick::Clock;

use crate::{ClipTelemetry, MaxAge, MoneyClip, Options, Version, accessor::Accessor};

/// Builder for [`MoneyClip`].
///
/// Created by [`MoneyClip::builder`]. A store must be chosen with
/// [`store`](MoneyClipBuilder::store) or [`memory`](MoneyClipBuilder::memory) before the
/// client can be built.
///
/// # Examples
///
/// ```
/// use moneyclip::MoneyClip;
/// use std::time::Duration;
/// use tick::Clock;
///
/// let clip = MoneyClip::builder(Clock::new_frozen())
///     .memory()
///     .max_age(Duration::from_secs(300))
///     .version("2024-06")
///     .build();
/// ```
#[derive(Debug)]
pub struct MoneyClipBuilder<S = ()> {
    store: S,
    clock: Clock,
    defaults: Options,
    telemetry: Option<ClipTelemetry>,
}

impl MoneyClipBuilder<()> {
    pub(crate) fn new(clock: Clock) -> Self {
        Self {
            store: (),
            clock,
            defaults: Options::default(),
            telemetry: None,
        }
    }

    /// Sets the store the client persists entries in.
    ///
    /// # Examples
    ///
    /// ```
    /// use moneyclip::{InMemoryStore, MoneyClip};
    /// use tick::Clock;
    ///
    /// let store = InMemoryStore::builder().max_capacity_per_partition(10_000).build();
    /// let clip = MoneyClip::builder(Clock::new_frozen()).store(store).build();
    /// ```
    pub fn store<S>(self, store: S) -> MoneyClipBuilder<S>
    where
        S: KeyValueStore,
    {
        MoneyClipBuilder {
            store,
            clock: self.clock,
            defaults: self.defaults,
            telemetry: self.telemetry,
        }
    }

    /// Uses a fresh unbounded [`InMemoryStore`].
    #[cfg(feature = "memory")]
    #[must_use]
    pub fn memory(self) -> MoneyClipBuilder<InMemoryStore> {
        self.store(InMemoryStore::new())
    }
}

impl<S> MoneyClipBuilder<S> {
    /// Sets the default maximum entry age.
    #[must_use]
    pub fn max_age(mut self, max_age: impl Into<MaxAge>) -> Self {
        self.defaults = self.defaults.with_max_age(max_age);
        self
    }

    /// Sets the default schema version.
    #[must_use]
    pub fn version(mut self, version: impl Into<Version>) -> Self {
        self.defaults = self.defaults.with_version(version);
        self
    }

    /// Sets the default partition.
    #[must_use]
    pub fn partition(mut self, name: impl Into<String>) -> Self {
        self.defaults = self.defaults.with_partition(name);
        self
    }

    /// Replaces all defaults at once, typically with options loaded from configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use moneyclip::{MoneyClip, Options};
    /// use tick::Clock;
    ///
    /// let defaults: Options = serde_json::from_str(r#"{ "max_age_ms": 60000, "version": 3 }"#)?;
    /// let clip = MoneyClip::builder(Clock::new_frozen()).memory().options(defaults.clone()).build();
    /// assert_eq!(clip.defaults(), &defaults);
    /// # Ok::<(), serde_json::Error>(())
    /// ```
    #[must_use]
    pub fn options(mut self, defaults: Options) -> Self {
        self.defaults = defaults;
        self
    }

    /// Records cache outcomes through `telemetry`.
    #[must_use]
    pub fn telemetry(mut self, telemetry: ClipTelemetry) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Returns a reference to the builder's clock.
    #[must_use]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }
}

impl<S: KeyValueStore> MoneyClipBuilder<S> {
    /// Builds the client.
    #[must_use]
    pub fn build(self) -> MoneyClip<S> {
        MoneyClip::new(Arc::new(Accessor::new(self.store, self.clock, self.telemetry)), self.defaults)
    }
}
