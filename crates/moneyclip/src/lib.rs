// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Time- and version-based invalidation layered over any asynchronous key-value store.
//!
//! `moneyclip` stores every value together with the schema version it was written under
//! and the time it was written. Reads check both against the active [`Options`]:
//! - an entry written under a different [`Version`] is stale,
//! - an entry older than the [`MaxAge`] is stale.
//!
//! A stale entry is deleted from the store and reported as a miss. Nothing else about the
//! store changes: partitions, durability and concurrency are the store's business.
//!
//! # Examples
//!
//! ## Expiring entries
//!
//! ```
//! use moneyclip::{MoneyClip, Overrides};
//! use std::time::Duration;
//! use tick::ClockControl;
//! # futures::executor::block_on(async {
//!
//! let control = ClockControl::new();
//! let clip = MoneyClip::builder(control.to_clock())
//!     .memory()
//!     .max_age(Duration::from_millis(100))
//!     .build();
//!
//! clip.set("thing", "value", &Overrides::new()).await?;
//! assert_eq!(clip.get::<String>("thing", &Overrides::new()).await.as_deref(), Some("value"));
//!
//! control.advance(Duration::from_millis(200));
//! assert_eq!(clip.get::<String>("thing", &Overrides::new()).await, None);
//! assert!(clip.get_all::<String>(&Overrides::new()).await.is_empty());
//! # Ok::<(), moneyclip::Error>(())
//! # }).unwrap();
//! ```
//!
//! ## Versioned schemas
//!
//! Bumping the version invalidates everything written before, without touching the store.
//!
//! ```
//! use moneyclip::{MoneyClip, Overrides};
//! use tick::Clock;
//! # futures::executor::block_on(async {
//!
//! let clip = MoneyClip::builder(Clock::new_frozen()).memory().build();
//!
//! clip.set("user", &("ada", 36), &Overrides::new().version(1)).await?;
//! assert_eq!(clip.get::<(String, u32)>("user", &Overrides::new().version(2)).await, None);
//!
//! // The mismatched entry was deleted on read.
//! assert!(clip.get_all::<(String, u32)>(&Overrides::new().version(1)).await.is_empty());
//! # Ok::<(), moneyclip::Error>(())
//! # }).unwrap();
//! ```
//!
//! ## Scoped caches
//!
//! [`MoneyClip::scoped`] fixes a partition and options once:
//!
//! ```
//! use moneyclip::{MoneyClip, Overrides};
//! use std::time::Duration;
//! use tick::Clock;
//! # futures::executor::block_on(async {
//!
//! let clip = MoneyClip::builder(Clock::new_frozen()).memory().build();
//! let sessions = clip.scoped(&Overrides::new().partition("sessions").version(5).max_age(Duration::from_secs(900)));
//!
//! sessions.set("abc", "token").await?;
//! assert_eq!(sessions.get::<String>("abc").await.as_deref(), Some("token"));
//! assert_eq!(clip.get::<String>("abc", &Overrides::new()).await, None);
//! # Ok::<(), moneyclip::Error>(())
//! # }).unwrap();
//! ```
//!
//! # Failure Handling
//!
//! Reads never fail: store errors, unreadable entries and payloads of the wrong type are
//! misses. Writes report a store failure as `Ok(false)`. The only error is
//! [`Error`] from `set` when a value has no JSON representation.
//!
//! # Features
//!
//! - `memory` (default): [`InMemoryStore`] and [`MoneyClipBuilder::memory`].
//! - `logs` (default): structured `tracing` events, see [`TelemetryConfig::with_logs`].
//! - `metrics`: OpenTelemetry counters and histograms.
//! - `dynamic-store`: the type-erased [`DynamicStore`].
//! - `test-util`: [`MockStore`] and `tick` clock control for tests.

mod accessor;
pub mod builder;
mod bulk;
mod client;
pub mod envelope;
mod options;
pub mod policy;
mod scoped;
mod telemetry;

#[doc(inline)]
pub use builder::MoneyClipBuilder;
#[doc(inline)]
pub use client::MoneyClip;
#[doc(inline)]
pub use envelope::{DecodeFailure, DecodeReason, Envelope};
#[cfg(feature = "memory")]
#[doc(inline)]
pub use moneyclip_memory::{InMemoryStore, InMemoryStoreBuilder};
#[cfg(feature = "dynamic-store")]
#[doc(inline)]
pub use moneyclip_store::{DynamicStore, DynamicStoreExt};
#[doc(inline)]
pub use moneyclip_store::{Error, KeyValueStore, Partition, Result};
#[doc(inline)]
pub use options::{MaxAge, Options, Overrides, Version};
#[doc(inline)]
pub use policy::Verdict;
#[doc(inline)]
pub use scoped::ScopedCache;
#[doc(inline)]
pub use telemetry::{ClipTelemetry, config::TelemetryConfig};

#[cfg(any(feature = "test-util", test))]
#[doc(inline)]
pub use moneyclip_store::testing::{MockStore, StoreOp};
