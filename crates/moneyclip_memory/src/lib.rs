// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! In-memory partitioned key-value store backed by moka.
//!
//! This crate provides [`InMemoryStore`], a concurrent implementation of
//! [`KeyValueStore`](moneyclip_store::KeyValueStore) that keeps one moka cache per
//! partition. Use [`InMemoryStoreBuilder`] to bound partitions or give the store a
//! name without exposing moka types directly.
//!
//! # Quick Start
//!
//! ```
//! use moneyclip_memory::InMemoryStore;
//! use moneyclip_store::{KeyValueStore, Partition};
//!
//! # futures::executor::block_on(async {
//! let store = InMemoryStore::new();
//! let partition = store.partition("sessions");
//!
//! store.set("alice", "{}".to_string(), &partition).await?;
//! assert_eq!(store.get("alice", &partition).await?.as_deref(), Some("{}"));
//! assert_eq!(store.get("alice", &Partition::default()).await?, None);
//! # Ok::<(), moneyclip_store::Error>(())
//! # });
//! ```

pub mod builder;
pub mod store;

#[doc(inline)]
pub use builder::InMemoryStoreBuilder;
#[doc(inline)]
pub use store::InMemoryStore;
