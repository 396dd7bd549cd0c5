// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Storage contract for the `moneyclip` caching layer.
//!
//! This crate defines the [`KeyValueStore`] trait that every storage engine must satisfy,
//! the [`Partition`] handle that addresses a named sub-store, and the [`Error`] type returned
//! by fallible store operations.
//!
//! # Overview
//!
//! A store persists opaque strings under string keys, scoped to a partition. It knows nothing
//! about expiration or versioning: `moneyclip` layers those policies on top. Implement
//! [`KeyValueStore`] for your storage engine, then hand it to the `moneyclip` client builder.
//!
//! # Implementing a Store
//!
//! ```
//! use moneyclip_store::{Error, KeyValueStore, Partition};
//! use std::collections::HashMap;
//! use std::sync::RwLock;
//!
//! #[derive(Default)]
//! struct SimpleStore(RwLock<HashMap<(Partition, String), String>>);
//!
//! impl KeyValueStore for SimpleStore {
//!     async fn get(&self, key: &str, partition: &Partition) -> Result<Option<String>, Error> {
//!         Ok(self.0.read().unwrap().get(&(partition.clone(), key.to_owned())).cloned())
//!     }
//!
//!     async fn set(&self, key: &str, value: String, partition: &Partition) -> Result<(), Error> {
//!         self.0.write().unwrap().insert((partition.clone(), key.to_owned()), value);
//!         Ok(())
//!     }
//!
//!     async fn del(&self, key: &str, partition: &Partition) -> Result<(), Error> {
//!         self.0.write().unwrap().remove(&(partition.clone(), key.to_owned()));
//!         Ok(())
//!     }
//!
//!     async fn keys(&self, partition: &Partition) -> Result<Vec<String>, Error> {
//!         let map = self.0.read().unwrap();
//!         Ok(map.keys().filter(|(p, _)| p == partition).map(|(_, k)| k.clone()).collect())
//!     }
//!
//!     async fn clear(&self, partition: &Partition) -> Result<(), Error> {
//!         self.0.write().unwrap().retain(|(p, _), _| p != partition);
//!         Ok(())
//!     }
//! }
//! ```
//!
//! # Dynamic Dispatch
//!
//! Enable the `dynamic-store` feature for [`DynamicStore`], which wraps any `KeyValueStore`
//! in a clonable, type-erased container.

pub mod error;
mod partition;
mod store;
#[cfg(any(feature = "test-util", test))]
pub mod testing;

#[cfg(feature = "dynamic-store")]
mod dynamic;

#[cfg(feature = "dynamic-store")]
#[doc(inline)]
pub use dynamic::{DynamicStore, DynamicStoreExt};
#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use partition::Partition;
#[doc(inline)]
pub use store::KeyValueStore;
