// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Reading every valid entry of a partition.

use std::collections::HashMap;

use futures::future::join_all;
use moneyclip_store::{KeyValueStore, Partition};
use serde::de::DeserializeOwned;

use crate::{Options, accessor::Accessor, telemetry::ClipOperation, telemetry::ext::ClockExt};

impl<S: KeyValueStore> Accessor<S> {
    /// Resolves every key of `partition` through [`Accessor::get`] concurrently.
    ///
    /// Invalid entries are omitted and evicted along the way. A failed key enumeration
    /// yields an empty map. There is no snapshot: entries written or removed while the
    /// reads are in flight may or may not be reflected.
    pub(crate) async fn get_all<T: DeserializeOwned>(&self, options: &Options, partition: &Partition) -> HashMap<String, T> {
        let timed = self.clock().measure(self.store().keys(partition)).await;
        self.record_outcome(partition, ClipOperation::GetAll, &timed.value, timed.elapsed);

        let Ok(keys) = timed.value else {
            return HashMap::new();
        };

        let values = join_all(keys.iter().map(|key| self.get::<T>(key, options, partition))).await;

        keys.into_iter()
            .zip(values)
            .filter_map(|(key, value)| value.map(|value| (key, value)))
            .collect()
    }
}
