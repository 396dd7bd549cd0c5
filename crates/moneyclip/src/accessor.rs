// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Single-entry reads and writes with policy enforcement.

use moneyclip_store::{KeyValueStore, Partition, Result};
use serde::{Serialize, de::DeserializeOwned};
use tick::Clock;

use crate::{
    Error, Options, Verdict,
    envelope::{self, DecodeReason},
    telemetry::{
        ClipActivity, ClipOperation, ClipTelemetry,
        ext::{ClipTelemetryExt, ClockExt},
    },
};

/// Applies envelope encoding and the expiration policy on top of a store.
///
/// Store failures never escape `get`/`set`: each one is folded into the empty result at
/// the point it occurs and recorded as an error outcome.
#[derive(Debug)]
pub(crate) struct Accessor<S> {
    store: S,
    clock: Clock,
    telemetry: Option<ClipTelemetry>,
}

impl<S> Accessor<S> {
    pub(crate) fn new(store: S, clock: Clock, telemetry: Option<ClipTelemetry>) -> Self {
        Self { store, clock, telemetry }
    }

    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn clock(&self) -> &Clock {
        &self.clock
    }
}

impl<S: KeyValueStore> Accessor<S> {
    /// Maps the options' partition name to a store handle; no name means the default partition.
    pub(crate) fn partition_for(&self, options: &Options) -> Partition {
        options
            .partition_name()
            .map_or_else(Partition::default, |name| self.store.partition(name))
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, key: &str, options: &Options, partition: &Partition) -> Option<T> {
        let timed = self.clock.measure(self.store.get(key, partition)).await;
        let duration = Some(timed.elapsed);

        let Ok(raw) = timed.value else {
            self.telemetry.record(partition, ClipOperation::Get, ClipActivity::Error, duration);
            return None;
        };

        let envelope = match envelope::decode(raw.as_deref()) {
            Ok(envelope) => envelope,
            Err(failure) => {
                let activity = match failure.reason() {
                    DecodeReason::Absent => ClipActivity::Miss,
                    DecodeReason::Malformed | DecodeReason::PayloadMismatch => ClipActivity::Corrupt,
                };
                self.telemetry.record(partition, ClipOperation::Get, activity, duration);
                return None;
            }
        };

        match Verdict::check(&envelope, options, self.clock.system_time()) {
            Verdict::Valid => {}
            Verdict::VersionMismatch => {
                self.telemetry
                    .record(partition, ClipOperation::Get, ClipActivity::VersionMismatch, duration);
                self.evict(key, partition).await;
                return None;
            }
            Verdict::Expired => {
                self.telemetry.record(partition, ClipOperation::Get, ClipActivity::Expired, duration);
                self.evict(key, partition).await;
                return None;
            }
        }

        // A null payload reads the same as an absent entry.
        if envelope.payload().is_null() {
            self.telemetry.record(partition, ClipOperation::Get, ClipActivity::Miss, duration);
            return None;
        }

        if let Ok(value) = envelope.into_payload() {
            self.telemetry.record(partition, ClipOperation::Get, ClipActivity::Hit, duration);
            Some(value)
        } else {
            self.telemetry.record(partition, ClipOperation::Get, ClipActivity::Corrupt, duration);
            None
        }
    }

    /// Writes `value` stamped with the active version and the current time.
    ///
    /// Returns `Ok(false)` when the store rejects the write.
    pub(crate) async fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        options: &Options,
        partition: &Partition,
    ) -> std::result::Result<bool, Error> {
        let raw = envelope::encode(value, options.version(), self.clock.system_time())?;

        let timed = self.clock.measure(self.store.set(key, raw, partition)).await;
        let (activity, written) = match timed.value {
            Ok(()) => (ClipActivity::Stored, true),
            Err(_) => (ClipActivity::Error, false),
        };
        self.telemetry.record(partition, ClipOperation::Set, activity, Some(timed.elapsed));

        Ok(written)
    }

    pub(crate) async fn del(&self, key: &str, partition: &Partition) -> Result<()> {
        let timed = self.clock.measure(self.store.del(key, partition)).await;
        self.record_outcome(partition, ClipOperation::Del, &timed.value, timed.elapsed);
        timed.value
    }

    pub(crate) async fn clear(&self, partition: &Partition) -> Result<()> {
        let timed = self.clock.measure(self.store.clear(partition)).await;
        self.record_outcome(partition, ClipOperation::Clear, &timed.value, timed.elapsed);
        timed.value
    }

    pub(crate) async fn keys(&self, partition: &Partition) -> Result<Vec<String>> {
        let timed = self.clock.measure(self.store.keys(partition)).await;
        self.record_outcome(partition, ClipOperation::Keys, &timed.value, timed.elapsed);
        timed.value
    }

    pub(crate) fn record_outcome<R>(&self, partition: &Partition, operation: ClipOperation, result: &Result<R>, duration: std::time::Duration) {
        let activity = if result.is_ok() { ClipActivity::Ok } else { ClipActivity::Error };
        self.telemetry.record(partition, operation, activity, Some(duration));
    }

    // The outcome is recorded and otherwise dropped: a failed delete leaves a stale entry
    // that the next read evicts again.
    async fn evict(&self, key: &str, partition: &Partition) {
        let timed = self.clock.measure(self.store.del(key, partition)).await;
        let activity = match timed.value {
            Ok(()) => ClipActivity::Evicted,
            Err(_) => ClipActivity::Error,
        };
        self.telemetry.record(partition, ClipOperation::Evict, activity, Some(timed.elapsed));
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use moneyclip_store::testing::{MockStore, StoreOp};
    use tick::ClockControl;

    use super::*;
    use crate::{TelemetryConfig, telemetry::testing::ClipLog};

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        futures::executor::block_on(f)
    }

    fn accessor(store: &MockStore, control: &ClockControl) -> Accessor<MockStore> {
        Accessor::new(store.clone(), control.to_clock(), None)
    }

    #[test]
    fn set_then_get_returns_value() {
        block_on(async {
            let store = MockStore::new();
            let control = ClockControl::new();
            let accessor = accessor(&store, &control);
            let options = Options::default().with_version(3);
            let partition = Partition::default();

            assert!(accessor.set("k", "v", &options, &partition).await.unwrap());
            assert_eq!(accessor.get::<String>("k", &options, &partition).await.as_deref(), Some("v"));
        });
    }

    #[test]
    fn written_envelope_carries_version_and_clock_time() {
        block_on(async {
            let store = MockStore::new();
            let control = ClockControl::new();
            let accessor = accessor(&store, &control);
            let partition = Partition::default();

            accessor
                .set("k", &[1, 2, 3], &Options::default().with_version("v9"), &partition)
                .await
                .unwrap();

            let entry = envelope::decode(store.raw("k", &partition).as_deref()).unwrap();
            assert_eq!(entry.version(), &crate::Version::from("v9"));
            assert_eq!(entry.written_at_ms(), envelope::to_millis(control.to_clock().system_time()));
        });
    }

    #[test]
    fn expired_entry_is_evicted() {
        block_on(async {
            let store = MockStore::new();
            let control = ClockControl::new();
            let accessor = accessor(&store, &control);
            let options = Options::default().with_max_age(Duration::from_millis(100));
            let partition = Partition::default();

            accessor.set("k", &1, &options, &partition).await.unwrap();
            control.advance(Duration::from_millis(101));
            store.clear_operations();

            assert_eq!(accessor.get::<i32>("k", &options, &partition).await, None);
            assert!(!store.contains_key("k", &partition));
            assert!(store.operations().contains(&StoreOp::Del {
                key: "k".to_string(),
                partition: partition.clone(),
            }));
        });
    }

    #[test]
    fn corrupt_entry_is_a_miss_and_left_in_place() {
        block_on(async {
            let store = MockStore::new();
            let control = ClockControl::new();
            let accessor = accessor(&store, &control);
            let partition = Partition::default();

            store.put_raw("k", "not an envelope", &partition);

            assert_eq!(accessor.get::<String>("k", &Options::default(), &partition).await, None);
            assert!(store.contains_key("k", &partition));
        });
    }

    #[test]
    fn payload_of_other_type_is_a_miss_without_eviction() {
        block_on(async {
            let store = MockStore::new();
            let control = ClockControl::new();
            let accessor = accessor(&store, &control);
            let options = Options::default();
            let partition = Partition::default();

            accessor.set("k", "text", &options, &partition).await.unwrap();

            assert_eq!(accessor.get::<u64>("k", &options, &partition).await, None);
            assert!(store.contains_key("k", &partition));
        });
    }

    #[test]
    fn null_payload_is_a_miss_and_stays_in_place() {
        block_on(async {
            let store = MockStore::new();
            let control = ClockControl::new();
            let accessor = accessor(&store, &control);
            let options = Options::default();
            let partition = Partition::default();

            accessor.set("k", &serde_json::Value::Null, &options, &partition).await.unwrap();

            assert_eq!(accessor.get::<serde_json::Value>("k", &options, &partition).await, None);
            assert_eq!(accessor.get::<Option<String>>("k", &options, &partition).await, None);
            assert!(store.contains_key("k", &partition));
        });
    }

    #[test]
    fn entry_with_fractional_version_is_evicted_on_mismatch() {
        block_on(async {
            let store = MockStore::new();
            let control = ClockControl::new();
            let accessor = accessor(&store, &control);
            let partition = Partition::default();

            store.put_raw("f", r#"{"version":1.5,"time":0,"data":"x"}"#, &partition);

            let options = Options::default().with_version(2);
            assert_eq!(accessor.get::<String>("f", &options, &partition).await, None);
            assert!(!store.contains_key("f", &partition));
        });
    }

    #[test]
    fn store_read_failure_is_a_miss() {
        block_on(async {
            let store = MockStore::new();
            let control = ClockControl::new();
            let accessor = accessor(&store, &control);
            let options = Options::default();
            let partition = Partition::default();

            accessor.set("k", "v", &options, &partition).await.unwrap();
            store.fail_when(|op| matches!(op, StoreOp::Get { .. }));

            assert_eq!(accessor.get::<String>("k", &options, &partition).await, None);
        });
    }

    #[test]
    fn store_write_failure_returns_false() {
        block_on(async {
            let store = MockStore::new();
            let control = ClockControl::new();
            let accessor = accessor(&store, &control);
            store.fail_when(|op| matches!(op, StoreOp::Set { .. }));

            let written = accessor.set("k", "v", &Options::default(), &Partition::default()).await;
            assert!(!written.unwrap());
        });
    }

    #[test]
    fn eviction_failure_still_returns_none() {
        block_on(async {
            let store = MockStore::new();
            let control = ClockControl::new();
            let accessor = accessor(&store, &control);
            let partition = Partition::default();

            accessor.set("k", "v", &Options::default().with_version(1), &partition).await.unwrap();
            store.fail_when(|op| matches!(op, StoreOp::Del { .. }));

            let options = Options::default().with_version(2);
            assert_eq!(accessor.get::<String>("k", &options, &partition).await, None);
            assert!(store.contains_key("k", &partition));
        });
    }

    #[test]
    fn unencodable_value_is_an_error_and_nothing_is_written() {
        block_on(async {
            let store = MockStore::new();
            let control = ClockControl::new();
            let accessor = accessor(&store, &control);

            let mut map = std::collections::HashMap::new();
            map.insert((1, 2), "tuple keys have no JSON form");

            accessor
                .set("k", &map, &Options::default(), &Partition::default())
                .await
                .unwrap_err();
            assert!(store.operations().is_empty());
        });
    }

    #[test]
    fn partition_for_uses_default_without_name() {
        let store = MockStore::new();
        let accessor = accessor(&store, &ClockControl::new());

        assert_eq!(accessor.partition_for(&Options::default()), Partition::default());
        assert_eq!(
            accessor.partition_for(&Options::default().with_partition("p")),
            Partition::named("p")
        );
    }

    #[test]
    fn outcomes_are_logged() {
        block_on(async {
            let log = ClipLog::new();
            let _guard = log.install();

            let store = MockStore::new();
            let control = ClockControl::new();
            let telemetry = TelemetryConfig::new().with_logs().build();
            let accessor = Accessor::new(store.clone(), control.to_clock(), Some(telemetry));
            let partition = Partition::named("logged");
            let options = Options::default().with_max_age(Duration::from_millis(10));

            accessor.get::<String>("missing", &options, &partition).await;
            accessor.set("k", "v", &options, &partition).await.unwrap();
            accessor.get::<String>("k", &options, &partition).await;
            control.advance(Duration::from_millis(11));
            accessor.get::<String>("k", &options, &partition).await;

            log.assert_event(tracing::Level::DEBUG, ClipOperation::Get, ClipActivity::Miss);
            log.assert_event(tracing::Level::INFO, ClipOperation::Set, ClipActivity::Stored);
            log.assert_event(tracing::Level::DEBUG, ClipOperation::Get, ClipActivity::Hit);
            log.assert_event(tracing::Level::INFO, ClipOperation::Get, ClipActivity::Expired);
            log.assert_event(tracing::Level::INFO, ClipOperation::Evict, ClipActivity::Evicted);
            log.assert_partition("logged");
        });
    }

    #[test]
    fn failed_eviction_is_logged_as_error() {
        block_on(async {
            let log = ClipLog::new();
            let _guard = log.install();

            let store = MockStore::new();
            let telemetry = TelemetryConfig::new().with_logs().build();
            let accessor = Accessor::new(store.clone(), ClockControl::new().to_clock(), Some(telemetry));
            let partition = Partition::default();

            accessor.set("k", "v", &Options::default().with_version(1), &partition).await.unwrap();
            store.fail_when(|op| matches!(op, StoreOp::Del { .. }));
            accessor.get::<String>("k", &Options::default().with_version(2), &partition).await;

            log.assert_event(tracing::Level::INFO, ClipOperation::Get, ClipActivity::VersionMismatch);
            log.assert_event(tracing::Level::ERROR, ClipOperation::Evict, ClipActivity::Error);
        });
    }
}
