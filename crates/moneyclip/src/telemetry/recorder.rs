// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Recording of cache outcomes.

use std::time::Duration;

use moneyclip_store::Partition;
#[cfg(any(feature = "metrics", test))]
use opentelemetry::{
    KeyValue,
    metrics::{Counter, Histogram},
};

#[cfg(any(feature = "logs", test))]
use crate::telemetry::Severity;
#[cfg(any(feature = "metrics", test))]
use crate::telemetry::attributes;
use crate::telemetry::{ClipActivity, ClipOperation, ClipTelemetry};

#[derive(Debug, Default)]
pub(crate) struct ClipTelemetryInner {
    #[cfg(any(feature = "logs", test))]
    pub(crate) logging_enabled: bool,
    #[cfg(any(feature = "metrics", test))]
    pub(crate) event_counter: Option<Counter<u64>>,
    #[cfg(any(feature = "metrics", test))]
    pub(crate) operation_duration: Option<Histogram<f64>>,
}

impl ClipTelemetry {
    /// Records one outcome of a cache operation against `partition`.
    #[allow(unused_variables, reason = "Parts are no-ops depending on enabled features")]
    pub(crate) fn record(&self, partition: &Partition, operation: ClipOperation, activity: ClipActivity, duration: Option<Duration>) {
        #[cfg(any(feature = "metrics", test))]
        if self.inner.event_counter.is_some() || self.inner.operation_duration.is_some() {
            let attrs = [
                KeyValue::new(attributes::CLIP_PARTITION_NAME, partition.to_string()),
                KeyValue::new(attributes::CLIP_OPERATION_NAME, operation.as_str()),
                KeyValue::new(attributes::CLIP_ACTIVITY_NAME, activity.as_str()),
            ];

            if let Some(c) = &self.inner.event_counter {
                c.add(1, &attrs);
            }

            if let (Some(d), Some(h)) = (duration, &self.inner.operation_duration) {
                h.record(d.as_secs_f64(), &attrs);
            }
        }

        #[cfg(any(feature = "logs", test))]
        if self.inner.logging_enabled {
            Self::emit(partition, operation, activity, duration);
        }
    }

    #[cfg(any(feature = "logs", test))]
    fn emit(partition: &Partition, operation: ClipOperation, activity: ClipActivity, duration: Option<Duration>) {
        let op = operation.as_str();
        let act = activity.as_str();
        let duration_ns = duration.map(|d| d.as_nanos());

        // Tracing levels must be constant. Field names must match attributes.rs.
        macro_rules! emit_event {
            ($level:ident) => {
                tracing::$level!(
                    clip.partition = %partition,
                    clip.operation = op,
                    clip.activity = act,
                    clip.duration_ns = ?duration_ns,
                    "clip.event"
                )
            };
        }

        match activity.severity() {
            Severity::Error => emit_event!(error),
            Severity::Info => emit_event!(info),
            Severity::Debug => emit_event!(debug),
        }
    }
}
