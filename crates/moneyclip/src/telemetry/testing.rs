// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! In-memory sinks for asserting on recorded cache outcomes.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use opentelemetry::KeyValue;
use opentelemetry_sdk::metrics::data::{AggregatedMetrics, MetricData, ResourceMetrics, ScopeMetrics};
use opentelemetry_sdk::metrics::{InMemoryMetricExporter, SdkMeterProvider};
use tracing::Level;
use tracing_subscriber::{fmt::MakeWriter, layer::SubscriberExt};

use crate::telemetry::metrics::{CLIP_EVENT_COUNT_NAME, CLIP_OPERATION_DURATION_NAME};
use crate::telemetry::{ClipActivity, ClipOperation, attributes};

/// Meter provider whose `clip.*` instruments can be queried per outcome.
#[derive(Debug)]
pub(crate) struct ClipMetrics {
    exporter: InMemoryMetricExporter,
    provider: SdkMeterProvider,
}

impl ClipMetrics {
    pub fn new() -> Self {
        let exporter = InMemoryMetricExporter::default();
        let provider = SdkMeterProvider::builder().with_periodic_exporter(exporter.clone()).build();
        Self { exporter, provider }
    }

    pub fn provider(&self) -> &SdkMeterProvider {
        &self.provider
    }

    /// Counted events for one partition, operation and activity.
    pub fn events(&self, partition: &str, operation: ClipOperation, activity: ClipActivity) -> u64 {
        let wanted = [
            KeyValue::new(attributes::CLIP_PARTITION_NAME, partition.to_owned()),
            KeyValue::new(attributes::CLIP_OPERATION_NAME, operation.as_str()),
            KeyValue::new(attributes::CLIP_ACTIVITY_NAME, activity.as_str()),
        ];

        let Some(snapshot) = self.snapshot() else {
            return 0;
        };

        snapshot
            .scope_metrics()
            .flat_map(ScopeMetrics::metrics)
            .filter(|metric| metric.name() == CLIP_EVENT_COUNT_NAME)
            .filter_map(|metric| match metric.data() {
                AggregatedMetrics::U64(MetricData::Sum(sum)) => Some(sum),
                _ => None,
            })
            .flat_map(|sum| sum.data_points())
            .filter(|point| carries_all(point.attributes(), &wanted))
            .map(|point| point.value())
            .sum()
    }

    /// Number of store call durations recorded for `operation`, over every outcome.
    pub fn timings(&self, operation: ClipOperation) -> u64 {
        let wanted = [KeyValue::new(attributes::CLIP_OPERATION_NAME, operation.as_str())];

        let Some(snapshot) = self.snapshot() else {
            return 0;
        };

        snapshot
            .scope_metrics()
            .flat_map(ScopeMetrics::metrics)
            .filter(|metric| metric.name() == CLIP_OPERATION_DURATION_NAME)
            .filter_map(|metric| match metric.data() {
                AggregatedMetrics::F64(MetricData::Histogram(histogram)) => Some(histogram),
                _ => None,
            })
            .flat_map(|histogram| histogram.data_points())
            .filter(|point| carries_all(point.attributes(), &wanted))
            .map(|point| point.count())
            .sum()
    }

    // Temporality is cumulative, so the newest export holds every count so far.
    fn snapshot(&self) -> Option<ResourceMetrics> {
        self.provider.force_flush().unwrap();
        self.exporter.get_finished_metrics().unwrap().pop()
    }
}

fn carries_all<'a>(attributes: impl Iterator<Item = &'a KeyValue>, wanted: &[KeyValue]) -> bool {
    let attributes: Vec<_> = attributes.collect();
    wanted.iter().all(|kv| attributes.contains(&kv))
}

/// Formatted `tracing` output of the current thread, one entry per event.
#[derive(Clone, Debug, Default)]
pub(crate) struct ClipLog(Arc<Mutex<Vec<u8>>>);

impl ClipLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes this thread's events into the log until the guard drops.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .with_writer(self.clone())
                .with_ansi(false),
        );
        tracing::subscriber::set_default(subscriber)
    }

    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.lock().unwrap())
            .lines()
            .map(str::to_owned)
            .collect()
    }

    /// Asserts that one `clip.event` line carries `level`, `operation` and `activity` together.
    pub fn assert_event(&self, level: Level, operation: ClipOperation, activity: ClipActivity) {
        let level = level.to_string();
        let operation = format!("{}={:?}", attributes::CLIP_OPERATION_NAME, operation.as_str());
        let activity = format!("{}={:?}", attributes::CLIP_ACTIVITY_NAME, activity.as_str());

        let lines = self.lines();
        assert!(
            lines.iter().any(|line| line.contains(attributes::CLIP_EVENT_NAME)
                && line.contains(&level)
                && line.contains(&operation)
                && line.contains(&activity)),
            "no {level} event with {operation} {activity} in:\n{}",
            lines.join("\n")
        );
    }

    /// Asserts that some line mentions `partition`.
    pub fn assert_partition(&self, partition: &str) {
        let lines = self.lines();
        assert!(
            lines.iter().any(|line| line.contains(partition)),
            "partition '{partition}' never logged:\n{}",
            lines.join("\n")
        );
    }
}

impl Write for ClipLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for ClipLog {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
