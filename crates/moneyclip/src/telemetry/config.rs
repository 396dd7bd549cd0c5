// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Telemetry configuration.

#[cfg(any(feature = "metrics", test))]
use opentelemetry::metrics::{Meter, MeterProvider};

use crate::telemetry::ClipTelemetry;
#[cfg(any(feature = "logs", feature = "metrics", test))]
use crate::telemetry::recorder::ClipTelemetryInner;

/// Configuration for cache telemetry.
///
/// Everything is disabled until enabled explicitly. Build the configuration into a
/// [`ClipTelemetry`] and pass it to [`MoneyClipBuilder::telemetry`](crate::MoneyClipBuilder::telemetry).
///
/// # Examples
///
/// ```
/// # #[cfg(all(feature = "logs", feature = "memory"))]
/// # {
/// use moneyclip::{MoneyClip, TelemetryConfig};
/// use tick::Clock;
///
/// let telemetry = TelemetryConfig::new().with_logs().build();
/// let clip = MoneyClip::builder(Clock::new_frozen())
///     .memory()
///     .telemetry(telemetry)
///     .build();
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct TelemetryConfig {
    #[cfg(any(feature = "logs", test))]
    logs_enabled: bool,
    #[cfg(any(feature = "metrics", test))]
    meter: Option<Meter>,
}

impl TelemetryConfig {
    /// Creates a configuration with everything disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables structured `tracing` events for every cache outcome.
    #[cfg(any(feature = "logs", test))]
    #[must_use]
    pub fn with_logs(self) -> Self {
        Self {
            logs_enabled: true,
            ..self
        }
    }

    /// Enables OpenTelemetry metrics using the provided meter provider.
    #[cfg(any(feature = "metrics", test))]
    #[must_use]
    pub fn with_metrics(mut self, provider: &dyn MeterProvider) -> Self {
        use crate::telemetry::metrics;
        self.meter = Some(metrics::create_meter(provider));
        self
    }

    /// Builds the telemetry sink.
    #[must_use]
    pub fn build(self) -> ClipTelemetry {
        #[cfg(not(any(feature = "logs", feature = "metrics", test)))]
        {
            return ClipTelemetry {};
        }

        #[cfg(any(feature = "logs", feature = "metrics", test))]
        {
            #[cfg(any(feature = "metrics", test))]
            let (event_counter, operation_duration) = {
                use crate::telemetry::metrics::{create_event_counter, create_operation_duration_histogram};
                (
                    self.meter.as_ref().map(create_event_counter),
                    self.meter.as_ref().map(create_operation_duration_histogram),
                )
            };

            ClipTelemetry {
                inner: std::sync::Arc::new(ClipTelemetryInner {
                    #[cfg(any(feature = "logs", test))]
                    logging_enabled: self.logs_enabled,
                    #[cfg(any(feature = "metrics", test))]
                    event_counter,
                    #[cfg(any(feature = "metrics", test))]
                    operation_duration,
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_disables_everything() {
        let config = TelemetryConfig::new();
        assert!(!config.logs_enabled);
        assert!(config.meter.is_none());
    }

    #[test]
    fn with_logs_enables_logging_only() {
        let telemetry = TelemetryConfig::new().with_logs().build();
        assert!(telemetry.inner.logging_enabled);
        assert!(telemetry.inner.event_counter.is_none());
        assert!(telemetry.inner.operation_duration.is_none());
    }

    #[test]
    fn with_metrics_creates_instruments() {
        let metrics = crate::telemetry::testing::ClipMetrics::new();
        let telemetry = TelemetryConfig::new().with_metrics(metrics.provider()).build();
        assert!(!telemetry.inner.logging_enabled);
        assert!(telemetry.inner.event_counter.is_some());
        assert!(telemetry.inner.operation_duration.is_some());
    }
}
