// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Helpers shared by the accessor paths: timing store calls and recording their outcome.

use std::time::Duration;

use moneyclip_store::Partition;
use tick::Clock;

use crate::telemetry::{ClipActivity, ClipOperation, ClipTelemetry};

/// Output of a store call together with how long it took on the client's clock.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Timed<R> {
    pub value: R,
    pub elapsed: Duration,
}

pub(crate) trait ClockExt {
    /// Awaits `call`, measuring it with this clock's monotonic time.
    fn measure<F, R>(&self, call: F) -> impl Future<Output = Timed<R>> + Send
    where
        F: Future<Output = R> + Send,
        R: Send;
}

impl ClockExt for Clock {
    fn measure<F, R>(&self, call: F) -> impl Future<Output = Timed<R>> + Send
    where
        F: Future<Output = R> + Send,
        R: Send,
    {
        let started = self.instant();
        async move {
            let value = call.await;
            Timed {
                value,
                elapsed: self.instant().saturating_duration_since(started),
            }
        }
    }
}

pub(crate) trait ClipTelemetryExt {
    fn record(&self, partition: &Partition, operation: ClipOperation, activity: ClipActivity, elapsed: Option<Duration>);
}

// Lets the accessor record unconditionally; an unconfigured client drops everything.
impl ClipTelemetryExt for Option<ClipTelemetry> {
    #[allow(unused_variables, reason = "Nothing to record into without logs or metrics")]
    fn record(&self, partition: &Partition, operation: ClipOperation, activity: ClipActivity, elapsed: Option<Duration>) {
        #[cfg(any(feature = "logs", feature = "metrics", test))]
        if let Some(telemetry) = self {
            telemetry.record(partition, operation, activity, elapsed);
        }
    }
}
