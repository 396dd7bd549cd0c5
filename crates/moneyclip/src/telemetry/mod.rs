// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Telemetry for cache outcomes.
//!
//! Every accessor outcome (hit, miss, eviction, store failure, ...) is recorded as a
//! structured `tracing` event when the `logs` feature is enabled, and as OpenTelemetry
//! metrics when the `metrics` feature is enabled and a meter provider is configured.

#[cfg(any(feature = "logs", feature = "metrics", test))]
use std::sync::Arc;

#[cfg(any(feature = "logs", feature = "metrics", test))]
use recorder::ClipTelemetryInner;

pub(crate) mod attributes;
pub(crate) mod config;
pub(crate) mod ext;
#[cfg(any(feature = "metrics", test))]
pub(crate) mod metrics;
#[cfg(any(feature = "logs", feature = "metrics", test))]
pub(crate) mod recorder;
#[cfg(test)]
pub(crate) mod testing;

/// Telemetry sink for cache outcomes.
///
/// Build one with [`TelemetryConfig`](crate::TelemetryConfig) and pass it to
/// [`MoneyClipBuilder::telemetry`](crate::MoneyClipBuilder::telemetry).
#[derive(Clone, Debug)]
pub struct ClipTelemetry {
    #[cfg(any(feature = "logs", feature = "metrics", test))]
    inner: Arc<ClipTelemetryInner>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClipOperation {
    Get,
    Set,
    GetAll,
    Evict,
    Del,
    Clear,
    Keys,
}

impl ClipOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "clip.get",
            Self::Set => "clip.set",
            Self::GetAll => "clip.get_all",
            Self::Evict => "clip.evict",
            Self::Del => "clip.del",
            Self::Clear => "clip.clear",
            Self::Keys => "clip.keys",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClipActivity {
    Hit,
    Miss,
    Corrupt,
    Expired,
    VersionMismatch,
    Evicted,
    Stored,
    Ok,
    Error,
}

impl ClipActivity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "clip.hit",
            Self::Miss => "clip.miss",
            Self::Corrupt => "clip.corrupt",
            Self::Expired => "clip.expired",
            Self::VersionMismatch => "clip.version_mismatch",
            Self::Evicted => "clip.evicted",
            Self::Stored => "clip.stored",
            Self::Ok => "clip.ok",
            Self::Error => "clip.error",
        }
    }

    #[cfg(any(feature = "logs", test))]
    pub fn severity(self) -> Severity {
        match self {
            Self::Hit | Self::Miss | Self::Ok => Severity::Debug,
            Self::Corrupt | Self::Expired | Self::VersionMismatch | Self::Evicted | Self::Stored => Severity::Info,
            Self::Error => Severity::Error,
        }
    }
}

#[cfg(any(feature = "logs", test))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Severity {
    Debug,
    Info,
    Error,
}
