// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#[cfg(any(feature = "metrics", test))]
pub(crate) const CLIP_PARTITION_NAME: &str = "clip.partition";

#[cfg(test)]
pub(crate) const CLIP_EVENT_NAME: &str = "clip.event";

#[cfg(any(feature = "metrics", test))]
pub(crate) const CLIP_OPERATION_NAME: &str = "clip.operation";

#[cfg(any(feature = "metrics", test))]
pub(crate) const CLIP_ACTIVITY_NAME: &str = "clip.activity";

#[cfg(test)]
pub(crate) const CLIP_DURATION_NAME: &str = "clip.duration_ns";
