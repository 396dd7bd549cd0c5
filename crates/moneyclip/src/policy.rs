// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Expiration policy.
//!
//! An entry is valid when its version equals the active version exactly and it is no older
//! than the maximum age. Age is measured from the recorded write time to `now`; an entry
//! written in the future has age zero.

use std::time::{Duration, SystemTime};

use crate::{Envelope, Options, envelope::to_millis};

/// Outcome of checking an entry against the active options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// The entry may be returned.
    Valid,
    /// The entry was written under a different schema version.
    VersionMismatch,
    /// The entry is older than the maximum age.
    Expired,
}

impl Verdict {
    /// Checks `envelope` against `options` at time `now`.
    ///
    /// The version is checked first, so an entry that is both stale and mismatched reports
    /// [`Verdict::VersionMismatch`].
    ///
    /// # Examples
    ///
    /// ```
    /// use moneyclip::{Options, Verdict, envelope};
    /// use std::time::{Duration, UNIX_EPOCH};
    ///
    /// let written = UNIX_EPOCH + Duration::from_secs(10);
    /// let entry = envelope::decode(Some(&envelope::encode(&1, &1.into(), written)?))?;
    /// let options = Options::default().with_version(1).with_max_age(Duration::from_millis(100));
    ///
    /// assert_eq!(Verdict::check(&entry, &options, written + Duration::from_millis(100)), Verdict::Valid);
    /// assert_eq!(Verdict::check(&entry, &options, written + Duration::from_millis(101)), Verdict::Expired);
    /// assert_eq!(Verdict::check(&entry, &options.with_version(2), written), Verdict::VersionMismatch);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[must_use]
    pub fn check<T>(envelope: &Envelope<T>, options: &Options, now: SystemTime) -> Self {
        if envelope.version() != options.version() {
            return Self::VersionMismatch;
        }

        match options.max_age().as_duration() {
            Some(max_age) if age(envelope.written_at_ms(), now) > max_age => Self::Expired,
            _ => Self::Valid,
        }
    }

    /// Returns `true` for [`Verdict::Valid`].
    #[must_use]
    pub fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Shorthand for `Verdict::check(envelope, options, now).is_valid()`.
#[must_use]
pub fn is_valid<T>(envelope: &Envelope<T>, options: &Options, now: SystemTime) -> bool {
    Verdict::check(envelope, options, now).is_valid()
}

fn age(written_at_ms: u64, now: SystemTime) -> Duration {
    Duration::from_millis(to_millis(now).saturating_sub(written_at_ms))
}
