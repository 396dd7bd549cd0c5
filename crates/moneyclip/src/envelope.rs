// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Wire format of persisted entries.
//!
//! Every value is stored wrapped in an envelope that records the schema version and the
//! write time, serialized as a JSON object with exactly three fields:
//!
//! ```json
//! { "version": 1, "time": 1700000000000, "data": { "any": "payload" } }
//! ```
//!
//! `time` is the write time in whole milliseconds since the Unix epoch.

use std::{
    fmt,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{Error, Version};

/// A decoded entry: payload plus the metadata it was written with.
///
/// The payload type defaults to a generic JSON [`Value`] so validity can be decided
/// before the payload is bound to the caller's type with [`Envelope::into_payload`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    version: Version,
    #[serde(rename = "time")]
    written_at_ms: u64,
    data: T,
}

impl<T> Envelope<T> {
    /// Returns the version the entry was written with.
    #[must_use]
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Returns the write time in milliseconds since the Unix epoch.
    #[must_use]
    pub fn written_at_ms(&self) -> u64 {
        self.written_at_ms
    }

    /// Returns the write time.
    #[must_use]
    pub fn written_at(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(self.written_at_ms)
    }

    /// Returns the stored payload.
    #[must_use]
    pub fn payload(&self) -> &T {
        &self.data
    }
}

impl Envelope<Value> {
    /// Binds the payload to the caller's type.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeFailure`] with [`DecodeReason::PayloadMismatch`] if the payload
    /// does not deserialize into `T`.
    pub fn into_payload<T: DeserializeOwned>(self) -> Result<T, DecodeFailure> {
        serde_json::from_value(self.data).map_err(|e| DecodeFailure::caused_by(DecodeReason::PayloadMismatch, e))
    }
}

/// Why an entry could not be decoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeReason {
    /// The store held no value.
    Absent,
    /// The stored text is not a well-formed envelope.
    Malformed,
    /// The envelope is well-formed but its payload has a different shape than requested.
    PayloadMismatch,
}

impl fmt::Display for DecodeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Absent => "no value stored",
            Self::Malformed => "malformed envelope",
            Self::PayloadMismatch => "payload does not match the requested type",
        })
    }
}

/// An entry could not be turned back into an [`Envelope`] or payload.
///
/// Callers of the cache never see this: every decode failure is a miss.
#[ohno::error]
#[display("cache entry could not be decoded: {reason}")]
pub struct DecodeFailure {
    reason: DecodeReason,
}

impl DecodeFailure {
    /// Returns what went wrong.
    #[must_use]
    pub fn reason(&self) -> DecodeReason {
        self.reason
    }
}

/// Wraps `value` in an envelope tagged with `version` and `written_at`, as JSON text.
///
/// Write times before the Unix epoch are recorded as zero.
///
/// # Errors
///
/// Returns an error if `value` cannot be represented as JSON, for example a map whose
/// keys are not strings. This is the only hard error the cache raises.
///
/// # Examples
///
/// ```
/// use moneyclip::{Version, envelope};
/// use std::time::{Duration, UNIX_EPOCH};
///
/// let raw = envelope::encode(&"value", &Version::from(1), UNIX_EPOCH + Duration::from_millis(42))?;
/// assert_eq!(raw, r#"{"version":1,"time":42,"data":"value"}"#);
/// # Ok::<(), moneyclip::Error>(())
/// ```
pub fn encode<T: Serialize + ?Sized>(value: &T, version: &Version, written_at: SystemTime) -> Result<String, Error> {
    let envelope = Envelope {
        version: version.clone(),
        written_at_ms: to_millis(written_at),
        data: value,
    };
    serde_json::to_string(&envelope).map_err(Error::from_message)
}

/// Parses raw store text back into an envelope.
///
/// # Errors
///
/// Returns a [`DecodeFailure`] if `raw` is `None` ([`DecodeReason::Absent`]) or is not a
/// well-formed envelope ([`DecodeReason::Malformed`]).
///
/// # Examples
///
/// ```
/// use moneyclip::envelope::{self, DecodeReason};
///
/// let entry = envelope::decode(Some(r#"{"version":"v1","time":42,"data":[1,2]}"#))?;
/// assert_eq!(entry.written_at_ms(), 42);
/// assert_eq!(entry.into_payload::<Vec<u8>>()?, vec![1, 2]);
///
/// assert_eq!(envelope::decode(None).unwrap_err().reason(), DecodeReason::Absent);
/// assert_eq!(envelope::decode(Some("{")).unwrap_err().reason(), DecodeReason::Malformed);
/// # Ok::<(), envelope::DecodeFailure>(())
/// ```
pub fn decode(raw: Option<&str>) -> Result<Envelope, DecodeFailure> {
    let raw = raw.ok_or_else(|| DecodeFailure::new(DecodeReason::Absent))?;
    serde_json::from_str(raw).map_err(|e| DecodeFailure::caused_by(DecodeReason::Malformed, e))
}

pub(crate) fn to_millis(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map_or(0, |since_epoch| u64::try_from(since_epoch.as_millis()).unwrap_or(u64::MAX))
}
