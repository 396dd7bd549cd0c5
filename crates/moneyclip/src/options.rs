// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Cache policy options and per-call overrides.
//!
//! [`Options`] is a fully resolved policy: how old an entry may get, which schema version
//! is current, and which partition to address. Client-wide defaults are fixed once when the
//! client is built; each call or scoped cache supplies [`Overrides`], which are merged on top
//! with [`Options::merge`]. Nothing here is ever mutated in place.
//!
//! Both types implement `serde` traits so policies can come straight from configuration:
//!
//! ```
//! use moneyclip::{Overrides, Version};
//! use std::time::Duration;
//!
//! let overrides: Overrides =
//!     serde_json::from_str(r#"{ "max_age_ms": 100, "version": "v2", "partition_name": "users" }"#)?;
//!
//! assert_eq!(overrides, Overrides::new().max_age(Duration::from_millis(100)).version("v2").partition("users"));
//! # Ok::<(), serde_json::Error>(())
//! ```

use std::{fmt, time::Duration};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;

/// Schema version tag stored with every entry.
///
/// Versions are identity tags compared with strict equality, never ordered. A number and
/// a string are different tags even when they print the same: `Version::from(1)` does not
/// match `Version::from("1")`. Any JSON number is accepted, so entries tagged with a
/// fractional version still decode and are invalidated as a mismatch.
///
/// The default is the sentinel `Version::Number(0)`. Leaving the version unset and setting
/// it to the sentinel explicitly are indistinguishable.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Version {
    /// A numeric tag.
    Number(Number),
    /// A string tag.
    Text(String),
}

impl Default for Version {
    fn default() -> Self {
        Self::Number(Number::from(0_u64))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<Number> for Version {
    fn from(value: Number) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for Version {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<i32> for Version {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<u32> for Version {
    fn from(value: u32) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for Version {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for Version {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Version {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Upper bound on how long an entry stays valid after it was written.
///
/// Serialized as an integer number of milliseconds, with `null` meaning unbounded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<u64>", into = "Option<u64>")]
pub enum MaxAge {
    /// Entries never expire by age.
    #[default]
    Unbounded,
    /// Entries expire once they are older than the duration.
    Within(Duration),
}

impl MaxAge {
    /// Returns the bound, or `None` when unbounded.
    #[must_use]
    pub fn as_duration(self) -> Option<Duration> {
        match self {
            Self::Unbounded => None,
            Self::Within(duration) => Some(duration),
        }
    }
}

impl From<Duration> for MaxAge {
    fn from(value: Duration) -> Self {
        Self::Within(value)
    }
}

impl From<Option<u64>> for MaxAge {
    fn from(value: Option<u64>) -> Self {
        value.map_or(Self::Unbounded, |millis| Self::Within(Duration::from_millis(millis)))
    }
}

impl From<MaxAge> for Option<u64> {
    fn from(value: MaxAge) -> Self {
        value
            .as_duration()
            .map(|duration| u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }
}

/// A fully resolved cache policy.
///
/// # Examples
///
/// ```
/// use moneyclip::{MaxAge, Options, Overrides, Version};
/// use std::time::Duration;
///
/// let defaults = Options::default().with_max_age(Duration::from_secs(60));
/// let merged = defaults.merge(&Overrides::new().version(3));
///
/// assert_eq!(merged.max_age(), MaxAge::Within(Duration::from_secs(60)));
/// assert_eq!(merged.version(), &Version::from(3));
/// assert_eq!(merged.partition_name(), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    #[serde(rename = "max_age_ms")]
    max_age: MaxAge,
    version: Version,
    partition_name: Option<String>,
}

impl Options {
    /// Returns the maximum entry age.
    #[must_use]
    pub fn max_age(&self) -> MaxAge {
        self.max_age
    }

    /// Returns the active schema version.
    #[must_use]
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Returns the partition name, or `None` for the store's default partition.
    #[must_use]
    pub fn partition_name(&self) -> Option<&str> {
        self.partition_name.as_deref()
    }

    /// Returns a copy with the given maximum age.
    #[must_use]
    pub fn with_max_age(mut self, max_age: impl Into<MaxAge>) -> Self {
        self.max_age = max_age.into();
        self
    }

    /// Returns a copy with the given schema version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<Version>) -> Self {
        self.version = version.into();
        self
    }

    /// Returns a copy addressing the named partition.
    #[must_use]
    pub fn with_partition(mut self, name: impl Into<String>) -> Self {
        self.partition_name = Some(name.into());
        self
    }

    /// Overlays every field set in `overrides` on top of these options.
    #[must_use]
    pub fn merge(&self, overrides: &Overrides) -> Self {
        Self {
            max_age: overrides.max_age.unwrap_or(self.max_age),
            version: overrides.version.clone().unwrap_or_else(|| self.version.clone()),
            partition_name: overrides.partition_name.clone().or_else(|| self.partition_name.clone()),
        }
    }
}

/// Partial options supplied per call or per scoped cache.
///
/// Unset fields fall back to the client defaults when merged. When loaded from
/// configuration, leaving `max_age_ms` out inherits the default bound while an explicit
/// `null` lifts it.
///
/// # Examples
///
/// ```
/// use moneyclip::Overrides;
/// use std::time::Duration;
///
/// let overrides = Overrides::new()
///     .max_age(Duration::from_millis(100))
///     .version(5)
///     .partition("thumbnails");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Overrides {
    // Missing inherits the default bound; an explicit `null` lifts it.
    #[serde(
        rename = "max_age_ms",
        deserialize_with = "present_max_age",
        skip_serializing_if = "Option::is_none"
    )]
    max_age: Option<MaxAge>,
    version: Option<Version>,
    partition_name: Option<String>,
}

impl Overrides {
    /// Creates overrides that change nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the maximum entry age.
    #[must_use]
    pub fn max_age(mut self, max_age: impl Into<MaxAge>) -> Self {
        self.max_age = Some(max_age.into());
        self
    }

    /// Lifts any age bound set by the defaults.
    #[must_use]
    pub fn unbounded_age(self) -> Self {
        self.max_age(MaxAge::Unbounded)
    }

    /// Overrides the schema version.
    #[must_use]
    pub fn version(mut self, version: impl Into<Version>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Overrides the partition.
    #[must_use]
    pub fn partition(mut self, name: impl Into<String>) -> Self {
        self.partition_name = Some(name.into());
        self
    }
}

fn present_max_age<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<MaxAge>, D::Error> {
    MaxAge::deserialize(deserializer).map(Some)
}

impl From<&Options> for Overrides {
    fn from(options: &Options) -> Self {
        Self {
            max_age: Some(options.max_age),
            version: Some(options.version.clone()),
            partition_name: options.partition_name.clone(),
        }
    }
}
